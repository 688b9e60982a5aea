//! arena-backed document tree shared by the html and xml parser families
//!
//! nodes live in a flat `Vec` and refer to each other by [`NodeId`]. rewriting
//! the tree (decomposition, reconstruction) replaces a slot's payload in place,
//! so ids handed out by a traversal stay valid while the tree is mutated.
//! slots unlinked by a rewrite stay in the arena but are no longer reachable
//! from the root.

mod node;
mod parse;
mod serialize;

pub use node::{Attribute, Element, Node, NodeData, NodeId};

use crate::error::Result;
use crate::hash::Hash;
use crate::types::DocumentKind;

/// tag-name prefix that encodes a fragment reference in stored bytes
pub const PLACEHOLDER_PREFIX: &str = "sha256_";

/// html elements that never have content or an end tag
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// html elements whose content is raw text, never markup or entities
pub(crate) const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// html elements whose content is text with entities but no markup
pub(crate) const ESCAPABLE_RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "title"];

/// markup preceding the root element
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrologItem {
    /// `<?xml ...?>`, always re-emitted in canonical form
    Declaration,
    Doctype(String),
    Comment(String),
    ProcessingInstruction(String),
}

/// how element names carrying [`PLACEHOLDER_PREFIX`] are treated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ParseMode {
    /// user input: the prefix is reserved and rejected
    Source,
    /// fragment store content: the prefix marks a [`NodeData::FragmentRef`]
    Stored,
}

/// a parsed html or xml document
#[derive(Clone, Debug)]
pub struct Document {
    kind: DocumentKind,
    nodes: Vec<Node>,
    root: NodeId,
    prolog: Vec<PrologItem>,
}

impl Document {
    /// parse user-supplied document bytes
    pub fn parse(bytes: &[u8], kind: DocumentKind) -> Result<Self> {
        parse::parse(bytes, kind, ParseMode::Source)
    }

    /// parse bytes produced by decomposition, resolving placeholder tags
    pub(crate) fn parse_stored(bytes: &[u8], kind: DocumentKind) -> Result<Self> {
        parse::parse(bytes, kind, ParseMode::Stored)
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn prolog(&self) -> &[PrologItem] {
        &self.prolog
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes[id.0].as_element()
    }

    /// element children of `id`, skipping comments and processing instructions
    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.node(*c).is_element())
            .collect()
    }

    /// reachable nodes, children before parents, root last
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            stack.push((id, true));
            for child in self.children(id).iter().rev() {
                stack.push((*child, false));
            }
        }

        order
    }

    /// reachable nodes, parents before children
    pub fn pre_order(&self) -> Vec<NodeId> {
        self.pre_order_from(self.root)
    }

    fn pre_order_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            order.push(id);
            for child in self.children(id).iter().rev() {
                stack.push(*child);
            }
        }

        order
    }

    /// fragment references at or below `start`, in document order
    pub fn fragment_refs(&self, start: NodeId) -> Vec<(NodeId, Hash)> {
        self.pre_order_from(start)
            .into_iter()
            .filter_map(|id| self.node(id).fragment_ref().map(|hash| (id, hash)))
            .collect()
    }

    /// swap a subtree for a reference to the fragment it was stored as
    ///
    /// the tail goes too: it was serialized into the fragment bytes.
    pub(crate) fn replace_with_ref(&mut self, id: NodeId, hash: Hash) {
        let node = &mut self.nodes[id.0];
        node.data = NodeData::FragmentRef(hash);
        node.children.clear();
        node.tail.clear();
    }

    /// put a parsed fragment in place of the node at `id`
    ///
    /// returns the fragment references the grafted subtree brought along,
    /// in document order.
    pub(crate) fn graft(&mut self, id: NodeId, fragment: Document, tail: String) -> Vec<(NodeId, Hash)> {
        let Document {
            nodes: mut frag_nodes,
            root: frag_root,
            ..
        } = fragment;

        let top = std::mem::replace(
            &mut frag_nodes[frag_root.0],
            Node::new(NodeData::Comment(String::new()), None),
        );

        let mut children = Vec::with_capacity(top.children.len());
        for child in &top.children {
            children.push(self.import(&frag_nodes, *child, id));
        }

        let node = &mut self.nodes[id.0];
        node.data = top.data;
        node.children = children;
        node.tail = tail;

        self.fragment_refs(id)
    }

    /// copy a subtree from another arena, returning its new id
    fn import(&mut self, from: &[Node], src: NodeId, parent: NodeId) -> NodeId {
        let source = &from[src.0];
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(source.data.clone(), Some(parent));
        node.tail = source.tail.clone();
        self.nodes.push(node);

        let children: Vec<NodeId> = source
            .children
            .iter()
            .map(|child| self.import(from, *child, id))
            .collect();
        self.nodes[id.0].children = children;

        id
    }
}
