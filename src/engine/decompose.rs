use std::iter::FusedIterator;

use crate::document::{Document, NodeId};
use crate::hash::{compute_hash, Hash};

/// a serialized subtree and the digest it is stored under
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub hash: Hash,
    pub bytes: Vec<u8>,
}

impl Fragment {
    /// wrap bytes, computing their digest
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            hash: compute_hash(&bytes),
            bytes,
        }
    }
}

/// lazy stream of fragments, children before parents
///
/// the last item is the flattened root skeleton (prolog included). the
/// stream owns and rewrites the document as it goes, so it cannot restart.
pub struct Decomposition {
    document: Document,
    pending: std::vec::IntoIter<NodeId>,
    root_emitted: bool,
}

/// start decomposing a parsed document
pub fn decompose(document: Document) -> Decomposition {
    let root = document.root();
    let pending: Vec<NodeId> = document
        .post_order()
        .into_iter()
        .filter(|id| *id != root)
        .collect();

    Decomposition {
        document,
        pending: pending.into_iter(),
        root_emitted: false,
    }
}

impl Iterator for Decomposition {
    type Item = Fragment;

    fn next(&mut self) -> Option<Fragment> {
        for id in self.pending.by_ref() {
            // comments and processing instructions stay inline in their parent
            if !self.document.node(id).is_element() {
                continue;
            }

            let fragment = Fragment::new(self.document.node_to_bytes(id, true));
            self.document.replace_with_ref(id, fragment.hash);
            return Some(fragment);
        }

        if self.root_emitted {
            return None;
        }
        self.root_emitted = true;

        // hashed from the final skeleton bytes, never carried over from a child
        Some(Fragment::new(self.document.to_bytes()))
    }
}

impl FusedIterator for Decomposition {}
