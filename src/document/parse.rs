use std::borrow::Cow;
use std::collections::HashMap;

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use crate::document::{
    Attribute, Document, Element, Node, NodeData, NodeId, ParseMode, PrologItem,
    ESCAPABLE_RAW_TEXT_ELEMENTS, PLACEHOLDER_PREFIX, RAW_TEXT_ELEMENTS, VOID_ELEMENTS,
};
use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::types::DocumentKind;

/// parse document bytes with the parser family for `kind`
///
/// xml is strict. html is lenient: names are case-folded, void elements take
/// no content, `script`/`style`/`textarea`/`title` bodies are read as text,
/// end tags close back to the nearest matching open element and whatever is
/// still open at eof is closed implicitly. stray top-level content is moved
/// into an implied `<html><body>`.
pub(crate) fn parse(bytes: &[u8], kind: DocumentKind, mode: ParseMode) -> Result<Document> {
    let input = if kind.is_html() {
        protect_raw_text(bytes)
    } else {
        Cow::Borrowed(bytes)
    };

    let mut reader = Reader::from_reader(input.as_ref());
    let config = reader.config_mut();
    config.trim_text(false);
    config.expand_empty_elements = false;
    config.check_end_names = !kind.is_html();
    config.check_comments = false;

    let mut builder = TreeBuilder::new(kind, mode);
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            Error::parse(kind, format!("at byte {}: {}", reader.buffer_position(), e))
        })?;

        match event {
            Event::Start(e) => builder.open(&e)?,
            Event::Empty(e) => builder.empty(&e)?,
            Event::End(e) => builder.close(e.name().as_ref())?,
            Event::Text(e) => {
                let text = builder.unescape(&e)?;
                builder.text(&text)?;
            }
            Event::CData(e) => builder.text(&String::from_utf8_lossy(&e))?,
            Event::Comment(e) => builder.comment(String::from_utf8_lossy(&e).into_owned()),
            Event::PI(e) => builder.processing_instruction(String::from_utf8_lossy(&e).into_owned()),
            Event::Decl(_) => builder.prolog_item(PrologItem::Declaration)?,
            Event::DocType(e) => {
                let doctype = String::from_utf8_lossy(&e).trim().to_string();
                builder.prolog_item(PrologItem::Doctype(doctype))?
            }
            Event::Eof => break,
        }

        buf.clear();
    }

    builder.finish()
}

/// escape the bodies of html raw-text elements so the reader sees plain text
///
/// `script` and `style` get `&` escaped too, so their bodies come back
/// byte-for-byte. `textarea` and `title` keep their entities. a body runs to
/// the first matching end tag, or to eof if there is none.
fn protect_raw_text(input: &[u8]) -> Cow<'_, [u8]> {
    let mut out: Option<Vec<u8>> = None;
    let mut copied = 0;
    let mut i = 0;

    while let Some(offset) = input[i..].iter().position(|b| *b == b'<') {
        let tag = i + offset;
        let rest = &input[tag..];

        if rest.starts_with(b"<!--") {
            i = find(rest, b"-->").map_or(input.len(), |end| tag + end + 3);
            continue;
        }

        let Some((name, escape_amp)) = raw_text_name(rest) else {
            i = tag + 1;
            continue;
        };
        let Some(tag_end) = start_tag_end(rest) else {
            break;
        };

        let body_start = tag + tag_end + 1;
        if rest[tag_end - 1] == b'/' {
            i = body_start;
            continue;
        }

        let body_len = find_end_tag(&input[body_start..], name).unwrap_or(input.len() - body_start);
        let body = &input[body_start..body_start + body_len];
        i = body_start + body_len;

        if !body
            .iter()
            .any(|b| matches!(b, b'<' | b'>') || (escape_amp && *b == b'&'))
        {
            continue;
        }

        let out = out.get_or_insert_with(|| Vec::with_capacity(input.len() + 64));
        out.extend_from_slice(&input[copied..body_start]);
        for &b in body {
            match b {
                b'<' => out.extend_from_slice(b"&lt;"),
                b'>' => out.extend_from_slice(b"&gt;"),
                b'&' if escape_amp => out.extend_from_slice(b"&amp;"),
                _ => out.push(b),
            }
        }
        copied = i;
    }

    match out {
        Some(mut out) => {
            out.extend_from_slice(&input[copied..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(input),
    }
}

/// raw-text element opened by the start tag at the head of `rest`, and
/// whether its body is free of entities
fn raw_text_name(rest: &[u8]) -> Option<(&'static str, bool)> {
    let name_len = rest[1..]
        .iter()
        .position(|b| !b.is_ascii_alphanumeric())
        .unwrap_or(rest.len() - 1);
    if !rest
        .get(1 + name_len)
        .map_or(true, |b| b.is_ascii_whitespace() || matches!(b, b'>' | b'/'))
    {
        return None;
    }

    let name = &rest[1..1 + name_len];
    let matching = |names: &'static [&'static str]| {
        names
            .iter()
            .copied()
            .find(|candidate| candidate.as_bytes().eq_ignore_ascii_case(name))
    };

    matching(RAW_TEXT_ELEMENTS)
        .map(|name| (name, true))
        .or_else(|| matching(ESCAPABLE_RAW_TEXT_ELEMENTS).map(|name| (name, false)))
}

/// index of the `>` closing the start tag at the head of `rest`
fn start_tag_end(rest: &[u8]) -> Option<usize> {
    let mut quote = None;
    for (i, &b) in rest.iter().enumerate().skip(1) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            _ => {}
        }
    }
    None
}

/// offset of the first `</name` end tag in `body`, case-insensitively
fn find_end_tag(body: &[u8], name: &str) -> Option<usize> {
    let name = name.as_bytes();
    (0..body.len()).find(|&i| {
        let rest = &body[i..];
        rest.starts_with(b"</")
            && rest.len() >= 2 + name.len()
            && rest[2..2 + name.len()].eq_ignore_ascii_case(name)
            && rest
                .get(2 + name.len())
                .map_or(true, |b| b.is_ascii_whitespace() || matches!(b, b'>' | b'/'))
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// general entities declared in a doctype's internal subset
///
/// parameter entities and external entities are skipped.
fn internal_entities(doctype: &str) -> HashMap<String, String> {
    let mut entities = HashMap::new();
    let mut rest = doctype;

    while let Some(pos) = rest.find("<!ENTITY") {
        rest = rest[pos + "<!ENTITY".len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }

        let name_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (name, after) = rest.split_at(name_len);
        let after = after.trim_start();

        let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            rest = after;
            continue;
        };
        let value = &after[1..];
        let Some(end) = value.find(quote) else {
            break;
        };

        let raw = &value[..end];
        let expanded = unescape(raw).map_or_else(|_| raw.to_string(), Cow::into_owned);
        entities.entry(name.to_string()).or_insert(expanded);
        rest = &value[end + 1..];
    }

    entities
}

struct TreeBuilder {
    kind: DocumentKind,
    mode: ParseMode,
    nodes: Vec<Node>,
    root: Option<NodeId>,
    /// currently open elements, innermost last
    open: Vec<NodeId>,
    /// open elements below this depth are implied and never closed by end tags
    floor: usize,
    prolog: Vec<PrologItem>,
    entities: HashMap<String, String>,
}

impl TreeBuilder {
    fn new(kind: DocumentKind, mode: ParseMode) -> Self {
        Self {
            kind,
            mode,
            nodes: Vec::new(),
            root: None,
            open: Vec::new(),
            floor: 0,
            prolog: Vec::new(),
            entities: HashMap::new(),
        }
    }

    fn error(&self, message: impl std::fmt::Display) -> Error {
        Error::parse(self.kind, message)
    }

    fn open(&mut self, start: &BytesStart) -> Result<()> {
        let data = self.node_data(start)?;
        let is_void = match &data {
            NodeData::Element(el) => self.kind.is_html() && VOID_ELEMENTS.contains(&el.name.as_str()),
            _ => false,
        };

        let id = self.attach(data)?;
        if !is_void {
            self.open.push(id);
        }
        Ok(())
    }

    fn empty(&mut self, start: &BytesStart) -> Result<()> {
        let data = self.node_data(start)?;
        self.attach(data)?;
        Ok(())
    }

    fn close(&mut self, raw_name: &[u8]) -> Result<()> {
        let name = self.fold_name(raw_name);

        if !self.kind.is_html() {
            // the reader already verified the name matches
            return match self.open.pop() {
                Some(_) => Ok(()),
                None => Err(self.error(format!("unexpected end tag </{}>", name))),
            };
        }

        if VOID_ELEMENTS.contains(&name.as_str()) {
            return Ok(());
        }

        let position = self.open[self.floor..]
            .iter()
            .rposition(|id| self.tag_name(*id).as_deref() == Some(name.as_str()));

        // stray end tags are dropped
        if let Some(pos) = position {
            self.open.truncate(self.floor + pos);
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        let Some(&parent) = self.open.last() else {
            if text.trim().is_empty() {
                return Ok(());
            }
            if self.kind.is_html() {
                self.implied_body();
                return self.text(text);
            }
            return Err(self.error(format!("text outside the root element: {:?}", text.trim())));
        };

        if let Some(&last) = self.nodes[parent.0].children.last() {
            self.nodes[last.0].tail.push_str(text);
            return Ok(());
        }

        if let NodeData::Element(el) = &mut self.nodes[parent.0].data {
            el.text.push_str(text);
            return Ok(());
        }

        if text.trim().is_empty() {
            Ok(())
        } else {
            Err(self.error("content inside a fragment reference"))
        }
    }

    fn comment(&mut self, content: String) {
        if self.open.is_empty() {
            if self.root.is_none() {
                self.prolog.push(PrologItem::Comment(content));
            }
            return;
        }
        // attach cannot fail with an open parent
        let _ = self.attach(NodeData::Comment(content));
    }

    fn processing_instruction(&mut self, content: String) {
        if self.open.is_empty() {
            if self.root.is_none() {
                self.prolog.push(PrologItem::ProcessingInstruction(content));
            }
            return;
        }
        let _ = self.attach(NodeData::ProcessingInstruction(content));
    }

    fn prolog_item(&mut self, item: PrologItem) -> Result<()> {
        if self.root.is_some() {
            return Err(self.error("declaration or doctype after the root element"));
        }
        if let PrologItem::Doctype(doctype) = &item {
            self.entities.extend(internal_entities(doctype));
        }
        self.prolog.push(item);
        Ok(())
    }

    /// add a node under the innermost open element, or as the root
    fn attach(&mut self, data: NodeData) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());

        match self.open.last().copied() {
            Some(parent) => {
                if matches!(self.nodes[parent.0].data, NodeData::FragmentRef(_)) {
                    return Err(self.error("content inside a fragment reference"));
                }
                self.nodes.push(Node::new(data, Some(parent)));
                self.nodes[parent.0].children.push(id);
            }
            None => {
                if self.root.is_some() {
                    if !self.kind.is_html() {
                        return Err(self.error("more than one root element"));
                    }
                    self.implied_body();
                    return self.attach(data);
                }
                self.nodes.push(Node::new(data, None));
                self.root = Some(id);
            }
        }

        Ok(id)
    }

    /// reopen the document as `<html><body>` so more top-level content fits
    ///
    /// an existing `html` root is reused along with its last `body`; any other
    /// root moves into the new body. returns the body.
    fn implied_body(&mut self) -> NodeId {
        let old_root = self.root;

        let html = match old_root {
            Some(root) if self.tag_name(root).as_deref() == Some("html") => root,
            _ => {
                let id = NodeId(self.nodes.len());
                self.nodes.push(Node::new(NodeData::Element(Element::new("html")), None));
                self.root = Some(id);
                id
            }
        };

        let existing = self.nodes[html.0]
            .children
            .iter()
            .rev()
            .copied()
            .find(|child| self.tag_name(*child).as_deref() == Some("body"));
        let body = match existing {
            Some(body) => body,
            None => {
                let id = NodeId(self.nodes.len());
                self.nodes.push(Node::new(NodeData::Element(Element::new("body")), Some(html)));
                self.nodes[html.0].children.push(id);
                id
            }
        };

        if let Some(old) = old_root.filter(|old| *old != html) {
            self.nodes[old.0].parent = Some(body);
            self.nodes[body.0].children.push(old);
        }

        tracing::debug!("html content outside a single root, implying <html><body>");
        self.open = vec![html, body];
        self.floor = 2;
        body
    }

    fn node_data(&self, start: &BytesStart) -> Result<NodeData> {
        let name = self.fold_name(start.name().as_ref());

        if let Some(hex) = name.strip_prefix(PLACEHOLDER_PREFIX) {
            return match self.mode {
                ParseMode::Source => Err(self.error(format!(
                    "element <{}> uses the reserved {} prefix",
                    name, PLACEHOLDER_PREFIX
                ))),
                ParseMode::Stored => Hash::from_hex(hex)
                    .map(NodeData::FragmentRef)
                    .map_err(|_| self.error(format!("malformed fragment reference <{}>", name))),
            };
        }

        let mut element = Element::new(name);
        let attributes = if self.kind.is_html() {
            start.html_attributes()
        } else {
            start.attributes()
        };

        for attr in attributes {
            let attr = attr.map_err(|e| self.error(e))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = match attr.unescape_value_with(|name| self.entity(name)) {
                Ok(value) => value.into_owned(),
                Err(_) if self.kind.is_html() => String::from_utf8_lossy(&attr.value).into_owned(),
                Err(e) => return Err(self.error(format!("attribute {}: {}", key, e))),
            };
            element.attributes.push(Attribute::new(key, value));
        }

        Ok(NodeData::Element(element))
    }

    fn unescape<'a>(&self, text: &'a BytesText) -> Result<Cow<'a, str>> {
        match text.unescape_with(|name| self.entity(name)) {
            Ok(text) => Ok(text),
            // html tolerates bare ampersands and unknown entities
            Err(_) if self.kind.is_html() => Ok(String::from_utf8_lossy(text)),
            Err(e) => Err(self.error(e)),
        }
    }

    /// replacement text for an entity: doctype declarations, then predefined
    fn entity(&self, name: &str) -> Option<&str> {
        self.entities
            .get(name)
            .map(String::as_str)
            .or_else(|| resolve_predefined_entity(name))
    }

    fn fold_name(&self, raw: &[u8]) -> String {
        let name = String::from_utf8_lossy(raw);
        if self.kind.is_html() {
            name.to_ascii_lowercase()
        } else {
            name.into_owned()
        }
    }

    fn tag_name(&self, id: NodeId) -> Option<String> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => Some(el.name.clone()),
            NodeData::FragmentRef(hash) => Some(format!("{}{}", PLACEHOLDER_PREFIX, hash.to_hex())),
            _ => None,
        }
    }

    fn finish(self) -> Result<Document> {
        if !self.kind.is_html() && !self.open.is_empty() {
            let unclosed = self.tag_name(self.open[self.open.len() - 1]).unwrap_or_default();
            return Err(self.error(format!("unclosed element <{}>", unclosed)));
        }

        let root = self
            .root
            .ok_or_else(|| Error::parse(self.kind, "document has no root element"))?;

        Ok(Document {
            kind: self.kind,
            nodes: self.nodes,
            root,
            prolog: self.prolog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xml(s: &str) -> Result<Document> {
        Document::parse(s.as_bytes(), DocumentKind::Xml)
    }

    fn html(s: &str) -> Result<Document> {
        Document::parse(s.as_bytes(), DocumentKind::Html)
    }

    #[test]
    fn test_mixed_content_text_and_tail() {
        let doc = xml("<p>a<b>bold</b>c</p>").unwrap();
        let p = doc.root();
        assert_eq!(doc.element(p).unwrap().text, "a");

        let b = doc.children(p)[0];
        assert_eq!(doc.element(b).unwrap().name, "b");
        assert_eq!(doc.element(b).unwrap().text, "bold");
        assert_eq!(doc.node(b).tail, "c");
    }

    #[test]
    fn test_xml_entities_and_attributes() {
        let doc = xml(r#"<a href="x&amp;y" id='1'>1 &lt; 2</a>"#).unwrap();
        let el = doc.element(doc.root()).unwrap();
        assert_eq!(el.attribute("href"), Some("x&y"));
        assert_eq!(el.attribute("id"), Some("1"));
        assert_eq!(el.text, "1 < 2");
    }

    #[test]
    fn test_xml_prolog() {
        let doc = xml("<?xml version=\"1.0\"?>\n<!-- c -->\n<root/>").unwrap();
        assert_eq!(
            doc.prolog(),
            &[PrologItem::Declaration, PrologItem::Comment(" c ".to_string())]
        );
    }

    #[test]
    fn test_xml_rejects_malformed() {
        assert!(matches!(xml("<a><b></a>"), Err(Error::Parse { .. })));
        assert!(matches!(xml("<a>"), Err(Error::Parse { .. })));
        assert!(matches!(xml("<a/><b/>"), Err(Error::Parse { .. })));
        assert!(matches!(xml("loose text <a/>"), Err(Error::Parse { .. })));
        assert!(matches!(xml(""), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_source_rejects_reserved_prefix() {
        let tag = format!("<a><{}abc/></a>", PLACEHOLDER_PREFIX);
        assert!(matches!(xml(&tag), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_stored_mode_reads_fragment_refs() {
        let hash = crate::hash::compute_hash(b"<b/>");
        let stored = format!("<a><{}{}/></a>", PLACEHOLDER_PREFIX, hash.to_hex());
        let doc = Document::parse_stored(stored.as_bytes(), DocumentKind::Xml).unwrap();

        let child = doc.children(doc.root())[0];
        assert_eq!(doc.node(child).fragment_ref(), Some(hash));
    }

    #[test]
    fn test_stored_mode_rejects_bad_ref() {
        let stored = format!("<a><{}nothex/></a>", PLACEHOLDER_PREFIX);
        let result = Document::parse_stored(stored.as_bytes(), DocumentKind::Xml);
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_html_void_and_case_folding() {
        let doc = html("<!doctype html><HTML><body>a<br>b<IMG src=x>c</body></HTML>").unwrap();
        assert_eq!(doc.prolog(), &[PrologItem::Doctype("html".to_string())]);

        let root = doc.root();
        assert_eq!(doc.element(root).unwrap().name, "html");
        let body = doc.children(root)[0];
        let kids = doc.children(body);
        assert_eq!(kids.len(), 2);
        assert_eq!(doc.element(kids[0]).unwrap().name, "br");
        assert_eq!(doc.node(kids[0]).tail, "b");
        assert_eq!(doc.element(kids[1]).unwrap().attribute("src"), Some("x"));
        assert_eq!(doc.node(kids[1]).tail, "c");
    }

    #[test]
    fn test_html_lenient_closing() {
        // unclosed <li>s close at their parent's end tag, unclosed root at eof
        let doc = html("<ul><li>one<li>two</ul>").unwrap();
        let ul = doc.root();
        let li = doc.children(ul)[0];
        assert_eq!(doc.element(li).unwrap().text, "one");
        assert_eq!(doc.children(li).len(), 1);

        let doc = html("<div><p>open").unwrap();
        assert_eq!(doc.element(doc.root()).unwrap().name, "div");
    }

    #[test]
    fn test_html_entities() {
        let doc = html("<p>a&nbsp;b &amp; c</p>").unwrap();
        assert_eq!(doc.element(doc.root()).unwrap().text, "a\u{a0}b & c");
    }

    #[test]
    fn test_html_valueless_attribute() {
        let doc = html("<input disabled>").unwrap();
        let el = doc.element(doc.root()).unwrap();
        assert_eq!(el.attribute("disabled"), Some(""));
    }

    #[test]
    fn test_html_script_body_is_text() {
        let doc = html("<div><script>if (a < b) { go(); } var s = \"</div>\";</script>after</div>")
            .unwrap();
        let script = doc.children(doc.root())[0];
        assert_eq!(
            doc.element(script).unwrap().text,
            "if (a < b) { go(); } var s = \"</div>\";"
        );
        assert!(doc.children(script).is_empty());
        assert_eq!(doc.node(script).tail, "after");
    }

    #[test]
    fn test_html_raw_text_keeps_ampersands_and_case() {
        let doc = html("<head><STYLE type=text/css>a &amp;&& b</Style><title>x &lt; y</title></head>")
            .unwrap();
        let kids = doc.children(doc.root());
        assert_eq!(doc.element(kids[0]).unwrap().text, "a &amp;&& b");
        assert_eq!(doc.element(kids[0]).unwrap().attribute("type"), Some("text/css"));
        // title decodes entities but has no child elements
        assert_eq!(doc.element(kids[1]).unwrap().text, "x < y");
    }

    #[test]
    fn test_html_unclosed_script_runs_to_eof() {
        let doc = html("<body><script>a < b").unwrap();
        let script = doc.children(doc.root())[0];
        assert_eq!(doc.element(script).unwrap().text, "a < b");
    }

    #[test]
    fn test_html_raw_text_inside_comment_ignored() {
        let doc = html("<div><!-- <script> --><b>x</b></div>").unwrap();
        let kids = doc.children(doc.root());
        assert_eq!(kids.len(), 2);
        assert_eq!(doc.element(kids[1]).unwrap().name, "b");
    }

    #[test]
    fn test_html_multiple_top_level_elements() {
        let doc = html("<p>a</p><p>b</p>").unwrap();
        let root = doc.root();
        assert_eq!(doc.element(root).unwrap().name, "html");

        let body = doc.children(root)[0];
        assert_eq!(doc.element(body).unwrap().name, "body");
        let paragraphs = doc.children(body);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(doc.element(paragraphs[0]).unwrap().text, "a");
        assert_eq!(doc.element(paragraphs[1]).unwrap().text, "b");
        assert_eq!(doc.node(paragraphs[0]).parent(), Some(body));
    }

    #[test]
    fn test_html_top_level_text() {
        let doc = html("hello <b>x</b> world").unwrap();
        let body = doc.children(doc.root())[0];
        assert_eq!(doc.element(body).unwrap().text, "hello ");

        let b = doc.children(body)[0];
        assert_eq!(doc.element(b).unwrap().text, "x");
        assert_eq!(doc.node(b).tail, " world");
    }

    #[test]
    fn test_html_content_after_html_root_joins_body() {
        let doc = html("<html><body><p>a</p></body></html><p>b</p>").unwrap();
        let root = doc.root();
        assert_eq!(doc.children(root).len(), 1);

        let body = doc.children(root)[0];
        assert_eq!(doc.children(body).len(), 2);
    }

    #[test]
    fn test_xml_internal_entities() {
        let doc = xml("<!DOCTYPE r [<!ENTITY co \"Acme &amp; Co\"><!ENTITY y '2024'>]>\
                       <r owner=\"&co;\">&co; &y; &lt;</r>")
        .unwrap();
        let el = doc.element(doc.root()).unwrap();
        assert_eq!(el.attribute("owner"), Some("Acme & Co"));
        assert_eq!(el.text, "Acme & Co 2024 <");
    }

    #[test]
    fn test_xml_undeclared_entity_rejected() {
        assert!(matches!(
            xml("<!DOCTYPE r [<!ENTITY a \"x\">]><r>&b;</r>"),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_internal_entities_skips_parameter_and_external() {
        let entities = internal_entities(
            "r [<!ENTITY % p \"x\"><!ENTITY ext SYSTEM \"e.xml\"><!ENTITY ok \"v\">]",
        );
        assert_eq!(entities.len(), 1);
        assert_eq!(entities.get("ok").map(String::as_str), Some("v"));
    }
}
