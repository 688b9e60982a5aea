use quick_xml::escape::{escape, partial_escape};

use crate::document::{
    Document, NodeData, NodeId, PrologItem, PLACEHOLDER_PREFIX, RAW_TEXT_ELEMENTS, VOID_ELEMENTS,
};

/// canonical xml declaration; output is always utf-8
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

impl Document {
    /// serialize the whole document: prolog, then the root element
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::new();
        for item in &self.prolog {
            write_prolog_item(item, &mut out);
            out.push('\n');
        }
        self.write_node(self.root, &mut out, false);
        out.into_bytes()
    }

    /// serialize one subtree, optionally followed by its tail text
    ///
    /// text outside the element is escaped so it never contains `>`: the last
    /// `>` in the output always closes the element.
    pub fn node_to_bytes(&self, id: NodeId, with_tail: bool) -> Vec<u8> {
        let mut out = String::new();
        self.write_node(id, &mut out, with_tail);
        out.into_bytes()
    }

    fn write_node(&self, id: NodeId, out: &mut String, with_tail: bool) {
        let node = self.node(id);
        let html = self.kind.is_html();

        match &node.data {
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.name);
                for attr in &el.attributes {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&escape(attr.value.as_str()));
                    out.push('"');
                }

                if el.text.is_empty() && node.children.is_empty() {
                    if !html {
                        out.push_str("/>");
                    } else if VOID_ELEMENTS.contains(&el.name.as_str()) {
                        out.push('>');
                    } else {
                        out.push_str("></");
                        out.push_str(&el.name);
                        out.push('>');
                    }
                } else {
                    out.push('>');
                    if html && RAW_TEXT_ELEMENTS.contains(&el.name.as_str()) {
                        // script and style bodies are not markup
                        out.push_str(&el.text);
                    } else {
                        out.push_str(&partial_escape(el.text.as_str()));
                    }
                    for child in &node.children {
                        self.write_node(*child, out, true);
                    }
                    out.push_str("</");
                    out.push_str(&el.name);
                    out.push('>');
                }
            }
            NodeData::Comment(content) => {
                out.push_str("<!--");
                out.push_str(content);
                out.push_str("-->");
            }
            NodeData::ProcessingInstruction(content) => {
                out.push_str("<?");
                out.push_str(content);
                out.push_str("?>");
            }
            NodeData::FragmentRef(hash) => {
                let tag = format!("{}{}", PLACEHOLDER_PREFIX, hash.to_hex());
                if html {
                    out.push_str(&format!("<{tag}></{tag}>"));
                } else {
                    out.push_str(&format!("<{tag}/>"));
                }
            }
        }

        if with_tail {
            out.push_str(&partial_escape(node.tail.as_str()));
        }
    }
}

fn write_prolog_item(item: &PrologItem, out: &mut String) {
    match item {
        PrologItem::Declaration => out.push_str(XML_DECLARATION),
        PrologItem::Doctype(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype);
            out.push('>');
        }
        PrologItem::Comment(content) => {
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
        }
        PrologItem::ProcessingInstruction(content) => {
            out.push_str("<?");
            out.push_str(content);
            out.push_str("?>");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::document::Document;
    use crate::types::DocumentKind;

    fn canonical(input: &str, kind: DocumentKind) -> String {
        let doc = Document::parse(input.as_bytes(), kind).unwrap();
        String::from_utf8(doc.to_bytes()).unwrap()
    }

    #[test]
    fn test_xml_canonical_form() {
        assert_eq!(
            canonical("<a x='1'><b></b>t &gt; u<c>v</c></a>", DocumentKind::Xml),
            r#"<a x="1"><b/>t &gt; u<c>v</c></a>"#
        );
    }

    #[test]
    fn test_xml_prolog_canonical() {
        assert_eq!(
            canonical("<?xml version='1.0' encoding='latin1'?><!--hi--><r/>", DocumentKind::Xml),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!--hi-->\n<r/>"
        );
    }

    #[test]
    fn test_html_canonical_form() {
        assert_eq!(
            canonical("<!doctype html><P class=x>a<BR>b<span></span></P>", DocumentKind::Html),
            "<!DOCTYPE html>\n<p class=\"x\">a<br>b<span></span></p>"
        );
    }

    #[test]
    fn test_attribute_escaping() {
        assert_eq!(
            canonical(r#"<a t="&quot;q&quot; &amp; &lt;"/>"#, DocumentKind::Xml),
            r#"<a t="&quot;q&quot; &amp; &lt;"/>"#
        );
    }

    #[test]
    fn test_node_to_bytes_with_tail() {
        let doc = Document::parse(b"<p>a<b>bold</b> &amp; more</p>", DocumentKind::Xml).unwrap();
        let b = doc.children(doc.root())[0];

        assert_eq!(doc.node_to_bytes(b, false), b"<b>bold</b>");
        assert_eq!(doc.node_to_bytes(b, true), b"<b>bold</b> &amp; more");
    }

    #[test]
    fn test_canonical_form_is_stable() {
        let once = canonical("<r><x a='1'>t</x><!-- c --><?pi data?></r>", DocumentKind::Xml);
        let twice = canonical(&once, DocumentKind::Xml);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_html_script_body_written_verbatim() {
        let source = "<html><head><script>if (a < b && c > d) { s = \"</div>\"; }</script>\
                      <style>p > a { color: red }</style></head></html>";
        assert_eq!(canonical(source, DocumentKind::Html), source);
    }

    #[test]
    fn test_html_textarea_body_escaped() {
        assert_eq!(
            canonical("<form><textarea>a<b &amp; c</textarea></form>", DocumentKind::Html),
            "<form><textarea>a&lt;b &amp; c</textarea></form>"
        );
    }

    #[test]
    fn test_html_implied_body_canonical() {
        let once = canonical("<p>a</p><p>b</p>", DocumentKind::Html);
        assert_eq!(once, "<html><body><p>a</p><p>b</p></body></html>");
        assert_eq!(canonical(&once, DocumentKind::Html), once);
    }
}
