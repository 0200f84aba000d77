/// Serialize an element tree back to XML bytes.
use super::tree::{Element, Node, XmlPart};
use crate::common::xml::escape_xml;

impl XmlPart {
    /// Serialize the part, declaration first.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::with_capacity(16 * 1024);
        if let Some(decl) = &self.declaration {
            out.push_str("<?");
            out.push_str(decl);
            out.push_str("?>\r\n");
        }
        write_element(&mut out, &self.root);
        out.into_bytes()
    }
}

impl Element {
    /// Serialize this element and its subtree.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        write_element(&mut out, self);
        out
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_xml(value));
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');

    for child in &element.children {
        match child {
            Node::Element(e) => write_element(out, e),
            Node::Text(t) => out.push_str(&escape_xml(t)),
            Node::CData(t) => {
                out.push_str("<![CDATA[");
                out.push_str(t);
                out.push_str("]]>");
            },
            Node::Comment(t) => {
                out.push_str("<!--");
                out.push_str(t);
                out.push_str("-->");
            },
            Node::Instruction(t) => {
                out.push_str("<?");
                out.push_str(t);
                out.push_str("?>");
            },
        }
    }

    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::super::parse;

    #[test]
    fn test_write_escapes_and_self_closes() {
        let xml = br#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">a &lt; b &amp; "c"</w:t></w:r>"#;
        let part = parse(xml).unwrap();
        assert_eq!(
            part.root.to_xml_string(),
            r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">a &lt; b &amp; &quot;c&quot;</w:t></w:r>"#
        );
    }

    #[test]
    fn test_unknown_markup_survives() {
        let xml = br#"<root><!-- note --><x:ext a="1"><![CDATA[<raw>]]></x:ext></root>"#;
        let part = parse(xml).unwrap();
        let reparsed = parse(&part.to_bytes()).unwrap();
        assert_eq!(part, reparsed);
        assert_eq!(
            part.root.to_xml_string(),
            r#"<root><!-- note --><x:ext a="1"><![CDATA[<raw>]]></x:ext></root>"#
        );
    }
}
