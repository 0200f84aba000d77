/// Element tree types.

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A child element
    Element(Element),
    /// Decoded character data
    Text(String),
    /// A CDATA section (content kept verbatim)
    CData(String),
    /// A comment (content kept verbatim)
    Comment(String),
    /// A processing instruction (content kept verbatim)
    Instruction(String),
}

/// An XML element with its qualified name, attributes and children.
///
/// Names keep their prefix (`w:p`, `w14:paraId`); WordprocessingML parts use
/// fixed prefixes, so lookups match on local names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Qualified name, e.g. `w:r`
    pub name: String,
    /// Attributes in document order, values decoded
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style child appender.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder-style text appender.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// The local part of the element name (`r` for `w:r`).
    #[inline]
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Check the local name.
    #[inline]
    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    /// Get an attribute value by local name (`val` matches `w:val`).
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| local_part(k) == local)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing one with the same qualified name.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    /// Iterate over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Iterate mutably over child elements.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Find the first child element with the given local name.
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.elements().find(|e| e.is(local))
    }

    /// Find the first child element with the given local name, mutably.
    pub fn child_mut(&mut self, local: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.is(local))
    }

    /// Find the first descendant (depth-first, self excluded) with the given local name.
    pub fn descendant(&self, local: &str) -> Option<&Element> {
        for child in self.elements() {
            if child.is(local) {
                return Some(child);
            }
            if let Some(found) = child.descendant(local) {
                return Some(found);
            }
        }
        None
    }

    /// Visit every descendant element (depth-first, self excluded).
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        for child in self.elements() {
            visit(child);
            child.walk(visit);
        }
    }

    /// Concatenated character data of this element and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) | Node::CData(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
                _ => {},
            }
        }
    }
}

/// A parsed XML part: the declaration (if any) and the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlPart {
    /// Raw declaration content, e.g. `xml version="1.0" encoding="UTF-8"`
    pub declaration: Option<String>,
    /// The root element
    pub root: Element,
}

#[inline]
fn local_part(name: &str) -> &str {
    match name.rfind(':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name_and_attr() {
        let el = Element::new("w:sz").with_attr("w:val", "24");
        assert_eq!(el.local_name(), "sz");
        assert!(el.is("sz"));
        assert_eq!(el.attr("val"), Some("24"));
        assert_eq!(el.attr("type"), None);
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut el = Element::new("w:b").with_attr("w:val", "0");
        el.set_attr("w:val", "1");
        assert_eq!(el.attrs.len(), 1);
        assert_eq!(el.attr("val"), Some("1"));
    }

    #[test]
    fn test_descendant_and_text() {
        let el = Element::new("w:p").with_child(
            Element::new("w:r").with_child(Element::new("w:t").with_text("Hello")),
        );
        assert_eq!(el.descendant("t").map(Element::text), Some("Hello".to_string()));
        assert_eq!(el.text(), "Hello");
    }
}
