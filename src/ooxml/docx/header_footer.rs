/// Header and footer support for Word documents.
///
/// Headers and footers are stored in separate XML parts
/// (`/word/header*.xml` and `/word/footer*.xml`) and hold paragraphs and
/// tables just like the main document body.
use crate::ooxml::docx::enums::HeaderFooterKind;
use crate::ooxml::docx::story::Story;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::PackURI;
use crate::ooxml::xml::{Element, XmlPart, parse};

/// A header or footer part in a Word document.
///
/// # Examples
///
/// ```rust,no_run
/// use docmint::ooxml::docx::Package;
///
/// let doc = Package::open("template.docx")?.into_document()?;
/// for part in doc.headers_footers() {
///     println!("{} {}: {}", part.kind(), part.uri(), part.text());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct HeaderFooter {
    uri: PackURI,
    kind: HeaderFooterKind,
    declaration: Option<String>,
    /// `<w:hdr>`/`<w:ftr>` with its children moved into `content`
    root: Element,
    content: Story,
}

impl HeaderFooter {
    /// Parse a header or footer part.
    pub fn from_xml(uri: PackURI, kind: HeaderFooterKind, xml: &[u8]) -> Result<Self> {
        let XmlPart {
            declaration,
            mut root,
        } = parse(xml)?;

        let expected = match kind {
            HeaderFooterKind::Header => "hdr",
            HeaderFooterKind::Footer => "ftr",
        };
        if !root.is(expected) {
            return Err(OoxmlError::InvalidStructure(format!(
                "{uri}: expected w:{expected}, found {}",
                root.name
            )));
        }

        let content = Story::from_nodes(std::mem::take(&mut root.children));
        Ok(Self {
            uri,
            kind,
            declaration,
            root,
            content,
        })
    }

    /// Serialize the part back to XML bytes.
    pub fn to_xml(&self) -> Vec<u8> {
        let mut root = self.root.clone();
        root.children = self.content.to_nodes();
        XmlPart {
            declaration: self.declaration.clone(),
            root,
        }
        .to_bytes()
    }

    /// Partname of this header/footer.
    #[inline]
    pub fn uri(&self) -> &PackURI {
        &self.uri
    }

    /// Whether this is a header or a footer.
    #[inline]
    pub fn kind(&self) -> HeaderFooterKind {
        self.kind
    }

    /// The paragraphs and tables of this part.
    #[inline]
    pub fn content(&self) -> &Story {
        &self.content
    }

    /// The paragraphs and tables of this part, mutably.
    #[inline]
    pub fn content_mut(&mut self) -> &mut Story {
        &mut self.content
    }

    /// Get the text content of this header/footer.
    pub fn text(&self) -> String {
        self.content.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:r><w:t>{{Name1}}</w:t></w:r></w:p></w:hdr>"#;

    #[test]
    fn test_header_text_and_round_trip() {
        let uri = PackURI::new("/word/header1.xml").unwrap();
        let mut header = HeaderFooter::from_xml(uri, HeaderFooterKind::Header, HEADER.as_bytes()).unwrap();
        assert_eq!(header.text(), "{{Name1}}");

        header.content_mut().for_each_paragraph_mut(&mut |p| p.set_text("JUAN"));
        let xml = String::from_utf8(header.to_xml()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\""));
        assert!(xml.contains("JUAN"));
        assert!(xml.contains("<w:hdr xmlns:w="));
    }

    #[test]
    fn test_wrong_root_rejected() {
        let uri = PackURI::new("/word/footer1.xml").unwrap();
        let result = HeaderFooter::from_xml(uri, HeaderFooterKind::Footer, HEADER.as_bytes());
        assert!(matches!(result, Err(OoxmlError::InvalidStructure(_))));
    }
}
