/// The main document of a Word package, loaded into an editable tree.
use crate::ooxml::docx::enums::HeaderFooterKind;
use crate::ooxml::docx::header_footer::HeaderFooter;
use crate::ooxml::docx::paragraph::Paragraph;
use crate::ooxml::docx::section::Section;
use crate::ooxml::docx::story::{Location, Story, StoryKind};
use crate::ooxml::docx::table::Table;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::{OpcPackage, PackURI};
use crate::ooxml::xml::{Element, XmlPart, parse};
use log::{debug, warn};
use std::path::Path;

/// A Word document: body, sections and header/footer parts.
///
/// The document owns its package. Parts the model does not cover (styles,
/// numbering, media) stay in the package untouched and are written back
/// unchanged by [`Document::to_bytes`].
///
/// # Examples
///
/// ```rust,no_run
/// use docmint::ooxml::docx::Package;
///
/// let mut doc = Package::open("template.docx")?.into_document()?;
/// doc.for_each_paragraph_mut(|p| {
///     if p.text().contains("DRAFT") {
///         p.set_text(p.text().replace("DRAFT", "FINAL"));
///     }
/// });
/// std::fs::write("out.docx", doc.to_bytes()?)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    package: OpcPackage,
    uri: PackURI,
    declaration: Option<String>,
    /// `<w:document>` with the body children moved into `body`
    root: Element,
    body: Story,
    sections: Vec<Section>,
    headers_footers: Vec<HeaderFooter>,
}

impl Document {
    /// Parse the main document part and its headers and footers.
    pub(crate) fn load(package: OpcPackage) -> Result<Self> {
        let uri = package.main_document_uri()?;
        let XmlPart {
            declaration,
            mut root,
        } = parse(package.require_part(&uri)?)?;
        let rels = package.rels_for(&uri)?;

        let body_element = root
            .child_mut("body")
            .ok_or_else(|| OoxmlError::InvalidStructure(format!("{uri}: no w:body element")))?;
        let sections = Section::collect(body_element, &rels);
        let body = Story::from_nodes(std::mem::take(&mut body_element.children));

        let mut headers_footers = Vec::new();
        for rel in rels.iter().filter(|r| !r.is_external()) {
            let kind = match rel.reltype() {
                rt::HEADER => HeaderFooterKind::Header,
                rt::FOOTER => HeaderFooterKind::Footer,
                _ => continue,
            };
            let part_uri = rel.target_partname()?;
            let Some(xml) = package.part(&part_uri) else {
                warn!("{kind} part {part_uri} is referenced but missing");
                continue;
            };
            headers_footers.push(HeaderFooter::from_xml(part_uri, kind, xml)?);
        }

        debug!(
            "loaded {uri}: {} blocks, {} sections, {} header/footer parts",
            body.blocks().len(),
            sections.len(),
            headers_footers.len()
        );

        Ok(Self {
            package,
            uri,
            declaration,
            root,
            body,
            sections,
            headers_footers,
        })
    }

    /// Partname of the main document part.
    #[inline]
    pub fn uri(&self) -> &PackURI {
        &self.uri
    }

    /// The document body.
    #[inline]
    pub fn body(&self) -> &Story {
        &self.body
    }

    /// The document body, mutably.
    #[inline]
    pub fn body_mut(&mut self) -> &mut Story {
        &mut self.body
    }

    /// Sections in document order.
    #[inline]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All header and footer parts, in relationship order.
    #[inline]
    pub fn headers_footers(&self) -> &[HeaderFooter] {
        &self.headers_footers
    }

    /// Header parts.
    pub fn headers(&self) -> impl Iterator<Item = &HeaderFooter> {
        self.headers_footers
            .iter()
            .filter(|hf| hf.kind() == HeaderFooterKind::Header)
    }

    /// Footer parts.
    pub fn footers(&self) -> impl Iterator<Item = &HeaderFooter> {
        self.headers_footers
            .iter()
            .filter(|hf| hf.kind() == HeaderFooterKind::Footer)
    }

    /// Look up a header/footer part by partname.
    pub fn header_footer(&self, uri: &PackURI) -> Option<&HeaderFooter> {
        self.headers_footers.iter().find(|hf| hf.uri() == uri)
    }

    /// Visit every paragraph: body (including table cells), then headers and footers.
    ///
    /// Each header/footer part is visited once, however many sections show it.
    pub fn for_each_paragraph_mut<F: FnMut(&mut Paragraph)>(&mut self, mut f: F) {
        self.body.for_each_paragraph_mut(&mut f);
        for part in &mut self.headers_footers {
            part.content_mut().for_each_paragraph_mut(&mut f);
        }
    }

    /// Visit every table of the body, including nested tables.
    pub fn for_each_table_mut<F: FnMut(&mut Table)>(&mut self, mut f: F) {
        self.body.for_each_table_mut(&mut f);
    }

    /// Visit every paragraph with its location.
    pub fn visit_paragraphs<'a, F: FnMut(&Location, &'a Paragraph)>(&'a self, mut f: F) {
        self.body
            .visit_paragraphs(&Location::new(StoryKind::Body), &mut f);
        for part in &self.headers_footers {
            let story = match part.kind() {
                HeaderFooterKind::Header => StoryKind::Header(part.uri().clone()),
                HeaderFooterKind::Footer => StoryKind::Footer(part.uri().clone()),
            };
            part.content().visit_paragraphs(&Location::new(story), &mut f);
        }
    }

    /// Text of the body.
    pub fn text(&self) -> String {
        self.body.text()
    }

    /// Serialize the document, with every untouched part carried over, to `.docx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut package = self.package.clone();

        let mut root = self.root.clone();
        if let Some(body) = root.child_mut("body") {
            body.children = self.body.to_nodes();
        }
        let main = XmlPart {
            declaration: self.declaration.clone(),
            root,
        };
        package.set_part(&self.uri, main.to_bytes());

        for part in &self.headers_footers {
            package.set_part(part.uri(), part.to_xml());
        }

        Ok(package.to_bytes()?)
    }

    /// Serialize and write the document to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::ooxml::docx::Package;
    use crate::ooxml::docx::enums::WdHeaderFooter;
    use crate::ooxml::docx::fixtures::{DocxBuilder, para, table};

    fn sample() -> Vec<u8> {
        DocxBuilder::new(format!(
            "{}{}",
            para(&["Pay to ", "{{Name1}}"]),
            table(&[&["Salary", "100"], &["Total", "100"]])
        ))
        .header(para(&["HEADER {{Name1}}"]))
        .footer(para(&["page footer"]))
        .build()
    }

    #[test]
    fn test_load_document() {
        let doc = Package::from_bytes(&sample()).unwrap().into_document().unwrap();
        assert_eq!(doc.uri().as_str(), "/word/document.xml");
        assert_eq!(doc.text(), "Pay to {{Name1}}\nSalary 100\nTotal 100");
        assert_eq!(doc.headers().count(), 1);
        assert_eq!(doc.footers().count(), 1);
        assert_eq!(doc.sections().len(), 1);

        let header_uri = doc.sections()[0].header(WdHeaderFooter::Primary).unwrap();
        assert_eq!(doc.header_footer(header_uri).unwrap().text(), "HEADER {{Name1}}");
    }

    #[test]
    fn test_visit_every_paragraph() {
        let mut doc = Package::from_bytes(&sample()).unwrap().into_document().unwrap();
        let mut count = 0;
        doc.for_each_paragraph_mut(|_| count += 1);
        // body paragraph, four cells, header, footer
        assert_eq!(count, 7);

        let mut locations = Vec::new();
        doc.visit_paragraphs(|loc, _| locations.push(loc.to_string()));
        assert_eq!(locations[0], "body");
        assert_eq!(locations[4], "body/table[0]/row[1]/cell[1]");
        assert_eq!(locations[5], "header(/word/header1.xml)");
        assert_eq!(locations[6], "footer(/word/footer1.xml)");
    }

    #[test]
    fn test_edit_and_save_round_trip() {
        let mut doc = Package::from_bytes(&sample()).unwrap().into_document().unwrap();
        doc.for_each_paragraph_mut(|p| {
            let text = p.text();
            if text.contains("{{Name1}}") {
                p.set_text(text.replace("{{Name1}}", "JUAN"));
            }
        });
        doc.for_each_table_mut(|t| {
            t.remove_row(0).unwrap();
        });

        let bytes = doc.to_bytes().unwrap();
        let reloaded = Package::from_bytes(&bytes).unwrap().into_document().unwrap();
        assert_eq!(reloaded.text(), "Pay to JUAN\nTotal 100");
        assert_eq!(reloaded.headers().next().unwrap().text(), "HEADER JUAN");
        assert_eq!(reloaded.sections().len(), 1);
    }

    #[test]
    fn test_non_word_package_rejected() {
        let mut writer = crate::ooxml::opc::phys_pkg::PhysPkgWriter::new();
        let uri = crate::ooxml::opc::PackURI::new("/readme.txt").unwrap();
        writer.write(&uri, b"hello").unwrap();
        let bytes = writer.finish().unwrap();
        assert!(Package::from_bytes(&bytes).is_err());
    }
}
