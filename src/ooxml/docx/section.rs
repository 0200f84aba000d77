/// Section properties: which header and footer parts a section shows.
use crate::ooxml::docx::enums::WdHeaderFooter;
use crate::ooxml::opc::{PackURI, Relationships};
use crate::ooxml::xml::Element;
use log::warn;
use smallvec::SmallVec;

/// A document section, described by one `<w:sectPr>` element.
///
/// Sections end either at a paragraph carrying `w:pPr/w:sectPr` or at the
/// body-level `w:sectPr` of the last section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    headers: SmallVec<[(WdHeaderFooter, PackURI); 3]>,
    footers: SmallVec<[(WdHeaderFooter, PackURI); 3]>,
}

impl Section {
    /// Resolve the header/footer references of a `<w:sectPr>`.
    ///
    /// References whose relationship is missing are skipped with a warning.
    pub fn from_sect_pr(sect_pr: &Element, rels: &Relationships) -> Self {
        let mut section = Self::default();
        for reference in sect_pr.elements() {
            let slot = match reference.local_name() {
                "headerReference" => &mut section.headers,
                "footerReference" => &mut section.footers,
                _ => continue,
            };
            let kind = reference
                .attr("type")
                .and_then(WdHeaderFooter::from_xml)
                .unwrap_or_default();
            let Some(r_id) = reference.attr("id") else { continue };
            match rels.get(r_id).map(|rel| rel.target_partname()) {
                Some(Ok(uri)) => slot.push((kind, uri)),
                _ => warn!("section references unknown relationship {r_id}"),
            }
        }
        section
    }

    /// Collect the sections of a `<w:body>` element in document order.
    pub fn collect(body: &Element, rels: &Relationships) -> Vec<Self> {
        let mut sections = Vec::new();
        for child in body.elements() {
            let sect_pr = if child.is("p") {
                child.child("pPr").and_then(|ppr| ppr.child("sectPr"))
            } else if child.is("sectPr") {
                Some(child)
            } else {
                None
            };
            if let Some(sect_pr) = sect_pr {
                sections.push(Self::from_sect_pr(sect_pr, rels));
            }
        }
        sections
    }

    /// Header parts by slot.
    pub fn headers(&self) -> impl Iterator<Item = &(WdHeaderFooter, PackURI)> {
        self.headers.iter()
    }

    /// Footer parts by slot.
    pub fn footers(&self) -> impl Iterator<Item = &(WdHeaderFooter, PackURI)> {
        self.footers.iter()
    }

    /// The header part shown in the given slot, if any.
    pub fn header(&self, kind: WdHeaderFooter) -> Option<&PackURI> {
        self.headers.iter().find(|(k, _)| *k == kind).map(|(_, u)| u)
    }

    /// The footer part shown in the given slot, if any.
    pub fn footer(&self, kind: WdHeaderFooter) -> Option<&PackURI> {
        self.footers.iter().find(|(k, _)| *k == kind).map(|(_, u)| u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::xml::parse;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>
  <Relationship Id="rId8" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/>
  <Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header2.xml"/>
</Relationships>"#;

    const BODY: &str = r#"<w:body xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <w:p><w:pPr><w:sectPr><w:headerReference w:type="first" r:id="rId9"/></w:sectPr></w:pPr></w:p>
  <w:p/>
  <w:sectPr>
    <w:headerReference w:type="default" r:id="rId7"/>
    <w:footerReference w:type="default" r:id="rId8"/>
    <w:footerReference w:type="even" r:id="rId99"/>
  </w:sectPr>
</w:body>"#;

    #[test]
    fn test_collect_sections() {
        let rels = Relationships::from_xml(RELS.as_bytes(), "/word").unwrap();
        let body = parse(BODY.as_bytes()).unwrap().root;
        let sections = Section::collect(&body, &rels);

        assert_eq!(sections.len(), 2);
        assert_eq!(
            sections[0].header(WdHeaderFooter::FirstPage).map(|u| u.as_str()),
            Some("/word/header2.xml")
        );
        assert!(sections[0].footer(WdHeaderFooter::Primary).is_none());

        assert_eq!(
            sections[1].header(WdHeaderFooter::Primary).map(|u| u.as_str()),
            Some("/word/header1.xml")
        );
        assert_eq!(
            sections[1].footer(WdHeaderFooter::Primary).map(|u| u.as_str()),
            Some("/word/footer1.xml")
        );
        // rId99 has no relationship
        assert_eq!(sections[1].footers().count(), 1);
    }
}
