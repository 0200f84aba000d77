//! In-memory `.docx` packages for unit tests.

use crate::ooxml::opc::PackURI;
use crate::ooxml::opc::phys_pkg::PhysPkgWriter;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Builds a minimal but complete WordprocessingML package.
pub(crate) struct DocxBuilder {
    body: String,
    headers: Vec<String>,
    footers: Vec<String>,
}

impl DocxBuilder {
    pub(crate) fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            headers: Vec::new(),
            footers: Vec::new(),
        }
    }

    pub(crate) fn header(mut self, content: impl Into<String>) -> Self {
        self.headers.push(content.into());
        self
    }

    pub(crate) fn footer(mut self, content: impl Into<String>) -> Self {
        self.footers.push(content.into());
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut overrides = String::from(
            r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
        );
        let mut rels = String::new();
        let mut refs = String::new();
        for (i, _) in self.headers.iter().enumerate() {
            let n = i + 1;
            overrides.push_str(&format!(r#"<Override PartName="/word/header{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/>"#));
            rels.push_str(&format!(r#"<Relationship Id="rIdH{n}" Type="{REL_BASE}/header" Target="header{n}.xml"/>"#));
            if i == 0 {
                refs.push_str(r#"<w:headerReference w:type="default" r:id="rIdH1"/>"#);
            }
        }
        for (i, _) in self.footers.iter().enumerate() {
            let n = i + 1;
            overrides.push_str(&format!(r#"<Override PartName="/word/footer{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>"#));
            rels.push_str(&format!(r#"<Relationship Id="rIdF{n}" Type="{REL_BASE}/footer" Target="footer{n}.xml"/>"#));
            if i == 0 {
                refs.push_str(r#"<w:footerReference w:type="default" r:id="rIdF1"/>"#);
            }
        }

        let mut writer = PhysPkgWriter::new();
        let mut put = |name: &str, xml: String| {
            let uri = PackURI::new(name).unwrap();
            writer.write(&uri, xml.as_bytes()).unwrap();
        };

        put(
            "/[Content_Types].xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{overrides}</Types>"#
            ),
        );
        put(
            "/_rels/.rels",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/officeDocument" Target="word/document.xml"/></Relationships>"#
            ),
        );
        put(
            "/word/_rels/document.xml.rels",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
            ),
        );
        put(
            "/word/document.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}"><w:body>{}<w:sectPr>{refs}</w:sectPr></w:body></w:document>"#,
                self.body
            ),
        );
        for (i, content) in self.headers.iter().enumerate() {
            put(
                &format!("/word/header{}.xml", i + 1),
                format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:hdr xmlns:w="{W_NS}" xmlns:r="{R_NS}">{content}</w:hdr>"#),
            );
        }
        for (i, content) in self.footers.iter().enumerate() {
            put(
                &format!("/word/footer{}.xml", i + 1),
                format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:ftr xmlns:w="{W_NS}" xmlns:r="{R_NS}">{content}</w:ftr>"#),
            );
        }

        writer.finish().unwrap()
    }
}

/// A paragraph with one plain run per entry.
pub(crate) fn para(runs: &[&str]) -> String {
    let runs: String = runs
        .iter()
        .map(|t| format!(r#"<w:r><w:t xml:space="preserve">{t}</w:t></w:r>"#))
        .collect();
    format!("<w:p>{runs}</w:p>")
}

/// A table with one single-paragraph cell per entry.
pub(crate) fn table(rows: &[&[&str]]) -> String {
    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let grid: String = (0..width).map(|_| r#"<w:gridCol w:w="2000"/>"#).collect();
    let rows: String = rows
        .iter()
        .map(|cells| {
            let cells: String = cells
                .iter()
                .map(|c| format!(r#"<w:tc><w:tcPr><w:tcW w:w="2000" w:type="dxa"/></w:tcPr>{}</w:tc>"#, para(&[c])))
                .collect();
            format!("<w:tr>{cells}</w:tr>")
        })
        .collect();
    format!(r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr><w:tblGrid>{grid}</w:tblGrid>{rows}</w:tbl>"#)
}
