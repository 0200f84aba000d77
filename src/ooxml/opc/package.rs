/// The in-memory OPC package.
///
/// `OpcPackage` keeps every member of the ZIP container as raw bytes in
/// archive order. Parts that the document model edits are parsed on demand
/// and written back with [`OpcPackage::set_part`]; everything else is carried
/// through untouched.
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use crate::ooxml::opc::phys_pkg::{PhysPart, PhysPkgReader, PhysPkgWriter};
use crate::ooxml::opc::pkgreader::ContentTypeMap;
use crate::ooxml::opc::rel::Relationships;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Member name used when the package relationships don't name a main part.
const FALLBACK_MAIN_DOCUMENT: &str = "/word/document.xml";

/// Main API class for working with OPC packages.
#[derive(Debug, Clone)]
pub struct OpcPackage {
    /// All members of the package, in ZIP order
    parts: Vec<PhysPart>,
}

impl OpcPackage {
    /// Open an OPC package from a file.
    ///
    /// # Example
    /// ```no_run
    /// use docmint::ooxml::opc::OpcPackage;
    ///
    /// let pkg = OpcPackage::open("template.docx").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            parts: PhysPkgReader::open(path)?,
        })
    }

    /// Load an OPC package from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Ok(Self {
            parts: PhysPkgReader::read(reader)?,
        })
    }

    /// Load an OPC package from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Get the raw content of a part, if present.
    pub fn part(&self, uri: &PackURI) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == uri.membername())
            .map(|p| p.data.as_slice())
    }

    /// Get the raw content of a part, failing if it is absent.
    pub fn require_part(&self, uri: &PackURI) -> Result<&[u8]> {
        self.part(uri)
            .ok_or_else(|| OpcError::PartNotFound(uri.to_string()))
    }

    /// Replace (or add) the content of a part.
    pub fn set_part(&mut self, uri: &PackURI, data: Vec<u8>) {
        match self.parts.iter_mut().find(|p| p.name == uri.membername()) {
            Some(part) => part.data = data,
            None => self.parts.push(PhysPart {
                name: uri.membername().to_string(),
                data,
            }),
        }
    }

    /// Iterate over all partnames in archive order.
    pub fn partnames(&self) -> impl Iterator<Item = PackURI> + '_ {
        self.parts.iter().map(|p| PackURI::from_membername(&p.name))
    }

    /// Get the relationships whose source is `source` (a part or the package).
    ///
    /// A source without a `.rels` part has no relationships.
    pub fn rels_for(&self, source: &PackURI) -> Result<Relationships> {
        let rels_uri = source.rels_uri().map_err(OpcError::InvalidPackUri)?;
        match self.part(&rels_uri) {
            Some(xml) => Relationships::from_xml(xml, source.base_uri()),
            None => Ok(Relationships::default()),
        }
    }

    /// Get the content type map from `[Content_Types].xml`.
    pub fn content_types(&self) -> Result<ContentTypeMap> {
        let uri = PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
        ContentTypeMap::from_xml(self.require_part(&uri)?)
    }

    /// Locate the main document part via the package relationships.
    pub fn main_document_uri(&self) -> Result<PackURI> {
        let package = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
        let rels = self.rels_for(&package)?;
        let uri = match rels.part_with_reltype(relationship_type::OFFICE_DOCUMENT) {
            Some(rel) => rel.target_partname()?,
            None => PackURI::new(FALLBACK_MAIN_DOCUMENT).map_err(OpcError::InvalidPackUri)?,
        };

        if self.part(&uri).is_none() {
            return Err(OpcError::PartNotFound(uri.to_string()));
        }
        Ok(uri)
    }

    /// Serialize the package to ZIP bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = PhysPkgWriter::new();
        for part in &self.parts {
            writer.write(&PackURI::from_membername(&part.name), &part.data)?;
        }
        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package_with(parts: &[(&str, &str)]) -> OpcPackage {
        let mut writer = PhysPkgWriter::new();
        for (name, data) in parts {
            writer
                .write(&PackURI::from_membername(name), data.as_bytes())
                .unwrap();
        }
        OpcPackage::from_bytes(&writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_main_document_from_package_rels() {
        let pkg = package_with(&[
            (
                "_rels/.rels",
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/main.xml"/></Relationships>"#,
            ),
            ("word/main.xml", "<w:document/>"),
        ]);
        assert_eq!(pkg.main_document_uri().unwrap().as_str(), "/word/main.xml");
    }

    #[test]
    fn test_main_document_fallback_and_missing() {
        let pkg = package_with(&[("word/document.xml", "<w:document/>")]);
        assert_eq!(pkg.main_document_uri().unwrap().as_str(), "/word/document.xml");

        let empty = package_with(&[("docProps/app.xml", "<Properties/>")]);
        assert!(matches!(empty.main_document_uri(), Err(OpcError::PartNotFound(_))));
    }

    #[test]
    fn test_set_part_preserves_order() {
        let mut pkg = package_with(&[("a.xml", "<a/>"), ("b.xml", "<b/>")]);
        pkg.set_part(&PackURI::from_membername("a.xml"), b"<a2/>".to_vec());

        let reread = OpcPackage::from_bytes(&pkg.to_bytes().unwrap()).unwrap();
        let names: Vec<String> = reread.partnames().map(|u| u.to_string()).collect();
        assert_eq!(names, vec!["/a.xml", "/b.xml"]);
        assert_eq!(reread.part(&PackURI::from_membername("a.xml")), Some(&b"<a2/>"[..]));
    }
}
