/// Package implementation for Word documents.
use crate::ooxml::docx::document::Document;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::content_type as ct;
use std::io::{Read, Seek};
use std::path::Path;

/// A Word (.docx or .dotx) package.
///
/// This is the main entry point for working with Word documents.
/// It wraps an OPC package and checks that its main part is a
/// WordprocessingML document.
///
/// # Examples
///
/// ```rust,no_run
/// use docmint::ooxml::docx::Package;
///
/// // Open an existing document
/// let pkg = Package::open("template.docx")?;
///
/// // Load the main document
/// let doc = pkg.into_document()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Package {
    /// The underlying OPC package
    opc: OpcPackage,
}

impl Package {
    /// Open a .docx package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::verified(OpcPackage::open(path)?)
    }

    /// Create a .docx package from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::verified(OpcPackage::from_reader(reader)?)
    }

    /// Create a .docx package from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::verified(OpcPackage::from_bytes(bytes)?)
    }

    /// Verify it's a Word document by checking the main part's content type.
    fn verified(opc: OpcPackage) -> Result<Self> {
        let main_uri = opc
            .main_document_uri()
            .map_err(|e| OoxmlError::PartNotFound(format!("main document part: {}", e)))?;

        let content_type = opc.content_types()?.get(&main_uri).unwrap_or("").to_string();
        if !ct::WML_MAIN_PARTS.contains(&content_type.as_str()) {
            return Err(OoxmlError::InvalidContentType {
                expected: ct::WML_DOCUMENT_MAIN.to_string(),
                got: content_type,
            });
        }

        Ok(Self { opc })
    }

    /// Parse the main document.
    pub fn into_document(self) -> Result<Document> {
        Document::load(self.opc)
    }

    /// Get the underlying OPC package.
    ///
    /// This provides access to lower-level package operations.
    #[inline]
    pub fn opc_package(&self) -> &OpcPackage {
        &self.opc
    }
}
