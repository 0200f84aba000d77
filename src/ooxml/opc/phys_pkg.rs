//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! The package is small (a template of a handful of pages), so every member is
//! decompressed up front and kept in ZIP entry order. Writing reproduces that
//! order.

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// One decompressed member of the package.
#[derive(Debug, Clone)]
pub struct PhysPart {
    /// ZIP member name (no leading slash)
    pub name: String,
    /// Decompressed content
    pub data: Vec<u8>,
}

/// Physical package reader.
pub struct PhysPkgReader;

impl PhysPkgReader {
    /// Read every member of the package at `path`.
    ///
    /// # Errors
    /// Returns `PackageNotFound` if the file doesn't exist, or a ZIP error if
    /// it isn't a valid archive.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Vec<PhysPart>> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(OpcError::PackageNotFound(path.display().to_string()));
        }

        let data = std::fs::read(path)?;
        Self::read(Cursor::new(data))
    }

    /// Read every member of the package from a reader.
    pub fn read<R: Read + Seek>(reader: R) -> Result<Vec<PhysPart>> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.push(PhysPart { name, data });
        }

        Ok(parts)
    }
}

/// Physical package writer producing an in-memory ZIP archive.
pub struct PhysPkgWriter {
    /// The underlying ZIP archive writer
    archive: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl PhysPkgWriter {
    /// Create a new package writer that writes to memory.
    pub fn new() -> Self {
        Self {
            archive: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Write a part to the package.
    ///
    /// Media parts are already compressed and are stored; everything else
    /// is deflated.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        let method = if pack_uri.membername().starts_with("word/media/") {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        let options = SimpleFileOptions::default().compression_method(method);
        self.archive.start_file(pack_uri.membername(), options)?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Finish writing and return the package bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.archive.finish()?.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut writer = PhysPkgWriter::new();
        let document = PackURI::new("/word/document.xml").unwrap();
        let media = PackURI::new("/word/media/image1.png").unwrap();
        writer.write(&document, b"<document/>").unwrap();
        writer.write(&media, &[0x89, b'P', b'N', b'G']).unwrap();
        let zip_data = writer.finish().unwrap();

        let parts = PhysPkgReader::read(Cursor::new(zip_data)).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "word/document.xml");
        assert_eq!(parts[0].data, b"<document/>");
        assert_eq!(parts[1].name, "word/media/image1.png");
    }

    #[test]
    fn test_missing_package() {
        let err = PhysPkgReader::open("/nonexistent/template.docx").unwrap_err();
        assert!(matches!(err, OpcError::PackageNotFound(_)));
    }

    #[test]
    fn test_not_a_zip() {
        let err = PhysPkgReader::read(Cursor::new(b"plain text".to_vec())).unwrap_err();
        assert!(matches!(err, OpcError::ZipError(_)));
    }
}
