//! Office Open XML (OOXML) format implementation.
//!
//! This module provides loading, editing and saving of WordprocessingML
//! (.docx) packages. The implementation is based on the Open Packaging
//! Conventions (OPC) and follows the structure of the python-docx library.
//!
//! # Architecture
//!
//! The module is organized into several layers:
//!
//! 1. **OPC Layer** (`opc`): Low-level package handling (ZIP, relationships, content types)
//! 2. **XML Layer** (`xml`): A lossless element tree for the parts being edited
//! 3. **Document Model** (`docx`): Paragraphs, runs, tables, headers and footers
//!
//! # Example: Working with Word Documents
//!
//! ```rust,no_run
//! use docmint::ooxml::docx::Package;
//!
//! // Open and read a document
//! let doc = Package::open("document.docx")?.into_document()?;
//!
//! // Extract text content
//! println!("{}", doc.text());
//! println!("Document contains {} paragraphs", doc.body().paragraphs().count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod docx;
pub mod error;
pub mod opc;
pub mod xml;

// Re-export commonly used types from OPC layer
pub use opc::{OpcPackage, PackURI};

// Re-export error types
pub use error::{OoxmlError, Result};
