/// Open Packaging Conventions (OPC) implementation.
///
/// This module provides the parts of the Open Packaging Conventions a template engine
/// needs:
///
/// - ZIP-based physical packaging (read every member, write them back in order)
/// - Content type lookup
/// - Relationship parsing, used to find the main document, headers and footers

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod phys_pkg;
pub mod pkgreader;
pub mod rel;

// Re-export commonly used types
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use rel::{Relationship, Relationships};
