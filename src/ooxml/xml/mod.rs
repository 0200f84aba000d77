//! Lossless XML element tree for editable parts.
//!
//! The read-only model of the Office library streams over raw bytes. Editing a
//! part requires an owned tree instead: [`parse`] builds one with quick-xml and
//! [`XmlPart::to_bytes`] writes it back. Markup the document model does not
//! understand is kept as [`Element`]s and round-trips unchanged.

mod reader;
mod tree;
mod writer;

pub use reader::parse;
pub use tree::{Element, Node, XmlPart};
