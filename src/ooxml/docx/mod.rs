/// Word (.docx) document support.
///
/// This module loads the WordprocessingML parts of a package into an
/// editable tree and writes them back.
///
/// # Architecture
///
/// The module is organized around these key types:
/// - `Package`: The overall .docx file package
/// - `Document`: The body, sections and header/footer parts
/// - `Story`: Ordered blocks of a body, cell, header or footer
/// - `Paragraph`: A paragraph with runs
/// - `Run`: A text run with a `Format`
/// - `Table`: A table with rows and cells
///
/// # Example
///
/// ```rust,no_run
/// use docmint::ooxml::docx::Package;
///
/// // Open a document
/// let doc = Package::open("document.docx")?.into_document()?;
///
/// // Access paragraphs and runs
/// for para in doc.body().paragraphs() {
///     println!("Paragraph: {}", para.text());
///     for run in para.runs() {
///         println!("  Run: {} (bold: {:?})", run.text(), run.format().bold());
///     }
/// }
///
/// // Access tables
/// for table in doc.body().tables() {
///     for row in table.rows() {
///         for cell in row.cells() {
///             println!("Cell: {}", cell.text());
///         }
///     }
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod document;
pub mod enums;
pub mod format;
pub mod header_footer;
pub mod package;
pub mod paragraph;
pub mod section;
pub mod story;
pub mod table;

#[cfg(test)]
pub(crate) mod fixtures;

pub use document::Document;
pub use enums::{HeaderFooterKind, WdHeaderFooter};
pub use format::Format;
pub use header_footer::HeaderFooter;
pub use package::Package;
pub use paragraph::{Inline, Paragraph, Run};
pub use section::Section;
pub use story::{Block, Location, Story, StoryKind};
pub use table::{Cell, Row, Table, VMergeState};
