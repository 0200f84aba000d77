//! Docmint - format-preserving template filling for Word documents
//!
//! This library fills `.docx` templates: it finds placeholder tokens in
//! paragraphs, table cells, headers and footers and replaces them with
//! caller-supplied values while keeping each run's formatting, then edits
//! table rows conditionally and cleans up duplicated text.
//!
//! # Features
//!
//! - **Run-aware substitution**: placeholders split across differently
//!   formatted runs (`"day"` + `"1"`) are found and replaced as one token
//! - **Longest-first rules**: `tec_10` is never corrupted by `tec_1`
//! - **Row editing**: remove or insert table rows by keyword
//! - **Cleanup**: `"DEL 2026 DEL 2026"` becomes `"DEL 2026"`, `"$$"` becomes `"$"`
//! - **Lossless packages**: parts the engine does not touch are written back unchanged
//!
//! # Example - Filling a template
//!
//! ```no_run
//! use docmint::template::{Generator, PlaceholderRule, RowDirective, RuleSet, Template};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let template = Template::open("contract.docx")?;
//!
//! let rules = RuleSet::new([
//!     PlaceholderRule::new("{{Name1}}", "JUAN PEREZ"),
//!     PlaceholderRule::new("{{value1}}", "2.440.000"),
//!     PlaceholderRule::new("day1", "15"),
//! ])?;
//! let generator = Generator::new(rules)
//!     .with_rows(vec![RowDirective::remove("extras", &["salary"])]);
//!
//! let generated = generator.generate(&template)?;
//! std::fs::write("contract-filled.docx", &generated.bytes)?;
//! println!("{} substitution(s)", generated.report.substitutions);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Reading a DOCX file
//!
//! ```no_run
//! use docmint::ooxml::docx::Package;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = Package::open("document.docx")?.into_document()?;
//!
//! // Print every paragraph with where it lives
//! doc.visit_paragraphs(|location, paragraph| {
//!     println!("{location}: {}", paragraph.text());
//! });
//! # Ok(())
//! # }
//! ```

/// Error types and XML text helpers shared across the crate
pub mod common;

/// OOXML (Office Open XML) package and WordprocessingML document model
///
/// This module reads `.docx` packages into an editable tree of paragraphs,
/// runs, tables, headers and footers, and writes them back.
pub mod ooxml;

/// Placeholder substitution, row editing and cleanup
pub mod template;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use template::{Generated, Generator, PlaceholderRule, Report, RowDirective, RuleSet, Template};
