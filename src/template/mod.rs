//! Template substitution engine.
//!
//! The pieces, leaves first:
//!
//! - [`rule`]: placeholder rules and the longest-first [`RuleSet`]
//! - `scanner` and [`replace`]: run-aware matching and format-preserving replacement
//! - [`rows`]: conditional table row removal and insertion
//! - [`cleanup`]: collapsing duplicated text left by overlapping substitutions
//! - [`normalize`], [`config`] and [`builder`]: turning a request payload into
//!   rules and row directives
//! - [`engine`]: the per-request pipeline over a [`Template`]
//!
//! # Example
//!
//! ```rust,no_run
//! use docmint::template::{Generator, Template, TemplateConfig, parse_payload};
//!
//! let template = Template::open("cv.docx")?;
//! let config = TemplateConfig::load("cv.yaml")?;
//! let record = config.normalize(parse_payload(r#"{"nombre": "Ana Gomez"}"#)?);
//!
//! let generated = Generator::from_config(&config, &record)?.generate(&template)?;
//! std::fs::write("out.docx", &generated.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod cleanup;
pub mod config;
pub mod engine;
pub mod normalize;
pub mod replace;
pub mod rows;
pub mod rule;
pub(crate) mod scanner;

pub use cleanup::{CleanupPipeline, CleanupRule};
pub use config::{TemplateConfig, parse_payload};
pub use engine::{Generated, Generator, Report, Template, output_file_name};
pub use normalize::{AliasTable, DataValue, Record};
pub use rows::{RowAction, RowDirective, RowReport, find_row, insert_row_before, remove_row};
pub use rule::{PlaceholderRule, RuleSet, Spacing};
