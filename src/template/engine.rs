//! The generation pipeline: template in, filled document bytes out.

use crate::common::{Error, Result};
use crate::ooxml::docx::{Document, Package};
use crate::template::builder::{build_cleanup, build_row_directives, build_rules};
use crate::template::cleanup::CleanupPipeline;
use crate::template::config::TemplateConfig;
use crate::template::normalize::Record;
use crate::template::replace;
use crate::template::rows::{self, RowDirective, RowReport};
use crate::template::rule::RuleSet;
use chrono::NaiveDateTime;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An immutable, validated template.
///
/// The bytes are read once and shared; every request instantiates its own
/// [`Document`] from them, so the template itself is never mutated.
///
/// # Examples
///
/// ```rust,no_run
/// use docmint::template::{Generator, Template};
/// use docmint::template::{PlaceholderRule, RuleSet};
///
/// let template = Template::open("contract.docx")?;
/// let rules = RuleSet::new([PlaceholderRule::new("{{Name1}}", "JUAN PEREZ")])?;
/// let generated = Generator::new(rules).generate(&template)?;
/// std::fs::write("out.docx", &generated.bytes)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    bytes: Arc<[u8]>,
    path: Option<PathBuf>,
}

impl Template {
    /// Read and validate a template file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::TemplateNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let mut template = Self::from_bytes(bytes)?;
        template.path = Some(path.to_path_buf());
        Ok(template)
    }

    /// Validate template bytes.
    ///
    /// The package is parsed once into the document model, so a template
    /// that loads here instantiates without error later.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let bytes = bytes.into();
        parse(&bytes)?;
        Ok(Self { bytes, path: None })
    }

    /// A fresh document for one request.
    pub fn instantiate(&self) -> Result<Document> {
        parse(&self.bytes)
    }

    /// The template package bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Where the template was read from, if it came from a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn parse(bytes: &[u8]) -> Result<Document> {
    Package::from_bytes(bytes)
        .and_then(Package::into_document)
        .map_err(|e| Error::MalformedTemplate(e.to_string()))
}

/// What a generation did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub substitutions: usize,
    pub rows: RowReport,
    pub paragraphs_cleaned: usize,
}

/// Output of [`Generator::generate`].
#[derive(Debug, Clone)]
pub struct Generated {
    pub bytes: Vec<u8>,
    pub report: Report,
}

/// Applies rules, row directives and cleanup to documents.
#[derive(Debug, Clone)]
pub struct Generator {
    rules: RuleSet,
    rows: Vec<RowDirective>,
    cleanup: CleanupPipeline,
}

impl Generator {
    /// Substitution only, with the standard cleanup.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            rows: Vec::new(),
            cleanup: CleanupPipeline::standard(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<RowDirective>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_cleanup(mut self, cleanup: CleanupPipeline) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Build everything a template configuration asks for from one record.
    pub fn from_config(config: &TemplateConfig, record: &Record) -> Result<Self> {
        Ok(Self {
            rules: build_rules(config, record)?,
            rows: build_row_directives(config, record),
            cleanup: build_cleanup(config)?,
        })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn rows(&self) -> &[RowDirective] {
        &self.rows
    }

    /// Transform a document in place.
    ///
    /// Order: substitution over every paragraph (body, cells, headers,
    /// footers), row directives over body tables, then cleanup over every
    /// paragraph. On error the document is half-edited and must be dropped.
    pub fn transform(&self, document: &mut Document) -> Result<Report> {
        let mut report = Report::default();

        document.for_each_paragraph_mut(|paragraph| {
            report.substitutions += replace::apply(paragraph, &self.rules);
        });

        if !self.rows.is_empty() {
            let mut failure = None;
            document.for_each_table_mut(|table| {
                if failure.is_some() {
                    return;
                }
                match rows::apply(table, &self.rows) {
                    Ok(table_report) => report.rows.merge(table_report),
                    Err(e) => failure = Some(e),
                }
            });
            if let Some(e) = failure {
                return Err(Error::during_mutation(e));
            }
        }

        document.for_each_paragraph_mut(|paragraph| {
            if self.cleanup.apply(paragraph) {
                report.paragraphs_cleaned += 1;
            }
        });

        debug!("{report:?}");
        Ok(report)
    }

    /// Instantiate `template`, transform it and serialize the result.
    pub fn generate(&self, template: &Template) -> Result<Generated> {
        let mut document = template.instantiate()?;
        let report = self.transform(&mut document)?;
        let bytes = document.to_bytes().map_err(Error::during_mutation)?;
        info!(
            "generated {} bytes: {} substitution(s), {} row(s) removed, {} inserted, {} paragraph(s) cleaned",
            bytes.len(),
            report.substitutions,
            report.rows.removed,
            report.rows.inserted,
            report.paragraphs_cleaned
        );
        Ok(Generated { bytes, report })
    }
}

/// File name for a generated document: `HV_Ana_Gomez_20260115_093000.docx`.
///
/// Whitespace becomes `_`; characters other than letters, digits, `-`
/// and `_` are dropped. An empty name leaves `<prefix>_<timestamp>.docx`.
pub fn output_file_name(prefix: &str, name: &str, timestamp: NaiveDateTime) -> String {
    let mut clean = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_whitespace() || c == '_' {
            if !clean.is_empty() && !clean.ends_with('_') {
                clean.push('_');
            }
        } else if c.is_alphanumeric() || c == '-' {
            clean.push(c);
        }
    }
    let clean = clean.trim_end_matches('_');

    let stamp = timestamp.format("%Y%m%d_%H%M%S");
    match (prefix.is_empty(), clean.is_empty()) {
        (false, false) => format!("{prefix}_{clean}_{stamp}.docx"),
        (false, true) => format!("{prefix}_{stamp}.docx"),
        (true, false) => format!("{clean}_{stamp}.docx"),
        (true, true) => format!("{stamp}.docx"),
    }
}
