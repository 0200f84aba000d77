//! Unified error types for docmint.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for docmint operations.
///
/// `TemplateNotFound` and `MalformedTemplate` are raised while loading, before
/// any document is mutated. `Structure` is raised once mutation has begun; the
/// affected document must be discarded.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The template file does not exist
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// The template package cannot be parsed into the document model
    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    /// A structural edit failed after mutation started
    #[error("Structural failure: {0}")]
    Structure(String),

    /// Invalid configuration or request payload
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for docmint operations.
pub type Result<T> = std::result::Result<T, Error>;
