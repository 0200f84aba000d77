//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from internal
//! error types to the unified Error type.

use super::types::Error;
use crate::ooxml::error::OoxmlError;
use crate::ooxml::opc::error::OpcError;

impl From<OpcError> for Error {
    fn from(err: OpcError) -> Self {
        match err {
            OpcError::PackageNotFound(path) => Error::TemplateNotFound(path.into()),
            OpcError::IoError(e) => Error::Io(e),
            other => Error::MalformedTemplate(other.to_string()),
        }
    }
}

impl From<OoxmlError> for Error {
    fn from(err: OoxmlError) -> Self {
        match err {
            OoxmlError::Opc(e) => Error::from(e),
            OoxmlError::Io(e) => Error::Io(e),
            OoxmlError::RowOutOfRange { .. } => Error::Structure(err.to_string()),
            other => Error::MalformedTemplate(other.to_string()),
        }
    }
}

impl Error {
    /// Map a document-model error raised after mutation began.
    ///
    /// Parse errors at that point mean the in-memory tree is inconsistent, so
    /// they are reported as structural failures rather than template defects.
    pub(crate) fn during_mutation(err: OoxmlError) -> Self {
        match err {
            OoxmlError::Io(e) => Error::Io(e),
            other => Error::Structure(other.to_string()),
        }
    }
}
