//! Unified error types for docmint.
//!
//! This module provides a unified error type that encompasses errors from the
//! package layer, the document model and configuration loading, presenting a
//! consistent API to users.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
