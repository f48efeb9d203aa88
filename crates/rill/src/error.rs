//! Error types for rill operations.
//!
//! This module provides the main error type [`RillError`] which wraps
//! the error conditions that can occur while producing a diagram.

use std::io;

use thiserror::Error;

use rill_parser::error::ParseError;

/// The main error type for rill operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant contains structured error information with source
/// code spans, alongside the source itself so callers can render rich
/// reports.
#[derive(Debug, Error)]
pub enum RillError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for RillError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl RillError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
