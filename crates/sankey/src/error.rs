//! Error types for Sankey operations.
//!
//! This module provides the main error type [`SankeyError`] which wraps
//! the error conditions that can occur while turning chart source into SVG.

use std::io;

use thiserror::Error;

use sankey_core::palette::PaletteError;
use sankey_parser::ParseError;

/// The main error type for Sankey operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the chart source next to the parser
/// diagnostics so that reporters can show labeled source snippets.
#[derive(Debug, Error)]
pub enum SankeyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for SankeyError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl From<PaletteError> for SankeyError {
    fn from(error: PaletteError) -> Self {
        Self::Config(error.to_string())
    }
}

impl SankeyError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
