//! Export of laid-out charts.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! turning a colored [`FlowGraph`] and its [`SankeyLayout`] into an output
//! format. It is the final stage of the pipeline.
//!
//! # Available Backends
//!
//! - [`svg`]: SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`SankeyError::Export`] at the crate
//! boundary.
//!
//! [`SankeyError::Export`]: crate::SankeyError::Export

/// SVG export backend.
pub mod svg;

use sankey_core::flow::FlowGraph;

use crate::layout::SankeyLayout;

/// Abstraction for chart export backends.
pub trait Exporter {
    /// Exports a chart to the backend's output format.
    ///
    /// `graph` must already be colored; nodes and links without a color
    /// are drawn in the backend's fallback color.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the layout does not match the graph, or
    /// [`Error::Io`] if writing the output fails.
    fn export_chart(&mut self, graph: &FlowGraph, layout: &SankeyLayout) -> Result<(), Error>;
}

/// Errors that can occur during chart export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
