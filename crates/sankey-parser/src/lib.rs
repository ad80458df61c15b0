//! # Sankey Parser
//!
//! Parser for the Sankey chart notation. Each source line is one of:
//!
//! ```text
//! // a comment
//! Salary [2500] Income
//! Income [400] Food #e5a
//! :Income #548755
//! ```
//!
//! Link lines create their nodes on first mention; node color lines only
//! recolor nodes that already exist. Malformed lines are skipped and
//! reported as warnings.
//!
//! ## Usage
//!
//! ```
//! # use sankey_parser::{parse_with, ParseConfig, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "Salary [2500] Income\n:Income #548755";
//!
//!     let output = parse_with(source, ParseConfig::default())?;
//!     assert_eq!(output.graph.node_count(), 2);
//!     assert!(output.warnings.is_empty());
//!     Ok(())
//! }
//! ```

mod builder;
pub mod error;
mod lexer;
mod span;
mod tokens;

pub use builder::{ParseConfig, ParseOutput};
pub use sankey_core::flow::ValuePolicy;
pub use error::{Diagnostic, ErrorCode, Label, ParseError, Severity};
pub use lexer::classify;
pub use span::Span;
pub use tokens::{Directive, InvalidKind, Line, Spanned};

use log::info;

use sankey_core::flow::FlowGraph;

use builder::Builder;

/// Parse source text into a flow graph, keeping non-numeric values as `NaN`.
///
/// Never fails: every malformed line is skipped. Use [`parse_with`] to get
/// the warnings or to reject non-numeric values.
///
/// # Example
///
/// ```
/// let graph = sankey_parser::parse("Salary [2500] Income");
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.links()[0].value(), 2500.0);
/// ```
pub fn parse(source: &str) -> FlowGraph {
    let lines = lexer::tokenize(source);
    match Builder::new(ParseConfig::default()).build(&lines) {
        Ok(output) => output.graph,
        // The pass-through policy only emits warnings.
        Err(_) => FlowGraph::new(),
    }
}

/// Parse source text into a flow graph.
///
/// The pipeline has two steps:
///
/// 1. **Classify** - Split the source into lines and classify each one
/// 2. **Build** - Apply the directives, in order, to a fresh graph
///
/// # Errors
///
/// Returns a [`ParseError`] when the [`ValuePolicy`] is `Reject` and at
/// least one flow value is not a number. The error carries every
/// diagnostic, warnings included.
///
/// [`ValuePolicy`]: sankey_core::flow::ValuePolicy
pub fn parse_with(source: &str, config: ParseConfig) -> Result<ParseOutput, ParseError> {
    info!(bytes = source.len(), policy:? = config.value_policy; "Parsing chart");

    // Step 1: Classify
    let lines = lexer::tokenize(source);

    // Step 2: Build
    Builder::new(config).build(&lines)
}
