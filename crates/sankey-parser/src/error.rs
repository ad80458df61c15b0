//! Error and diagnostic system for the Sankey parser.
//!
//! Parsing is best-effort: lines that cannot be understood are skipped and
//! reported as warnings. Only a non-numeric flow value under
//! [`ValuePolicy::Reject`](crate::ValuePolicy::Reject) produces an error,
//! which makes the whole parse fail with a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use sankey_parser::error::{Diagnostic, ErrorCode};
//! # use sankey_parser::Span;
//!
//! let diag = Diagnostic::warning("color for unknown node `Unknown`")
//!     .with_code(ErrorCode::E102)
//!     .with_label(Span::new(1..8), "no link line above mentions this node")
//!     .with_help("move the directive below the first link that uses the node");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
