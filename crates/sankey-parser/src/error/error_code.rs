//! Error codes for the Sankey diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Directive shape problems (the line is ignored)
//! - `E2xx` - Value problems

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Directive Errors (E1xx)
    // =========================================================================
    /// Malformed link line.
    ///
    /// The line contains `[` and `]` but the closing bracket comes before
    /// the opening one, so no value can be read.
    E100,

    /// Malformed node-color directive.
    ///
    /// A line containing `:` did not have the `:<name> <color>` shape.
    E101,

    /// Color directive for an unknown node.
    ///
    /// Node-color directives only apply to nodes that already appeared in
    /// a link line above them.
    E102,

    /// Unrecognized color.
    ///
    /// The color token is not valid CSS color syntax. It is still applied.
    E103,

    /// Unrecognized line.
    ///
    /// The line is neither a comment, a link nor a node-color directive.
    E104,

    // =========================================================================
    // Value Errors (E2xx)
    // =========================================================================
    /// Non-numeric flow value.
    E200,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E200 => "E200",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "malformed link",
            ErrorCode::E101 => "malformed node color",
            ErrorCode::E102 => "unknown node",
            ErrorCode::E103 => "unrecognized color",
            ErrorCode::E104 => "unrecognized line",
            ErrorCode::E200 => "non-numeric value",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
