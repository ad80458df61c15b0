//! Miette rendering for chart errors and parse warnings.
//!
//! Each parser diagnostic becomes its own [`Reportable`], labeled against
//! the chart source. Other [`SankeyError`] variants become a single
//! [`Reportable`] with a `sankey::*` code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity as MietteSeverity, SourceSpan};

use sankey::SankeyError;
use sankey_parser::{Diagnostic, Severity, Span};

/// One renderable report.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A parser diagnostic with the chart source it points into.
    Diagnostic { diag: &'a Diagnostic, src: &'a str },
    /// Any error that carries no source location.
    Error(&'a SankeyError),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic { diag, .. } => f.write_str(diag.message()),
            Reportable::Error(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic { .. } => None,
            Reportable::Error(err) => err.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic { diag, .. } => diag
                .code()
                .map(|code| Box::new(code) as Box<dyn fmt::Display>),
            Reportable::Error(err) => error_code(err).map(|code| Box::new(code) as Box<dyn fmt::Display>),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic { diag, .. } if diag.severity() == Severity::Warning => {
                Some(MietteSeverity::Warning)
            }
            _ => Some(MietteSeverity::Error),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic { diag, .. } => diag
                .help()
                .map(|help| Box::new(help) as Box<dyn fmt::Display>),
            Reportable::Error(SankeyError::Layout(_)) => Some(Box::new(
                "flows must not form cycles; check for links that lead back to an earlier node",
            )),
            Reportable::Error(_) => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic { src, .. } => Some(src as &dyn miette::SourceCode),
            Reportable::Error(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Reportable::Diagnostic { diag, .. } = self else {
            return None;
        };
        if diag.labels().is_empty() {
            return None;
        }
        Some(Box::new(
            diag.labels()
                .iter()
                .map(|label| LabeledSpan::at(source_span(label.span()), label.message())),
        ))
    }
}

fn error_code(err: &SankeyError) -> Option<&'static str> {
    match err {
        SankeyError::Io(_) => Some("sankey::io"),
        SankeyError::Parse { .. } => None,
        SankeyError::Config(_) => Some("sankey::config"),
        SankeyError::Layout(_) => Some("sankey::layout"),
        SankeyError::Export(_) => Some("sankey::export"),
    }
}

fn source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`SankeyError`] into the reports to render.
///
/// A [`SankeyError::Parse`] yields one report per diagnostic, warnings
/// included.
pub fn to_reportables(err: &SankeyError) -> Vec<Reportable<'_>> {
    match err {
        SankeyError::Parse { err: parse_err, src } => warning_reportables(parse_err.diagnostics(), src),
        _ => vec![Reportable::Error(err)],
    }
}

/// Wrap parser diagnostics for rendering against `src`.
pub fn warning_reportables<'a>(diagnostics: &'a [Diagnostic], src: &'a str) -> Vec<Reportable<'a>> {
    diagnostics
        .iter()
        .map(|diag| Reportable::Diagnostic { diag, src })
        .collect()
}
