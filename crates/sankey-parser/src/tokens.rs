//! Classified lines of Sankey source.
//!
//! Every source line is classified into exactly one [`Directive`] kind by
//! the [`lexer`](crate::lexer). Text pieces keep the byte span they were cut
//! from so that diagnostics can point at them.

use std::fmt;

use crate::span::Span;

/// A value paired with the source span it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned<T> {
    value: T,
    span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Get a reference to the underlying value
    pub fn inner(&self) -> &T {
        &self.value
    }
}

impl<'src> Spanned<&'src str> {
    /// Trims surrounding whitespace, narrowing the span to match.
    pub fn trimmed(self) -> Self {
        let leading = self.value.len() - self.value.trim_start().len();
        let value = self.value.trim();
        let start = self.span.start() + leading;
        Self::new(value, Span::new(start..start + value.len()))
    }
}

/// Why a line was classified as [`Directive::Invalid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidKind {
    /// The line has both brackets, but no `]` follows the first `[`.
    MalformedLink,
    /// The line contains `:` but is not `:<name> <color>`.
    MalformedNodeColor,
    /// The line matches no directive.
    Unrecognized,
}

/// The kind of a single source line, with its pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'src> {
    /// A line starting with `//`.
    Comment,
    /// A line holding only whitespace.
    Blank,
    /// `:<name> <color>`
    NodeColor {
        name: Spanned<&'src str>,
        color: Spanned<&'src str>,
    },
    /// `<source> [<value>] <target> [#color]`
    ///
    /// All pieces are trimmed. `value` is kept as text; turning it into a
    /// number is left to the graph builder.
    Link {
        source: Spanned<&'src str>,
        value: Spanned<&'src str>,
        target: Spanned<&'src str>,
        color: Option<Spanned<&'src str>>,
    },
    /// A line that is ignored.
    Invalid(InvalidKind),
}

impl Directive<'_> {
    /// Short name of the directive kind, for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Directive::Comment => "comment",
            Directive::Blank => "blank",
            Directive::NodeColor { .. } => "node-color",
            Directive::Link { .. } => "link",
            Directive::Invalid(_) => "invalid",
        }
    }
}

/// A classified source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'src> {
    /// 1-based line number.
    pub number: usize,
    /// Span of the line content, without the line terminator.
    pub span: Span,
    pub directive: Directive<'src>,
}

impl fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} ({})", self.number, self.directive.kind_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_narrows_span() {
        let piece = Spanned::new("  Income ", Span::new(10..19)).trimmed();
        assert_eq!(*piece.inner(), "Income");
        assert_eq!(piece.span(), Span::new(12..18));
    }

    #[test]
    fn test_trimmed_whitespace_only_is_empty() {
        let piece = Spanned::new("   ", Span::new(4..7)).trimmed();
        assert_eq!(*piece.inner(), "");
        assert!(piece.span().is_empty());
    }

    #[test]
    fn test_line_display() {
        let line = Line {
            number: 3,
            span: Span::new(0..4),
            directive: Directive::Blank,
        };
        assert_eq!(line.to_string(), "line 3 (blank)");
    }
}
