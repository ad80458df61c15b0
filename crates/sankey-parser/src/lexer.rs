//! Line classifier for Sankey source text.
//!
//! The source is processed one line at a time. Each line is classified into
//! a [`Directive`], checking the kinds in this order:
//!
//! 1. comment (`//` at the very start of the line) or blank line
//! 2. node color: the line contains `:`; shape `:<name> <color>`
//! 3. link: the line contains both `[` and `]`;
//!    shape `<source> [<value>] <target> [#color]`
//! 4. anything else is [`Directive::Invalid`]
//!
//! Classification never fails; malformed lines come back as
//! [`Directive::Invalid`] and are reported by the graph builder.

use winnow::{
    Parser as _,
    error::ModalResult,
    stream::LocatingSlice,
    token::{rest, take_till, take_while},
};

use crate::{
    span::Span,
    tokens::{Directive, InvalidKind, Line, Spanned},
};

type Input<'a> = LocatingSlice<&'a str>;

/// Raw pieces of a link line, before trimming.
struct LinkParts<'a> {
    source: Spanned<&'a str>,
    value: Spanned<&'a str>,
    target: Spanned<&'a str>,
}

/// Splits `source` into lines and classifies each one.
///
/// Lines are separated by `\n`; a trailing `\r` is not part of the line.
pub fn tokenize(source: &str) -> Vec<Line<'_>> {
    let mut offset = 0;
    source
        .split('\n')
        .enumerate()
        .map(|(index, raw)| {
            let content = raw.strip_suffix('\r').unwrap_or(raw);
            let line = Line {
                number: index + 1,
                span: Span::new(offset..offset + content.len()),
                directive: classify_at(content, offset),
            };
            offset += raw.len() + 1;
            line
        })
        .collect()
}

/// Classifies a single line. Spans are relative to the start of `line`.
///
/// # Example
///
/// ```
/// use sankey_parser::{Directive, classify};
///
/// match classify("Income [400] Food #e5a") {
///     Directive::Link { source, target, color, .. } => {
///         assert_eq!(*source.inner(), "Income");
///         assert_eq!(*target.inner(), "Food");
///         assert_eq!(color.map(|c| *c.inner()), Some("#e5a"));
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub fn classify(line: &str) -> Directive<'_> {
    classify_at(line, 0)
}

fn classify_at(line: &str, offset: usize) -> Directive<'_> {
    if line.starts_with("//") {
        return Directive::Comment;
    }
    if line.trim().is_empty() {
        return Directive::Blank;
    }
    if line.contains(':') {
        return node_color(line, offset);
    }
    if line.contains('[') && line.contains(']') {
        return link(line, offset);
    }
    Directive::Invalid(InvalidKind::Unrecognized)
}

fn node_color(line: &str, offset: usize) -> Directive<'_> {
    let mut input = Input::new(line);
    let Ok((name, color)) = node_color_parts.parse_next(&mut input) else {
        return Directive::Invalid(InvalidKind::MalformedNodeColor);
    };

    let color = color.trimmed();
    if color.inner().is_empty() {
        return Directive::Invalid(InvalidKind::MalformedNodeColor);
    }

    Directive::NodeColor {
        name: shift(name, offset),
        color: shift(color, offset),
    }
}

/// `:<name> <color>`, allowing whitespace before the colon.
fn node_color_parts<'a>(input: &mut Input<'a>) -> ModalResult<(Spanned<&'a str>, Spanned<&'a str>)> {
    take_while(0.., |c: char| c.is_whitespace()).void().parse_next(input)?;
    ':'.void().parse_next(input)?;
    let (name, name_span) = take_till(0.., ' ').with_span().parse_next(input)?;
    ' '.void().parse_next(input)?;
    let (color, color_span) = rest.with_span().parse_next(input)?;

    Ok((
        Spanned::new(name, name_span.into()),
        Spanned::new(color, color_span.into()),
    ))
}

fn link(line: &str, offset: usize) -> Directive<'_> {
    let mut input = Input::new(line);
    let Ok(parts) = link_parts.parse_next(&mut input) else {
        return Directive::Invalid(InvalidKind::MalformedLink);
    };

    let (target, color) = split_target(parts.target.trimmed());

    Directive::Link {
        source: shift(parts.source.trimmed(), offset),
        value: shift(parts.value.trimmed(), offset),
        target: shift(target, offset),
        color: color.map(|color| shift(color, offset)),
    }
}

/// Everything before the first `[`, then up to the next `]`, then the rest.
fn link_parts<'a>(input: &mut Input<'a>) -> ModalResult<LinkParts<'a>> {
    let (source, source_span) = take_till(0.., '[').with_span().parse_next(input)?;
    '['.void().parse_next(input)?;
    let (value, value_span) = take_till(0.., ']').with_span().parse_next(input)?;
    ']'.void().parse_next(input)?;
    let (target, target_span) = rest.with_span().parse_next(input)?;

    Ok(LinkParts {
        source: Spanned::new(source, source_span.into()),
        value: Spanned::new(value, value_span.into()),
        target: Spanned::new(target, target_span.into()),
    })
}

/// Splits a trimmed target on its first whitespace run.
///
/// When the part after the run starts with `#` it is the link color and the
/// part before it is the target name. Otherwise the whole text is the
/// target name and the link has no color.
fn split_target(target: Spanned<&str>) -> (Spanned<&str>, Option<Spanned<&str>>) {
    let mut input = Input::new(*target.inner());
    match target_parts.parse_next(&mut input) {
        Ok((name, remainder)) if remainder.inner().starts_with('#') => {
            let base = target.span().start();
            let name = Spanned::new(*name.inner(), name.span().offset_by(base));
            let color = Spanned::new(*remainder.inner(), remainder.span().offset_by(base));
            (name, Some(color))
        }
        _ => (target, None),
    }
}

fn target_parts<'a>(input: &mut Input<'a>) -> ModalResult<(Spanned<&'a str>, Spanned<&'a str>)> {
    let (name, name_span) = take_till(0.., |c: char| c.is_whitespace())
        .with_span()
        .parse_next(input)?;
    take_while(1.., |c: char| c.is_whitespace()).void().parse_next(input)?;
    let (remainder, remainder_span) = rest.with_span().parse_next(input)?;

    Ok((
        Spanned::new(name, name_span.into()),
        Spanned::new(remainder, remainder_span.into()),
    ))
}

fn shift(piece: Spanned<&str>, offset: usize) -> Spanned<&str> {
    Spanned::new(*piece.inner(), piece.span().offset_by(offset))
}
