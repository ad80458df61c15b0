//! Graph building from classified lines.
//!
//! The builder walks the classified lines in order and applies each
//! directive to a fresh [`FlowGraph`]. Lines that cannot be applied are
//! reported as warnings; only a rejected flow value is an error.

use log::{debug, info, trace, warn};

use sankey_core::{
    color::Color,
    flow::{FlowGraph, ValuePolicy},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    tokens::{Directive, InvalidKind, Line, Spanned},
};

/// Configuration for building a graph from source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseConfig {
    /// What to do with flow values that are not numbers.
    pub value_policy: ValuePolicy,
}

impl ParseConfig {
    pub fn new(value_policy: ValuePolicy) -> Self {
        Self { value_policy }
    }
}

/// A successfully built graph and the warnings raised while building it.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub graph: FlowGraph,
    pub warnings: Vec<Diagnostic>,
}

/// A color directive whose node did not exist when it was read.
struct DroppedColor<'src> {
    name: Spanned<&'src str>,
    line: usize,
}

pub struct Builder<'src> {
    cfg: ParseConfig,
    graph: FlowGraph,
    diagnostics: DiagnosticCollector,
    dropped_colors: Vec<DroppedColor<'src>>,
}

impl<'src> Builder<'src> {
    pub fn new(cfg: ParseConfig) -> Self {
        Self {
            cfg,
            graph: FlowGraph::new(),
            diagnostics: DiagnosticCollector::new(),
            dropped_colors: Vec::new(),
        }
    }

    pub fn build(mut self, lines: &[Line<'src>]) -> Result<ParseOutput, ParseError> {
        debug!(lines = lines.len(); "Building flow graph");

        for line in lines {
            trace!(line = line.number, kind = line.directive.kind_name(); "Applying directive");
            match &line.directive {
                Directive::Comment | Directive::Blank => {}
                Directive::NodeColor { name, color } => self.apply_node_color(line, *name, *color),
                Directive::Link {
                    source,
                    value,
                    target,
                    color,
                } => self.apply_link(*source, *value, *target, *color),
                Directive::Invalid(kind) => self.report_invalid(line, *kind),
            }
        }

        self.report_dropped_colors();

        let Self {
            graph, diagnostics, ..
        } = self;
        let warnings = diagnostics.finish()?;

        info!(
            nodes = graph.node_count(),
            links = graph.link_count(),
            warnings = warnings.len();
            "Flow graph built",
        );
        trace!(graph:?; "Built graph");
        Ok(ParseOutput { graph, warnings })
    }

    fn apply_link(
        &mut self,
        source: Spanned<&'src str>,
        value: Spanned<&'src str>,
        target: Spanned<&'src str>,
        color: Option<Spanned<&'src str>>,
    ) {
        let source_id = self.graph.ensure_node(source.inner());
        let target_id = self.graph.ensure_node(target.inner());
        let flow = self.parse_value(value);

        let color = color.map(|color| {
            self.check_color(color);
            color.inner().to_string()
        });
        self.graph.add_link(source_id, target_id, flow, color);
    }

    fn apply_node_color(
        &mut self,
        line: &Line<'src>,
        name: Spanned<&'src str>,
        color: Spanned<&'src str>,
    ) {
        self.check_color(color);
        if self.graph.set_node_color(name.inner(), color.inner()) {
            debug!(node = *name.inner(), color = *color.inner(); "Node color set");
        } else {
            warn!(node = *name.inner(), line = line.number; "Color directive for unknown node dropped");
            self.dropped_colors.push(DroppedColor {
                name,
                line: line.number,
            });
        }
    }

    /// Converts a trimmed value token into a flow value.
    ///
    /// An empty token is zero. Anything that is not a number becomes `NaN`,
    /// reported according to the configured [`ValuePolicy`].
    fn parse_value(&mut self, value: Spanned<&'src str>) -> f64 {
        let text = *value.inner();
        if text.is_empty() {
            return 0.0;
        }

        match numeric_value(text) {
            Some(flow) => flow,
            None => {
                let message = format!("flow value `{text}` is not a number");
                let diagnostic = match self.cfg.value_policy {
                    ValuePolicy::PassThrough => {
                        warn!(value = text; "Non-numeric flow value kept as NaN");
                        Diagnostic::warning(message)
                            .with_label(value.span(), "kept as NaN")
                            .with_help("links with a NaN value are drawn with zero width")
                    }
                    ValuePolicy::Reject => Diagnostic::error(message)
                        .with_label(value.span(), "expected a number"),
                };
                self.diagnostics.emit(diagnostic.with_code(ErrorCode::E200));
                f64::NAN
            }
        }
    }

    /// Reports color tokens that are not CSS colors. The token is still used.
    fn check_color(&mut self, color: Spanned<&'src str>) {
        if let Err(err) = Color::new(color.inner()) {
            warn!(color = *color.inner(); "Unrecognized color token");
            self.diagnostics.emit(
                Diagnostic::warning(err)
                    .with_code(ErrorCode::E103)
                    .with_label(color.span(), "not a CSS color"),
            );
        }
    }

    fn report_invalid(&mut self, line: &Line<'src>, kind: InvalidKind) {
        warn!(line = line.number, kind:?; "Line ignored");
        let diagnostic = match kind {
            InvalidKind::MalformedLink => Diagnostic::warning("malformed link line ignored")
                .with_code(ErrorCode::E100)
                .with_label(line.span, "no `]` after the first `[`")
                .with_help("links are written as `Source [value] Target`"),
            InvalidKind::MalformedNodeColor => {
                Diagnostic::warning("malformed node color directive ignored")
                    .with_code(ErrorCode::E101)
                    .with_label(line.span, "expected `:<name> <color>`")
            }
            InvalidKind::Unrecognized => Diagnostic::warning("unrecognized line ignored")
                .with_code(ErrorCode::E104)
                .with_label(line.span, "neither a link nor a node color")
                .with_help("comments start with `//`"),
        };
        self.diagnostics.emit(diagnostic);
    }

    fn report_dropped_colors(&mut self) {
        let dropped = std::mem::take(&mut self.dropped_colors);
        for DroppedColor { name, line } in dropped {
            let mut diagnostic =
                Diagnostic::warning(format!("color for unknown node `{}`", name.inner()))
                    .with_code(ErrorCode::E102)
                    .with_label(name.span(), "no earlier link mentions this node");

            // Directives only apply to nodes that already exist.
            if self.graph.node_id(name.inner()).is_some() {
                debug!(node = *name.inner(), line; "Dropped color names a later node");
                diagnostic = diagnostic
                    .with_help("move the directive below the first link that uses the node");
            }
            self.diagnostics.emit(diagnostic);
        }
    }
}

/// Reads a flow value token as a number.
///
/// `NaN` and the `inf`/`infinity` spellings are not numbers; the only
/// infinite literal is `Infinity` with an optional sign. Digits that
/// overflow `f64` still read as infinite.
fn numeric_value(text: &str) -> Option<f64> {
    let flow = text.parse::<f64>().ok()?;
    if flow.is_nan() {
        return None;
    }
    if flow.is_infinite() {
        let unsigned = text
            .strip_prefix(['+', '-'])
            .unwrap_or(text);
        if unsigned.starts_with(|c: char| c.is_ascii_alphabetic()) && unsigned != "Infinity" {
            return None;
        }
    }
    Some(flow)
}
