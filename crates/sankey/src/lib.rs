//! Sankey - Flow charts from a small text notation.
//!
//! Parsing, layout, coloring and SVG rendering for Sankey charts. A chart
//! is written one flow per line:
//!
//! ```text
//! Salary [2500] Income
//! Income [400] Food #e5a
//! :Income #548755
//! ```

pub mod config;

mod error;
pub mod export;
pub mod layout;

pub use sankey_core::{color, colorize, currency, flow, geometry, palette};
pub use sankey_parser::{Diagnostic, ParseOutput};

pub use error::SankeyError;

use log::{debug, info, trace};

use sankey_core::{colorize::assign_colors, flow::FlowGraph};

use config::AppConfig;
use export::Exporter;
use layout::{LayoutEngine, SankeyLayout, engines};

/// Builder for parsing and rendering Sankey charts.
///
/// This provides an API for processing charts through parsing, layout,
/// coloring and rendering stages.
///
/// # Examples
///
/// ```rust
/// use sankey::{ChartBuilder, config::AppConfig};
///
/// let source = "Salary [2500] Income\nIncome [1000] Taxes";
///
/// let builder = ChartBuilder::new(AppConfig::default());
///
/// // Parse source to a flow graph
/// let mut output = builder.parse(source).expect("Failed to parse");
///
/// // Lay out, color and render the graph
/// let svg = builder.render_svg(&mut output.graph).expect("Failed to render");
/// assert!(svg.contains("<svg"));
///
/// // Or use default config
/// let builder = ChartBuilder::default();
/// ```
pub struct ChartBuilder {
    config: AppConfig,
    engine: Box<dyn LayoutEngine>,
}

impl Default for ChartBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl ChartBuilder {
    /// Create a new chart builder with the given configuration and the
    /// basic layout engine.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            engine: Box::new(engines::Basic::default()),
        }
    }

    /// Replace the layout engine.
    pub fn with_engine(mut self, engine: impl LayoutEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source text into a flow graph.
    ///
    /// Lines that cannot be understood are skipped and returned as
    /// warnings in the [`ParseOutput`].
    ///
    /// # Errors
    ///
    /// Returns [`SankeyError::Parse`] when the configured value policy
    /// rejects a non-numeric flow value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sankey::ChartBuilder;
    ///
    /// let output = ChartBuilder::default()
    ///     .parse("A [1] B\nthis line is ignored")
    ///     .expect("Failed to parse chart");
    /// assert_eq!(output.graph.node_count(), 2);
    /// assert_eq!(output.warnings.len(), 1);
    /// ```
    pub fn parse(&self, source: &str) -> Result<ParseOutput, SankeyError> {
        info!("Parsing chart");

        let output = sankey_parser::parse_with(source, (*self.config.parse()).into())
            .map_err(|err| SankeyError::new_parse_error(err, source))?;

        debug!(
            nodes = output.graph.node_count(),
            links = output.graph.link_count(),
            warnings = output.warnings.len();
            "Chart parsed successfully",
        );
        Ok(output)
    }

    /// Compute the layout of a flow graph for the configured chart size.
    ///
    /// # Errors
    ///
    /// Returns [`SankeyError::Layout`] if the graph has a cycle, or if the
    /// engine does not position every node and link exactly once.
    pub fn layout(&self, graph: &FlowGraph) -> Result<SankeyLayout, SankeyError> {
        let extent = self.config.chart().extent();
        let layout = self.engine.layout(graph, extent)?;
        layout.check_covers(graph).map_err(SankeyError::Layout)?;
        info!(nodes = layout.nodes().len(), links = layout.links().len(); "Layout calculated");
        Ok(layout)
    }

    /// Lay out, color and render a flow graph to an SVG string.
    ///
    /// Nodes and links without an explicit color are colored in place,
    /// following the node order of the layout.
    ///
    /// # Errors
    ///
    /// Returns [`SankeyError::Layout`] for graphs that cannot be laid out,
    /// [`SankeyError::Config`] for an invalid palette or background color
    /// and [`SankeyError::Export`] if rendering fails.
    pub fn render_svg(&self, graph: &mut FlowGraph) -> Result<String, SankeyError> {
        let palette = self.config.style().palette()?;
        let layout = self.layout(graph)?;

        assign_colors(graph, &layout.node_order(), &palette);
        trace!(graph:?; "Colored graph");

        let mut svg_exporter = export::svg::SvgBuilder::new(Vec::new())
            .with_chart(self.config.chart())
            .with_style(self.config.style())
            .with_currency(self.config.currency())
            .build()
            .map_err(|err| match err {
                export::Error::Render(message) => SankeyError::Config(message),
                other => other.into(),
            })?;

        svg_exporter.export_chart(graph, &layout)?;

        let svg_string = String::from_utf8(svg_exporter.into_inner())
            .map_err(|err| SankeyError::Export(Box::new(err)))?;

        info!(bytes = svg_string.len(); "SVG rendered successfully");
        Ok(svg_string)
    }

    /// Parse and render source text in one step.
    ///
    /// # Errors
    ///
    /// See [`ChartBuilder::parse`] and [`ChartBuilder::render_svg`].
    pub fn render_source(&self, source: &str) -> Result<String, SankeyError> {
        let mut output = self.parse(source)?;
        self.render_svg(&mut output.graph)
    }
}
