//! SVG export backend.
//!
//! [`SvgBuilder`] collects the chart, style and currency settings and
//! produces an [`Svg`] exporter that writes into any [`io::Write`].
//!
//! The document is drawn in three groups, bottom to top: node rectangles,
//! link paths and node labels. Each node gets two labels, its name just
//! above its vertical center and its formatted value just below. Labels sit
//! to the right of nodes in the left half of the chart and to the left of
//! the others.

use std::io::{self, Write as _};

use log::{debug, error, info};
use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use sankey_core::{
    color::Color,
    currency::CurrencyFormat,
    flow::FlowGraph,
    geometry::Size,
};

use crate::{
    config::{ChartConfig, StyleConfig},
    export,
    layout::{PositionedLink, PositionedNode, SankeyLayout},
};

/// Fill and stroke used for elements the color pass left uncolored.
const FALLBACK_COLOR: &str = "#7f7f7f";

/// Horizontal gap between a node and its labels.
const LABEL_GAP: f32 = 6.0;

/// Builder for [`Svg`] exporters.
pub struct SvgBuilder<W> {
    writer: W,
    chart: ChartConfig,
    style: StyleConfig,
    currency: CurrencyFormat,
}

impl<W> SvgBuilder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            chart: ChartConfig::default(),
            style: StyleConfig::default(),
            currency: CurrencyFormat::default(),
        }
    }

    pub fn with_chart(mut self, chart: &ChartConfig) -> Self {
        self.chart = *chart;
        self
    }

    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    pub fn with_currency(mut self, currency: &CurrencyFormat) -> Self {
        self.currency = currency.clone();
        self
    }

    /// Validates the settings and creates the exporter.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if the configured background color
    /// is not a CSS color.
    pub fn build(self) -> Result<Svg<W>, export::Error> {
        let background = self
            .style
            .background_color()
            .map_err(export::Error::Render)?;

        Ok(Svg {
            writer: self.writer,
            size: Size::new(self.chart.width() as f32, self.chart.height() as f32),
            font_size: self.chart.font_size(),
            background,
            link_opacity: self.style.link_opacity(),
            currency: self.currency,
        })
    }
}

/// SVG exporter for laid-out charts.
pub struct Svg<W> {
    writer: W,
    size: Size,
    font_size: u32,
    background: Option<Color>,
    link_opacity: f32,
    currency: CurrencyFormat,
}

impl<W> Svg<W> {
    /// Consumes the exporter and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Renders the chart to an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if `layout` does not position every
    /// node and link of `graph` exactly once.
    pub fn render_chart(
        &self,
        graph: &FlowGraph,
        layout: &SankeyLayout,
    ) -> Result<Document, export::Error> {
        layout.check_covers(graph).map_err(export::Error::Render)?;

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", self.size.width(), self.size.height()),
            )
            .set("width", self.size.width())
            .set("height", self.size.height());

        if let Some(background) = &self.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", background)
                    .set("fill-opacity", background.alpha()),
            );
        }

        let nodes = layout
            .nodes()
            .iter()
            .fold(svg_element::Group::new().set("class", "nodes"), |group, node| {
                group.add(self.render_node(graph, node))
            });

        let links = layout.links().iter().fold(
            svg_element::Group::new()
                .set("class", "links")
                .set("fill", "none"),
            |group, link| group.add(self.render_link(graph, link)),
        );

        let labels = layout.nodes().iter().fold(
            svg_element::Group::new().set("class", "labels"),
            |group, node| {
                let (name, value) = self.render_labels(graph, node, layout);
                group.add(name).add(value)
            },
        );

        debug!(nodes = layout.nodes().len(), links = layout.links().len(); "SVG document rendered");
        Ok(doc.add(nodes).add(links).add(labels))
    }

    fn render_node(&self, graph: &FlowGraph, node: &PositionedNode) -> svg_element::Rectangle {
        let bounds = node.bounds();
        let fill = graph.node(node.id()).color().unwrap_or(FALLBACK_COLOR);

        svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("fill", fill)
            .set("stroke", "#000")
            .set("stroke-width", "1px")
    }

    fn render_link(&self, graph: &FlowGraph, link: &PositionedLink) -> svg_element::Path {
        let flow = &graph.links()[link.index()];
        let stroke = flow
            .color()
            .or_else(|| graph.node(flow.source()).color())
            .unwrap_or(FALLBACK_COLOR);

        svg_element::Path::new()
            .set("d", link.path_data())
            .set("stroke", stroke)
            .set("stroke-opacity", self.link_opacity)
            .set("stroke-width", link.width().max(1.0))
    }

    /// Returns the name label and the value label of a node.
    fn render_labels(
        &self,
        graph: &FlowGraph,
        node: &PositionedNode,
        layout: &SankeyLayout,
    ) -> (svg_element::Text, svg_element::Text) {
        let bounds = node.bounds();
        let extent = layout.extent();
        let left_half = bounds.min_x() < extent.min_x() + extent.width() / 2.0;
        let (x, anchor) = if left_half {
            (bounds.max_x() + LABEL_GAP, "start")
        } else {
            (bounds.min_x() - LABEL_GAP, "end")
        };
        let center_y = bounds.center().y();

        let label = |y: f32, content: String| {
            svg_element::Text::new("")
                .set("x", x)
                .set("y", y)
                .set("dy", "0.2em")
                .set("text-anchor", anchor)
                .set("font-size", format!("{}px", self.font_size))
                .add(SvgText::new(content))
        };

        let name = graph.node(node.id()).name().to_string();
        (
            label(center_y - LABEL_GAP, name),
            label(center_y + LABEL_GAP, self.currency.format(node.value())),
        )
    }
}

impl<W: io::Write> export::Exporter for Svg<W> {
    fn export_chart(&mut self, graph: &FlowGraph, layout: &SankeyLayout) -> Result<(), export::Error> {
        let doc = self.render_chart(graph, layout)?;

        info!("Writing SVG document");
        if let Err(err) = write!(self.writer, "{doc}") {
            error!(err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sankey_core::geometry::{Bounds, Point};

    use super::*;
    use crate::export::Exporter as _;

    fn chart() -> (FlowGraph, SankeyLayout) {
        let mut graph = FlowGraph::new();
        let a = graph.ensure_node("Salary");
        let b = graph.ensure_node("Income");
        graph.add_link(a, b, 2500.0, Some("#e5a".to_string()));
        graph.node_mut(a).set_color("#1f77b4");
        graph.node_mut(b).set_color("#ff7f0e");

        let layout = SankeyLayout::new(
            Bounds::new(1.0, 1.0, 199.0, 99.0),
            vec![
                PositionedNode::new(a, Bounds::new(1.0, 1.0, 21.0, 99.0), 2500.0, 0),
                PositionedNode::new(b, Bounds::new(179.0, 1.0, 199.0, 99.0), 2500.0, 1),
            ],
            vec![PositionedLink::new(
                0,
                Point::new(21.0, 50.0),
                Point::new(179.0, 50.0),
                98.0,
            )],
        );
        (graph, layout)
    }

    fn render(graph: &FlowGraph, layout: &SankeyLayout, style: &StyleConfig) -> String {
        let mut svg = SvgBuilder::new(Vec::new())
            .with_chart(&ChartConfig::new(200, 110, 14))
            .with_style(style)
            .build()
            .unwrap();
        svg.export_chart(graph, layout).unwrap();
        String::from_utf8(svg.into_inner()).unwrap()
    }

    #[test]
    fn test_renders_nodes_links_and_labels() {
        let (graph, layout) = chart();
        let output = render(&graph, &layout, &StyleConfig::default());

        assert!(output.contains(r##"fill="#1f77b4""##));
        assert!(output.contains(r##"stroke="#000""##));
        assert!(output.contains(r##"stroke="#e5a""##));
        assert!(output.contains(r#"stroke-width="98""#));
        assert!(output.contains("Salary"));
        assert!(output.contains("$2,500.00"));
        assert!(output.contains(r#"font-size="14px""#));
    }

    #[test]
    fn test_label_sides() {
        let (graph, layout) = chart();
        let doc = SvgBuilder::new(io::sink())
            .build()
            .unwrap()
            .render_chart(&graph, &layout)
            .unwrap()
            .to_string();

        // Left node labels start right of it; right node labels end left of it.
        assert!(doc.contains(r#"x="27""#));
        assert!(doc.contains(r#"text-anchor="start""#));
        assert!(doc.contains(r#"text-anchor="end""#));
        assert!(doc.contains(r#"x="173""#));
    }

    #[test]
    fn test_thin_links_are_visible() {
        let (graph, _) = chart();
        let layout = SankeyLayout::new(
            Bounds::default(),
            vec![
                PositionedNode::new(graph.node_id("Salary").unwrap(), Bounds::default(), 0.0, 0),
                PositionedNode::new(graph.node_id("Income").unwrap(), Bounds::default(), 0.0, 1),
            ],
            vec![PositionedLink::new(0, Point::default(), Point::default(), 0.0)],
        );
        let output = render(&graph, &layout, &StyleConfig::default());
        assert!(output.contains(r#"stroke-width="1""#));
    }

    #[test]
    fn test_background() {
        let (graph, layout) = chart();
        let mut style = StyleConfig::default();
        style.set_background_color("white");
        let output = render(&graph, &layout, &style);
        assert!(output.contains(r#"height="100%""#));
    }

    #[test]
    fn test_invalid_background_rejected() {
        let mut style = StyleConfig::default();
        style.set_background_color("definitely-not");
        let result = SvgBuilder::new(Vec::<u8>::new()).with_style(&style).build();
        assert!(matches!(result, Err(export::Error::Render(_))));
    }

    #[test]
    fn test_mismatched_layout_rejected() {
        let (graph, _) = chart();
        let svg = SvgBuilder::new(Vec::<u8>::new()).build().unwrap();
        let result = svg.render_chart(&graph, &SankeyLayout::default());
        assert!(matches!(result, Err(export::Error::Render(_))));
    }

    #[test]
    fn test_out_of_range_link_rejected() {
        let (graph, layout) = chart();
        let links = layout
            .links()
            .iter()
            .map(|link| PositionedLink::new(link.index() + 5, link.source(), link.target(), 1.0))
            .collect();
        let layout = SankeyLayout::new(layout.extent(), layout.nodes().to_vec(), links);

        let svg = SvgBuilder::new(Vec::<u8>::new()).build().unwrap();
        let result = svg.render_chart(&graph, &layout);
        assert!(matches!(result, Err(export::Error::Render(message)) if message.contains("link index 5")));
    }
}
