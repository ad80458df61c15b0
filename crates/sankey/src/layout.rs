//! Layout of flow graphs.
//!
//! A [`LayoutEngine`] positions every node of a [`FlowGraph`] inside a
//! rectangular extent and computes the vertical band each link occupies at
//! both of its ends. The result is a [`SankeyLayout`], which the exporter
//! draws and the color pass uses for its node ordering.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ parse
//! FlowGraph
//!     ↓ layout (this module)
//! SankeyLayout
//!     ↓ colorize, export
//! SVG
//! ```

pub mod engines;

use sankey_core::{
    flow::{FlowGraph, NodeId},
    geometry::{Bounds, Point},
};

use crate::error::SankeyError;

/// Computes positions for a flow graph.
pub trait LayoutEngine {
    /// Lays out `graph` inside `extent`.
    ///
    /// # Errors
    ///
    /// Returns [`SankeyError::Layout`] if the graph cannot be laid out, for
    /// example because it contains a cycle.
    fn layout(&self, graph: &FlowGraph, extent: Bounds) -> Result<SankeyLayout, SankeyError>;
}

/// A node with its rectangle in chart coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    id: NodeId,
    bounds: Bounds,
    value: f64,
    column: usize,
}

impl PositionedNode {
    pub fn new(id: NodeId, bounds: Bounds, value: f64, column: usize) -> Self {
        Self {
            id,
            bounds,
            value,
            column,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The larger of the node's total inflow and total outflow.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Zero-based column the node was placed in, counted from the left.
    pub fn column(&self) -> usize {
        self.column
    }
}

/// A link with the band it occupies at its source and target nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedLink {
    index: usize,
    source: Point,
    target: Point,
    width: f32,
}

impl PositionedLink {
    /// `source` and `target` are the centers of the link band on the right
    /// edge of the source node and the left edge of the target node.
    pub fn new(index: usize, source: Point, target: Point, width: f32) -> Self {
        Self {
            index,
            source,
            target,
            width,
        }
    }

    /// Position of the link in [`FlowGraph::links`].
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn source(&self) -> Point {
        self.source
    }

    pub fn target(&self) -> Point {
        self.target
    }

    /// Thickness of the band. Zero for links without a usable value.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Path data for a horizontal cubic curve from source to target.
    ///
    /// Both control points sit halfway between the two ends, so the curve
    /// leaves and enters the nodes horizontally.
    pub fn path_data(&self) -> String {
        let mid_x = self.source.midpoint(self.target).x();
        format!(
            "M{},{}C{},{},{},{},{},{}",
            self.source.x(),
            self.source.y(),
            mid_x,
            self.source.y(),
            mid_x,
            self.target.y(),
            self.target.x(),
            self.target.y()
        )
    }
}

/// Positions for every node and link of a flow graph.
///
/// Nodes are kept in graph order and links in link order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SankeyLayout {
    extent: Bounds,
    nodes: Vec<PositionedNode>,
    links: Vec<PositionedLink>,
}

impl SankeyLayout {
    pub fn new(extent: Bounds, nodes: Vec<PositionedNode>, links: Vec<PositionedLink>) -> Self {
        Self {
            extent,
            nodes,
            links,
        }
    }

    /// The rectangle the layout was computed for.
    pub fn extent(&self) -> Bounds {
        self.extent
    }

    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[PositionedLink] {
        &self.links
    }

    /// Node ids in layout order, as consumed by the color pass.
    pub fn node_order(&self) -> Vec<NodeId> {
        self.nodes.iter().map(PositionedNode::id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks that the layout positions every node and link of `graph`
    /// exactly once.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first node id or link index that is out
    /// of range, repeated or missing.
    pub fn check_covers(&self, graph: &FlowGraph) -> Result<(), String> {
        let mut seen_nodes = vec![false; graph.node_count()];
        for node in &self.nodes {
            let index = node.id().index();
            match seen_nodes.get_mut(index) {
                None => return Err(format!("node id {index} is not in the graph")),
                Some(true) => return Err(format!("node id {index} is positioned twice")),
                Some(seen) => *seen = true,
            }
        }
        if let Some(missing) = seen_nodes.iter().position(|seen| !seen) {
            let name = graph.nodes().nth(missing).map_or("", |node| node.name());
            return Err(format!("node `{name}` has no position"));
        }

        let mut seen_links = vec![false; graph.link_count()];
        for link in &self.links {
            let index = link.index();
            match seen_links.get_mut(index) {
                None => return Err(format!("link index {index} is not in the graph")),
                Some(true) => return Err(format!("link index {index} is positioned twice")),
                Some(seen) => *seen = true,
            }
        }
        if let Some(missing) = seen_links.iter().position(|seen| !seen) {
            return Err(format!("link index {missing} has no position"));
        }
        Ok(())
    }
}
