//! Basic column layout engine.
//!
//! Places every node in a column derived from its depth in the flow graph,
//! sizes it by its throughput and then relaxes the vertical positions a few
//! times so that connected nodes line up. Nodes that only emit flow are
//! centered: they sit one column before their nearest target instead of in
//! the first column.
//!
//! The graph must be acyclic. Self-loops count as cycles.

use log::{debug, info, trace, warn};
use petgraph::{
    Direction,
    algo::toposort,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use sankey_core::{
    flow::{FlowGraph, NodeId, flow_weight},
    geometry::{Bounds, Point},
};

use crate::{
    error::SankeyError,
    layout::{LayoutEngine, PositionedLink, PositionedNode, SankeyLayout},
};

/// Vertical extent of a node or link band.
#[derive(Debug, Clone, Copy, Default)]
struct Band {
    y0: f64,
    y1: f64,
}

impl Band {
    fn center(self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }

    fn shift(&mut self, dy: f64) {
        self.y0 += dy;
        self.y1 += dy;
    }
}

/// The basic column layout engine.
#[derive(Debug, Clone)]
pub struct Engine {
    node_width: f64,
    node_padding: f64,
    iterations: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            node_width: 20.0,
            node_padding: 10.0,
            iterations: 6,
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the width of node rectangles
    pub fn set_node_width(&mut self, width: f64) -> &mut Self {
        self.node_width = width;
        self
    }

    /// Set the minimum vertical gap between nodes in the same column
    pub fn set_node_padding(&mut self, padding: f64) -> &mut Self {
        self.node_padding = padding;
        self
    }

    /// Set the number of relaxation passes
    pub fn set_iterations(&mut self, iterations: usize) -> &mut Self {
        self.iterations = iterations;
        self
    }

    /// Assigns each node a column, counted from the left.
    fn columns(&self, dag: &DiGraph<NodeId, usize>) -> Result<Vec<usize>, NodeIndex> {
        let order = toposort(dag, None).map_err(|cycle| cycle.node_id())?;

        let mut depth = vec![0usize; dag.node_count()];
        for &node in &order {
            for edge in dag.edges_directed(node, Direction::Outgoing) {
                let target = edge.target().index();
                depth[target] = depth[target].max(depth[node.index()] + 1);
            }
        }

        let columns = dag
            .node_indices()
            .map(|node| {
                let has_incoming = dag
                    .neighbors_directed(node, Direction::Incoming)
                    .next()
                    .is_some();
                if has_incoming {
                    return depth[node.index()];
                }
                dag.neighbors_directed(node, Direction::Outgoing)
                    .map(|target| depth[target.index()])
                    .min()
                    .map_or(0, |nearest| nearest.saturating_sub(1))
            })
            .collect();
        Ok(columns)
    }

    /// Moves each node toward the weighted center of its neighbors in the
    /// previous column (`direction` incoming) or next column (outgoing).
    fn relax(
        &self,
        ctx: &mut Relaxation<'_>,
        direction: Direction,
        alpha: f64,
        beta: f64,
    ) {
        let column_order: Vec<usize> = match direction {
            Direction::Incoming => (1..ctx.columns.len()).collect(),
            Direction::Outgoing => (0..ctx.columns.len().saturating_sub(1)).rev().collect(),
        };

        for column in column_order {
            for &node in &ctx.columns[column] {
                let mut weighted = 0.0;
                let mut total = 0.0;
                for edge in ctx.dag.edges_directed(NodeIndex::new(node), direction) {
                    let other = match direction {
                        Direction::Incoming => edge.source(),
                        Direction::Outgoing => edge.target(),
                    };
                    let weight = ctx.weights[*edge.weight()];
                    weighted += ctx.bands[other.index()].center() * weight;
                    total += weight;
                }
                if total > 0.0 {
                    let dy = (weighted / total - ctx.bands[node].center()) * alpha;
                    ctx.bands[node].shift(dy);
                }
            }

            let bands = &ctx.bands;
            ctx.columns[column].sort_by(|a, b| bands[*a].y0.total_cmp(&bands[*b].y0));
            self.resolve_collisions(&ctx.columns[column], ctx.bands, ctx.extent, ctx.padding, beta);
        }
    }

    /// Pushes overlapping nodes apart and back inside the extent.
    ///
    /// `column` must be sorted by `y0`.
    fn resolve_collisions(
        &self,
        column: &[usize],
        bands: &mut [Band],
        extent: Band,
        padding: f64,
        alpha: f64,
    ) {
        if column.is_empty() {
            return;
        }
        let middle = column.len() / 2;
        let subject = bands[column[middle]];

        push_up(&column[..middle], bands, subject.y0 - padding, padding, alpha);
        push_down(&column[middle + 1..], bands, subject.y1 + padding, padding, alpha);
        push_up(column, bands, extent.y1, padding, alpha);
        push_down(column, bands, extent.y0, padding, alpha);
    }
}

/// Working state shared by the relaxation passes.
struct Relaxation<'a> {
    dag: &'a DiGraph<NodeId, usize>,
    weights: &'a [f64],
    columns: Vec<Vec<usize>>,
    bands: &'a mut [Band],
    extent: Band,
    padding: f64,
}

/// Walks `nodes` top to bottom, moving each one below `y`.
fn push_down(nodes: &[usize], bands: &mut [Band], mut y: f64, padding: f64, alpha: f64) {
    for &node in nodes {
        let dy = (y - bands[node].y0) * alpha;
        if dy > 1e-6 {
            bands[node].shift(dy);
        }
        y = bands[node].y1 + padding;
    }
}

/// Walks `nodes` bottom to top, moving each one above `y`.
fn push_up(nodes: &[usize], bands: &mut [Band], mut y: f64, padding: f64, alpha: f64) {
    for &node in nodes.iter().rev() {
        let dy = (bands[node].y1 - y) * alpha;
        if dy > 1e-6 {
            bands[node].shift(-dy);
        }
        y = bands[node].y0 - padding;
    }
}

impl LayoutEngine for Engine {
    fn layout(&self, graph: &FlowGraph, extent: Bounds) -> Result<SankeyLayout, SankeyError> {
        if graph.is_empty() {
            debug!("Empty graph, nothing to lay out");
            return Ok(SankeyLayout::new(extent, Vec::new(), Vec::new()));
        }

        if let Some(link) = graph.links().iter().find(|link| link.is_self_loop()) {
            let name = graph.node(link.source()).name();
            return Err(SankeyError::Layout(format!("self-loop on node `{name}`")));
        }

        let mut dag = DiGraph::<NodeId, usize>::with_capacity(graph.node_count(), graph.link_count());
        for id in graph.node_ids() {
            dag.add_node(id);
        }
        for (index, link) in graph.links().iter().enumerate() {
            dag.add_edge(
                NodeIndex::new(link.source().index()),
                NodeIndex::new(link.target().index()),
                index,
            );
        }

        let columns = self.columns(&dag).map_err(|node| {
            let name = graph.node(dag[node]).name();
            SankeyError::Layout(format!("circular link through node `{name}`"))
        })?;
        let column_count = columns.iter().max().map_or(1, |max| max + 1);
        info!(nodes = graph.node_count(), columns = column_count; "Laying out flow graph");

        let weights: Vec<f64> = graph
            .links()
            .iter()
            .map(|link| {
                let weight = flow_weight(link.value());
                if weight == 0.0 && link.value() != 0.0 {
                    warn!(
                        source = graph.node(link.source()).name(),
                        target = graph.node(link.target()).name(),
                        value = link.value();
                        "Link drawn with zero width",
                    );
                }
                weight
            })
            .collect();
        let values: Vec<f64> = graph.node_ids().map(|id| graph.node_value(id)).collect();

        let mut by_column: Vec<Vec<usize>> = vec![Vec::new(); column_count];
        for (node, &column) in columns.iter().enumerate() {
            by_column[column].push(node);
        }

        let x0 = f64::from(extent.min_x());
        let y_extent = Band {
            y0: f64::from(extent.min_y()),
            y1: f64::from(extent.max_y()),
        };
        let height = y_extent.y1 - y_extent.y0;
        let kx = if column_count > 1 {
            (f64::from(extent.width()) - self.node_width) / (column_count - 1) as f64
        } else {
            0.0
        };

        let tallest = by_column.iter().map(Vec::len).max().unwrap_or(0);
        let padding = if tallest > 1 {
            self.node_padding.min(height / (tallest - 1) as f64)
        } else {
            self.node_padding
        };

        let ky = by_column
            .iter()
            .filter_map(|column| {
                let total: f64 = column.iter().map(|&node| values[node]).sum();
                (total > 0.0)
                    .then(|| (height - (column.len() - 1) as f64 * padding) / total)
            })
            .fold(f64::INFINITY, f64::min);
        let ky = if ky.is_finite() { ky.max(0.0) } else { 0.0 };
        debug!(ky, padding; "Vertical scale computed");

        let mut bands = vec![Band::default(); graph.node_count()];
        for column in &by_column {
            let mut y = y_extent.y0;
            for &node in column {
                bands[node] = Band {
                    y0: y,
                    y1: y + values[node] * ky,
                };
                y = bands[node].y1 + padding;
            }
            let spread = (y_extent.y1 - y + padding) / (column.len() + 1) as f64;
            for (i, &node) in column.iter().enumerate() {
                bands[node].shift(spread * (i + 1) as f64);
            }
        }

        let mut ctx = Relaxation {
            dag: &dag,
            weights: &weights,
            columns: by_column,
            bands: &mut bands,
            extent: y_extent,
            padding,
        };
        for i in 0..self.iterations {
            let alpha = 0.99f64.powi(i as i32);
            let beta = (1.0 - alpha).max((i + 1) as f64 / self.iterations as f64);
            self.relax(&mut ctx, Direction::Outgoing, alpha, beta);
            self.relax(&mut ctx, Direction::Incoming, alpha, beta);
        }

        let link_bands = link_bands(graph, &dag, &bands, &weights, ky);

        let nodes = graph
            .node_ids()
            .map(|id| {
                let node = id.index();
                let left = x0 + columns[node] as f64 * kx;
                let bounds = Bounds::new(
                    left as f32,
                    bands[node].y0 as f32,
                    (left + self.node_width) as f32,
                    bands[node].y1 as f32,
                );
                PositionedNode::new(id, bounds, values[node], columns[node])
            })
            .collect::<Vec<_>>();

        let links = graph
            .links()
            .iter()
            .enumerate()
            .map(|(index, link)| {
                let (source_y, target_y) = link_bands[index];
                PositionedLink::new(
                    index,
                    Point::new(nodes[link.source().index()].bounds().max_x(), source_y as f32),
                    Point::new(nodes[link.target().index()].bounds().min_x(), target_y as f32),
                    (weights[index] * ky) as f32,
                )
            })
            .collect();

        let layout = SankeyLayout::new(extent, nodes, links);
        trace!(layout:?; "Layout computed");
        Ok(layout)
    }
}

/// Stacks the links at each node, ordered by the position of the node at
/// their other end, and returns the band centers at source and target.
fn link_bands(
    graph: &FlowGraph,
    dag: &DiGraph<NodeId, usize>,
    bands: &[Band],
    weights: &[f64],
    ky: f64,
) -> Vec<(f64, f64)> {
    let mut centers = vec![(0.0, 0.0); graph.link_count()];

    for node in dag.node_indices() {
        let mut outgoing: Vec<(usize, f64)> = dag
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| (*edge.weight(), bands[edge.target().index()].y0))
            .collect();
        outgoing.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let mut y = bands[node.index()].y0;
        for (link, _) in outgoing {
            let width = weights[link] * ky;
            centers[link].0 = y + width / 2.0;
            y += width;
        }

        let mut incoming: Vec<(usize, f64)> = dag
            .edges_directed(node, Direction::Incoming)
            .map(|edge| (*edge.weight(), bands[edge.source().index()].y0))
            .collect();
        incoming.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let mut y = bands[node.index()].y0;
        for (link, _) in incoming {
            let width = weights[link] * ky;
            centers[link].1 = y + width / 2.0;
            y += width;
        }
    }

    centers
}
