//! Flow graph data model.
//!
//! A [`FlowGraph`] owns an ordered, name-deduplicated node table and an
//! ordered list of [`Link`]s. Links refer to nodes through [`NodeId`]
//! handles into that table rather than holding copies, so a color assigned
//! to a node after a link was created is observed through the link.
//!
//! Node insertion order is significant: it drives default palette
//! selection and is preserved by the layout engines.
//!
//! # Example
//!
//! ```
//! use sankey_core::flow::FlowGraph;
//!
//! let mut graph = FlowGraph::new();
//! let salary = graph.ensure_node("Salary");
//! let income = graph.ensure_node("Income");
//! graph.add_link(salary, income, 2500.0, None);
//!
//! assert!(graph.set_node_color("Income", "#548755"));
//! let link = &graph.links()[0];
//! assert_eq!(graph.node(link.target()).color(), Some("#548755"));
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

/// Stable handle to a node inside a [`FlowGraph`].
///
/// The wrapped value is the node's position in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the node's position in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named entity in the flow graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    color: Option<String>,
}

impl Node {
    fn new(name: String) -> Self {
        Self { name, color: None }
    }

    /// The node's unique, trimmed name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node's color, if one was set explicitly or assigned.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = Some(color.into());
    }
}

/// A weighted, directed flow between two nodes.
#[derive(Debug, Clone)]
pub struct Link {
    source: NodeId,
    target: NodeId,
    value: f64,
    color: Option<String>,
}

impl Link {
    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The flow value. May be `NaN` when the source text held a
    /// non-numeric value and the parser was told to keep it.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = Some(color.into());
    }

    /// Returns `true` for self-loops.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

// NaN values compare equal so that parsing the same text twice yields equal graphs.
impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        let same_value =
            self.value == other.value || (self.value.is_nan() && other.value.is_nan());
        self.source == other.source
            && self.target == other.target
            && same_value
            && self.color == other.color
    }
}

/// The node table and link list produced by parsing a chart.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    nodes: IndexMap<String, Node>,
    links: Vec<Link>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of the node called `name`, creating it at the end of
    /// the node table if it does not exist yet.
    ///
    /// Names are trimmed, so `" A"` and `"A"` are the same node.
    pub fn ensure_node(&mut self, name: &str) -> NodeId {
        let name = name.trim();
        if let Some(index) = self.nodes.get_index_of(name) {
            return NodeId(index);
        }
        let (index, _) = self
            .nodes
            .insert_full(name.to_string(), Node::new(name.to_string()));
        NodeId(index)
    }

    /// Looks up a node by its trimmed name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.nodes.get_index_of(name.trim()).map(NodeId)
    }

    /// Returns the node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this graph.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Mutable access to the node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this graph.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Sets the color of an existing node.
    ///
    /// Returns `false`, leaving the graph untouched, when no node called
    /// `name` exists. Color directives never create nodes.
    pub fn set_node_color(&mut self, name: &str, color: &str) -> bool {
        match self.nodes.get_mut(name.trim()) {
            Some(node) => {
                node.set_color(color);
                true
            }
            None => false,
        }
    }

    /// Appends a link between two existing nodes.
    pub fn add_link(&mut self, source: NodeId, target: NodeId, value: f64, color: Option<String>) {
        debug_assert!(source.0 < self.nodes.len() && target.0 < self.nodes.len());
        self.links.push(Link {
            source,
            target,
            value,
            color,
        });
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> {
        self.nodes.values()
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl ExactSizeIterator<Item = NodeId> + use<> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut [Link] {
        &mut self.links
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Links leaving `id`, in link order.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |link| link.source == id)
    }

    /// Links entering `id`, in link order.
    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |link| link.target == id)
    }

    /// The throughput of a node: the larger of its total inflow and total
    /// outflow. Non-finite and negative link values count as zero.
    pub fn node_value(&self, id: NodeId) -> f64 {
        let inflow: f64 = self.incoming(id).map(|link| flow_weight(link.value)).sum();
        let outflow: f64 = self.outgoing(id).map(|link| flow_weight(link.value)).sum();
        inflow.max(outflow)
    }
}

// Order-sensitive, unlike `IndexMap`'s own equality.
impl PartialEq for FlowGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes.len() == other.nodes.len()
            && self.nodes.values().eq(other.nodes.values())
            && self.links == other.links
    }
}

/// What the parser does with a flow value that is not a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuePolicy {
    /// Keep the link with a `NaN` value and report a warning.
    #[default]
    PassThrough,
    /// Fail the parse with an error for every such value.
    Reject,
}

/// The weight a link value contributes to layout and totals.
///
/// Values that cannot describe a flow (`NaN`, infinities, negatives) weigh
/// nothing.
pub fn flow_weight(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salary_graph() -> FlowGraph {
        let mut graph = FlowGraph::new();
        let salary = graph.ensure_node("Salary");
        let bonus = graph.ensure_node("Bonus");
        let income = graph.ensure_node("Income");
        let taxes = graph.ensure_node("Taxes");
        graph.add_link(salary, income, 2500.0, None);
        graph.add_link(bonus, income, 2000.0, None);
        graph.add_link(income, taxes, 1000.0, None);
        graph
    }

    #[test]
    fn test_ensure_node_deduplicates() {
        let mut graph = FlowGraph::new();
        let first = graph.ensure_node("A");
        let second = graph.ensure_node("A");
        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_ensure_node_preserves_insertion_order() {
        let graph = salary_graph();
        let names: Vec<_> = graph.nodes().map(Node::name).collect();
        assert_eq!(names, ["Salary", "Bonus", "Income", "Taxes"]);
        let ids: Vec<_> = graph.node_ids().map(NodeId::index).collect();
        assert_eq!(ids, [0, 1, 2, 3]);
    }

    #[test]
    fn test_color_change_visible_through_link() {
        let mut graph = salary_graph();
        assert!(graph.set_node_color("Income", "#548755"));

        let link = &graph.links()[0];
        assert_eq!(graph.node(link.target()).color(), Some("#548755"));
    }

    #[test]
    fn test_set_color_on_unknown_node_does_nothing() {
        let mut graph = salary_graph();
        let before = graph.clone();
        assert!(!graph.set_node_color("Unknown", "#fff"));
        assert_eq!(graph, before);
        assert!(graph.node_id("Unknown").is_none());
    }

    #[test]
    fn test_node_value_is_max_of_in_and_out() {
        let graph = salary_graph();
        let income = graph.node_id("Income").unwrap();
        assert_eq!(graph.node_value(income), 4500.0);
        let taxes = graph.node_id("Taxes").unwrap();
        assert_eq!(graph.node_value(taxes), 1000.0);
    }

    #[test]
    fn test_node_value_ignores_nan() {
        let mut graph = FlowGraph::new();
        let a = graph.ensure_node("A");
        let b = graph.ensure_node("B");
        graph.add_link(a, b, f64::NAN, None);
        graph.add_link(a, b, 3.0, None);
        assert_eq!(graph.node_value(a), 3.0);
    }

    #[test]
    fn test_parallel_links_not_merged() {
        let mut graph = FlowGraph::new();
        let a = graph.ensure_node("A");
        let b = graph.ensure_node("B");
        graph.add_link(a, b, 1.0, None);
        graph.add_link(a, b, 2.0, None);
        assert_eq!(graph.link_count(), 2);
        assert_eq!(graph.outgoing(a).count(), 2);
        assert_eq!(graph.incoming(b).count(), 2);
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let mut left = FlowGraph::new();
        left.ensure_node("A");
        left.ensure_node("B");

        let mut right = FlowGraph::new();
        right.ensure_node("B");
        right.ensure_node("A");

        assert_ne!(left, right);
    }

    #[test]
    fn test_nan_links_compare_equal() {
        let build = || {
            let mut graph = FlowGraph::new();
            let a = graph.ensure_node("A");
            let b = graph.ensure_node("B");
            graph.add_link(a, b, f64::NAN, None);
            graph
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_names_are_trimmed() {
        let mut graph = FlowGraph::new();
        let a = graph.ensure_node(" A");
        assert_eq!(graph.ensure_node("A\t"), a);
        assert_eq!(graph.node(a).name(), "A");
        assert_eq!(graph.node_id("  A "), Some(a));
        assert!(graph.set_node_color(" A", "#fff"));
        assert_eq!(graph.node(a).color(), Some("#fff"));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_self_loop() {
        let mut graph = FlowGraph::new();
        let a = graph.ensure_node("A");
        graph.add_link(a, a, 1.0, None);
        assert!(graph.links()[0].is_self_loop());
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_flow_weight() {
        assert_eq!(flow_weight(2.5), 2.5);
        assert_eq!(flow_weight(-1.0), 0.0);
        assert_eq!(flow_weight(f64::NAN), 0.0);
        assert_eq!(flow_weight(f64::INFINITY), 0.0);
    }
}
