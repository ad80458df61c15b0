//! Default color assignment for nodes and links.
//!
//! Runs once per render, after layout. Node colors are resolved first:
//! every node without an explicit color takes the palette entry at its
//! position in the layout's node order. Link colors are resolved second:
//! every link without an explicit color takes the resolved color of its
//! source node. Links sharing a source therefore render alike unless one of
//! them carries its own color.

use log::{debug, trace};

use crate::{
    flow::{FlowGraph, NodeId},
    palette::Palette,
};

/// Resolves a color for every node and link of `graph`, in place.
///
/// `order` is the node ordering produced by the layout step and decides
/// which palette entry a node receives. Nodes missing from `order` are
/// colored afterwards, continuing the palette sequence in graph order, so
/// that every node ends up with a color.
///
/// # Example
///
/// ```
/// use sankey_core::{colorize::assign_colors, flow::FlowGraph, palette::Palette};
///
/// let mut graph = FlowGraph::new();
/// let a = graph.ensure_node("A");
/// let b = graph.ensure_node("B");
/// graph.add_link(a, b, 1.0, None);
///
/// let palette = Palette::new(["red", "blue"]).unwrap();
/// assign_colors(&mut graph, &[b, a], &palette);
///
/// assert_eq!(graph.node(b).color(), Some("red"));
/// assert_eq!(graph.node(a).color(), Some("blue"));
/// assert_eq!(graph.links()[0].color(), Some("blue"));
/// ```
pub fn assign_colors(graph: &mut FlowGraph, order: &[NodeId], palette: &Palette) {
    let mut position = 0;
    let mut assigned = 0;

    for &id in order {
        let node = graph.node_mut(id);
        if node.color().is_none() {
            node.set_color(palette.color(position));
            assigned += 1;
        }
        position += 1;
    }

    let unordered: Vec<NodeId> = graph.node_ids().filter(|id| !order.contains(id)).collect();
    for id in unordered {
        let node = graph.node_mut(id);
        if node.color().is_none() {
            node.set_color(palette.color(position));
            assigned += 1;
        }
        position += 1;
    }

    debug!(assigned; "Assigned default node colors");

    let source_colors: Vec<Option<String>> = graph
        .links()
        .iter()
        .map(|link| graph.node(link.source()).color().map(str::to_string))
        .collect();

    for (link, source_color) in graph.links_mut().iter_mut().zip(source_colors) {
        if link.color().is_some() {
            continue;
        }
        if let Some(color) = source_color {
            link.set_color(color);
        }
    }

    trace!(graph:?; "Colors resolved");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget() -> FlowGraph {
        let mut graph = FlowGraph::new();
        let salary = graph.ensure_node("Salary");
        let income = graph.ensure_node("Income");
        let taxes = graph.ensure_node("Taxes");
        let food = graph.ensure_node("Food");
        graph.add_link(salary, income, 2500.0, None);
        graph.add_link(income, taxes, 1000.0, None);
        graph.add_link(income, food, 400.0, Some("#e5a".to_string()));
        graph
    }

    fn palette() -> Palette {
        Palette::new(["#111111", "#222222", "#333333"]).unwrap()
    }

    #[test]
    fn test_every_node_and_link_gets_a_color() {
        let mut graph = budget();
        let order: Vec<_> = graph.node_ids().collect();
        assign_colors(&mut graph, &order, &palette());

        assert!(graph.nodes().all(|node| node.color().is_some()));
        assert!(graph.links().iter().all(|link| link.color().is_some()));
    }

    #[test]
    fn test_palette_index_follows_order_and_wraps() {
        let mut graph = budget();
        let order: Vec<_> = graph.node_ids().collect();
        assign_colors(&mut graph, &order, &palette());

        let colors: Vec<_> = graph.nodes().map(|node| node.color().unwrap()).collect();
        assert_eq!(colors, ["#111111", "#222222", "#333333", "#111111"]);
    }

    #[test]
    fn test_layout_order_decides_palette_index() {
        let mut graph = budget();
        let mut order: Vec<_> = graph.node_ids().collect();
        order.reverse();
        assign_colors(&mut graph, &order, &palette());

        let food = graph.node_id("Food").unwrap();
        let salary = graph.node_id("Salary").unwrap();
        assert_eq!(graph.node(food).color(), Some("#111111"));
        assert_eq!(graph.node(salary).color(), Some("#111111"));
        let taxes = graph.node_id("Taxes").unwrap();
        assert_eq!(graph.node(taxes).color(), Some("#222222"));
    }

    #[test]
    fn test_explicit_node_color_is_kept_and_still_consumes_index() {
        let mut graph = budget();
        graph.set_node_color("Income", "#548755");
        let order: Vec<_> = graph.node_ids().collect();
        assign_colors(&mut graph, &order, &palette());

        let income = graph.node_id("Income").unwrap();
        let taxes = graph.node_id("Taxes").unwrap();
        assert_eq!(graph.node(income).color(), Some("#548755"));
        assert_eq!(graph.node(taxes).color(), Some("#333333"));
    }

    #[test]
    fn test_links_inherit_resolved_source_color() {
        let mut graph = budget();
        graph.set_node_color("Income", "#548755");
        let order: Vec<_> = graph.node_ids().collect();
        assign_colors(&mut graph, &order, &palette());

        let links = graph.links();
        assert_eq!(links[0].color(), Some("#111111"));
        assert_eq!(links[1].color(), Some("#548755"));
        assert_eq!(links[2].color(), Some("#e5a"));
    }

    #[test]
    fn test_nodes_missing_from_order_still_colored() {
        let mut graph = budget();
        let salary = graph.node_id("Salary").unwrap();
        assign_colors(&mut graph, &[salary], &palette());

        assert_eq!(graph.node(salary).color(), Some("#111111"));
        let income = graph.node_id("Income").unwrap();
        assert_eq!(graph.node(income).color(), Some("#222222"));
        assert!(graph.nodes().all(|node| node.color().is_some()));
    }

    #[test]
    fn test_second_pass_changes_nothing() {
        let mut graph = budget();
        let order: Vec<_> = graph.node_ids().collect();
        assign_colors(&mut graph, &order, &palette());
        let once = graph.clone();

        let other = Palette::new(["black"]).unwrap();
        assign_colors(&mut graph, &order, &other);
        assert_eq!(graph, once);
    }
}
