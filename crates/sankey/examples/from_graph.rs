//! Example: Creating a chart from the flow graph model
//!
//! This example builds a flow graph in code, without parsing source text,
//! and renders it with the default configuration.

use sankey::{ChartBuilder, flow::FlowGraph};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building flow graph...\n");

    let mut graph = FlowGraph::new();
    let salary = graph.ensure_node("Salary");
    let freelance = graph.ensure_node("Freelance");
    let income = graph.ensure_node("Income");
    let rent = graph.ensure_node("Rent");
    let groceries = graph.ensure_node("Groceries");
    let savings = graph.ensure_node("Savings");

    graph.add_link(salary, income, 3200.0, None);
    graph.add_link(freelance, income, 800.0, None);
    graph.add_link(income, rent, 1400.0, None);
    graph.add_link(income, groceries, 600.0, Some("#e5a".to_string()));
    graph.add_link(income, savings, 2000.0, None);

    // Explicit colors win over the palette
    graph.set_node_color("Savings", "#2ca02c");

    println!("Created graph:");
    println!("  Nodes: {}", graph.node_count());
    println!("  Links: {}", graph.link_count());
    println!();

    println!("Rendering to SVG...");
    let builder = ChartBuilder::default();
    let svg = builder.render_svg(&mut graph)?;

    println!("SVG generated successfully!");
    println!("SVG length: {} bytes", svg.len());

    let output_path = "from_graph_output.svg";
    std::fs::write(output_path, &svg)?;
    println!("SVG written to: {}", output_path);

    Ok(())
}
