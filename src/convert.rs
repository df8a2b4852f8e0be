use crate::error::Result;
use crate::ir::{FlowGraph, GraphEdge, GraphNode, OutlineNode, Point};
use crate::parser::build_outline;

/// Flattens an outline into nodes and parent→child edges.
///
/// Nodes come out in pre-order and children keep document order; the layout
/// engine uses that order to break ties. Positions are left at the origin.
pub fn convert(tree: &OutlineNode) -> FlowGraph {
    let mut graph = FlowGraph {
        nodes: Vec::with_capacity(tree.node_count()),
        edges: Vec::with_capacity(tree.node_count().saturating_sub(1)),
    };
    traverse(tree, None, &mut graph);
    graph
}

fn traverse(node: &OutlineNode, parent_id: Option<&str>, graph: &mut FlowGraph) {
    graph.nodes.push(GraphNode {
        id: node.id.clone(),
        label: node.text.clone(),
        position: Point::default(),
        hidden: false,
    });
    if let Some(parent_id) = parent_id {
        graph.edges.push(GraphEdge::new(parent_id, &node.id));
    }
    for child in &node.children {
        traverse(child, Some(&node.id), graph);
    }
}

/// Parse and convert in one step.
pub fn build_graph(text: &str, root_label: &str) -> Result<FlowGraph> {
    let tree = build_outline(text, root_label)?;
    let graph = convert(&tree);
    log::debug!(
        "graph: {} node(s), {} edge(s)",
        graph.nodes.len(),
        graph.edges.len()
    );
    Ok(graph)
}

/// Like [`build_graph`], but a failed parse yields the empty graph next to
/// the error so callers always have something to hand to a renderer.
pub fn graph_or_empty(text: &str, root_label: &str) -> (FlowGraph, Option<crate::Error>) {
    match build_graph(text, root_label) {
        Ok(graph) => (graph, None),
        Err(err) => (FlowGraph::default(), Some(err)),
    }
}
