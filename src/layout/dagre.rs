use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};

use super::{LayerGraph, Placement, ranking};
use crate::config::LayoutConfig;
use crate::ir::Direction;

pub(super) fn place(arena: &LayerGraph<'_>, config: &LayoutConfig) -> Placement {
    let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
        DagreGraph::new(Some(GraphOption {
            directed: Some(true),
            multigraph: Some(false),
            compound: Some(false),
        }));

    let mut graph_config = DagreConfig::default();
    graph_config.rankdir = Some(dagre_rankdir(config.direction).to_string());
    graph_config.nodesep = Some(config.node_spacing);
    graph_config.ranksep = Some(config.rank_spacing);
    graph_config.marginx = Some(config.margin);
    graph_config.marginy = Some(config.margin);
    dagre_graph.set_graph(graph_config);

    for (order, id) in arena.ids.iter().enumerate() {
        let mut node = DagreNode::default();
        node.width = config.node_width;
        node.height = config.node_height;
        node.order = Some(order);
        dagre_graph.set_node(id.to_string(), Some(node));
    }
    for &(from, to) in &arena.edges {
        let from = arena.ids[from].to_string();
        let to = arena.ids[to].to_string();
        let _ = dagre_graph.set_edge(&from, &to, Some(DagreEdge::default()), None);
    }

    dagre_layout::run_layout(&mut dagre_graph);

    let centers: Vec<(f32, f32)> = arena
        .ids
        .iter()
        .map(|id| {
            dagre_graph
                .node(&id.to_string())
                .map(|node| (node.x, node.y))
                .unwrap_or((0.0, 0.0))
        })
        .collect();

    // Ranks are ours so both engines agree on layering.
    let ranks = ranking::compute_ranks(arena.ids.len(), &arena.edges);
    let horizontal = config.direction.is_horizontal();
    let mut orders = vec![0usize; arena.ids.len()];
    let max_rank = ranks.iter().copied().max().unwrap_or(0);
    for rank in 0..=max_rank {
        let mut members: Vec<usize> = (0..arena.ids.len())
            .filter(|idx| ranks[*idx] == rank)
            .collect();
        members.sort_by(|a, b| {
            let (ka, kb) = if horizontal {
                (centers[*a].1, centers[*b].1)
            } else {
                (centers[*a].0, centers[*b].0)
            };
            ka.partial_cmp(&kb)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(b))
        });
        for (pos, idx) in members.into_iter().enumerate() {
            orders[idx] = pos;
        }
    }

    Placement {
        centers,
        ranks,
        orders,
    }
}

fn dagre_rankdir(direction: Direction) -> &'static str {
    match direction {
        Direction::TopDown => "tb",
        Direction::BottomTop => "bt",
        Direction::LeftRight => "lr",
        Direction::RightLeft => "rl",
    }
}
