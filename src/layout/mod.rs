#[cfg(feature = "dagre")]
mod dagre;
mod placement;
mod ranking;
mod routing;
pub(crate) mod types;
pub use types::*;

use crate::config::{LayoutConfig, LayoutEngine};
use crate::error::{Error, Result};
use crate::ir::FlowGraph;
use crate::visibility::Visibility;
use std::collections::HashMap;

/// Node centres and cross-axis order for the visible subgraph, indexed like
/// [`LayerGraph::ids`].
pub(crate) struct Placement {
    pub centers: Vec<(f32, f32)>,
    pub ranks: Vec<usize>,
    pub orders: Vec<usize>,
}

/// Visible subgraph as a throwaway index arena. Built fresh for every layout
/// call and dropped once positions are extracted.
pub(crate) struct LayerGraph<'a> {
    pub ids: Vec<&'a str>,
    pub edges: Vec<(usize, usize)>,
}

impl<'a> LayerGraph<'a> {
    fn build(graph: &'a FlowGraph, visibility: &Visibility) -> Result<Self> {
        let ids: Vec<&str> = graph
            .nodes
            .iter()
            .filter(|node| visibility.is_visible(&node.id))
            .map(|node| node.id.as_str())
            .collect();
        let index: HashMap<&str, usize> =
            ids.iter().enumerate().map(|(idx, id)| (*id, idx)).collect();

        let mut edges = Vec::with_capacity(visibility.visible_edges.len());
        for edge in &visibility.visible_edges {
            let lookup = |id: &str| {
                index
                    .get(id)
                    .copied()
                    .ok_or_else(|| Error::LayoutInconsistency {
                        edge: edge.id.clone(),
                        node: id.to_string(),
                    })
            };
            edges.push((lookup(&edge.source)?, lookup(&edge.target)?));
        }
        Ok(Self { ids, edges })
    }
}

/// Lays out the visible part of `graph`.
///
/// Hidden nodes are left out of ranking, ordering and spacing entirely; they
/// come back in [`Layout::nodes`] flagged hidden with their previous
/// position. Nothing is cached between calls.
pub fn compute_layout(
    graph: &FlowGraph,
    visibility: &Visibility,
    config: &LayoutConfig,
) -> Result<Layout> {
    let arena = LayerGraph::build(graph, visibility)?;
    if arena.ids.is_empty() {
        return Ok(hidden_only_layout(graph, config));
    }

    let placement = match config.engine {
        LayoutEngine::Layered => place_layered(&arena, config),
        LayoutEngine::Dagre => place_dagre(&arena, config),
    };

    let (width, height) = (config.node_width, config.node_height);
    let (min_x, min_y, max_x, max_y) = placement.centers.iter().fold(
        (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
        |(min_x, min_y, max_x, max_y), (cx, cy)| {
            (
                min_x.min(cx - width / 2.0),
                min_y.min(cy - height / 2.0),
                max_x.max(cx + width / 2.0),
                max_y.max(cy + height / 2.0),
            )
        },
    );
    let shift_x = config.margin - min_x;
    let shift_y = config.margin - min_y;

    let slot: HashMap<&str, usize> = arena
        .ids
        .iter()
        .enumerate()
        .map(|(idx, id)| (*id, idx))
        .collect();
    let nodes: Vec<NodeLayout> = graph
        .nodes
        .iter()
        .map(|node| match slot.get(node.id.as_str()) {
            Some(&idx) => {
                let (cx, cy) = placement.centers[idx];
                NodeLayout {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    x: cx + shift_x - width / 2.0,
                    y: cy + shift_y - height / 2.0,
                    width,
                    height,
                    rank: Some(placement.ranks[idx]),
                    order: Some(placement.orders[idx]),
                    hidden: false,
                }
            }
            None => hidden_node(node, config),
        })
        .collect();

    let edges = routing::route_edges(&nodes, &visibility.visible_edges, config.direction);

    log::debug!(
        "layout: {} visible of {} node(s), {} edge(s)",
        arena.ids.len(),
        graph.nodes.len(),
        edges.len()
    );

    Ok(Layout {
        direction: config.direction,
        nodes,
        edges,
        width: max_x - min_x + config.margin * 2.0,
        height: max_y - min_y + config.margin * 2.0,
    })
}

/// Writes positions and hidden flags back onto the graph nodes.
pub fn apply_layout(graph: &mut FlowGraph, layout: &Layout) {
    let by_id: HashMap<&str, &NodeLayout> = layout
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node))
        .collect();
    for node in &mut graph.nodes {
        let Some(placed) = by_id.get(node.id.as_str()) else {
            continue;
        };
        node.hidden = placed.hidden;
        if !placed.hidden {
            node.position.x = placed.x;
            node.position.y = placed.y;
        }
    }
}

fn place_layered(arena: &LayerGraph<'_>, config: &LayoutConfig) -> Placement {
    let node_count = arena.ids.len();
    let ranks = ranking::compute_ranks(node_count, &arena.edges);
    let mut ranked = ranking::build_rank_buckets(node_count, &arena.edges, &ranks);
    ranking::order_rank_nodes(&mut ranked, config.order_passes);

    let horizontal = config.direction.is_horizontal();
    let (main_extent, cross_extent) = if horizontal {
        (config.node_width, config.node_height)
    } else {
        (config.node_height, config.node_width)
    };
    let cross = placement::assign_cross_positions(&ranked, cross_extent, config.node_spacing);

    let mut orders = vec![0usize; node_count];
    for bucket in &ranked.buckets {
        for (pos, &idx) in bucket.iter().filter(|idx| !ranked.is_dummy(**idx)).enumerate() {
            orders[idx] = pos;
        }
    }

    let sign = if config.direction.is_reversed() { -1.0 } else { 1.0 };
    let centers = (0..node_count)
        .map(|idx| {
            let main = sign * ranks[idx] as f32 * (main_extent + config.rank_spacing);
            if horizontal {
                (main, cross[idx])
            } else {
                (cross[idx], main)
            }
        })
        .collect();

    Placement {
        centers,
        ranks,
        orders,
    }
}

#[cfg(feature = "dagre")]
fn place_dagre(arena: &LayerGraph<'_>, config: &LayoutConfig) -> Placement {
    dagre::place(arena, config)
}

#[cfg(not(feature = "dagre"))]
fn place_dagre(arena: &LayerGraph<'_>, config: &LayoutConfig) -> Placement {
    log::warn!("dagre engine requested but the `dagre` feature is disabled; using layered");
    place_layered(arena, config)
}

fn hidden_node(node: &crate::ir::GraphNode, config: &LayoutConfig) -> NodeLayout {
    NodeLayout {
        id: node.id.clone(),
        label: node.label.clone(),
        x: node.position.x,
        y: node.position.y,
        width: config.node_width,
        height: config.node_height,
        rank: None,
        order: None,
        hidden: true,
    }
}

fn hidden_only_layout(graph: &FlowGraph, config: &LayoutConfig) -> Layout {
    Layout {
        direction: config.direction,
        nodes: graph
            .nodes
            .iter()
            .map(|node| hidden_node(node, config))
            .collect(),
        edges: Vec::new(),
        width: 0.0,
        height: 0.0,
    }
}
