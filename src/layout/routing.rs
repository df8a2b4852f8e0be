use std::collections::HashMap;

use super::types::{EdgeLayout, NodeLayout};
use crate::ir::{Direction, GraphEdge};

/// Orthogonal elbow routes from each source's outgoing side to the target's
/// incoming side, bending halfway between the two ranks.
pub(super) fn route_edges(
    nodes: &[NodeLayout],
    edges: &[GraphEdge],
    direction: Direction,
) -> Vec<EdgeLayout> {
    let by_id: HashMap<&str, &NodeLayout> = nodes
        .iter()
        .filter(|node| !node.hidden)
        .map(|node| (node.id.as_str(), node))
        .collect();

    edges
        .iter()
        .filter_map(|edge| {
            let from = by_id.get(edge.source.as_str())?;
            let to = by_id.get(edge.target.as_str())?;
            Some(EdgeLayout {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                points: elbow(from, to, direction),
            })
        })
        .collect()
}

fn elbow(from: &NodeLayout, to: &NodeLayout, direction: Direction) -> Vec<(f32, f32)> {
    let (fx, fy) = from.center();
    let (tx, ty) = to.center();
    match direction {
        Direction::LeftRight | Direction::RightLeft => {
            let sign = if direction == Direction::LeftRight { 1.0 } else { -1.0 };
            let start = (fx + sign * from.width / 2.0, fy);
            let end = (tx - sign * to.width / 2.0, ty);
            let mid = (start.0 + end.0) / 2.0;
            vec![start, (mid, start.1), (mid, end.1), end]
        }
        Direction::TopDown | Direction::BottomTop => {
            let sign = if direction == Direction::TopDown { 1.0 } else { -1.0 };
            let start = (fx, fy + sign * from.height / 2.0);
            let end = (tx, ty - sign * to.height / 2.0);
            let mid = (start.1 + end.1) / 2.0;
            vec![start, (start.0, mid), (end.0, mid), end]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, x: f32, y: f32) -> NodeLayout {
        NodeLayout {
            id: id.to_string(),
            label: id.to_string(),
            x,
            y,
            width: 100.0,
            height: 40.0,
            rank: Some(0),
            order: Some(0),
            hidden: false,
        }
    }

    #[test]
    fn left_right_route_leaves_right_side() {
        let nodes = vec![node("a", 0.0, 0.0), node("b", 200.0, 100.0)];
        let edges = vec![GraphEdge::new("a", "b")];
        let routed = route_edges(&nodes, &edges, Direction::LeftRight);
        assert_eq!(
            routed[0].points,
            vec![(100.0, 20.0), (150.0, 20.0), (150.0, 120.0), (200.0, 120.0)]
        );
    }

    #[test]
    fn edges_to_hidden_nodes_are_skipped() {
        let mut hidden = node("b", 0.0, 0.0);
        hidden.hidden = true;
        let nodes = vec![node("a", 0.0, 0.0), hidden];
        let routed = route_edges(&nodes, &[GraphEdge::new("a", "b")], Direction::TopDown);
        assert!(routed.is_empty());
    }
}
