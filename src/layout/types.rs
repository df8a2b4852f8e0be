use std::collections::BTreeMap;

use crate::ir::Direction;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub id: String,
    pub label: String,
    /// Top-left anchor in graph space.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// `None` for hidden nodes, which take no part in layering.
    pub rank: Option<usize>,
    pub order: Option<usize>,
    pub hidden: bool,
}

impl NodeLayout {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLayout {
    pub id: String,
    pub source: String,
    pub target: String,
    pub points: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub direction: Direction,
    /// Every node of the graph in input order, hidden ones included.
    pub nodes: Vec<NodeLayout>,
    /// Visible edges only.
    pub edges: Vec<EdgeLayout>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &NodeLayout> {
        self.nodes.iter().filter(|node| !node.hidden)
    }

    pub fn ranks(&self) -> BTreeMap<String, usize> {
        self.nodes
            .iter()
            .filter_map(|node| node.rank.map(|rank| (node.id.clone(), rank)))
            .collect()
    }

    /// Visible ids grouped by rank, each rank in cross-axis order.
    pub fn rank_order(&self) -> Vec<Vec<String>> {
        let mut by_rank: BTreeMap<usize, Vec<(usize, String)>> = BTreeMap::new();
        for node in &self.nodes {
            if let (Some(rank), Some(order)) = (node.rank, node.order) {
                by_rank.entry(rank).or_default().push((order, node.id.clone()));
            }
        }
        by_rank
            .into_values()
            .map(|mut bucket| {
                bucket.sort();
                bucket.into_iter().map(|(_, id)| id).collect()
            })
            .collect()
    }
}
