use crate::error::{Error, Result};
use crate::ir::{GraphEdge, GraphNode};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Visibility {
    pub visible_nodes: BTreeSet<String>,
    pub visible_edges: Vec<GraphEdge>,
}

impl Visibility {
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible_nodes.contains(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolved {
    Pending,
    Visible,
    Hidden,
}

/// Works out which nodes survive the current collapse state.
///
/// A node is hidden when any strict ancestor is collapsed; collapsing a node
/// never hides the node itself. Parent links are rebuilt from `edges` on
/// every call so they can never go stale.
pub fn resolve(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    collapsed: &BTreeSet<String>,
) -> Result<Visibility> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.as_str(), idx))
        .collect();

    let mut parent: Vec<Option<usize>> = vec![None; nodes.len()];
    for edge in edges {
        let source = lookup(&index, edge, &edge.source)?;
        let target = lookup(&index, edge, &edge.target)?;
        parent[target] = Some(source);
    }

    let mut state = vec![Resolved::Pending; nodes.len()];
    for start in 0..nodes.len() {
        if state[start] != Resolved::Pending {
            continue;
        }
        // Climb until we hit a resolved ancestor or the root, then unwind.
        let mut chain = vec![start];
        let mut current = start;
        let outcome = loop {
            let Some(up) = parent[current] else {
                break Resolved::Visible;
            };
            if collapsed.contains(&nodes[up].id) {
                break Resolved::Hidden;
            }
            match state[up] {
                Resolved::Pending => {}
                done => break done,
            }
            if chain.len() > nodes.len() {
                return Err(Error::LayoutInconsistency {
                    edge: format!("parent chain of {}", nodes[start].id),
                    node: nodes[up].id.clone(),
                });
            }
            chain.push(up);
            current = up;
        };
        // Every chain entry was checked against the collapsed set on the way
        // up, so they all share the outcome.
        for idx in chain {
            state[idx] = outcome;
        }
    }

    let visible_nodes: BTreeSet<String> = nodes
        .iter()
        .zip(&state)
        .filter(|(_, state)| **state == Resolved::Visible)
        .map(|(node, _)| node.id.clone())
        .collect();
    let visible_edges = edges
        .iter()
        .filter(|edge| visible_nodes.contains(&edge.source) && visible_nodes.contains(&edge.target))
        .cloned()
        .collect();

    Ok(Visibility {
        visible_nodes,
        visible_edges,
    })
}

fn lookup(index: &HashMap<&str, usize>, edge: &GraphEdge, id: &str) -> Result<usize> {
    index
        .get(id)
        .copied()
        .ok_or_else(|| Error::LayoutInconsistency {
            edge: edge.id.clone(),
            node: id.to_string(),
        })
}
