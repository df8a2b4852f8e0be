//! Collapse/expand state for a mind map and the recomputation it drives.
//!
//! [`CollapseController`] owns the graph and the set of collapsed node ids.
//! Every transition rebuilds visibility and layout from scratch and stores the
//! result as a [`MindMapView`], so a renderer only ever reads the latest view.
//!
//! ```ignore
//! use md_mindmap::{CollapseController, LayoutConfig};
//!
//! let mut ctrl = CollapseController::from_document("# A\n## B", "notes.md", LayoutConfig::default())?;
//! ctrl.toggle("node-1")?;
//! for node in &ctrl.view().nodes {
//!     println!("{} hidden={} collapsed={}", node.node.label, node.node.hidden, node.is_collapsed);
//! }
//! ```

use std::collections::BTreeSet;

use crate::config::LayoutConfig;
use crate::convert::build_graph;
use crate::error::Result;
use crate::ir::{FlowGraph, GraphEdge, GraphNode};
use crate::layout::{Layout, apply_layout, compute_layout};
use crate::visibility::resolve;

/// A graph node plus the presentation flags a renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewNode {
    pub node: GraphNode,
    pub has_children: bool,
    pub is_collapsed: bool,
}

/// Output of one recomputation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MindMapView {
    /// All nodes in pre-order; hidden ones carry `hidden = true`.
    pub nodes: Vec<ViewNode>,
    /// Visible edges only.
    pub edges: Vec<GraphEdge>,
    pub layout: Layout,
    pub generation: u64,
}

impl MindMapView {
    pub fn visible_ids(&self) -> BTreeSet<String> {
        self.nodes
            .iter()
            .filter(|view| !view.node.hidden)
            .map(|view| view.node.id.clone())
            .collect()
    }

    pub fn node(&self, id: &str) -> Option<&ViewNode> {
        self.nodes.iter().find(|view| view.node.id == id)
    }
}

#[derive(Debug, Clone)]
pub struct CollapseController {
    graph: FlowGraph,
    parents: BTreeSet<String>,
    collapsed: BTreeSet<String>,
    all_collapsed: bool,
    config: LayoutConfig,
    generation: u64,
    view: MindMapView,
}

impl CollapseController {
    pub fn new(graph: FlowGraph, config: LayoutConfig) -> Result<Self> {
        let mut ctrl = Self {
            parents: graph.parents(),
            graph,
            collapsed: BTreeSet::new(),
            all_collapsed: false,
            config,
            generation: 0,
            view: MindMapView::default(),
        };
        ctrl.recompute()?;
        Ok(ctrl)
    }

    pub fn from_document(text: &str, root_label: &str, config: LayoutConfig) -> Result<Self> {
        Self::new(build_graph(text, root_label)?, config)
    }

    /// Replaces the document. Collapse state is reset either way; on failure
    /// the controller holds the empty graph and the error is returned.
    pub fn load_document(&mut self, text: &str, root_label: &str) -> Result<()> {
        self.collapsed.clear();
        self.all_collapsed = false;
        match build_graph(text, root_label) {
            Ok(graph) => {
                self.set_graph(graph);
                self.recompute()?;
                Ok(())
            }
            Err(err) => {
                log::debug!("document rejected: {err}");
                self.set_graph(FlowGraph::default());
                self.recompute()?;
                Err(err)
            }
        }
    }

    /// Flips one node between expanded and collapsed. Leaves and unknown ids
    /// are accepted; they simply have nothing to hide.
    pub fn toggle(&mut self, id: &str) -> Result<&MindMapView> {
        let collapse = !self.collapsed.contains(id);
        self.set_collapsed(id, collapse)
    }

    /// Collapses `id`, leaving it collapsed if it already was.
    pub fn collapse(&mut self, id: &str) -> Result<&MindMapView> {
        self.set_collapsed(id, true)
    }

    /// Expands `id`, leaving it expanded if it already was.
    pub fn expand(&mut self, id: &str) -> Result<&MindMapView> {
        self.set_collapsed(id, false)
    }

    /// Collapses every node with children, or expands everything when the
    /// map is already in the collapse-all state. Earlier individual toggles
    /// are overwritten.
    pub fn toggle_all(&mut self) -> Result<&MindMapView> {
        let all_collapsed = !self.all_collapsed;
        let next = if all_collapsed {
            self.parents.clone()
        } else {
            BTreeSet::new()
        };
        let previous = std::mem::replace(&mut self.collapsed, next);
        if let Err(err) = self.recompute() {
            self.collapsed = previous;
            return Err(err);
        }
        self.all_collapsed = all_collapsed;
        Ok(&self.view)
    }

    pub fn set_layout_config(&mut self, config: LayoutConfig) -> Result<&MindMapView> {
        self.config = config;
        self.recompute()?;
        Ok(&self.view)
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    pub fn all_collapsed(&self) -> bool {
        self.all_collapsed
    }

    pub fn collapsed(&self) -> &BTreeSet<String> {
        &self.collapsed
    }

    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    pub fn view(&self) -> &MindMapView {
        &self.view
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A failed recompute leaves the collapsed set as it was, so it always
    /// matches the current view.
    fn set_collapsed(&mut self, id: &str, collapse: bool) -> Result<&MindMapView> {
        let changed = if collapse {
            self.collapsed.insert(id.to_string())
        } else {
            self.collapsed.remove(id)
        };
        if let Err(err) = self.recompute() {
            if changed {
                if collapse {
                    self.collapsed.remove(id);
                } else {
                    self.collapsed.insert(id.to_string());
                }
            }
            return Err(err);
        }
        Ok(&self.view)
    }

    fn set_graph(&mut self, graph: FlowGraph) {
        self.parents = graph.parents();
        self.graph = graph;
    }

    fn recompute(&mut self) -> Result<()> {
        let visibility = resolve(&self.graph.nodes, &self.graph.edges, &self.collapsed)?;
        let layout = compute_layout(&self.graph, &visibility, &self.config)?;
        apply_layout(&mut self.graph, &layout);

        self.generation += 1;
        let nodes = self
            .graph
            .nodes
            .iter()
            .map(|node| ViewNode {
                node: node.clone(),
                has_children: self.parents.contains(&node.id),
                is_collapsed: self.collapsed.contains(&node.id),
            })
            .collect();
        self.view = MindMapView {
            nodes,
            edges: visibility.visible_edges,
            layout,
            generation: self.generation,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const SAMPLE: &str = "# Root\n## A\n## B\n### C";

    fn controller() -> CollapseController {
        CollapseController::from_document(SAMPLE, "doc.md", LayoutConfig::default()).unwrap()
    }

    fn ids(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn starts_fully_expanded() {
        let ctrl = controller();
        assert!(ctrl.collapsed().is_empty());
        assert!(!ctrl.all_collapsed());
        assert_eq!(ctrl.view().visible_ids().len(), 5);
        assert_eq!(ctrl.view().edges.len(), 4);
        assert_eq!(ctrl.generation(), 1);
    }

    #[test]
    fn toggle_hides_descendants_and_back() {
        let mut ctrl = controller();
        let before = ctrl.view().visible_ids();

        let view = ctrl.toggle("node-3").unwrap();
        assert_eq!(
            ids(&view.visible_ids()),
            vec!["node-1", "node-2", "node-3", "root"]
        );
        let b = view.node("node-3").unwrap();
        assert!(b.is_collapsed && b.has_children && !b.node.hidden);
        assert!(view.node("node-4").unwrap().node.hidden);

        ctrl.toggle("node-3").unwrap();
        assert_eq!(ctrl.view().visible_ids(), before);
        assert!(!ctrl.is_collapsed("node-3"));
    }

    #[test]
    fn toggling_a_leaf_changes_nothing_visible() {
        let mut ctrl = controller();
        let view = ctrl.toggle("node-4").unwrap();
        assert_eq!(view.visible_ids().len(), 5);
        assert!(ctrl.is_collapsed("node-4"));
    }

    #[test]
    fn toggle_all_collapses_every_parent() {
        let mut ctrl = controller();
        ctrl.toggle_all().unwrap();
        assert!(ctrl.all_collapsed());
        assert_eq!(ids(ctrl.collapsed()), vec!["node-1", "node-3", "root"]);
        assert_eq!(ids(&ctrl.view().visible_ids()), vec!["root"]);
    }

    #[test]
    fn toggle_all_twice_discards_individual_toggles() {
        let mut ctrl = controller();
        ctrl.toggle("node-3").unwrap();
        ctrl.toggle("node-4").unwrap();
        ctrl.toggle_all().unwrap();
        ctrl.toggle_all().unwrap();
        assert!(ctrl.collapsed().is_empty());
        assert_eq!(ctrl.view().visible_ids().len(), 5);
    }

    #[test]
    fn every_transition_bumps_the_generation() {
        let mut ctrl = controller();
        ctrl.toggle("node-1").unwrap();
        ctrl.toggle_all().unwrap();
        assert_eq!(ctrl.generation(), 3);
        assert_eq!(ctrl.view().generation, 3);
    }

    #[test]
    fn relayout_after_expand_matches_fresh_layout() {
        let mut ctrl = controller();
        let fresh = ctrl.view().layout.clone();
        ctrl.toggle("node-1").unwrap();
        ctrl.toggle("node-1").unwrap();
        assert_eq!(ctrl.view().layout, fresh);
    }

    #[test]
    fn failed_load_empties_the_graph() {
        let mut ctrl = controller();
        ctrl.toggle("node-1").unwrap();
        let err = ctrl.load_document("no headings here", "empty.md").unwrap_err();
        assert_eq!(err, Error::EmptyOutline);
        assert!(ctrl.graph().nodes.is_empty());
        assert!(ctrl.view().nodes.is_empty());
        assert!(ctrl.view().edges.is_empty());
        assert!(ctrl.collapsed().is_empty());
    }

    #[test]
    fn loading_resets_collapse_state() {
        let mut ctrl = controller();
        ctrl.toggle_all().unwrap();
        ctrl.load_document("# X\n## Y", "other.md").unwrap();
        assert!(!ctrl.all_collapsed());
        assert!(ctrl.collapsed().is_empty());
        assert_eq!(ctrl.graph().nodes[0].label, "other.md");
        assert_eq!(ctrl.view().visible_ids().len(), 3);
    }

    #[test]
    fn collapse_and_expand_are_idempotent() {
        let mut ctrl = controller();
        ctrl.collapse("node-3").unwrap();
        ctrl.collapse("node-3").unwrap();
        assert!(ctrl.is_collapsed("node-3"));
        assert!(ctrl.view().node("node-4").unwrap().node.hidden);

        ctrl.expand("node-3").unwrap();
        ctrl.expand("node-3").unwrap();
        assert!(!ctrl.is_collapsed("node-3"));
        assert_eq!(ctrl.view().visible_ids().len(), 5);
    }

    #[test]
    fn collapse_after_collapse_all_keeps_node_collapsed() {
        let mut ctrl = controller();
        ctrl.toggle_all().unwrap();
        let view = ctrl.collapse("node-1").unwrap();
        let top = view.node("node-1").unwrap();
        assert!(top.is_collapsed);
        assert_eq!(ids(&view.visible_ids()), vec!["root"]);
    }

    #[test]
    fn failed_recompute_leaves_collapse_state_untouched() {
        let mut ctrl = controller();
        let view = ctrl.view().clone();
        ctrl.graph.edges.push(GraphEdge::new("node-4", "ghost"));

        let err = ctrl.toggle("node-3").unwrap_err();
        assert!(matches!(err, Error::LayoutInconsistency { .. }));
        assert!(!ctrl.is_collapsed("node-3"));

        assert!(ctrl.toggle_all().is_err());
        assert!(!ctrl.all_collapsed());
        assert!(ctrl.collapsed().is_empty());
        assert_eq!(ctrl.view(), &view);
    }

    #[test]
    fn layout_config_changes_relayout() {
        let mut ctrl = controller();
        let config = LayoutConfig {
            direction: crate::ir::Direction::TopDown,
            ..LayoutConfig::default()
        };
        let view = ctrl.set_layout_config(config).unwrap();
        let root = view.layout.node("root").unwrap();
        let top = view.layout.node("node-1").unwrap();
        assert!(top.y > root.y);
        assert_eq!(top.x, root.x);
    }
}
