use std::collections::BTreeSet;
use std::path::Path;

use md_mindmap::layout_dump::dump_to_string;
use md_mindmap::parser::extract_headings;
use md_mindmap::visibility::resolve;
use md_mindmap::{
    CollapseController, Direction, Error, LayoutConfig, RenderConfig, ThemeName, build_graph,
    build_outline, compute_layout, convert, render_svg,
};

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).expect("fixture read failed")
}

fn ids<'a>(items: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    items.into_iter().map(str::to_string).collect()
}

#[test]
fn heading_count_matches_node_and_edge_count() {
    for name in ["project.md", "skipped_levels.md", "setext.md"] {
        let text = fixture(name);
        let headings = extract_headings(&text).len();
        let tree = build_outline(&text, name).expect("outline");
        assert_eq!(tree.node_count(), headings + 1, "{name}: tree size");

        let graph = convert(&tree);
        assert_eq!(graph.nodes.len(), headings + 1, "{name}: nodes");
        assert_eq!(graph.edges.len(), headings, "{name}: edges");
        for edge in &graph.edges {
            assert!(graph.node(&edge.source).is_some(), "{name}: {}", edge.id);
            assert!(graph.node(&edge.target).is_some(), "{name}: {}", edge.id);
        }
    }
}

#[test]
fn code_blocks_do_not_produce_headings() {
    let graph = build_graph(&fixture("project.md"), "project.md").unwrap();
    assert_eq!(graph.nodes.len(), 10);
    assert!(
        graph
            .nodes
            .iter()
            .all(|node| !node.label.contains("inside a code block"))
    );
}

#[test]
fn doc_scenario_nodes_edges_and_collapse() {
    let mut ctrl =
        CollapseController::from_document("# Root\n## A\n## B\n### C", "doc.md", LayoutConfig::default())
            .unwrap();

    let labels: Vec<(&str, &str)> = ctrl
        .graph()
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node.label.as_str()))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("root", "doc.md"),
            ("node-1", "Root"),
            ("node-2", "A"),
            ("node-3", "B"),
            ("node-4", "C"),
        ]
    );
    let edges: Vec<(&str, &str)> = ctrl
        .graph()
        .edges
        .iter()
        .map(|edge| (edge.source.as_str(), edge.target.as_str()))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("root", "node-1"),
            ("node-1", "node-2"),
            ("node-1", "node-3"),
            ("node-3", "node-4"),
        ]
    );

    let view = ctrl.toggle("node-3").unwrap();
    assert_eq!(
        view.visible_ids(),
        ids(["root", "node-1", "node-2", "node-3"])
    );
    let hidden: Vec<&str> = view
        .nodes
        .iter()
        .filter(|node| node.node.hidden)
        .map(|node| node.node.id.as_str())
        .collect();
    assert_eq!(hidden, vec!["node-4"]);
}

#[test]
fn collapse_hides_only_strict_descendants() {
    let text = fixture("project.md");
    let mut ctrl = CollapseController::from_document(&text, "project.md", LayoutConfig::default())
        .unwrap();
    let all = ctrl.view().visible_ids();

    // "Scope" owns Parser, Layout, Ranking and Routing.
    let scope = ctrl
        .graph()
        .nodes
        .iter()
        .find(|node| node.label == "Scope")
        .map(|node| node.id.clone())
        .unwrap();
    let view = ctrl.toggle(&scope).unwrap();
    let hidden: BTreeSet<String> = all.difference(&view.visible_ids()).cloned().collect();
    let hidden_labels: BTreeSet<&str> = view
        .nodes
        .iter()
        .filter(|node| hidden.contains(&node.node.id))
        .map(|node| node.node.label.as_str())
        .collect();
    assert_eq!(
        hidden_labels,
        BTreeSet::from(["Parser", "Layout", "Ranking", "Routing"])
    );
    assert!(view.visible_ids().contains(&scope));

    ctrl.toggle(&scope).unwrap();
    assert_eq!(ctrl.view().visible_ids(), all);
}

#[test]
fn nested_collapse_keeps_inner_state() {
    let text = fixture("project.md");
    let mut ctrl = CollapseController::from_document(&text, "project.md", LayoutConfig::default())
        .unwrap();
    let all = ctrl.view().visible_ids();
    // node-4 is "Layout", node-2 is "Scope".
    ctrl.toggle("node-4").unwrap();
    ctrl.toggle("node-2").unwrap();
    ctrl.toggle("node-2").unwrap();
    let visible = ctrl.view().visible_ids();
    assert!(!visible.contains("node-5"));
    assert!(!visible.contains("node-6"));
    assert_eq!(visible.len(), all.len() - 2);
}

#[test]
fn toggle_all_twice_restores_full_expansion() {
    let text = fixture("project.md");
    let mut ctrl = CollapseController::from_document(&text, "project.md", LayoutConfig::default())
        .unwrap();
    let all = ctrl.view().visible_ids();
    ctrl.toggle("node-2").unwrap();
    ctrl.toggle("node-7").unwrap();

    ctrl.toggle_all().unwrap();
    assert_eq!(ctrl.view().visible_ids(), ids(["root"]));
    ctrl.toggle_all().unwrap();
    assert!(ctrl.collapsed().is_empty());
    assert_eq!(ctrl.view().visible_ids(), all);
}

#[test]
fn skipped_levels_attach_to_nearest_shallower_heading() {
    let tree = build_outline(&fixture("skipped_levels.md"), "skip.md").unwrap();
    assert_eq!(tree.children.len(), 1);
    let top = &tree.children[0];
    assert_eq!(top.text, "Top");
    let labels: Vec<&str> = top.children.iter().map(|child| child.text.as_str()).collect();
    assert_eq!(labels, vec!["Deep child", "Back to two"]);
    assert_eq!(top.children[0].children[0].text, "Deeper still");

    let tree = build_outline("# One\n### Three", "skip.md").unwrap();
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].children[0].text, "Three");
}

#[test]
fn setext_headings_and_inline_markup() {
    let tree = build_outline(&fixture("setext.md"), "setext.md").unwrap();
    let overview = &tree.children[0];
    assert_eq!(overview.text, "Overview");
    assert_eq!(overview.children[0].text, "Details");
    assert_eq!(overview.children[0].children[0].text, "Notes with code and emphasis");
}

#[test]
fn layout_ranks_are_deterministic() {
    let graph = build_graph(&fixture("project.md"), "project.md").unwrap();
    let collapsed = BTreeSet::from(["node-7".to_string()]);
    let visibility = resolve(&graph.nodes, &graph.edges, &collapsed).unwrap();

    let first = compute_layout(&graph, &visibility, &LayoutConfig::default()).unwrap();
    let second = compute_layout(&graph, &visibility, &LayoutConfig::default()).unwrap();
    assert_eq!(first.ranks(), second.ranks());
    assert_eq!(first.rank_order(), second.rank_order());
    assert_eq!(first, second);

    let ranks = first.ranks();
    assert_eq!(ranks["root"], 0);
    assert_eq!(ranks["node-1"], 1);
    assert_eq!(ranks["node-5"], 4);
}

#[test]
fn each_direction_keeps_the_same_layering() {
    let graph = build_graph(&fixture("project.md"), "project.md").unwrap();
    let visibility = resolve(&graph.nodes, &graph.edges, &BTreeSet::new()).unwrap();
    let baseline = compute_layout(&graph, &visibility, &LayoutConfig::default())
        .unwrap()
        .ranks();
    for direction in [Direction::TopDown, Direction::BottomTop, Direction::RightLeft] {
        let config = LayoutConfig {
            direction,
            ..LayoutConfig::default()
        };
        let layout = compute_layout(&graph, &visibility, &config).unwrap();
        assert_eq!(layout.ranks(), baseline, "{direction:?}");
        for node in layout.visible_nodes() {
            assert!(node.x >= 0.0 && node.y >= 0.0, "{direction:?}: {}", node.id);
        }
    }
}

#[test]
fn empty_input_yields_empty_output() {
    assert_eq!(build_outline("", "empty.md").unwrap_err(), Error::EmptyOutline);
    assert_eq!(
        build_graph(&fixture("no_headings.md"), "none.md").unwrap_err(),
        Error::EmptyOutline
    );

    let mut ctrl = CollapseController::from_document("# A", "a.md", LayoutConfig::default())
        .unwrap();
    let err = ctrl.load_document("", "empty.md").unwrap_err();
    assert!(err.is_no_result());
    assert!(ctrl.view().nodes.is_empty());
    assert!(ctrl.view().edges.is_empty());
    assert!(ctrl.view().layout.nodes.is_empty());
}

#[test]
fn svg_and_json_reflect_collapse_state() {
    let text = fixture("project.md");
    let mut ctrl = CollapseController::from_document(&text, "project.md", LayoutConfig::default())
        .unwrap();
    ctrl.toggle("node-2").unwrap();
    let visible = ctrl.view().visible_ids().len();

    for theme in ThemeName::ALL {
        let svg = render_svg(ctrl.view(), theme.theme(), &RenderConfig::default());
        assert_eq!(svg.matches("<rect class=\"node\"").count(), visible, "{theme}");
        assert!(svg.contains(">+</text>"), "{theme}");
    }

    let json: serde_json::Value =
        serde_json::from_str(&dump_to_string(ctrl.view()).unwrap()).unwrap();
    let hidden = json["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|node| node["hidden"] == true)
        .count();
    assert_eq!(hidden, 4);
}
