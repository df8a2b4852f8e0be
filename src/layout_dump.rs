use crate::controller::MindMapView;
use crate::ir::{Direction, Point};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// The node/edge contract handed to renderers, as camelCase JSON.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub direction: Direction,
    pub generation: u64,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub position: Point,
    pub width: f32,
    pub height: f32,
    pub rank: Option<usize>,
    pub hidden: bool,
    pub has_children: bool,
    pub is_collapsed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_view(view: &MindMapView) -> Self {
        let layout = &view.layout;
        let nodes = view
            .nodes
            .iter()
            .map(|entry| {
                let placed = layout.node(&entry.node.id);
                NodeDump {
                    id: entry.node.id.clone(),
                    label: entry.node.label.clone(),
                    position: entry.node.position,
                    width: placed.map(|node| node.width).unwrap_or(0.0),
                    height: placed.map(|node| node.height).unwrap_or(0.0),
                    rank: placed.and_then(|node| node.rank),
                    hidden: entry.node.hidden,
                    has_children: entry.has_children,
                    is_collapsed: entry.is_collapsed,
                }
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                points: edge.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        LayoutDump {
            direction: layout.direction,
            generation: view.generation,
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
        }
    }
}

pub fn dump_to_string(view: &MindMapView) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDump::from_view(view))?)
}

pub fn write_layout_dump(path: Option<&Path>, view: &MindMapView) -> anyhow::Result<()> {
    let dump = LayoutDump::from_view(view);
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writer.flush()?;
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
    }
    Ok(())
}
