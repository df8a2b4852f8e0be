use crate::config::RenderConfig;
use crate::controller::MindMapView;
use crate::layout::NodeLayout;
use crate::theme::Theme;
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

const TOGGLE_RADIUS: f32 = 9.0;
const TOGGLE_INSET: f32 = 16.0;
const DOT_GAP: f32 = 24.0;

/// The canvas is at least `config.width` by `config.height`, growing to fit
/// larger layouts.
pub fn render_svg(view: &MindMapView, theme: &Theme, config: &RenderConfig) -> String {
    let layout = &view.layout;
    let width = layout.width.max(config.width);
    let height = layout.height.max(config.height);
    let placed: HashMap<&str, &NodeLayout> = layout
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node))
        .collect();
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));

    if config.show_background_dots {
        svg.push_str(&format!(
            "<defs><pattern id=\"dots\" width=\"{DOT_GAP}\" height=\"{DOT_GAP}\" patternUnits=\"userSpaceOnUse\"><circle cx=\"1\" cy=\"1\" r=\"1\" fill=\"{}\"/></pattern></defs>",
            theme.background_dots
        ));
    }
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    if config.show_background_dots {
        svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"url(#dots)\"/>");
    }

    for edge in &layout.edges {
        svg.push_str(&format!(
            "<path class=\"edge\" data-id=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\"/>",
            escape_xml(&edge.id),
            points_to_path(&edge.points),
            theme.line_color
        ));
    }

    for view_node in &view.nodes {
        if view_node.node.hidden {
            continue;
        }
        let Some(node) = placed.get(view_node.node.id.as_str()) else {
            continue;
        };
        svg.push_str(&format!(
            "<rect class=\"node\" data-id=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"6\" ry=\"6\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
            escape_xml(&node.id),
            node.x,
            node.y,
            node.width,
            node.height,
            theme.node_fill,
            theme.node_border
        ));

        let (center_x, center_y) = node.center();
        let text_x = if view_node.has_children {
            center_x - TOGGLE_INSET / 2.0
        } else {
            center_x
        };
        svg.push_str(&format!(
            "<text x=\"{text_x:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" font-weight=\"500\" fill=\"{}\">{}</text>",
            center_y,
            escape_xml(&theme.font_family),
            theme.font_size,
            theme.node_text,
            escape_xml(&node.label)
        ));

        if view_node.has_children {
            let cx = node.x + node.width - TOGGLE_INSET;
            let glyph = if view_node.is_collapsed { "+" } else { "-" };
            svg.push_str(&format!(
                "<g class=\"toggle\" data-id=\"{}\"><circle cx=\"{cx:.2}\" cy=\"{center_y:.2}\" r=\"{TOGGLE_RADIUS}\" fill=\"{}\"/><text x=\"{cx:.2}\" y=\"{center_y:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{glyph}</text></g>",
                escape_xml(&node.id),
                theme.button_hover,
                escape_xml(&theme.font_family),
                theme.font_size,
                theme.node_text
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
