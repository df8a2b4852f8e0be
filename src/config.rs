use crate::ir::Direction;
use crate::theme::{Theme, ThemeName};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    #[default]
    Layered,
    /// Needs the `dagre` feature; falls back to `Layered` without it.
    Dagre,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub direction: Direction,
    pub node_width: f32,
    pub node_height: f32,
    pub node_spacing: f32,
    pub rank_spacing: f32,
    pub margin: f32,
    pub order_passes: usize,
    pub engine: LayoutEngine,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::LeftRight,
            node_width: 172.0,
            node_height: 36.0,
            node_spacing: 80.0,
            rank_spacing: 150.0,
            margin: 8.0,
            order_passes: 4,
            engine: LayoutEngine::Layered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Minimum canvas size; larger layouts grow the canvas. Also the PNG
    /// default size.
    pub width: f32,
    pub height: f32,
    pub background: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub show_background_dots: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: None,
            font_family: None,
            font_size: None,
            show_background_dots: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub theme: ThemeName,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Palette for the configured theme with render overrides applied.
    pub fn resolved_theme(&self) -> Theme {
        let mut theme = self.theme.theme().clone();
        if let Some(background) = &self.render.background {
            theme.background = background.clone();
        }
        if let Some(font_family) = &self.render.font_family {
            theme.font_family = font_family.clone();
        }
        if let Some(font_size) = self.render.font_size {
            theme.font_size = font_size;
        }
        theme
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = serde_json::from_str(contents)?;
    if config.layout.node_width <= 0.0 || config.layout.node_height <= 0.0 {
        anyhow::bail!("layout.nodeWidth and layout.nodeHeight must be positive");
    }
    if config.layout.node_spacing < 0.0 || config.layout.rank_spacing < 0.0 {
        anyhow::bail!("layout.nodeSpacing and layout.rankSpacing must not be negative");
    }
    Ok(config)
}
