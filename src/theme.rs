use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
    Ocean,
    Forest,
    Grape,
}

impl ThemeName {
    pub const ALL: [ThemeName; 5] = [
        ThemeName::Light,
        ThemeName::Dark,
        ThemeName::Ocean,
        ThemeName::Forest,
        ThemeName::Grape,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeName::Light => "light",
            ThemeName::Dark => "dark",
            ThemeName::Ocean => "ocean",
            ThemeName::Forest => "forest",
            ThemeName::Grape => "grape",
        }
    }

    pub fn theme(self) -> &'static Theme {
        &THEMES[&self]
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ThemeName::ALL
            .into_iter()
            .find(|name| name.as_str() == lower)
            .ok_or_else(|| format!("unknown theme '{s}'"))
    }
}

/// Colors and fonts a renderer needs; layout never looks at these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub background_dots: String,
    pub node_fill: String,
    pub node_border: String,
    pub node_text: String,
    pub button_hover: String,
    pub line_color: String,
}

impl Theme {
    fn palette(
        background: &str,
        background_dots: &str,
        node_fill: &str,
        node_border: &str,
        node_text: &str,
        button_hover: &str,
        line_color: &str,
    ) -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            background: background.to_string(),
            background_dots: background_dots.to_string(),
            node_fill: node_fill.to_string(),
            node_border: node_border.to_string(),
            node_text: node_text.to_string(),
            button_hover: button_hover.to_string(),
            line_color: line_color.to_string(),
        }
    }
}

static THEMES: Lazy<BTreeMap<ThemeName, Theme>> = Lazy::new(|| {
    BTreeMap::from([
        (
            ThemeName::Light,
            Theme::palette(
                "#FFFFFF", "#E5E7EB", "#FFFFFF", "#D6D3D1", "#18181B", "#E5E7EB", "#B1B1B7",
            ),
        ),
        (
            ThemeName::Dark,
            Theme::palette(
                "#18181B", "#374151", "#27272A", "#52525B", "#F4F4F5", "#3F3F46", "#71717A",
            ),
        ),
        (
            ThemeName::Ocean,
            Theme::palette(
                "#F0F9FF", "#BAE6FD", "#E0F2FE", "#7DD3FC", "#0C4A6E", "#BAE6FD", "#38BDF8",
            ),
        ),
        (
            ThemeName::Forest,
            Theme::palette(
                "#ECFDF5", "#A7F3D0", "#D1FAE5", "#6EE7B7", "#064E3B", "#A7F3D0", "#34D399",
            ),
        ),
        (
            ThemeName::Grape,
            Theme::palette(
                "#FAF5FF", "#E9D5FF", "#F3E8FF", "#D8B4FE", "#581C87", "#E9D5FF", "#C084FC",
            ),
        ),
    ])
});
