#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;
pub mod visibility;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, LayoutEngine, RenderConfig};
pub use controller::{CollapseController, MindMapView, ViewNode};
pub use convert::{build_graph, convert};
pub use error::{Error, Result};
pub use ir::{Direction, FlowGraph, GraphEdge, GraphNode, OutlineNode, Point};
pub use layout::{Layout, apply_layout, compute_layout};
pub use parser::build_outline;
pub use render::render_svg;
pub use theme::{Theme, ThemeName};
pub use visibility::{Visibility, resolve};
