use crate::config::{Config, load_config};
use crate::controller::CollapseController;
use crate::convert::convert;
use crate::ir::Direction;
use crate::layout_dump::write_layout_dump;
use crate::parser::build_outline_bytes;
use crate::render::{render_svg, write_output_svg};
use crate::theme::ThemeName;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const STDIN_ROOT_NAME: &str = "stdin.md";

#[derive(Parser, Debug)]
#[command(name = "mdmm", version, about = "Markdown outline to mind-map layout")]
pub struct Args {
    /// Input Markdown file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Label of the root node. Defaults to the input file name.
    #[arg(short = 'n', long = "rootName")]
    pub root_name: Option<String>,

    /// Color theme
    #[arg(short = 't', long = "theme", value_enum)]
    pub theme: Option<ThemeName>,

    /// Layering direction: LR, RL, TB or BT
    #[arg(short = 'd', long = "direction", value_parser = parse_direction)]
    pub direction: Option<Direction>,

    /// Collapse the node with this id (repeatable)
    #[arg(long = "collapse")]
    pub collapse: Vec<String>,

    /// Collapse every node with children before applying --collapse
    #[arg(long = "collapseAll")]
    pub collapse_all: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = load_config(args.config.as_deref())
        .with_context(|| "failed to load config file")?;
    apply_overrides(&mut config, &args);

    let (bytes, default_name) = read_input(args.input.as_deref())?;
    let root_name = args.root_name.clone().unwrap_or(default_name);
    let tree = build_outline_bytes(&bytes, &root_name)
        .with_context(|| format!("could not build an outline from {root_name}"))?;

    let mut ctrl = CollapseController::new(convert(&tree), config.layout.clone())?;
    apply_collapse_flags(&mut ctrl, &args)?;
    log::info!(
        "{} node(s), {} visible",
        ctrl.graph().nodes.len(),
        ctrl.view().visible_ids().len()
    );

    let theme = config.resolved_theme();
    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(ctrl.view(), &theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => write_png(&args, &ctrl, &config)?,
        OutputFormat::Json => write_layout_dump(args.output.as_deref(), ctrl.view())?,
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(args: &Args, ctrl: &CollapseController, config: &Config) -> Result<()> {
    let output = ensure_output(&args.output, "png")?;
    let svg = render_svg(ctrl.view(), &config.resolved_theme(), &config.render);
    crate::render::write_output_png(&svg, &output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_args: &Args, _ctrl: &CollapseController, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

/// `--collapseAll` first, then every `--collapse` id. Repeating an id or
/// naming one that `--collapseAll` already covered keeps it collapsed.
fn apply_collapse_flags(ctrl: &mut CollapseController, args: &Args) -> crate::error::Result<()> {
    if args.collapse_all {
        ctrl.toggle_all()?;
    }
    for id in &args.collapse {
        if ctrl.graph().node(id).is_none() {
            log::warn!("--collapse {id}: no such node");
        }
        ctrl.collapse(id)?;
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(theme) = args.theme {
        config.theme = theme;
    }
    if let Some(direction) = args.direction {
        config.layout.direction = direction;
    }
}

fn parse_direction(token: &str) -> Result<Direction, String> {
    Direction::from_token(token).ok_or_else(|| format!("unknown direction '{token}'"))
}

fn read_input(path: Option<&Path>) -> Result<(Vec<u8>, String)> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        let content =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(STDIN_ROOT_NAME)
            .to_string();
        return Ok((content, name));
    }

    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf)?;
    Ok((buf, STDIN_ROOT_NAME.to_string()))
}

#[cfg(feature = "png")]
fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
