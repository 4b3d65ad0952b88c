use crate::config::{EngineKind, load_config};
use crate::ir::Orientation;
use crate::parser::parse_document;
use crate::render::{render_svg, write_output_json, write_output_png, write_output_svg};
use crate::scene::build_scene;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "action-graph", version, about = "Lay out and time an action dependency graph")]
pub struct Args {
    /// Input graph document (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (json/svg/png). Defaults to stdout for JSON and SVG.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format; inferred from the output extension when omitted
    #[arg(short = 'e', long = "outputFormat", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Config JSON file (layout, render and theme settings)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Override the document orientation (LR or TB)
    #[arg(long = "orientation")]
    pub orientation: Option<String>,

    /// Layered layout engine
    #[arg(long = "engine", value_enum)]
    pub engine: Option<EngineKind>,

    /// Width used when rasterising
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height used when rasterising
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(engine) = args.engine {
        config.layout.engine = engine;
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let input = read_input(args.input.as_deref())?;
    let mut document = parse_document(&input)?;
    if let Some(token) = args.orientation.as_deref() {
        document.graph.orientation = Orientation::from_token(token);
    }

    let scene = build_scene(&document, &config.layout)?;
    info!(
        nodes = scene.nodes.len(),
        edges = scene.edges.len(),
        orientation = %scene.orientation,
        "scene computed"
    );

    match resolve_format(args.output_format, args.output.as_deref()) {
        OutputFormat::Json => write_output_json(&scene, args.output.as_deref())?,
        OutputFormat::Svg => {
            let svg = render_svg(&scene, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&scene, &config.theme, &config.render);
            write_output_png(&svg, &output, &config.render, &config.theme)?;
        }
    }
    Ok(())
}

/// Logs go to stderr so stdout carries only the rendered output.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("action_graph=info,warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn resolve_format(explicit: Option<OutputFormat>, output: Option<&Path>) -> OutputFormat {
    if let Some(format) = explicit {
        return format;
    }
    let ext = output
        .and_then(|path| path.extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("svg") => OutputFormat::Svg,
        Some("png") => OutputFormat::Png,
        _ => OutputFormat::Json,
    }
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
