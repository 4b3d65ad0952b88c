#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod ir;
pub mod layout;
pub mod parser;
pub mod render;
pub mod scene;
pub mod theme;
pub mod timing;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, EngineKind, LayoutConfig, RenderConfig};
pub use error::{Error, Result};
pub use graph::DependencyGraph;
pub use ir::{GraphDocument, GraphEdge, GraphNode, MarkerKind, Orientation, TimeRanges};
pub use layout::{HandleSide, LayeredLayout, Point, compute_layout};
pub use parser::parse_document;
pub use render::render_svg;
pub use scene::{RenderEdge, RenderNode, Scene, build_scene, build_scene_from_parts};
pub use theme::Theme;
pub use timing::{TimeBucket, TimingError, compute_timing};

/// Parse a document and build its scene with default settings.
pub fn compute_scene(input: &str) -> Result<Scene> {
    let document = parse_document(input)?;
    build_scene(&document, &LayoutConfig::default())
}
