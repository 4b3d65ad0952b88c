mod dagre;
mod ranking;

pub use dagre::DagreEngine;
pub use ranking::RankedEngine;

use crate::config::{EngineKind, LayoutConfig};
use crate::graph::DependencyGraph;
use crate::ir::Orientation;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Every node is laid out with the same box.
pub const NODE_WIDTH: f32 = 200.0;
pub const NODE_HEIGHT: f32 = 50.0;

/// Nodes without auto-layout edges are stacked left of the main drawing.
pub const SHELF_X: f32 = -200.0;
pub const SHELF_START_Y: f32 = 25.0;
pub const SHELF_STEP_Y: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Side of a node box hosting a connection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl HandleSide {
    /// `(target, source)` sides for an orientation.
    pub fn for_orientation(orientation: &Orientation) -> (Self, Self) {
        if orientation.is_horizontal() {
            (Self::Left, Self::Right)
        } else {
            (Self::Top, Self::Bottom)
        }
    }
}

/// Where a handle sits on a node box whose top-left corner is `position`.
pub fn handle_point(position: Point, side: HandleSide) -> Point {
    match side {
        HandleSide::Top => Point::new(position.x + NODE_WIDTH / 2.0, position.y),
        HandleSide::Bottom => Point::new(position.x + NODE_WIDTH / 2.0, position.y + NODE_HEIGHT),
        HandleSide::Left => Point::new(position.x, position.y + NODE_HEIGHT / 2.0),
        HandleSide::Right => Point::new(position.x + NODE_WIDTH, position.y + NODE_HEIGHT / 2.0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePlacement {
    pub position: Point,
    pub target_side: HandleSide,
    pub source_side: HandleSide,
    /// Placed on the shelf instead of by the layered algorithm.
    pub shelved: bool,
}

/// What a layered engine is asked to lay out.
#[derive(Debug, Clone)]
pub struct LayoutRequest<'r> {
    pub orientation: &'r Orientation,
    pub node_ids: Vec<&'r str>,
    pub edges: &'r [(&'r str, &'r str)],
    pub config: &'r LayoutConfig,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutOutput {
    pub nodes: HashMap<String, Point>,
    pub edges: HashMap<(String, String), Vec<Point>>,
}

/// A rank-based directed graph drawing algorithm.
pub trait LayeredLayout {
    fn name(&self) -> &'static str;
    fn layout(&self, request: &LayoutRequest<'_>) -> LayoutOutput;
}

#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub is_horizontal: bool,
    /// One entry per surviving node, in input order.
    pub placements: Vec<NodePlacement>,
    /// Routed points for each unique auto-layout `(from, to)` pair.
    pub edge_points: HashMap<(String, String), Vec<Point>>,
    ids: Vec<String>,
}

impl LayoutResult {
    /// Position by id; duplicate ids resolve to the last occurrence.
    pub fn positions(&self) -> HashMap<&str, Point> {
        self.ids
            .iter()
            .zip(&self.placements)
            .map(|(id, placement)| (id.as_str(), placement.position))
            .collect()
    }

    pub fn edge_points(&self, from: &str, to: &str) -> Option<&[Point]> {
        self.edge_points
            .get(&(from.to_string(), to.to_string()))
            .map(Vec::as_slice)
    }
}

pub fn compute_layout(
    graph: &DependencyGraph<'_>,
    orientation: &Orientation,
    config: &LayoutConfig,
) -> LayoutResult {
    let output = run_engine(graph, orientation, config);
    let (target_side, source_side) = HandleSide::for_orientation(orientation);

    let mut shelf_y = SHELF_START_Y;
    let mut placements = Vec::with_capacity(graph.nodes().len());
    let mut ids = Vec::with_capacity(graph.nodes().len());
    for node in graph.nodes() {
        let assigned = if graph.has_layout_edges(&node.id) {
            output.nodes.get(&node.id).copied()
        } else {
            None
        };
        let (position, shelved) = match assigned {
            Some(position) => (position, false),
            None => {
                let position = Point::new(SHELF_X, shelf_y);
                shelf_y += SHELF_STEP_Y;
                (position, true)
            }
        };
        placements.push(NodePlacement {
            position,
            target_side,
            source_side,
            shelved,
        });
        ids.push(node.id.clone());
    }

    LayoutResult {
        is_horizontal: orientation.is_horizontal(),
        placements,
        edge_points: output.edges,
        ids,
    }
}

fn run_engine(
    graph: &DependencyGraph<'_>,
    orientation: &Orientation,
    config: &LayoutConfig,
) -> LayoutOutput {
    if graph.layout_pairs().is_empty() {
        return LayoutOutput::default();
    }

    let mut seen = HashSet::new();
    let node_ids: Vec<&str> = graph
        .nodes()
        .iter()
        .map(|node| node.id.as_str())
        .filter(|id| seen.insert(*id))
        .collect();
    let request = LayoutRequest {
        orientation,
        node_ids,
        edges: graph.layout_pairs(),
        config,
    };

    match config.engine {
        EngineKind::Dagre => run_with_fallback(&DagreEngine, &request),
        EngineKind::Ranked => run_with(&RankedEngine, &request),
    }
}

/// Runs `primary`, handing over to [`RankedEngine`] when it places nothing.
fn run_with_fallback(primary: &dyn LayeredLayout, request: &LayoutRequest<'_>) -> LayoutOutput {
    let output = run_with(primary, request);
    if output.nodes.is_empty() && !request.node_ids.is_empty() {
        warn!(
            engine = primary.name(),
            "layout produced no coordinates, falling back to ranked layout"
        );
        return run_with(&RankedEngine, request);
    }
    output
}

fn run_with(engine: &dyn LayeredLayout, request: &LayoutRequest<'_>) -> LayoutOutput {
    debug!(
        engine = engine.name(),
        rankdir = %request.orientation,
        nodes = request.node_ids.len(),
        edges = request.edges.len(),
        "running layered layout"
    );
    engine.layout(request)
}
