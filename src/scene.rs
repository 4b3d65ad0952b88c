//! Merges layout and timing into the node/edge lists the canvas renders.

use serde::Serialize;
use tracing::debug;

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::ir::{GraphDocument, GraphEdge, GraphNode, MarkerKind, Orientation, TimeRanges};
use crate::layout::{HandleSide, Point, compute_layout};
use crate::timing::{TimeBucket, compute_timing, format_duration, shows_badge};

/// Arrowheads are drawn at a fixed size.
pub const MARKER_SIZE: f32 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    /// Computed time for calculated nodes, authored time otherwise.
    pub time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_ranges: Option<TimeRanges>,
    pub colorize_time: bool,
    pub is_calculated: bool,
    pub bucket: TimeBucket,
    /// Badge text; absent when the node has no duration to show.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: Point,
    pub source_position: HandleSide,
    pub target_position: HandleSide,
    pub data: NodeData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeMarker {
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub animated: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<EdgeMarker>,
    pub auto_layout: bool,
    /// Routed polyline for auto-layout edges; empty for manual ones.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub orientation: Orientation,
    pub background_color: String,
    pub height: f32,
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl Scene {
    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().rev().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&RenderEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }
}

pub fn build_scene(document: &GraphDocument, config: &LayoutConfig) -> Result<Scene> {
    let mut scene = build_scene_from_parts(
        &document.graph.orientation,
        &document.nodes,
        &document.edges,
        config,
    )?;
    scene.background_color = document.graph.background_color.clone();
    scene.height = document.height;
    Ok(scene)
}

/// Filter, time, lay out and merge one graph. Every call starts from scratch.
pub fn build_scene_from_parts(
    orientation: &Orientation,
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    config: &LayoutConfig,
) -> Result<Scene> {
    let graph = DependencyGraph::build(nodes, edges);
    let timings = compute_timing(&graph)?;
    let layout = compute_layout(&graph, orientation, config);
    debug!(
        nodes = graph.nodes().len(),
        auto_edges = graph.auto_edges().len(),
        manual_edges = graph.manual_edges().len(),
        calculated = timings.len(),
        "scene inputs resolved"
    );

    let render_nodes = graph
        .nodes()
        .iter()
        .zip(&layout.placements)
        .map(|(node, placement)| {
            let time = timings.get(&node.id).copied().unwrap_or(node.time);
            RenderNode {
                id: node.id.clone(),
                node_type: "action".to_string(),
                position: placement.position,
                source_position: placement.source_side,
                target_position: placement.target_side,
                data: NodeData {
                    label: node.label.clone(),
                    time,
                    time_ranges: node.time_ranges,
                    colorize_time: node.colorize_time,
                    is_calculated: node.is_calculated,
                    bucket: TimeBucket::for_node(node, time),
                    duration: shows_badge(time).then(|| format_duration(time)),
                },
            }
        })
        .collect();

    let render_edges = graph
        .render_edges()
        .map(|edge| {
            let auto_layout = edge.is_auto_layout();
            let points = if auto_layout {
                layout
                    .edge_points(&edge.from, &edge.to)
                    .map(<[Point]>::to_vec)
                    .unwrap_or_default()
            } else {
                Vec::new()
            };
            RenderEdge {
                id: edge.render_id(),
                source: edge.from.clone(),
                target: edge.to.clone(),
                animated: edge.animated,
                edge_type: edge.edge_type.clone(),
                marker_end: edge_marker(edge),
                auto_layout,
                points,
            }
        })
        .collect();

    Ok(Scene {
        orientation: orientation.clone(),
        background_color: GraphDocument::default().graph.background_color,
        height: GraphDocument::default().height,
        nodes: render_nodes,
        edges: render_edges,
    })
}

fn edge_marker(edge: &GraphEdge) -> Option<EdgeMarker> {
    match edge.marker_end {
        None | Some(MarkerKind::None) => None,
        Some(kind) => Some(EdgeMarker {
            kind,
            width: MARKER_SIZE,
            height: MARKER_SIZE,
        }),
    }
}
