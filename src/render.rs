use crate::config::RenderConfig;
use crate::ir::MarkerKind;
use crate::layout::{HandleSide, NODE_HEIGHT, NODE_WIDTH, Point, handle_point};
use crate::scene::{RenderEdge, RenderNode, Scene};
use crate::theme::Theme;
use anyhow::Result;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const BADGE_HEIGHT: f32 = 20.0;
const BADGE_CHAR_WIDTH: f32 = 6.5;
const HANDLE_WIDTH: f32 = 16.0;
const HANDLE_THICKNESS: f32 = 4.0;

/// Static SVG preview of a scene. Node positions are box top-left corners.
pub fn render_svg(scene: &Scene, theme: &Theme, config: &RenderConfig) -> String {
    let (min, max) = scene_bounds(scene);
    let pad = config.padding;
    let view_x = min.x - pad;
    let view_y = min.y - pad;
    let width = (max.x - min.x + pad * 2.0).max(1.0);
    let height = (max.y - min.y + pad * 2.0).max(1.0);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"{view_x:.2} {view_y:.2} {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect x=\"{view_x:.2}\" y=\"{view_y:.2}\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&scene.background_color)
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"{0}\" markerHeight=\"{0}\" markerUnits=\"userSpaceOnUse\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10\" fill=\"none\" stroke=\"{1}\" stroke-width=\"1.5\"/></marker>",
        crate::scene::MARKER_SIZE / 2.0,
        theme.line_color
    ));
    svg.push_str(&format!(
        "<marker id=\"arrowclosed\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"{0}\" markerHeight=\"{0}\" markerUnits=\"userSpaceOnUse\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{1}\"/></marker>",
        crate::scene::MARKER_SIZE / 2.0,
        theme.line_color
    ));
    svg.push_str("</defs>");

    let by_id: HashMap<&str, &RenderNode> = scene
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node))
        .collect();

    for edge in &scene.edges {
        let (Some(source), Some(target)) = (
            by_id.get(edge.source.as_str()),
            by_id.get(edge.target.as_str()),
        ) else {
            continue;
        };
        svg.push_str(&edge_svg(edge, source, target, theme));
    }

    for node in &scene.nodes {
        svg.push_str(&node_svg(node, theme));
    }

    svg.push_str("</svg>");
    svg
}

fn scene_bounds(scene: &Scene) -> (Point, Point) {
    if scene.nodes.is_empty() {
        return (Point::default(), Point::new(NODE_WIDTH, NODE_HEIGHT));
    }
    let mut min = Point::new(f32::MAX, f32::MAX);
    let mut max = Point::new(f32::MIN, f32::MIN);
    for node in &scene.nodes {
        min.x = min.x.min(node.position.x);
        min.y = min.y.min(node.position.y);
        max.x = max.x.max(node.position.x + NODE_WIDTH);
        max.y = max.y.max(node.position.y + NODE_HEIGHT);
    }
    (min, max)
}

/// Unit vector pointing out of the box through a handle.
fn handle_direction(side: HandleSide) -> (f32, f32) {
    match side {
        HandleSide::Top => (0.0, -1.0),
        HandleSide::Bottom => (0.0, 1.0),
        HandleSide::Left => (-1.0, 0.0),
        HandleSide::Right => (1.0, 0.0),
    }
}

fn edge_svg(edge: &RenderEdge, source: &RenderNode, target: &RenderNode, theme: &Theme) -> String {
    let start = handle_point(source.position, source.source_position);
    let end = handle_point(target.position, target.target_position);
    let (sdx, sdy) = handle_direction(source.source_position);
    let (tdx, tdy) = handle_direction(target.target_position);
    let reach = ((end.x - start.x).abs() + (end.y - start.y).abs()).max(40.0) * 0.4;
    let d = format!(
        "M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
        start.x,
        start.y,
        start.x + sdx * reach,
        start.y + sdy * reach,
        end.x + tdx * reach,
        end.y + tdy * reach,
        end.x,
        end.y
    );
    let marker = match edge.marker_end.map(|marker| marker.kind) {
        Some(MarkerKind::Arrow) => " marker-end=\"url(#arrow)\"",
        Some(MarkerKind::ArrowClosed) => " marker-end=\"url(#arrowclosed)\"",
        Some(MarkerKind::None) | None => "",
    };
    let dash = if edge.animated {
        " stroke-dasharray=\"5\""
    } else {
        ""
    };
    format!(
        "<path id=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.2\"{}{} />",
        escape_xml(&edge.id),
        d,
        theme.line_color,
        dash,
        marker
    )
}

fn node_svg(node: &RenderNode, theme: &Theme) -> String {
    let Point { x, y } = node.position;
    let center_y = y + NODE_HEIGHT / 2.0;
    let mut out = String::new();
    out.push_str(&format!(
        "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{NODE_WIDTH:.2}\" height=\"{NODE_HEIGHT:.2}\" rx=\"8\" ry=\"8\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        theme.node_fill, theme.node_border
    ));

    for (side, is_target) in [(node.target_position, true), (node.source_position, false)] {
        let point = handle_point(node.position, side);
        let (w, h) = match side {
            HandleSide::Top | HandleSide::Bottom => (HANDLE_WIDTH, HANDLE_THICKNESS),
            HandleSide::Left | HandleSide::Right => (HANDLE_THICKNESS, HANDLE_WIDTH),
        };
        out.push_str(&format!(
            "<rect class=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" rx=\"2\" fill=\"{}\"/>",
            if is_target { "handle-target" } else { "handle-source" },
            point.x - w / 2.0,
            point.y - h / 2.0,
            theme.handle_color
        ));
    }

    let Some(duration) = node.data.duration.as_deref() else {
        out.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{center_y:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            x + NODE_WIDTH / 2.0,
            theme.font_family,
            theme.font_size,
            theme.text_color,
            escape_xml(&node.data.label)
        ));
        return out;
    };

    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{center_y:.2}\" text-anchor=\"start\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        x + 12.0,
        theme.font_family,
        theme.font_size,
        theme.text_color,
        escape_xml(&node.data.label)
    ));
    let colors = theme.badge(node.data.bucket);
    let badge_width = duration.chars().count() as f32 * BADGE_CHAR_WIDTH + 16.0;
    let badge_x = x + NODE_WIDTH - 10.0 - badge_width;
    out.push_str(&format!(
        "<rect x=\"{badge_x:.2}\" y=\"{:.2}\" width=\"{badge_width:.2}\" height=\"{BADGE_HEIGHT:.2}\" rx=\"10\" ry=\"10\" fill=\"{}\"/>",
        center_y - BADGE_HEIGHT / 2.0,
        colors.fill
    ));
    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{center_y:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        badge_x + badge_width / 2.0,
        theme.font_family,
        theme.font_size - 1.0,
        colors.text,
        escape_xml(duration)
    ));
    out
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

pub fn write_output_json(scene: &Scene, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, scene)?;
        }
        None => {
            println!("{}", serde_json::to_string_pretty(scene)?);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "Inter".to_string());
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid default render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig, _theme: &Theme) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the 'png' feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
