use action_graph::config::{EngineKind, LayoutConfig};
use action_graph::graph::DependencyGraph;
use action_graph::ir::{GraphEdge, GraphNode, Orientation};
use action_graph::render::render_svg;
use action_graph::scene::build_scene_from_parts;
use action_graph::theme::Theme;
use action_graph::timing::compute_timing;
use action_graph::RenderConfig;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// `layers` stacked diamonds ending in one calculated rollup node.
fn diamond_graph(layers: usize, width: usize) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let mut nodes = vec![GraphNode::new("j0", "start", 100.0)];
    let mut edges = Vec::new();
    for layer in 0..layers {
        let join = format!("j{}", layer + 1);
        for lane in 0..width {
            let id = format!("s{layer}_{lane}");
            nodes.push(GraphNode::new(id.clone(), "step", (lane as f64 + 1.0) * 10.0));
            edges.push(GraphEdge::new(format!("j{layer}"), id.clone()));
            edges.push(GraphEdge::new(id, join.clone()));
        }
        nodes.push(GraphNode::new(join, "join", 0.0));
    }
    nodes.push(GraphNode::new("total", "Total", 0.0).calculated());
    edges.push(GraphEdge::new(format!("j{layers}"), "total"));
    (nodes, edges)
}

fn chain_graph(len: usize) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let mut nodes: Vec<GraphNode> = (0..len)
        .map(|idx| {
            let node = GraphNode::new(format!("n{idx}"), format!("Step {idx}"), 250.0);
            if idx % 5 == 4 { node.calculated() } else { node }
        })
        .collect();
    nodes.push(GraphNode::new("loose", "Loose", 0.0));
    let edges = (1..len)
        .map(|idx| GraphEdge::new(format!("n{}", idx - 1), format!("n{idx}")))
        .collect();
    (nodes, edges)
}

fn bench_timing(c: &mut Criterion) {
    let mut group = c.benchmark_group("timing");
    for (layers, width) in [(10usize, 4usize), (30, 6), (60, 8)] {
        let (nodes, edges) = diamond_graph(layers, width);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("diamond_{layers}x{width}")),
            &(nodes, edges),
            |b, (nodes, edges)| {
                b.iter(|| {
                    let graph = DependencyGraph::build(black_box(nodes), black_box(edges));
                    black_box(compute_timing(&graph).expect("acyclic"));
                });
            },
        );
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let ranked = LayoutConfig {
        engine: EngineKind::Ranked,
        ..LayoutConfig::default()
    };
    for len in [10usize, 40, 120] {
        let (nodes, edges) = chain_graph(len);
        for (label, config) in [("dagre", LayoutConfig::default()), ("ranked", ranked.clone())] {
            group.bench_with_input(
                BenchmarkId::new(label, len),
                &(&nodes, &edges),
                |b, (nodes, edges)| {
                    b.iter(|| {
                        let scene = build_scene_from_parts(
                            &Orientation::LeftRight,
                            black_box(nodes),
                            black_box(edges),
                            &config,
                        )
                        .expect("scene");
                        black_box(scene.nodes.len());
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_svg");
    let theme = Theme::slate();
    let render = RenderConfig::default();
    for (layers, width) in [(5usize, 3usize), (20, 4)] {
        let (nodes, edges) = diamond_graph(layers, width);
        let scene =
            build_scene_from_parts(&Orientation::TopBottom, &nodes, &edges, &LayoutConfig::default())
                .expect("scene");
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("diamond_{layers}x{width}")),
            &scene,
            |b, scene| {
                b.iter(|| black_box(render_svg(black_box(scene), &theme, &render)));
            },
        );
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_timing, bench_layout, bench_render
);
criterion_main!(benches);
