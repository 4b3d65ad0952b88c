use std::collections::BTreeSet;
use std::path::Path;

use action_graph::{
    EngineKind, Error, GraphDocument, GraphEdge, GraphNode, HandleSide, LayoutConfig, Orientation,
    Scene, TimeBucket, TimingError, build_scene, build_scene_from_parts, compute_scene,
    parse_document,
};

fn load_fixture(rel: &str) -> GraphDocument {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_document(&input).expect("fixture parse failed")
}

fn ranked() -> LayoutConfig {
    LayoutConfig {
        engine: EngineKind::Ranked,
        ..LayoutConfig::default()
    }
}

fn node_ids(scene: &Scene) -> BTreeSet<String> {
    scene.nodes.iter().map(|node| node.id.clone()).collect()
}

fn edge_ids(scene: &Scene) -> BTreeSet<String> {
    scene.edges.iter().map(|edge| edge.id.clone()).collect()
}

#[test]
fn checkout_fixture_timings() {
    let document = load_fixture("checkout.json5");
    let scene = build_scene(&document, &LayoutConfig::default()).unwrap();

    let ready = scene.node("ready").unwrap();
    assert_eq!(ready.data.time, 3000.0);
    assert_eq!(ready.data.bucket, TimeBucket::Warning);

    let pay = scene.node("pay").unwrap();
    assert_eq!(pay.data.time, 2500.0);
    assert_eq!(pay.data.bucket, TimeBucket::Warning);

    let total = scene.node("total").unwrap();
    assert_eq!(total.data.time, 5500.0);
    assert_eq!(total.data.bucket, TimeBucket::Good);
    assert_eq!(total.data.duration.as_deref(), Some("0m 5s"));

    let audit = scene.node("audit").unwrap();
    assert_eq!(audit.data.bucket, TimeBucket::Neutral);
}

#[test]
fn checkout_fixture_filters_and_orders_edges() {
    let document = load_fixture("checkout.json5");
    let scene = build_scene(&document, &LayoutConfig::default()).unwrap();

    assert_eq!(scene.nodes.len(), 7);
    assert!(scene.nodes.iter().all(|node| !node.id.is_empty()));

    let ids: Vec<&str> = scene.edges.iter().map(|edge| edge.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "edge-cart-ready",
            "edge-pricing-ready",
            "edge-ready-pay",
            "edge-pay-total",
            "edge-audit-total",
        ]
    );
    let styled = scene.edge("edge-ready-pay").unwrap();
    assert_eq!(styled.edge_type.as_deref(), Some("smoothstep"));
    let manual = scene.edge("edge-audit-total").unwrap();
    assert!(!manual.auto_layout);
    assert_eq!(manual.source, "audit");
    assert_eq!(manual.target, "total");
}

#[test]
fn isolated_nodes_stack_on_the_shelf() {
    let document = load_fixture("checkout.json5");
    let scene = build_scene(&document, &ranked()).unwrap();
    let audit = scene.node("audit").unwrap();
    let notes = scene.node("notes").unwrap();
    assert_eq!((audit.position.x, audit.position.y), (-200.0, 25.0));
    assert_eq!((notes.position.x, notes.position.y), (-200.0, 125.0));
}

#[test]
fn shelf_counter_steps_by_hundred() {
    let nodes: Vec<GraphNode> = (0..4)
        .map(|idx| GraphNode::new(format!("n{idx}"), "loose", 0.0))
        .collect();
    let scene = build_scene_from_parts(&Orientation::TopBottom, &nodes, &[], &ranked()).unwrap();
    let ys: Vec<f32> = scene.nodes.iter().map(|node| node.position.y).collect();
    assert_eq!(ys, vec![25.0, 125.0, 225.0, 325.0]);
    assert!(scene.nodes.iter().all(|node| node.position.x == -200.0));
}

#[test]
fn legacy_documents_lay_out_every_edge() {
    let document = load_fixture("legacy.json");
    assert_eq!(document.graph.orientation, Orientation::LeftRight);
    let scene = build_scene(&document, &LayoutConfig::default()).unwrap();
    assert_eq!(scene.node("c").unwrap().data.time, 1200.0);
    assert!(scene.edges.iter().all(|edge| edge.auto_layout));
    for node in &scene.nodes {
        assert_eq!(node.target_position, HandleSide::Left);
        assert_eq!(node.source_position, HandleSide::Right);
        assert_ne!(node.position.x, -200.0);
    }
}

#[test]
fn manual_edge_changes_neither_layout_nor_timing() {
    let nodes = vec![
        GraphNode::new("a", "A", 100.0),
        GraphNode::new("x", "X", 9000.0),
        GraphNode::new("y", "Y", 50.0).calculated(),
    ];
    let base_edges = vec![GraphEdge::new("a", "x"), GraphEdge::new("a", "y")];
    let mut with_manual = base_edges.clone();
    with_manual.push(GraphEdge::new("x", "y").manual());

    let config = LayoutConfig::default();
    let base = build_scene_from_parts(&Orientation::TopBottom, &nodes, &base_edges, &config).unwrap();
    let manual =
        build_scene_from_parts(&Orientation::TopBottom, &nodes, &with_manual, &config).unwrap();

    for id in ["a", "x", "y"] {
        assert_eq!(base.node(id).unwrap().position, manual.node(id).unwrap().position);
    }
    assert_eq!(manual.node("y").unwrap().data.time, 100.0);
    let edge = manual.edge("edge-x-y").unwrap();
    assert_eq!((edge.source.as_str(), edge.target.as_str()), ("x", "y"));
}

#[test]
fn orientation_switch_only_moves_handles() {
    let document = load_fixture("checkout.json5");
    let vertical = build_scene(&document, &LayoutConfig::default()).unwrap();
    let mut flipped = document.clone();
    flipped.graph.orientation = Orientation::LeftRight;
    let horizontal = build_scene(&flipped, &LayoutConfig::default()).unwrap();

    assert_eq!(node_ids(&vertical), node_ids(&horizontal));
    assert_eq!(edge_ids(&vertical), edge_ids(&horizontal));
    for node in &vertical.nodes {
        assert_eq!(
            (node.target_position, node.source_position),
            (HandleSide::Top, HandleSide::Bottom)
        );
    }
    for node in &horizontal.nodes {
        assert_eq!(
            (node.target_position, node.source_position),
            (HandleSide::Left, HandleSide::Right)
        );
    }
}

#[test]
fn rebuilding_is_idempotent() {
    let document = load_fixture("checkout.json5");
    for config in [LayoutConfig::default(), ranked()] {
        let first = build_scene(&document, &config).unwrap();
        let second = build_scene(&document, &config).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn cycles_fail_with_the_offending_nodes() {
    let document = load_fixture("cycle.json5");
    let err = build_scene(&document, &LayoutConfig::default()).unwrap_err();
    match err {
        Error::Timing(TimingError::Cycle { nodes }) => {
            assert!(nodes.contains(&"a".to_string()));
            assert!(nodes.contains(&"b".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn auto_edges_carry_routes() {
    let document = load_fixture("legacy.json");
    let scene = build_scene(&document, &ranked()).unwrap();
    for edge in &scene.edges {
        assert!(edge.points.len() >= 2, "{} has no route", edge.id);
    }
}

#[test]
fn compute_scene_matches_default_build() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("checkout.json5");
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    let scene = compute_scene(&input).unwrap();
    let expected = build_scene(&load_fixture("checkout.json5"), &LayoutConfig::default()).unwrap();
    assert_eq!(scene, expected);
    assert!(compute_scene("{ nodes: [").is_err());
}
