use std::collections::HashMap;

use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};

use super::ranking::route_edges;
use super::{LayeredLayout, LayoutOutput, LayoutRequest, NODE_HEIGHT, NODE_WIDTH, Point};

/// Sugiyama-style layout through `dagre_rust`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagreEngine;

impl LayeredLayout for DagreEngine {
    fn name(&self) -> &'static str {
        "dagre"
    }

    fn layout(&self, request: &LayoutRequest<'_>) -> LayoutOutput {
        if request.node_ids.is_empty() {
            return LayoutOutput::default();
        }

        let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
            DagreGraph::new(Some(GraphOption {
                directed: Some(true),
                multigraph: Some(false),
                compound: Some(false),
            }));

        let mut graph_config = DagreConfig::default();
        graph_config.rankdir = Some(request.orientation.as_token().to_lowercase());
        graph_config.nodesep = Some(request.config.node_spacing);
        graph_config.ranksep = Some(request.config.rank_spacing);
        graph_config.marginx = Some(request.config.margin_x);
        graph_config.marginy = Some(request.config.margin_y);
        dagre_graph.set_graph(graph_config);

        for (order, node_id) in request.node_ids.iter().enumerate() {
            let mut node = DagreNode::default();
            node.width = NODE_WIDTH;
            node.height = NODE_HEIGHT;
            node.order = Some(order);
            dagre_graph.set_node(node_id.to_string(), Some(node));
        }

        for (from, to) in request.edges {
            let from = from.to_string();
            let to = to.to_string();
            let _ = dagre_graph.set_edge(&from, &to, Some(DagreEdge::default()), None);
        }

        dagre_layout::run_layout(&mut dagre_graph);

        let mut nodes = HashMap::with_capacity(request.node_ids.len());
        for node_id in &request.node_ids {
            let key = node_id.to_string();
            let Some(dagre_node) = dagre_graph.node(&key) else {
                continue;
            };
            nodes.insert(key, Point::new(dagre_node.x, dagre_node.y));
        }

        let edges = route_edges(&nodes, request.edges, request.orientation);
        LayoutOutput { nodes, edges }
    }
}
