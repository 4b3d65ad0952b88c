//! Filtered view of an action graph shared by layout and timing.
//!
//! Nodes without an id and edges whose endpoints do not resolve are dropped
//! here, so every later stage can index by id without further checks.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::ir::{GraphEdge, GraphNode};

#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    nodes: Vec<&'a GraphNode>,
    index: HashMap<&'a str, usize>,
    auto_edges: Vec<&'a GraphEdge>,
    manual_edges: Vec<&'a GraphEdge>,
    layout_pairs: Vec<(&'a str, &'a str)>,
    predecessors: HashMap<&'a str, Vec<&'a str>>,
    connected: HashSet<&'a str>,
}

impl<'a> DependencyGraph<'a> {
    pub fn build(nodes: &'a [GraphNode], edges: &'a [GraphEdge]) -> Self {
        let mut kept = Vec::with_capacity(nodes.len());
        let mut index = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if node.id.is_empty() {
                debug!(label = %node.label, "dropping node without id");
                continue;
            }
            // Duplicate ids resolve to the last occurrence.
            index.insert(node.id.as_str(), kept.len());
            kept.push(node);
        }

        let mut auto_edges = Vec::new();
        let mut manual_edges = Vec::new();
        let mut layout_pairs = Vec::new();
        let mut seen_pairs: HashSet<(&str, &str)> = HashSet::new();
        let mut predecessors: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut connected = HashSet::new();

        for edge in edges {
            if edge.from.is_empty()
                || edge.to.is_empty()
                || !index.contains_key(edge.from.as_str())
                || !index.contains_key(edge.to.as_str())
            {
                debug!(from = %edge.from, to = %edge.to, "dropping dangling edge");
                continue;
            }
            if !edge.is_auto_layout() {
                manual_edges.push(edge);
                continue;
            }
            auto_edges.push(edge);
            let pair = (edge.from.as_str(), edge.to.as_str());
            if seen_pairs.insert(pair) {
                layout_pairs.push(pair);
                predecessors.entry(pair.1).or_default().push(pair.0);
                connected.insert(pair.0);
                connected.insert(pair.1);
            }
        }

        Self {
            nodes: kept,
            index,
            auto_edges,
            manual_edges,
            layout_pairs,
            predecessors,
            connected,
        }
    }

    /// Surviving nodes in input order.
    pub fn nodes(&self) -> &[&'a GraphNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&'a GraphNode> {
        self.index.get(id).map(|idx| self.nodes[*idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Direct predecessors over auto-layout edges, each listed once.
    pub fn predecessors(&self, id: &str) -> &[&'a str] {
        self.predecessors
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the node touches at least one auto-layout edge.
    pub fn has_layout_edges(&self, id: &str) -> bool {
        self.connected.contains(id)
    }

    /// Unique `(from, to)` pairs that take part in the layered layout.
    pub fn layout_pairs(&self) -> &[(&'a str, &'a str)] {
        &self.layout_pairs
    }

    pub fn auto_edges(&self) -> &[&'a GraphEdge] {
        &self.auto_edges
    }

    pub fn manual_edges(&self) -> &[&'a GraphEdge] {
        &self.manual_edges
    }

    /// All surviving edges: auto-layout first, then manual ones.
    pub fn render_edges(&self) -> impl Iterator<Item = &'a GraphEdge> + '_ {
        self.auto_edges
            .iter()
            .chain(self.manual_edges.iter())
            .copied()
    }
}
