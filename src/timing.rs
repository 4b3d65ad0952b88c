//! Critical-path timing over the auto-layout dependency graph.
//!
//! A calculated node is a rollup point: it shows the slowest cumulative
//! time of its ancestors and adds nothing of its own. A regular node on the
//! path adds its authored duration on top of its slowest parent.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::DependencyGraph;
use crate::ir::{GraphNode, TimeRanges};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimingError {
    #[error("dependency cycle through nodes: {}", nodes.join(" -> "))]
    Cycle { nodes: Vec<String> },
}

/// Computed time for every calculated node, keyed by id.
pub fn compute_timing(graph: &DependencyGraph<'_>) -> Result<BTreeMap<String, f64>, TimingError> {
    let mut propagator = Propagator::new(graph);
    let mut timings = BTreeMap::new();
    for node in graph.nodes() {
        if !node.is_calculated || timings.contains_key(&node.id) {
            continue;
        }
        // Lookups go through the graph so duplicate ids agree with it.
        let timing = propagator.ancestor_timing(node.id.as_str())?;
        debug!(node = %node.id, timing, "calculated node timing");
        timings.insert(node.id.clone(), timing);
    }
    Ok(timings)
}

/// Per-run traversal state. Shared ancestors are resolved once.
struct Propagator<'g, 'a> {
    graph: &'g DependencyGraph<'a>,
    memo: HashMap<&'a str, f64>,
    path: Vec<&'a str>,
    on_path: HashSet<&'a str>,
}

impl<'g, 'a> Propagator<'g, 'a> {
    fn new(graph: &'g DependencyGraph<'a>) -> Self {
        Self {
            graph,
            memo: HashMap::new(),
            path: Vec::new(),
            on_path: HashSet::new(),
        }
    }

    fn ancestor_timing(&mut self, id: &'a str) -> Result<f64, TimingError> {
        let graph = self.graph;
        let Some(node) = graph.node(id) else {
            return Ok(0.0);
        };
        if let Some(timing) = self.memo.get(id) {
            return Ok(*timing);
        }

        let parents = graph.predecessors(id);
        if parents.is_empty() {
            return Ok(node.time);
        }

        if !self.on_path.insert(id) {
            let start = self.path.iter().position(|entry| *entry == id).unwrap_or(0);
            let mut nodes: Vec<String> = self.path[start..].iter().map(|s| s.to_string()).collect();
            nodes.push(id.to_string());
            return Err(TimingError::Cycle { nodes });
        }
        self.path.push(id);

        let mut slowest: Option<f64> = None;
        for &parent in parents {
            let timing = self.ancestor_timing(parent)?;
            slowest = Some(slowest.map_or(timing, |current| current.max(timing)));
        }

        self.path.pop();
        self.on_path.remove(id);

        let slowest = slowest.unwrap_or(0.0);
        let timing = if node.is_calculated {
            slowest
        } else {
            slowest + node.time
        };
        self.memo.insert(id, timing);
        Ok(timing)
    }
}

/// Badge colour class for a displayed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Neutral,
    Good,
    Warning,
    Critical,
}

impl TimeBucket {
    pub fn classify(time: f64, ranges: TimeRanges, colorize: bool) -> Self {
        if !colorize {
            return Self::Neutral;
        }
        if time >= ranges.poor && time < ranges.bad {
            Self::Warning
        } else if time >= ranges.bad {
            Self::Critical
        } else {
            Self::Good
        }
    }

    /// Calculated nodes are always coloured; others only on request.
    pub fn for_node(node: &GraphNode, time: f64) -> Self {
        Self::classify(
            time,
            node.time_ranges_or_default(),
            node.colorize_time || node.is_calculated,
        )
    }
}

/// `"{minutes}m {seconds}s"`, truncating to whole seconds.
pub fn format_duration(ms: f64) -> String {
    let minutes = (ms / 1000.0 / 60.0).floor() as i64;
    let seconds = ((ms / 1000.0).floor() as i64) % 60;
    format!("{minutes}m {seconds}s")
}

/// Zero-length steps carry no badge.
pub fn shows_badge(time: f64) -> bool {
    time > 0.0
}
