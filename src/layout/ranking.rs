use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::{
    HandleSide, LayeredLayout, LayoutOutput, LayoutRequest, NODE_HEIGHT, NODE_WIDTH, Point,
    handle_point,
};
use crate::ir::Orientation;

const ORDERING_PASSES: usize = 4;

/// Longest-path ranking with median ordering sweeps.
///
/// Cycles are broken at the earliest declared node, so the engine never
/// fails; it only trades crossing quality for simplicity compared to dagre.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankedEngine;

impl LayeredLayout for RankedEngine {
    fn name(&self) -> &'static str {
        "ranked"
    }

    fn layout(&self, request: &LayoutRequest<'_>) -> LayoutOutput {
        if request.node_ids.is_empty() {
            return LayoutOutput::default();
        }

        let node_order: HashMap<&str, usize> = request
            .node_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (*id, idx))
            .collect();
        let ranks = compute_ranks(&request.node_ids, request.edges, &node_order);

        let max_rank = ranks.values().copied().max().unwrap_or(0);
        let mut rank_nodes: Vec<Vec<&str>> = vec![Vec::new(); max_rank + 1];
        for id in &request.node_ids {
            let rank = ranks.get(id).copied().unwrap_or(0);
            rank_nodes[rank].push(*id);
        }
        order_rank_nodes(&mut rank_nodes, request.edges, &node_order, ORDERING_PASSES);

        let horizontal = request.orientation.is_horizontal();
        let (rank_extent, cross_extent) = if horizontal {
            (NODE_WIDTH, NODE_HEIGHT)
        } else {
            (NODE_HEIGHT, NODE_WIDTH)
        };
        let rank_step = rank_extent + request.config.rank_spacing;
        let cross_step = cross_extent + request.config.node_spacing;
        let widest = rank_nodes.iter().map(Vec::len).max().unwrap_or(1);
        let full_cross = widest as f32 * cross_step - request.config.node_spacing;

        let mut nodes = HashMap::with_capacity(request.node_ids.len());
        for (rank, bucket) in rank_nodes.iter().enumerate() {
            let span = bucket.len() as f32 * cross_step - request.config.node_spacing;
            let offset = (full_cross - span) / 2.0;
            for (idx, id) in bucket.iter().enumerate() {
                let main = rank as f32 * rank_step + rank_extent / 2.0;
                let cross = offset + idx as f32 * cross_step + cross_extent / 2.0;
                let (x, y) = if horizontal { (main, cross) } else { (cross, main) };
                nodes.insert(
                    id.to_string(),
                    Point::new(x + request.config.margin_x, y + request.config.margin_y),
                );
            }
        }

        let edges = route_edges(&nodes, request.edges, request.orientation);
        LayoutOutput { nodes, edges }
    }
}

/// Straight routes from each source handle to its target handle, for every
/// pair whose endpoints were both placed.
pub(super) fn route_edges(
    nodes: &HashMap<String, Point>,
    pairs: &[(&str, &str)],
    orientation: &Orientation,
) -> HashMap<(String, String), Vec<Point>> {
    let (target_side, source_side) = HandleSide::for_orientation(orientation);
    let mut edges = HashMap::with_capacity(pairs.len());
    for (from, to) in pairs {
        let (Some(start), Some(end)) = (nodes.get(*from), nodes.get(*to)) else {
            continue;
        };
        edges.insert(
            (from.to_string(), to.to_string()),
            vec![
                handle_point(*start, source_side),
                handle_point(*end, target_side),
            ],
        );
    }
    edges
}

fn order_rank_nodes<'a>(
    rank_nodes: &mut [Vec<&'a str>],
    edges: &[(&'a str, &'a str)],
    node_order: &HashMap<&str, usize>,
    passes: usize,
) {
    if rank_nodes.len() <= 1 {
        return;
    }
    let mut incoming: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
    let mut outgoing: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
    for (from, to) in edges {
        outgoing.entry(*from).or_default().push(*to);
        incoming.entry(*to).or_default().push(*from);
    }

    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    refresh_positions(rank_nodes, &mut positions);

    for _ in 0..passes.max(1) {
        for rank in 1..rank_nodes.len() {
            if rank_nodes[rank].len() <= 1 {
                continue;
            }
            sort_bucket(&mut rank_nodes[rank], &incoming, &positions, node_order);
            refresh_positions(rank_nodes, &mut positions);
        }
        for rank in (0..rank_nodes.len().saturating_sub(1)).rev() {
            if rank_nodes[rank].len() <= 1 {
                continue;
            }
            sort_bucket(&mut rank_nodes[rank], &outgoing, &positions, node_order);
            refresh_positions(rank_nodes, &mut positions);
        }
    }
}

fn refresh_positions<'a>(rank_nodes: &[Vec<&'a str>], positions: &mut HashMap<&'a str, usize>) {
    positions.clear();
    for bucket in rank_nodes {
        for (idx, node_id) in bucket.iter().enumerate() {
            positions.insert(*node_id, idx);
        }
    }
}

fn sort_bucket(
    bucket: &mut [&str],
    neighbors: &HashMap<&str, Vec<&str>>,
    positions: &HashMap<&str, usize>,
    node_order: &HashMap<&str, usize>,
) {
    let current: HashMap<String, usize> = bucket
        .iter()
        .enumerate()
        .map(|(idx, id)| (id.to_string(), idx))
        .collect();
    bucket.sort_by(|a, b| {
        let a_score = median_position(a, neighbors, positions, &current);
        let b_score = median_position(b, neighbors, positions, &current);
        match a_score.partial_cmp(&b_score) {
            Some(std::cmp::Ordering::Equal) | None => {
                let a_pos = current.get(*a).copied().unwrap_or(0);
                let b_pos = current.get(*b).copied().unwrap_or(0);
                a_pos.cmp(&b_pos).then_with(|| {
                    node_order
                        .get(*a)
                        .copied()
                        .unwrap_or(usize::MAX)
                        .cmp(&node_order.get(*b).copied().unwrap_or(usize::MAX))
                })
            }
            Some(ordering) => ordering,
        }
    });
}

fn median_position(
    node_id: &str,
    neighbors: &HashMap<&str, Vec<&str>>,
    positions: &HashMap<&str, usize>,
    current: &HashMap<String, usize>,
) -> f32 {
    let fallback = *current.get(node_id).unwrap_or(&0) as f32;
    let Some(list) = neighbors.get(node_id) else {
        return fallback;
    };
    let mut values: Vec<f32> = list
        .iter()
        .filter_map(|neighbor| positions.get(neighbor).map(|pos| *pos as f32))
        .collect();
    if values.is_empty() {
        return fallback;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) * 0.5
    }
}

fn compute_ranks<'a>(
    node_ids: &[&'a str],
    edges: &[(&'a str, &'a str)],
    node_order: &HashMap<&str, usize>,
) -> HashMap<&'a str, usize> {
    let set: HashSet<&str> = node_ids.iter().copied().collect();
    let mut adj: HashMap<&str, Vec<&'a str>> = HashMap::new();
    let mut indeg: HashMap<&str, usize> = node_ids.iter().map(|id| (*id, 0)).collect();
    for (from, to) in edges {
        if set.contains(from) && set.contains(to) {
            adj.entry(*from).or_default().push(*to);
            *indeg.entry(*to).or_default() += 1;
        }
    }

    let order_key = |id: &str| node_order.get(id).copied().unwrap_or(usize::MAX);

    let mut ready: BinaryHeap<Reverse<(usize, &'a str)>> = node_ids
        .iter()
        .filter(|id| indeg.get(**id).copied().unwrap_or(0) == 0)
        .map(|id| Reverse((order_key(*id), *id)))
        .collect();

    let mut order: Vec<&'a str> = Vec::with_capacity(node_ids.len());
    let mut processed: HashSet<&str> = HashSet::new();
    loop {
        while let Some(Reverse((_key, id))) = ready.pop() {
            if !processed.insert(id) {
                continue;
            }
            order.push(id);
            for next in adj.get(id).into_iter().flatten() {
                if processed.contains(next) {
                    continue;
                }
                if let Some(deg) = indeg.get_mut(next) {
                    *deg = deg.saturating_sub(1);
                    if *deg == 0 {
                        ready.push(Reverse((order_key(*next), *next)));
                    }
                }
            }
        }

        if processed.len() >= set.len() {
            break;
        }

        // Cycle: restart from the earliest declared remaining node and
        // treat its incoming edges as back-edges.
        let best = node_ids
            .iter()
            .filter(|id| !processed.contains(**id))
            .min_by_key(|id| order_key(**id));
        match best {
            Some(id) => ready.push(Reverse((order_key(*id), *id))),
            None => break,
        }
    }

    let order_index: HashMap<&str, usize> =
        order.iter().enumerate().map(|(idx, id)| (*id, idx)).collect();

    let mut ranks: HashMap<&'a str, usize> = HashMap::new();
    for node in &order {
        let rank = *ranks.entry(*node).or_insert(0);
        let from_idx = order_index.get(node).copied().unwrap_or(0);
        for next in adj.get(node).into_iter().flatten() {
            let to_idx = order_index.get(next).copied().unwrap_or(from_idx);
            if to_idx <= from_idx {
                continue;
            }
            let entry = ranks.entry(*next).or_insert(0);
            *entry = (*entry).max(rank + 1);
        }
    }
    ranks
}
