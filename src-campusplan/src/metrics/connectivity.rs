//! Kansky road-network connectivity indices
//!
//! Converts a road network (polylines produced by a downstream generator)
//! into a node/edge graph by clustering nearby vertices, then computes the
//! classical Kansky measures:
//!
//! - `μ` circuits: `max(0, e - v + 1)`
//! - `α` connectivity: `μ / (2v - 5)`, clamped to [0, 1]
//! - `β` edges per node: `e / v`
//! - `γ` actual vs maximum planar connections: `e / 3(v - 2)`, clamped
//! - `η` mean edge length in meters

use serde::{Deserialize, Serialize};

use campusplan_model::{Building, Point, Solution, point_segment_distance};

/// Vertices closer than this are merged into one graph node, in meters.
pub const INTERSECTION_THRESHOLD: f64 = 10.0;

/// Container for the Kansky measures of one network.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KanskyIndices {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    /// Mean edge length in meters.
    pub eta: f64,
    pub n_nodes: usize,
    pub n_edges: usize,
    pub n_circuits: usize,
}

impl KanskyIndices {
    fn degenerate() -> Self {
        Self {
            alpha: 0.0,
            beta: 0.0,
            gamma: 0.0,
            eta: 0.0,
            n_nodes: 0,
            n_edges: 0,
            n_circuits: 0,
        }
    }
}

/// Cluster polyline vertices into nodes and emit one undirected edge per
/// consecutive vertex pair. Returns (nodes, edges, edge lengths).
pub fn road_network_to_graph(
    roads: &[Vec<Point>],
    intersection_threshold: f64,
) -> (Vec<Point>, Vec<(usize, usize)>, Vec<f64>) {
    let mut nodes: Vec<Point> = Vec::new();

    let mut node_of = |point: Point, nodes: &mut Vec<Point>| -> usize {
        for (i, existing) in nodes.iter().enumerate() {
            if point.distance(*existing) < intersection_threshold {
                return i;
            }
        }
        nodes.push(point);
        nodes.len() - 1
    };

    let mut edges: Vec<(usize, usize)> = Vec::new();
    let mut lengths: Vec<f64> = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for road in roads {
        if road.len() < 2 {
            continue;
        }
        for pair in road.windows(2) {
            let a = node_of(pair[0], &mut nodes);
            let b = node_of(pair[1], &mut nodes);
            if a == b {
                continue;
            }
            let key = (a.min(b), a.max(b));
            if seen.insert(key) {
                edges.push(key);
                lengths.push(pair[0].distance(pair[1]));
            }
        }
    }

    (nodes, edges, lengths)
}

/// Compute the Kansky indices of a node/edge graph.
pub fn kansky_indices(
    nodes: &[Point],
    edges: &[(usize, usize)],
    edge_lengths: &[f64],
) -> KanskyIndices {
    let n_nodes = nodes.len();
    let n_edges = edges.len();
    if n_nodes == 0 || n_edges == 0 {
        return KanskyIndices::degenerate();
    }

    let n_circuits = n_edges.saturating_sub(n_nodes - 1);

    let max_circuits = (2 * n_nodes).saturating_sub(5).max(1);
    let alpha = (n_circuits as f64 / max_circuits as f64).clamp(0.0, 1.0);

    let beta = n_edges as f64 / n_nodes as f64;

    let max_planar_edges = (3 * n_nodes.saturating_sub(2)).max(1);
    let gamma = (n_edges as f64 / max_planar_edges as f64).clamp(0.0, 1.0);

    let eta = if edge_lengths.is_empty() {
        0.0
    } else {
        edge_lengths.iter().sum::<f64>() / edge_lengths.len() as f64
    };

    KanskyIndices {
        alpha,
        beta,
        gamma,
        eta,
        n_nodes,
        n_edges,
        n_circuits,
    }
}

/// Aggregate the indices into a single quality score in [0, 1]:
/// `0.4·γ + 0.3·α + 0.3·min(β/3, 1)`.
pub fn quality_score(indices: &KanskyIndices) -> f64 {
    let beta_normalized = (indices.beta / 3.0).min(1.0);
    (0.4 * indices.gamma + 0.3 * indices.alpha + 0.3 * beta_normalized).clamp(0.0, 1.0)
}

/// Fraction of placed buildings farther than `max_distance` from every road
/// segment. An empty network leaves every building disconnected.
pub fn disconnected_fraction(
    buildings: &[Building],
    solution: &Solution,
    roads: &[Vec<Point>],
    max_distance: f64,
) -> f64 {
    let placed: Vec<Point> = buildings
        .iter()
        .filter_map(|b| solution.position(&b.id))
        .collect();
    if placed.is_empty() {
        return 0.0;
    }
    if roads.iter().all(|r| r.len() < 2) {
        return 1.0;
    }

    let disconnected = placed
        .iter()
        .filter(|p| {
            let nearest = roads
                .iter()
                .flat_map(|road| road.windows(2))
                .map(|seg| point_segment_distance(**p, seg[0], seg[1]))
                .fold(f64::INFINITY, f64::min);
            nearest > max_distance
        })
        .count();

    disconnected as f64 / placed.len() as f64
}
