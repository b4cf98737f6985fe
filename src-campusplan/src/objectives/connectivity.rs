//! Road-network connectivity objective
//!
//! The optimizer does not build roads; a downstream generator does. When the
//! caller supplies that network as polylines this objective scores its
//! topology through the Kansky indices. Without a network the score stays
//! neutral so the remaining objectives drive the search.

use campusplan_model::{Point, Solution};

use crate::fitness::EvalContext;
use crate::metrics::connectivity::{
    INTERSECTION_THRESHOLD, kansky_indices, quality_score, road_network_to_graph,
};
use crate::objectives::Objective;

/// Score when no network was configured.
const NEUTRAL_SCORE: f64 = 0.5;
/// Score when a network was configured but is empty.
const EMPTY_NETWORK_SCORE: f64 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct ConnectivityObjective {
    roads: Option<Vec<Vec<Point>>>,
}

impl ConnectivityObjective {
    /// Objective with no network: always neutral.
    pub fn unconfigured() -> Self {
        Self { roads: None }
    }

    /// Objective scoring the given externally produced polylines.
    pub fn with_roads(roads: Vec<Vec<Point>>) -> Self {
        Self { roads: Some(roads) }
    }
}

impl Objective for ConnectivityObjective {
    fn name(&self) -> &'static str {
        "connectivity"
    }

    fn score(&self, _solution: &Solution, _ctx: &EvalContext) -> f64 {
        let Some(roads) = &self.roads else {
            return NEUTRAL_SCORE;
        };
        if roads.iter().all(|r| r.len() < 2) {
            return EMPTY_NETWORK_SCORE;
        }
        let (nodes, edges, lengths) = road_network_to_graph(roads, INTERSECTION_THRESHOLD);
        quality_score(&kansky_indices(&nodes, &edges, &lengths))
    }
}
