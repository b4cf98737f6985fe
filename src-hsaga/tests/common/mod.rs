//! Shared toy evaluators for the optimizer integration tests.
#![allow(dead_code)]

use campusplan_hsaga::Evaluate;
use campusplan_model::{Bounds, Solution};

/// Rewards placements close to the site center. Deterministic: sums in
/// sorted-id order so identical runs are bit-identical.
pub struct CenterPull {
    pub bounds: Bounds,
}

impl Evaluate for CenterPull {
    fn evaluate(&self, solution: &mut Solution) -> f64 {
        if let Some(f) = solution.fitness {
            return f;
        }
        let center = self.bounds.center();
        let mut ids: Vec<&String> = solution.positions().keys().collect();
        ids.sort();
        let mean_dist = ids
            .iter()
            .map(|id| solution.position(id).unwrap().distance(center))
            .sum::<f64>()
            / ids.len().max(1) as f64;
        let fitness = (1.0 - mean_dist / (self.bounds.diagonal() / 2.0)).clamp(0.0, 1.0);
        solution.fitness = Some(fitness);
        fitness
    }
}

/// Always panics; exercises the chain-fault paths.
pub struct PanickingEvaluator;

impl Evaluate for PanickingEvaluator {
    fn evaluate(&self, _solution: &mut Solution) -> f64 {
        panic!("evaluator blew up");
    }
}
