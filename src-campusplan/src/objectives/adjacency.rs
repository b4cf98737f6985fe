//! Adjacency objective (quadratic-assignment style)
//!
//! For every unordered pair of placed buildings the layout pays
//! `W(type_a, type_b) · distance`; the mean over pairs is the QAP cost.
//! Satisfaction maps the cost onto [0, 1]: 100 m or less of mean weighted
//! distance is perfect, 1000 m or more is worthless, linear in between.

use serde::{Deserialize, Serialize};

use campusplan_model::{AdjacencyWeights, Building, Solution};

use crate::fitness::EvalContext;
use crate::objectives::Objective;

/// Mean weighted distance at or below which satisfaction is 1.0.
pub const IDEAL_DISTANCE: f64 = 100.0;
/// Mean weighted distance at or above which satisfaction is 0.0.
pub const MAX_DISTANCE: f64 = 1000.0;

/// A high-weight pair farther apart than this is reported as critical.
const CRITICAL_DISTANCE: f64 = 300.0;
/// A high-weight pair at most this far apart is reported as good.
const GOOD_DISTANCE: f64 = 200.0;
/// Pairs with at least this weight participate in the critical/good report.
const STRONG_WEIGHT: f64 = 0.8;

#[derive(Debug, Clone, Default)]
pub struct AdjacencyObjective {
    weights: AdjacencyWeights,
}

impl AdjacencyObjective {
    pub fn new(weights: AdjacencyWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &AdjacencyWeights {
        &self.weights
    }
}

/// Mean of `W(type_i, type_j) · dist(i, j)` over placed pairs.
/// `None` when fewer than two buildings are placed.
pub fn qap_cost(
    solution: &Solution,
    buildings: &[Building],
    weights: &AdjacencyWeights,
) -> Option<f64> {
    let mut total = 0.0;
    let mut pairs = 0usize;

    for (i, a) in buildings.iter().enumerate() {
        let Some(pa) = solution.position(&a.id) else {
            continue;
        };
        for b in &buildings[i + 1..] {
            let Some(pb) = solution.position(&b.id) else {
                continue;
            };
            total += weights.weight(a.kind, b.kind) * pa.distance(pb);
            pairs += 1;
        }
    }

    (pairs > 0).then(|| total / pairs as f64)
}

/// Map a QAP cost to a satisfaction score in [0, 1].
pub fn satisfaction(qap: f64) -> f64 {
    if qap <= IDEAL_DISTANCE {
        1.0
    } else if qap >= MAX_DISTANCE {
        0.0
    } else {
        (1.0 - (qap - IDEAL_DISTANCE) / (MAX_DISTANCE - IDEAL_DISTANCE)).clamp(0.0, 1.0)
    }
}

impl Objective for AdjacencyObjective {
    fn name(&self) -> &'static str {
        "adjacency"
    }

    fn score(&self, solution: &Solution, ctx: &EvalContext) -> f64 {
        match qap_cost(solution, ctx.buildings, &self.weights) {
            Some(qap) => satisfaction(qap),
            None => 1.0,
        }
    }
}

/// One building pair in the explainability report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairReport {
    pub buildings: (String, String),
    pub types: (String, String),
    pub weight: f64,
    pub distance: f64,
    /// `weight * distance`.
    pub cost: f64,
}

/// Adjacency analysis for a finished layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjacencyReport {
    pub qap_cost: f64,
    pub satisfaction: f64,
    pub n_pairs: usize,
    /// Strongly-weighted pairs placed too far apart (weight ≥ 0.8, d > 300 m).
    pub critical_pairs: Vec<PairReport>,
    /// Strongly-weighted pairs placed well (weight ≥ 0.8, d ≤ 200 m).
    pub good_pairs: Vec<PairReport>,
    pub mean_distance: f64,
}

/// Build the pair-level adjacency report for a layout.
pub fn adjacency_report(
    solution: &Solution,
    buildings: &[Building],
    weights: &AdjacencyWeights,
) -> AdjacencyReport {
    let mut pairs: Vec<PairReport> = Vec::new();

    for (i, a) in buildings.iter().enumerate() {
        let Some(pa) = solution.position(&a.id) else {
            continue;
        };
        for b in &buildings[i + 1..] {
            let Some(pb) = solution.position(&b.id) else {
                continue;
            };
            let weight = weights.weight(a.kind, b.kind);
            let distance = pa.distance(pb);
            pairs.push(PairReport {
                buildings: (a.id.clone(), b.id.clone()),
                types: (a.kind.to_string(), b.kind.to_string()),
                weight,
                distance,
                cost: weight * distance,
            });
        }
    }

    // Worst pairs first.
    pairs.sort_by(|x, y| y.cost.partial_cmp(&x.cost).unwrap_or(std::cmp::Ordering::Equal));

    let qap = if pairs.is_empty() {
        0.0
    } else {
        pairs.iter().map(|p| p.cost).sum::<f64>() / pairs.len() as f64
    };
    let mean_distance = if pairs.is_empty() {
        0.0
    } else {
        pairs.iter().map(|p| p.distance).sum::<f64>() / pairs.len() as f64
    };

    let critical_pairs = pairs
        .iter()
        .filter(|p| p.weight >= STRONG_WEIGHT && p.distance > CRITICAL_DISTANCE)
        .cloned()
        .collect();
    let good_pairs = pairs
        .iter()
        .filter(|p| p.weight >= STRONG_WEIGHT && p.distance <= GOOD_DISTANCE)
        .cloned()
        .collect();

    AdjacencyReport {
        qap_cost: qap,
        satisfaction: if pairs.is_empty() { 1.0 } else { satisfaction(qap) },
        n_pairs: pairs.len(),
        critical_pairs,
        good_pairs,
        mean_distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusplan_model::{Bounds, BuildingType, Point};

    fn two_building_fixture() -> (Vec<Building>, Solution) {
        let buildings = vec![
            Building::new("a", BuildingType::Residential, 1000.0, 2).unwrap(),
            Building::new("b", BuildingType::Dining, 500.0, 1).unwrap(),
        ];
        let mut solution = Solution::with_capacity(2);
        solution.set_position("a", Point::new(100.0, 500.0));
        solution.set_position("b", Point::new(300.0, 500.0));
        (buildings, solution)
    }

    #[test]
    fn test_residential_dining_pair_satisfaction() {
        let (buildings, solution) = two_building_fixture();
        let weights = AdjacencyWeights::default();

        // W(residential, dining) = 1.0 at 200 m: qap = 200.
        let qap = qap_cost(&solution, &buildings, &weights).unwrap();
        assert!((qap - 200.0).abs() < 1e-9);

        // 1 - (200 - 100) / 900 = 0.888...
        let score = satisfaction(qap);
        assert!((score - 0.888_888_9).abs() < 1e-6);
    }

    #[test]
    fn test_no_pairs_scores_one() {
        let buildings = vec![Building::new("solo", BuildingType::Library, 1000.0, 1).unwrap()];
        let bounds = Bounds::new(0.0, 0.0, 1000.0, 1000.0).unwrap();
        let ctx = EvalContext {
            buildings: &buildings,
            bounds,
            site: None,
        };
        let mut s = Solution::with_capacity(1);
        s.set_position("solo", Point::new(10.0, 10.0));
        assert_eq!(AdjacencyObjective::default().score(&s, &ctx), 1.0);
    }

    #[test]
    fn test_satisfaction_endpoints() {
        assert_eq!(satisfaction(50.0), 1.0);
        assert_eq!(satisfaction(100.0), 1.0);
        assert_eq!(satisfaction(1000.0), 0.0);
        assert_eq!(satisfaction(2500.0), 0.0);
        assert!((satisfaction(550.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_report_flags_critical_and_good_pairs() {
        let buildings = vec![
            Building::new("dorm", BuildingType::Residential, 2000.0, 2).unwrap(),
            Building::new("dining", BuildingType::Dining, 800.0, 1).unwrap(),
            Building::new("clinic", BuildingType::Health, 900.0, 1).unwrap(),
        ];
        let mut solution = Solution::with_capacity(3);
        solution.set_position("dorm", Point::new(0.0, 0.0));
        // Good: weight 1.0 at 150 m.
        solution.set_position("dining", Point::new(150.0, 0.0));
        // Critical: weight 0.8 at 500 m.
        solution.set_position("clinic", Point::new(0.0, 500.0));

        let report = adjacency_report(&solution, &buildings, &AdjacencyWeights::default());
        assert_eq!(report.n_pairs, 3);
        assert_eq!(report.good_pairs.len(), 1);
        assert_eq!(report.good_pairs[0].buildings.1, "dining");
        assert_eq!(report.critical_pairs.len(), 1);
        assert_eq!(report.critical_pairs[0].buildings.1, "clinic");
        // Worst pair (highest cost) first.
        assert!(report.critical_pairs[0].cost >= report.good_pairs[0].cost);
    }
}
