//! Construction cost objective
//!
//! Total program cost under the cost oracle, min-max normalized against a
//! reference total and inverted so cheaper programs score higher. With a
//! per-type oracle the score does not depend on positions; it keeps the cost
//! dimension visible in the breakdown and lets richer oracles plug in.

use campusplan_model::{Building, CostModel, Solution};

use crate::fitness::EvalContext;
use crate::objectives::Objective;

#[derive(Debug, Clone)]
pub struct CostObjective {
    model: CostModel,
    /// Cost that maps to a score of zero.
    reference_total: f64,
}

impl CostObjective {
    /// Reference defaults to twice the program's cost so the default score
    /// sits mid-scale.
    pub fn new(model: CostModel, buildings: &[Building]) -> Self {
        let reference_total = 2.0 * model.total_cost(buildings);
        Self {
            model,
            reference_total,
        }
    }

    pub fn with_reference(mut self, reference_total: f64) -> Self {
        self.reference_total = reference_total;
        self
    }

    pub fn model(&self) -> &CostModel {
        &self.model
    }
}

impl Objective for CostObjective {
    fn name(&self) -> &'static str {
        "cost"
    }

    fn score(&self, _solution: &Solution, ctx: &EvalContext) -> f64 {
        if self.reference_total <= 0.0 {
            return 0.0;
        }
        let total = self.model.total_cost(ctx.buildings);
        (1.0 - total / self.reference_total).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusplan_model::{Bounds, BuildingType};

    #[test]
    fn test_default_reference_gives_half_score() {
        let buildings = vec![Building::new("d", BuildingType::Dining, 1000.0, 1).unwrap()];
        let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0).unwrap();
        let ctx = EvalContext {
            buildings: &buildings,
            bounds,
            site: None,
        };
        let objective = CostObjective::new(CostModel::default(), &buildings);
        let s = Solution::default();
        assert!((objective.score(&s, &ctx) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_cheaper_than_reference_scores_higher() {
        let buildings = vec![Building::new("d", BuildingType::Dining, 1000.0, 1).unwrap()];
        let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0).unwrap();
        let ctx = EvalContext {
            buildings: &buildings,
            bounds,
            site: None,
        };
        let model = CostModel::default();
        let total = model.total_cost(&buildings);

        let generous = CostObjective::new(model.clone(), &buildings).with_reference(10.0 * total);
        let tight = CostObjective::new(model, &buildings).with_reference(total);

        let s = Solution::default();
        assert!((generous.score(&s, &ctx) - 0.9).abs() < 1e-12);
        assert_eq!(tight.score(&s, &ctx), 0.0);
    }
}
