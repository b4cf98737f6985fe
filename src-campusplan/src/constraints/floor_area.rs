//! Floor-area-ratio constraint: total floor area over site area.

use campusplan_model::Solution;

use crate::constraints::{ConstraintParamError, SpatialConstraint};
use crate::fitness::EvalContext;

/// `Σ area / site_area ≤ max_far`, with the same penalty shape as the
/// coverage constraint: excess over the limit, saturating at twice the limit.
#[derive(Debug, Clone, Copy)]
pub struct FloorAreaRatioConstraint {
    max_far: f64,
}

impl FloorAreaRatioConstraint {
    pub fn new(max_far: f64) -> Result<Self, ConstraintParamError> {
        if !(max_far > 0.0) {
            return Err(ConstraintParamError::FarOutOfRange(max_far));
        }
        Ok(Self { max_far })
    }

    pub fn max_far(&self) -> f64 {
        self.max_far
    }

    fn far(&self, solution: &Solution, ctx: &EvalContext) -> f64 {
        let site_area = ctx.bounds.area();
        if site_area <= 0.0 {
            return 0.0;
        }
        let total_area: f64 = ctx
            .buildings
            .iter()
            .filter(|b| solution.contains(&b.id))
            .map(|b| b.area)
            .sum();
        total_area / site_area
    }
}

impl SpatialConstraint for FloorAreaRatioConstraint {
    fn penalty(&self, solution: &Solution, ctx: &EvalContext) -> f64 {
        let far = self.far(solution, ctx);
        if far <= self.max_far {
            return 0.0;
        }
        ((far - self.max_far) / self.max_far).min(1.0)
    }

    fn description(&self) -> String {
        format!("Floor-area ratio <= {}", self.max_far)
    }
}
