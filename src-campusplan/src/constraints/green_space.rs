//! Green-space constraint: minimum unbuilt fraction of the site.

use campusplan_model::Solution;

use crate::constraints::coverage::coverage_ratio;
use crate::constraints::{ConstraintParamError, SpatialConstraint};
use crate::fitness::EvalContext;

/// `1 − coverage ≥ min_ratio`. The penalty is the deficiency relative to the
/// requirement, reaching 1.0 when nothing green is left.
#[derive(Debug, Clone, Copy)]
pub struct GreenSpaceConstraint {
    min_ratio: f64,
}

impl GreenSpaceConstraint {
    pub fn new(min_ratio: f64) -> Result<Self, ConstraintParamError> {
        if !(0.0..=1.0).contains(&min_ratio) {
            return Err(ConstraintParamError::GreenRatioOutOfRange(min_ratio));
        }
        Ok(Self { min_ratio })
    }

    pub fn min_ratio(&self) -> f64 {
        self.min_ratio
    }
}

impl SpatialConstraint for GreenSpaceConstraint {
    fn penalty(&self, solution: &Solution, ctx: &EvalContext) -> f64 {
        if self.min_ratio == 0.0 {
            return 0.0;
        }
        let green = 1.0 - coverage_ratio(solution, ctx);
        if green >= self.min_ratio {
            return 0.0;
        }
        if green <= 0.0 {
            return 1.0;
        }
        ((self.min_ratio - green) / self.min_ratio).min(1.0)
    }

    fn description(&self) -> String {
        format!("Green space ratio >= {:.0}%", self.min_ratio * 100.0)
    }
}
