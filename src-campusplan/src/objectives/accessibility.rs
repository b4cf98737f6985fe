//! Accessibility objective (2SFCA)
//!
//! Wraps the two-step floating catchment area metric: service buildings
//! supply capacity, residential and teaching buildings demand it, and the
//! objective rewards layouts whose demand points can reach well-provisioned
//! services within the catchment radius.

use campusplan_model::Solution;

use crate::fitness::EvalContext;
use crate::metrics::accessibility::{DecayFunction, TwoStepFca, catchment_points};
use crate::objectives::Objective;

/// Mean accessibility that maps to a full score.
const REFERENCE_ACCESSIBILITY: f64 = 2.0;

#[derive(Debug, Clone, Copy)]
pub struct AccessibilityObjective {
    fca: TwoStepFca,
}

impl AccessibilityObjective {
    pub fn new(catchment_radius: f64, decay: DecayFunction) -> Self {
        Self {
            fca: TwoStepFca::new(catchment_radius, decay),
        }
    }

    pub fn catchment_radius(&self) -> f64 {
        self.fca.catchment_radius
    }
}

impl Default for AccessibilityObjective {
    fn default() -> Self {
        Self {
            fca: TwoStepFca::default(),
        }
    }
}

impl Objective for AccessibilityObjective {
    fn name(&self) -> &'static str {
        "accessibility"
    }

    fn score(&self, solution: &Solution, ctx: &EvalContext) -> f64 {
        let (services, demands) = catchment_points(ctx.buildings, solution);
        if demands.is_empty() {
            return 0.0;
        }
        let scores = self.fca.calculate(&services, &demands);
        let mean = scores.values().sum::<f64>() / scores.len() as f64;
        (mean / REFERENCE_ACCESSIBILITY).clamp(0.0, 1.0)
    }
}
