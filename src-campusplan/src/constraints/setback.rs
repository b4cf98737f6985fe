//! Setback constraint: building disks must keep a minimum distance from the
//! site boundary.

use campusplan_model::Solution;

use crate::constraints::{ConstraintParamError, SpatialConstraint};
use crate::fitness::EvalContext;

/// Every building's disk must lie inside the boundary eroded by the setback
/// distance. The penalty is the worst per-building shortfall
/// `(required − actual + radius)`, normalized by the setback distance and
/// clamped to [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct SetbackConstraint {
    distance: f64,
}

impl SetbackConstraint {
    pub fn new(distance: f64) -> Result<Self, ConstraintParamError> {
        if !(distance >= 0.0) {
            return Err(ConstraintParamError::NegativeSetback(distance));
        }
        Ok(Self { distance })
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl SpatialConstraint for SetbackConstraint {
    fn penalty(&self, solution: &Solution, ctx: &EvalContext) -> f64 {
        if self.distance == 0.0 {
            return 0.0;
        }

        let bounds = ctx.bounds;
        let mut worst: f64 = 0.0;

        for building in ctx.buildings {
            let Some(p) = solution.position(&building.id) else {
                continue;
            };
            let radius = building.radius();

            // A center outside the site polygon counts as a full shortfall.
            if let Some(site) = ctx.site {
                if !site.contains(p) {
                    worst = worst.max(((self.distance + radius) / self.distance).min(1.0));
                    continue;
                }
            }

            let boundary_distance = (p.x - bounds.x_min)
                .min(bounds.x_max - p.x)
                .min(p.y - bounds.y_min)
                .min(bounds.y_max - p.y);

            if boundary_distance < self.distance + radius {
                let shortfall = self.distance - boundary_distance + radius;
                worst = worst.max((shortfall / self.distance).clamp(0.0, 1.0));
            }
        }

        worst
    }

    fn description(&self) -> String {
        format!("Setback from boundary: {}m", self.distance)
    }
}
