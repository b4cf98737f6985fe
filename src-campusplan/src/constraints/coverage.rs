//! Coverage-ratio constraint: total footprint over site area.

use campusplan_model::Solution;

use crate::constraints::{ConstraintParamError, SpatialConstraint};
use crate::fitness::EvalContext;

/// Footprint of the placed buildings over the site area.
pub fn coverage_ratio(solution: &Solution, ctx: &EvalContext) -> f64 {
    let site_area = ctx.bounds.area();
    if site_area <= 0.0 {
        return 0.0;
    }
    let total_footprint: f64 = ctx
        .buildings
        .iter()
        .filter(|b| solution.contains(&b.id))
        .map(|b| b.footprint())
        .sum();
    total_footprint / site_area
}

/// `Σ footprint / site_area ≤ max_ratio`. The penalty is the excess fraction
/// `(ratio − max) / max`, reaching 1.0 at twice the limit.
#[derive(Debug, Clone, Copy)]
pub struct CoverageConstraint {
    max_ratio: f64,
}

impl CoverageConstraint {
    pub fn new(max_ratio: f64) -> Result<Self, ConstraintParamError> {
        if !(max_ratio > 0.0 && max_ratio <= 1.0) {
            return Err(ConstraintParamError::CoverageRatioOutOfRange(max_ratio));
        }
        Ok(Self { max_ratio })
    }

    pub fn max_ratio(&self) -> f64 {
        self.max_ratio
    }
}

impl SpatialConstraint for CoverageConstraint {
    fn penalty(&self, solution: &Solution, ctx: &EvalContext) -> f64 {
        let ratio = coverage_ratio(solution, ctx);
        if ratio <= self.max_ratio {
            return 0.0;
        }
        ((ratio - self.max_ratio) / self.max_ratio).min(1.0)
    }

    fn description(&self) -> String {
        format!("Coverage ratio <= {:.0}%", self.max_ratio * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusplan_model::{Building, BuildingType, Bounds, Point};

    /// Buildings whose footprints sum to the given total, placed anywhere.
    fn fixture(total_footprint: f64) -> (Vec<Building>, Solution) {
        let buildings = vec![
            Building::new("a", BuildingType::Educational, total_footprint / 2.0, 1).unwrap(),
            Building::new("b", BuildingType::Residential, total_footprint / 2.0, 1).unwrap(),
        ];
        let mut solution = Solution::with_capacity(2);
        solution.set_position("a", Point::new(100.0, 100.0));
        solution.set_position("b", Point::new(200.0, 200.0));
        (buildings, solution)
    }

    fn site_100k() -> Bounds {
        // 400 x 250 m, area exactly 100,000 m².
        Bounds::new(0.0, 0.0, 400.0, 250.0).unwrap()
    }

    #[test]
    fn test_excess_coverage_penalty() {
        // Footprint 40,000 m² on 100,000 m² with a 0.3 cap: coverage 0.4,
        // penalty (0.4 - 0.3) / 0.3 = 1/3.
        let (buildings, solution) = fixture(40_000.0);
        let bounds = site_100k();
        let ctx = EvalContext {
            buildings: &buildings,
            bounds,
            site: None,
        };
        let constraint = CoverageConstraint::new(0.3).unwrap();

        assert!(!constraint.check(&solution, &ctx));
        let penalty = constraint.penalty(&solution, &ctx);
        assert!((penalty - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_penalty_boundaries() {
        let bounds = site_100k();
        let constraint = CoverageConstraint::new(0.3).unwrap();

        // Exactly at the cap: zero.
        let (buildings, solution) = fixture(30_000.0);
        let ctx = EvalContext {
            buildings: &buildings,
            bounds,
            site: None,
        };
        assert_eq!(constraint.penalty(&solution, &ctx), 0.0);
        assert!(constraint.check(&solution, &ctx));

        // At twice the cap: exactly one.
        let (buildings, solution) = fixture(60_000.0);
        let ctx = EvalContext {
            buildings: &buildings,
            bounds,
            site: None,
        };
        assert_eq!(constraint.penalty(&solution, &ctx), 1.0);

        // Beyond twice the cap: clamped.
        let (buildings, solution) = fixture(90_000.0);
        let ctx = EvalContext {
            buildings: &buildings,
            bounds,
            site: None,
        };
        assert_eq!(constraint.penalty(&solution, &ctx), 1.0);
    }

    #[test]
    fn test_unplaced_buildings_do_not_count() {
        let (buildings, _) = fixture(60_000.0);
        let bounds = site_100k();
        let ctx = EvalContext {
            buildings: &buildings,
            bounds,
            site: None,
        };
        let mut partial = Solution::with_capacity(1);
        partial.set_position("a", Point::new(50.0, 50.0));

        // Only half the footprint placed: coverage 0.3, inside the cap.
        let constraint = CoverageConstraint::new(0.3).unwrap();
        assert_eq!(constraint.penalty(&partial, &ctx), 0.0);
    }

    #[test]
    fn test_parameter_validation() {
        assert!(CoverageConstraint::new(0.0).is_err());
        assert!(CoverageConstraint::new(1.5).is_err());
        assert!(CoverageConstraint::new(1.0).is_ok());
    }
}
