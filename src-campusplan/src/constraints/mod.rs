//! CampusPlan - campus spatial-planning optimization
//! Spatial constraints and the constraint manager
//!
//! Copyright (C) 2026 CampusPlan contributors
//!
//! This program is free software: you can redistribute it and/or modify
//! it under the terms of the GNU General Public License as published by
//! the Free Software Foundation, either version 3 of the License, or
//! (at your option) any later version.
//!
//! This program is distributed in the hope that it will be useful,
//! but WITHOUT ANY WARRANTY; without even the implied warranty of
//! MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//! GNU General Public License for more details.
//!
//! You should have received a copy of the GNU General Public License
//! along with this program.  If not, see <https://www.gnu.org/licenses/>.
//!
//! A constraint is a soft rule: `check` says whether a layout satisfies it
//! and `penalty` grades the violation in [0, 1], with `check == true` exactly
//! when `penalty == 0`. Violations never abort the search; the evaluator
//! folds the summed penalties into the fitness.

use std::collections::BTreeMap;

use campusplan_model::Solution;

use crate::fitness::EvalContext;

pub mod coverage;
pub mod floor_area;
pub mod green_space;
pub mod setback;

pub use coverage::{CoverageConstraint, coverage_ratio};
pub use floor_area::FloorAreaRatioConstraint;
pub use green_space::GreenSpaceConstraint;
pub use setback::SetbackConstraint;

/// Errors raised when a constraint is built with out-of-range parameters.
#[derive(Debug, thiserror::Error)]
pub enum ConstraintParamError {
    #[error("setback distance must be >= 0, got {0}")]
    NegativeSetback(f64),

    #[error("max coverage ratio must be in (0, 1], got {0}")]
    CoverageRatioOutOfRange(f64),

    #[error("max floor-area ratio must be > 0, got {0}")]
    FarOutOfRange(f64),

    #[error("min green-space ratio must be in [0, 1], got {0}")]
    GreenRatioOutOfRange(f64),
}

/// A spatial rule over a candidate layout.
pub trait SpatialConstraint: Send + Sync {
    /// Whether the layout satisfies the rule.
    fn check(&self, solution: &Solution, ctx: &EvalContext) -> bool {
        self.penalty(solution, ctx) == 0.0
    }

    /// Violation severity in [0, 1]; zero iff satisfied.
    fn penalty(&self, solution: &Solution, ctx: &EvalContext) -> f64;

    /// Human-readable description used as the key in violation maps.
    fn description(&self) -> String;
}

/// Ordered collection of constraints with aggregate queries.
#[derive(Default)]
pub struct ConstraintManager {
    constraints: Vec<Box<dyn SpatialConstraint>>,
}

impl ConstraintManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, constraint: impl SpatialConstraint + 'static) -> &mut Self {
        self.constraints.push(Box::new(constraint));
        self
    }

    pub fn add_boxed(&mut self, constraint: Box<dyn SpatialConstraint>) -> &mut Self {
        self.constraints.push(constraint);
        self
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Whether every constraint is satisfied.
    pub fn check_all(&self, solution: &Solution, ctx: &EvalContext) -> bool {
        self.constraints.iter().all(|c| c.check(solution, ctx))
    }

    /// Sum of all penalties (not clamped; the evaluator caps it).
    pub fn total_penalty(&self, solution: &Solution, ctx: &EvalContext) -> f64 {
        self.constraints.iter().map(|c| c.penalty(solution, ctx)).sum()
    }

    /// Violated constraints keyed by description, with their penalties.
    pub fn violations(&self, solution: &Solution, ctx: &EvalContext) -> BTreeMap<String, f64> {
        self.constraints
            .iter()
            .filter_map(|c| {
                let penalty = c.penalty(solution, ctx);
                (penalty > 0.0).then(|| (c.description(), penalty))
            })
            .collect()
    }
}

impl std::fmt::Debug for ConstraintManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintManager")
            .field("constraints", &self.constraints.len())
            .finish()
    }
}
