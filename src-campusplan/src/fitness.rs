//! CampusPlan - campus spatial-planning optimization
//! Weighted multi-objective fitness evaluation
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

use std::sync::atomic::{AtomicUsize, Ordering};

use campusplan_hsaga::Evaluate;
use campusplan_model::{Bounds, Building, SiteBoundary, Solution};

use crate::constraints::ConstraintManager;
use crate::objectives::Objective;
use crate::result::ConstraintReport;

/// Constraint penalties reduce fitness by at most this factor. Layouts are
/// penalized, never rejected; callers wanting hard feasibility must filter
/// results themselves.
pub const MAX_PENALTY_FACTOR: f64 = 0.5;

/// Read-only context handed to objectives and constraints.
pub struct EvalContext<'a> {
    pub buildings: &'a [Building],
    pub bounds: Bounds,
    pub site: Option<&'a dyn SiteBoundary>,
}

/// Aggregates the enabled objectives and constraint penalties into a single
/// scalar in [0, 1], caching the result in the solution.
///
/// Thread-safe by construction: evaluation takes `&self` and mutates nothing
/// except the passed solution's cached fields and an internal counter, so one
/// evaluator can serve every SA chain at once.
pub struct FitnessEvaluator {
    buildings: Vec<Building>,
    bounds: Bounds,
    site: Option<Box<dyn SiteBoundary>>,
    objectives: Vec<(f64, Box<dyn Objective>)>,
    constraints: Option<ConstraintManager>,
    evaluations: AtomicUsize,
}

impl FitnessEvaluator {
    pub fn new(buildings: Vec<Building>, bounds: Bounds) -> Self {
        Self {
            buildings,
            bounds,
            site: None,
            objectives: Vec::new(),
            constraints: None,
            evaluations: AtomicUsize::new(0),
        }
    }

    /// Add an objective with a non-negative weight. Weights are normalized
    /// over their sum at evaluation time.
    pub fn with_objective(mut self, weight: f64, objective: Box<dyn Objective>) -> Self {
        self.objectives.push((weight.max(0.0), objective));
        self
    }

    pub fn with_constraints(mut self, constraints: ConstraintManager) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn with_site(mut self, site: Box<dyn SiteBoundary>) -> Self {
        self.site = Some(site);
        self
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Total weight over the enabled objectives.
    pub fn total_weight(&self) -> f64 {
        self.objectives.iter().map(|(w, _)| w).sum()
    }

    /// Evaluations performed since construction.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    fn context(&self) -> EvalContext<'_> {
        EvalContext {
            buildings: &self.buildings,
            bounds: self.bounds,
            site: self.site.as_deref(),
        }
    }

    /// Constraint report for a finished layout, if constraints are configured.
    pub fn constraint_report(&self, solution: &Solution) -> Option<ConstraintReport> {
        let manager = self.constraints.as_ref()?;
        let ctx = self.context();
        Some(ConstraintReport {
            satisfied: manager.check_all(solution, &ctx),
            penalty: manager.total_penalty(solution, &ctx),
            violations: manager.violations(solution, &ctx),
        })
    }
}

impl Evaluate for FitnessEvaluator {
    fn evaluate(&self, solution: &mut Solution) -> f64 {
        if let Some(cached) = solution.fitness {
            return cached;
        }

        let ctx = self.context();

        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for (weight, objective) in &self.objectives {
            let raw = objective.score(solution, &ctx);
            let score = if raw.is_finite() {
                raw.clamp(0.0, 1.0)
            } else {
                log::warn!(
                    "objective {} returned a non-finite score; treating as 0",
                    objective.name()
                );
                0.0
            };
            solution.objectives.insert(objective.name().to_string(), score);
            weighted += weight * score;
            total_weight += weight;
        }
        let base = if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        };

        let penalty = self
            .constraints
            .as_ref()
            .map(|m| m.total_penalty(solution, &ctx))
            .unwrap_or(0.0);
        let penalty_factor = penalty.min(MAX_PENALTY_FACTOR);

        let fitness = base * (1.0 - penalty_factor);
        solution.fitness = Some(fitness);
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        fitness
    }
}
