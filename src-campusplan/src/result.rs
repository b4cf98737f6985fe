//! Typed optimization result record
//!
//! The JSON shape written by the CLI and returned by
//! [`crate::workflow::run_optimization`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use campusplan_hsaga::{ConvergenceHistory, RunStats, StopReason};
use campusplan_model::{Point, Solution};

/// A solution flattened for serialization: positions in stable id order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionRecord {
    pub positions: BTreeMap<String, Point>,
    pub fitness: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub objectives: BTreeMap<String, f64>,
}

impl SolutionRecord {
    pub fn from_solution(solution: &Solution) -> Self {
        Self {
            positions: solution
                .positions()
                .iter()
                .map(|(id, p)| (id.clone(), *p))
                .collect(),
            fitness: solution.fitness,
            objectives: solution.objectives.clone(),
        }
    }
}

/// Constraint evaluation of the best layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintReport {
    pub satisfied: bool,
    /// Total penalty before the evaluator's cap.
    pub penalty: f64,
    /// Violated constraints keyed by description.
    pub violations: BTreeMap<String, f64>,
}

/// Complete result of one optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub best: SolutionRecord,
    pub finalists: Vec<SolutionRecord>,
    pub stats: RunStats,
    pub convergence: ConvergenceHistory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint_report: Option<ConstraintReport>,
    pub stop_reason: StopReason,
}
