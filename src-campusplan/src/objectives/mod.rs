//! CampusPlan - campus spatial-planning optimization
//! Objective functions scoring candidate layouts
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

use std::fmt;

use serde::{Deserialize, Serialize};

use campusplan_model::Solution;

use crate::fitness::EvalContext;

pub mod accessibility;
pub mod adjacency;
pub mod connectivity;
pub mod cost;
pub mod walking;

pub use accessibility::AccessibilityObjective;
pub use adjacency::{AdjacencyObjective, AdjacencyReport, PairReport, adjacency_report};
pub use connectivity::ConnectivityObjective;
pub use cost::CostObjective;
pub use walking::WalkingObjective;

/// An objective scores a candidate layout in [0, 1], higher is better.
///
/// Implementations are pure: they read the solution and the context and
/// mutate nothing, so the evaluator can call them from any chain.
pub trait Objective: Send + Sync {
    /// Stable name used as the key in per-objective breakdowns.
    fn name(&self) -> &'static str;

    /// Score the solution. Must stay within [0, 1] and be finite.
    fn score(&self, solution: &Solution, ctx: &EvalContext) -> f64;
}

/// The closed set of objectives a request can enable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    Cost,
    Adjacency,
    Accessibility,
    Walking,
    Connectivity,
}

impl ObjectiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveKind::Cost => "cost",
            ObjectiveKind::Adjacency => "adjacency",
            ObjectiveKind::Accessibility => "accessibility",
            ObjectiveKind::Walking => "walking",
            ObjectiveKind::Connectivity => "connectivity",
        }
    }
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
