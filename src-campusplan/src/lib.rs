#![doc = include_str!("../README.md")]

// Re-export workspace crates
pub use campusplan_env as env;
pub use campusplan_hsaga as hsaga;
pub use campusplan_model as model;

/// Common CLI argument definitions shared across binaries
pub mod cli;
/// Spatial constraints and the constraint manager
pub mod constraints;
/// Weighted multi-objective fitness evaluation
pub mod fitness;
/// Spatial analysis metrics (2SFCA accessibility, Kansky connectivity)
pub mod metrics;
/// Objective functions scoring candidate layouts
pub mod objectives;
/// Typed optimization request record
pub mod request;
/// Typed optimization result record
pub mod result;
/// Request assembly and the end-to-end optimization pipeline
pub mod workflow;

// Re-export commonly used items
pub use constraints::{
    ConstraintManager, ConstraintParamError, CoverageConstraint, FloorAreaRatioConstraint,
    GreenSpaceConstraint, SetbackConstraint, SpatialConstraint,
};
pub use fitness::{EvalContext, FitnessEvaluator, MAX_PENALTY_FACTOR};
pub use objectives::{Objective, ObjectiveKind};
pub use request::{ConstraintSpec, OptimizationRequest, RequestError};
pub use result::{ConstraintReport, OptimizationResult, SolutionRecord};
pub use workflow::run_optimization;
