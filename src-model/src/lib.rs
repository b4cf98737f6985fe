//! Domain model for campus spatial planning
//!
//! This crate holds the primitive types shared by the optimizer and the
//! quality model: buildings and their derived geometry, the site bounds and
//! boundary oracle, candidate solutions (placement vectors with cached
//! fitness), the adjacency preference table and the construction cost model.
//!
//! Everything here is plain data plus pure helpers; nothing in this crate
//! performs optimization or I/O.

pub mod adjacency;
pub mod building;
pub mod bounds;
pub mod cost;
pub mod geometry;
pub mod solution;

pub use adjacency::{AdjacencyWeights, NEUTRAL_WEIGHT};
pub use bounds::Bounds;
pub use building::{Building, BuildingType, DEFAULT_SAFETY_MARGIN, overlaps, sample_campus};
pub use cost::CostModel;
pub use geometry::{Point, Polygon, SiteBoundary, point_segment_distance};
pub use solution::{Solution, sort_by_fitness_desc};

/// Errors raised while constructing domain values.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("building {id} area must be positive, got {area}")]
    NonPositiveArea { id: String, area: f64 },

    #[error("building {id} must have at least one floor")]
    ZeroFloors { id: String },

    #[error(
        "invalid bounds: ({x_min}, {y_min}, {x_max}, {y_max}) requires x_min < x_max and y_min < y_max"
    )]
    InvalidBounds {
        x_min: f64,
        y_min: f64,
        x_max: f64,
        y_max: f64,
    },

    #[error("polygon needs at least 3 vertices, got {0}")]
    DegeneratePolygon(usize),
}
