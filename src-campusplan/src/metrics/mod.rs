//! Spatial analysis metrics
//!
//! Pure measurement code consumed by the objective library: two-step
//! floating catchment area accessibility and Kansky road-network indices.

pub mod accessibility;
pub mod connectivity;

pub use accessibility::{
    DecayFunction, DemandPoint, ServicePoint, TwoStepFca, catchment_points, is_demand_type,
    is_service_type, population_density,
};
pub use connectivity::{
    KanskyIndices, disconnected_fraction, kansky_indices, quality_score, road_network_to_graph,
};
