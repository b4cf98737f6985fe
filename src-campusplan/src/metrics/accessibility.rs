//! Two-step floating catchment area (2SFCA)
//!
//! Measures how accessible service buildings (library, dining, health, ...)
//! are to demand buildings (residences, teaching space), accounting for
//! distance decay, service capacity and competition between demand points.
//!
//! Step 1: each service j gets a capacity-to-demand ratio
//! `R_j = S_j / Σ_k P_k · W(d_kj)` over demand within the catchment.
//! Step 2: each demand point i sums the reachable ratios
//! `A_i = Σ_j R_j · W(d_ij)`.

use std::collections::BTreeMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use campusplan_model::{Building, BuildingType, Point, Solution};

/// Default catchment radius: 400 m, roughly a five-minute walk.
pub const DEFAULT_CATCHMENT_RADIUS: f64 = 400.0;

/// Distance decay applied inside the catchment; zero outside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayFunction {
    /// `W = exp(-beta * (d/r)²)`
    Gaussian { beta: f64 },
    /// `W = 1 - d/r`
    Linear,
    /// `W = 1` anywhere inside the catchment
    Step,
}

impl Default for DecayFunction {
    fn default() -> Self {
        DecayFunction::Gaussian { beta: 1.0 }
    }
}

impl DecayFunction {
    pub fn weight(&self, distance: f64, radius: f64) -> f64 {
        if distance > radius {
            return 0.0;
        }
        match *self {
            DecayFunction::Gaussian { beta } => {
                let normalized = distance / radius;
                (-beta * normalized * normalized).exp()
            }
            DecayFunction::Linear => (1.0 - distance / radius).max(0.0),
            DecayFunction::Step => 1.0,
        }
    }
}

/// A service facility.
#[derive(Debug, Clone)]
pub struct ServicePoint {
    pub id: String,
    pub position: Point,
    /// Service capacity; floor area is the stock proxy.
    pub capacity: f64,
    pub kind: BuildingType,
}

/// A demand location.
#[derive(Debug, Clone)]
pub struct DemandPoint {
    pub id: String,
    pub position: Point,
    /// People served at this location.
    pub population: f64,
    pub kind: BuildingType,
}

/// Whether buildings of this type provide a service.
pub fn is_service_type(kind: BuildingType) -> bool {
    matches!(
        kind,
        BuildingType::Library
            | BuildingType::Dining
            | BuildingType::Health
            | BuildingType::Social
            | BuildingType::Sports
    )
}

/// Whether buildings of this type generate demand.
pub fn is_demand_type(kind: BuildingType) -> bool {
    matches!(kind, BuildingType::Residential | BuildingType::Educational)
}

/// Floor area per person used to estimate population from building area.
pub fn population_density(kind: BuildingType) -> f64 {
    match kind {
        BuildingType::Residential => 20.0,
        BuildingType::Educational => 10.0,
        _ => 15.0,
    }
}

/// Partition the placed buildings of a solution into service and demand
/// points. Capacity is the building area; population is area over the
/// per-type density.
pub fn catchment_points(
    buildings: &[Building],
    solution: &Solution,
) -> (Vec<ServicePoint>, Vec<DemandPoint>) {
    let mut services = Vec::new();
    let mut demands = Vec::new();

    for building in buildings {
        let Some(position) = solution.position(&building.id) else {
            continue;
        };
        if is_service_type(building.kind) {
            services.push(ServicePoint {
                id: building.id.clone(),
                position,
                capacity: building.area,
                kind: building.kind,
            });
        }
        if is_demand_type(building.kind) {
            demands.push(DemandPoint {
                id: building.id.clone(),
                position,
                population: building.area / population_density(building.kind),
                kind: building.kind,
            });
        }
    }

    (services, demands)
}

/// Two-step floating catchment area calculator.
#[derive(Debug, Clone, Copy)]
pub struct TwoStepFca {
    pub catchment_radius: f64,
    pub decay: DecayFunction,
}

impl Default for TwoStepFca {
    fn default() -> Self {
        Self {
            catchment_radius: DEFAULT_CATCHMENT_RADIUS,
            decay: DecayFunction::default(),
        }
    }
}

impl TwoStepFca {
    pub fn new(catchment_radius: f64, decay: DecayFunction) -> Self {
        Self {
            catchment_radius,
            decay,
        }
    }

    /// Accessibility score per demand id. Higher is better.
    pub fn calculate(
        &self,
        services: &[ServicePoint],
        demands: &[DemandPoint],
    ) -> BTreeMap<String, f64> {
        if services.is_empty() || demands.is_empty() {
            return demands.iter().map(|d| (d.id.clone(), 0.0)).collect();
        }

        let distances = Array2::from_shape_fn((services.len(), demands.len()), |(j, k)| {
            services[j].position.distance(demands[k].position)
        });

        // Step 1: capacity-to-weighted-demand ratio per service
        let mut ratios = vec![0.0; services.len()];
        for (j, service) in services.iter().enumerate() {
            let mut weighted_demand = 0.0;
            for (k, demand) in demands.iter().enumerate() {
                let d = distances[(j, k)];
                if d <= self.catchment_radius {
                    weighted_demand += demand.population * self.decay.weight(d, self.catchment_radius);
                }
            }
            if weighted_demand > 0.0 {
                ratios[j] = service.capacity / weighted_demand;
            }
        }

        // Step 2: sum reachable ratios per demand point
        let mut scores = BTreeMap::new();
        for (k, demand) in demands.iter().enumerate() {
            let mut accessibility = 0.0;
            for j in 0..services.len() {
                let d = distances[(j, k)];
                if d <= self.catchment_radius {
                    accessibility += ratios[j] * self.decay.weight(d, self.catchment_radius);
                }
            }
            scores.insert(demand.id.clone(), accessibility);
        }
        scores
    }
}
