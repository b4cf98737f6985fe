//! Construction cost model
//!
//! A per-m² cost oracle keyed by building type, modulated by multiplicative
//! location and quality factors. National cost classification tables stay
//! outside the core; callers override the unit costs when they have real
//! figures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Building, BuildingType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostModel {
    unit_costs: HashMap<BuildingType, f64>,
    pub location_factor: f64,
    pub quality_factor: f64,
}

impl CostModel {
    pub fn new(
        unit_costs: HashMap<BuildingType, f64>,
        location_factor: f64,
        quality_factor: f64,
    ) -> Self {
        Self {
            unit_costs,
            location_factor,
            quality_factor,
        }
    }

    /// Replace the unit cost of a single type.
    pub fn set_unit_cost(&mut self, kind: BuildingType, cost_per_sqm: f64) {
        self.unit_costs.insert(kind, cost_per_sqm);
    }

    /// Base cost per m² for a building type.
    pub fn unit_cost(&self, kind: BuildingType) -> f64 {
        self.unit_costs
            .get(&kind)
            .copied()
            .unwrap_or(DEFAULT_UNIT_COST)
    }

    /// Total cost of one building: `unit * area * location * quality`.
    pub fn building_cost(&self, building: &Building) -> f64 {
        self.unit_cost(building.kind) * building.area * self.location_factor * self.quality_factor
    }

    /// Total cost of a building program.
    pub fn total_cost(&self, buildings: &[Building]) -> f64 {
        buildings.iter().map(|b| self.building_cost(b)).sum()
    }
}

/// Fallback unit cost for types missing from the table.
const DEFAULT_UNIT_COST: f64 = 25_000.0;

impl Default for CostModel {
    /// Stock 2025-vintage unit costs in TL/m², neutral factors.
    fn default() -> Self {
        use BuildingType::*;
        let unit_costs = HashMap::from([
            (Health, 42_000.0),
            (Library, 38_000.0),
            (Commercial, 36_000.0),
            (Dining, 30_000.0),
            (Educational, 28_000.0),
            (Administrative, 27_000.0),
            (Sports, 26_000.0),
            (Social, 24_000.0),
            (Residential, 22_000.0),
        ]);
        Self {
            unit_costs,
            location_factor: 1.0,
            quality_factor: 1.0,
        }
    }
}
