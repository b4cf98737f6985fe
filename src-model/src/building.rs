//! Buildings and their derived geometry
//!
//! A building is immutable input data: the optimizer never changes a
//! building, it only assigns positions to building ids inside solutions.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ModelError, Point};

/// Safety clearance added around building disks when testing overlap, in meters.
pub const DEFAULT_SAFETY_MARGIN: f64 = 5.0;

/// Building type classification.
///
/// Used for adjacency scoring, the cost oracle, and the service/demand
/// partition of the accessibility metric.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    Residential,
    Educational,
    Library,
    Administrative,
    Dining,
    Health,
    Sports,
    Commercial,
    Social,
}

impl BuildingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildingType::Residential => "residential",
            BuildingType::Educational => "educational",
            BuildingType::Library => "library",
            BuildingType::Administrative => "administrative",
            BuildingType::Dining => "dining",
            BuildingType::Health => "health",
            BuildingType::Sports => "sports",
            BuildingType::Commercial => "commercial",
            BuildingType::Social => "social",
        }
    }

    /// Relative importance weight of this building type.
    ///
    /// Health facilities attract the most infrastructure, residential is the
    /// baseline.
    pub fn weight(&self) -> f64 {
        match self {
            BuildingType::Health => 2.5,
            BuildingType::Library => 2.2,
            BuildingType::Commercial => 2.0,
            BuildingType::Dining => 1.8,
            BuildingType::Educational => 1.5,
            BuildingType::Sports => 1.3,
            BuildingType::Social => 1.2,
            BuildingType::Administrative => 1.1,
            BuildingType::Residential => 1.0,
        }
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A building to be placed on the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Stable unique key (e.g. "lib_main").
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BuildingType,
    /// Total floor area in m².
    pub area: f64,
    /// Number of floors, at least 1.
    pub floors: u32,
}

impl Building {
    pub fn new(
        id: impl Into<String>,
        kind: BuildingType,
        area: f64,
        floors: u32,
    ) -> Result<Self, ModelError> {
        let id = id.into();
        if !(area > 0.0) || !area.is_finite() {
            return Err(ModelError::NonPositiveArea { id, area });
        }
        if floors == 0 {
            return Err(ModelError::ZeroFloors { id });
        }
        Ok(Self {
            id,
            kind,
            area,
            floors,
        })
    }

    /// Ground-floor area in m².
    pub fn footprint(&self) -> f64 {
        self.area / self.floors as f64
    }

    /// Radius of the circular footprint approximation, in meters.
    pub fn radius(&self) -> f64 {
        (self.footprint() / PI).sqrt()
    }

    /// Importance weight: `type_weight * sqrt(area)`.
    pub fn importance(&self) -> f64 {
        self.kind.weight() * self.area.sqrt()
    }
}

/// Whether the disks of two placed buildings overlap, including a safety margin.
pub fn overlaps(a: &Building, pa: Point, b: &Building, pb: Point, margin: f64) -> bool {
    pa.distance(pb) < a.radius() + b.radius() + margin
}

/// The canonical ten-building test campus.
pub fn sample_campus() -> Vec<Building> {
    [
        ("lib_main", BuildingType::Library, 5000.0, 3),
        ("dorm_a", BuildingType::Residential, 8000.0, 5),
        ("dorm_b", BuildingType::Residential, 8000.0, 5),
        ("eng_building", BuildingType::Educational, 6000.0, 4),
        ("business_school", BuildingType::Educational, 5500.0, 3),
        ("cafeteria", BuildingType::Dining, 2000.0, 2),
        ("health_center", BuildingType::Health, 3000.0, 2),
        ("admin", BuildingType::Administrative, 4000.0, 3),
        ("gym", BuildingType::Sports, 3500.0, 2),
        ("student_center", BuildingType::Social, 2500.0, 2),
    ]
    .into_iter()
    .map(|(id, kind, area, floors)| {
        Building::new(id, kind, area, floors).expect("sample campus is valid")
    })
    .collect()
}
