//! Typed optimization request record
//!
//! Everything a caller can configure arrives through this record; there is no
//! persisted state and no runtime discovery of collaborator capabilities.
//! Absent sections simply mean defaults.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use campusplan_hsaga::{GaConfig, OptimizeError, SaConfig};
use campusplan_model::{Bounds, Building, BuildingType, CostModel, ModelError, Point};

use crate::constraints::{
    ConstraintParamError, CoverageConstraint, FloorAreaRatioConstraint, GreenSpaceConstraint,
    SetbackConstraint, SpatialConstraint,
};
use crate::metrics::accessibility::{DEFAULT_CATCHMENT_RADIUS, DecayFunction};
use crate::objectives::ObjectiveKind;

/// Errors raised while parsing or validating a request, plus everything the
/// optimization itself can raise.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("failed to read request: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse request: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Constraint(#[from] ConstraintParamError),

    #[error("at least one objective must be enabled")]
    EmptyObjectives,

    #[error("objective {objective} has negative weight {weight}")]
    NegativeObjectiveWeight {
        objective: ObjectiveKind,
        weight: f64,
    },

    #[error("objective weights must not all be zero")]
    ZeroObjectiveWeights,

    #[error(transparent)]
    Optimize(#[from] OptimizeError),
}

/// One symmetric adjacency-weight override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjacencyEntry {
    pub a: BuildingType,
    pub b: BuildingType,
    pub weight: f64,
}

fn default_factor() -> f64 {
    1.0
}

/// Cost-oracle overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSection {
    /// Per-type unit cost overrides in currency/m².
    #[serde(default)]
    pub unit_costs: BTreeMap<BuildingType, f64>,
    #[serde(default = "default_factor")]
    pub location_factor: f64,
    #[serde(default = "default_factor")]
    pub quality_factor: f64,
    /// Total cost that maps to a score of zero; defaults to twice the
    /// program's cost.
    #[serde(default)]
    pub reference_total: Option<f64>,
}

/// Accessibility-metric configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessibilitySection {
    #[serde(default = "default_catchment")]
    pub catchment_radius: f64,
    #[serde(default)]
    pub decay: DecayFunction,
}

fn default_catchment() -> f64 {
    DEFAULT_CATCHMENT_RADIUS
}

impl Default for AccessibilitySection {
    fn default() -> Self {
        Self {
            catchment_radius: DEFAULT_CATCHMENT_RADIUS,
            decay: DecayFunction::default(),
        }
    }
}

/// One constraint in the request, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintSpec {
    Setback { distance: f64 },
    Coverage { max_ratio: f64 },
    FloorAreaRatio { max_far: f64 },
    GreenSpace { min_ratio: f64 },
}

impl ConstraintSpec {
    /// Build the constraint, validating its parameters.
    pub fn build(&self) -> Result<Box<dyn SpatialConstraint>, ConstraintParamError> {
        Ok(match *self {
            ConstraintSpec::Setback { distance } => Box::new(SetbackConstraint::new(distance)?),
            ConstraintSpec::Coverage { max_ratio } => Box::new(CoverageConstraint::new(max_ratio)?),
            ConstraintSpec::FloorAreaRatio { max_far } => {
                Box::new(FloorAreaRatioConstraint::new(max_far)?)
            }
            ConstraintSpec::GreenSpace { min_ratio } => {
                Box::new(GreenSpaceConstraint::new(min_ratio)?)
            }
        })
    }
}

/// The full optimization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub buildings: Vec<Building>,
    pub bounds: Bounds,
    /// Optional site polygon; the box stays the primary bounding region.
    #[serde(default)]
    pub site_polygon: Option<Vec<Point>>,
    #[serde(default)]
    pub cost: Option<CostSection>,
    #[serde(default)]
    pub adjacency_weights: Option<Vec<AdjacencyEntry>>,
    #[serde(default)]
    pub accessibility: Option<AccessibilitySection>,
    /// Enabled objectives with their weights.
    pub objectives: BTreeMap<ObjectiveKind, f64>,
    #[serde(default)]
    pub constraints: Vec<ConstraintSpec>,
    /// Externally generated road polylines for the connectivity objective.
    #[serde(default)]
    pub roads: Option<Vec<Vec<Point>>>,
    #[serde(default)]
    pub sa: Option<SaConfig>,
    #[serde(default)]
    pub ga: Option<GaConfig>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub deadline_secs: Option<f64>,
}

impl OptimizationRequest {
    /// Read and parse a request from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, RequestError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Validate everything that can be checked before any work happens.
    pub fn validate(&self) -> Result<(), RequestError> {
        for building in &self.buildings {
            // Re-run the constructor checks on deserialized data.
            Building::new(
                building.id.clone(),
                building.kind,
                building.area,
                building.floors,
            )?;
        }
        self.bounds.validate()?;

        if self.objectives.is_empty() {
            return Err(RequestError::EmptyObjectives);
        }
        for (objective, weight) in &self.objectives {
            if *weight < 0.0 {
                return Err(RequestError::NegativeObjectiveWeight {
                    objective: *objective,
                    weight: *weight,
                });
            }
        }
        if self.objectives.values().sum::<f64>() <= 0.0 {
            return Err(RequestError::ZeroObjectiveWeights);
        }

        for spec in &self.constraints {
            spec.build()?;
        }
        Ok(())
    }

    /// The cost model with this request's overrides applied.
    pub fn cost_model(&self) -> CostModel {
        let mut model = CostModel::default();
        if let Some(section) = &self.cost {
            for (kind, cost) in &section.unit_costs {
                model.set_unit_cost(*kind, *cost);
            }
            model.location_factor = section.location_factor;
            model.quality_factor = section.quality_factor;
        }
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_request_json() -> &'static str {
        r#"{
            "buildings": [
                {"id": "lib", "type": "library", "area": 5000, "floors": 3},
                {"id": "dorm", "type": "residential", "area": 8000, "floors": 5}
            ],
            "bounds": {"x_min": 0, "y_min": 0, "x_max": 1000, "y_max": 1000},
            "objectives": {"adjacency": 0.5, "walking": 0.5}
        }"#
    }

    #[test]
    fn test_minimal_request_parses_and_validates() {
        let request: OptimizationRequest = serde_json::from_str(minimal_request_json()).unwrap();
        assert_eq!(request.buildings.len(), 2);
        assert_eq!(request.buildings[0].kind, BuildingType::Library);
        assert!(request.constraints.is_empty());
        assert!(request.sa.is_none());
        request.validate().unwrap();
    }

    #[test]
    fn test_constraint_specs_parse_with_snake_case_tags() {
        let json = r#"[
            {"setback": {"distance": 10.0}},
            {"coverage": {"max_ratio": 0.3}},
            {"floor_area_ratio": {"max_far": 2.0}},
            {"green_space": {"min_ratio": 0.4}}
        ]"#;
        let specs: Vec<ConstraintSpec> = serde_json::from_str(json).unwrap();
        assert_eq!(specs.len(), 4);
        for spec in &specs {
            spec.build().unwrap();
        }
    }

    #[test]
    fn test_invalid_constraint_parameter_fails_validation() {
        let mut request: OptimizationRequest =
            serde_json::from_str(minimal_request_json()).unwrap();
        request.constraints.push(ConstraintSpec::Coverage { max_ratio: 2.0 });
        assert!(matches!(
            request.validate(),
            Err(RequestError::Constraint(_))
        ));
    }

    #[test]
    fn test_empty_objectives_rejected() {
        let mut request: OptimizationRequest =
            serde_json::from_str(minimal_request_json()).unwrap();
        request.objectives.clear();
        assert!(matches!(request.validate(), Err(RequestError::EmptyObjectives)));
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let mut request: OptimizationRequest =
            serde_json::from_str(minimal_request_json()).unwrap();
        for weight in request.objectives.values_mut() {
            *weight = 0.0;
        }
        assert!(matches!(
            request.validate(),
            Err(RequestError::ZeroObjectiveWeights)
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut request: OptimizationRequest =
            serde_json::from_str(minimal_request_json()).unwrap();
        request.objectives.insert(ObjectiveKind::Cost, -0.1);
        assert!(matches!(
            request.validate(),
            Err(RequestError::NegativeObjectiveWeight { .. })
        ));
    }

    #[test]
    fn test_invalid_building_rejected() {
        let mut request: OptimizationRequest =
            serde_json::from_str(minimal_request_json()).unwrap();
        request.buildings[0].area = -5.0;
        assert!(matches!(request.validate(), Err(RequestError::Model(_))));
    }

    #[test]
    fn test_cost_model_overrides() {
        let mut request: OptimizationRequest =
            serde_json::from_str(minimal_request_json()).unwrap();
        request.cost = Some(CostSection {
            unit_costs: BTreeMap::from([(BuildingType::Library, 50_000.0)]),
            location_factor: 1.3,
            quality_factor: 0.9,
            reference_total: None,
        });
        let model = request.cost_model();
        assert_eq!(model.unit_cost(BuildingType::Library), 50_000.0);
        assert_eq!(model.location_factor, 1.3);
        // Untouched types keep the stock table.
        assert_eq!(
            model.unit_cost(BuildingType::Residential),
            CostModel::default().unit_cost(BuildingType::Residential)
        );
    }

    #[test]
    fn test_request_round_trips_through_json() {
        let request: OptimizationRequest = serde_json::from_str(minimal_request_json()).unwrap();
        let text = serde_json::to_string(&request).unwrap();
        let back: OptimizationRequest = serde_json::from_str(&text).unwrap();
        assert_eq!(back.buildings.len(), request.buildings.len());
        assert_eq!(back.objectives, request.objectives);
    }
}
