//! Request assembly and the end-to-end optimization pipeline
//!
//! This module turns a typed request into a configured evaluator and
//! optimizer, runs both stages, and folds everything into the result record.

use std::time::{Duration, Instant};

use campusplan_hsaga::{HybridOptimizer, ProgressObserver};
use campusplan_model::{AdjacencyWeights, Polygon};

use crate::fitness::FitnessEvaluator;
use crate::objectives::{
    AccessibilityObjective, AdjacencyObjective, ConnectivityObjective, CostObjective, Objective,
    ObjectiveKind, WalkingObjective,
};
use crate::constraints::ConstraintManager;
use crate::request::{AccessibilitySection, OptimizationRequest, RequestError};
use crate::result::{OptimizationResult, SolutionRecord};

/// Build the fitness evaluator a request describes.
pub fn build_evaluator(request: &OptimizationRequest) -> Result<FitnessEvaluator, RequestError> {
    request.validate()?;

    let mut evaluator = FitnessEvaluator::new(request.buildings.clone(), request.bounds);

    if let Some(vertices) = &request.site_polygon {
        evaluator = evaluator.with_site(Box::new(Polygon::new(vertices.clone())?));
    }

    let weights = match &request.adjacency_weights {
        Some(entries) => {
            let mut table = AdjacencyWeights::default();
            for entry in entries {
                table.insert(entry.a, entry.b, entry.weight);
            }
            table
        }
        None => AdjacencyWeights::default(),
    };

    for (kind, weight) in &request.objectives {
        let objective: Box<dyn Objective> = match kind {
            ObjectiveKind::Cost => {
                let mut cost =
                    CostObjective::new(request.cost_model(), &request.buildings);
                if let Some(reference) = request.cost.as_ref().and_then(|c| c.reference_total) {
                    cost = cost.with_reference(reference);
                }
                Box::new(cost)
            }
            ObjectiveKind::Adjacency => Box::new(AdjacencyObjective::new(weights.clone())),
            ObjectiveKind::Accessibility => {
                let section = request.accessibility.clone().unwrap_or_default();
                let AccessibilitySection {
                    catchment_radius,
                    decay,
                } = section;
                Box::new(AccessibilityObjective::new(catchment_radius, decay))
            }
            ObjectiveKind::Walking => Box::new(WalkingObjective),
            ObjectiveKind::Connectivity => match &request.roads {
                Some(roads) => Box::new(ConnectivityObjective::with_roads(roads.clone())),
                None => Box::new(ConnectivityObjective::unconfigured()),
            },
        };
        evaluator = evaluator.with_objective(*weight, objective);
    }

    if !request.constraints.is_empty() {
        let mut manager = ConstraintManager::new();
        for spec in &request.constraints {
            manager.add_boxed(spec.build()?);
        }
        evaluator = evaluator.with_constraints(manager);
    }

    Ok(evaluator)
}

/// Run a full optimization for the request and assemble the result record.
pub fn run_optimization(
    request: &OptimizationRequest,
    observer: &dyn ProgressObserver,
) -> Result<OptimizationResult, RequestError> {
    let evaluator = build_evaluator(request)?;

    let mut optimizer =
        HybridOptimizer::new(&evaluator, evaluator.buildings(), evaluator.bounds())
            .with_observer(observer);
    if let Some(sa) = &request.sa {
        optimizer = optimizer.with_sa_config(sa.clone());
    }
    if let Some(ga) = &request.ga {
        optimizer = optimizer.with_ga_config(ga.clone());
    }
    if let Some(seed) = request.seed {
        optimizer = optimizer.with_seed(seed);
    }
    if let Some(secs) = request.deadline_secs {
        optimizer =
            optimizer.with_deadline(Instant::now() + Duration::from_secs_f64(secs.max(0.0)));
    }

    let report = optimizer.run()?;
    let constraint_report = evaluator.constraint_report(&report.best);

    log::info!(
        "optimization finished: fitness={:.4}, {} evaluations in {:.2}s",
        report.best.fitness_key(),
        report.stats.evaluations,
        report.stats.runtime
    );

    Ok(OptimizationResult {
        best: SolutionRecord::from_solution(&report.best),
        finalists: report
            .finalists
            .iter()
            .map(SolutionRecord::from_solution)
            .collect(),
        stats: report.stats,
        convergence: report.convergence,
        constraint_report,
        stop_reason: report.stop_reason,
    })
}
