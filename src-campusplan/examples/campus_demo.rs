//! Minimal end-to-end demo: optimize the sample campus and print the result.
//!
//! Run with `cargo run --example campus_demo`.

use campusplan::fitness::FitnessEvaluator;
use campusplan::hsaga::{GaConfigBuilder, HybridOptimizer, SaConfigBuilder};
use campusplan::model::{AdjacencyWeights, Bounds, sample_campus};
use campusplan::objectives::{AdjacencyObjective, WalkingObjective};
use campusplan::{ConstraintManager, SetbackConstraint};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let buildings = sample_campus();
    let bounds = Bounds::new(0.0, 0.0, 1000.0, 1000.0)?;

    let mut constraints = ConstraintManager::new();
    constraints.add(SetbackConstraint::new(20.0)?);

    let evaluator = FitnessEvaluator::new(buildings.clone(), bounds)
        .with_objective(0.6, Box::new(AdjacencyObjective::new(AdjacencyWeights::default())))
        .with_objective(0.4, Box::new(WalkingObjective))
        .with_constraints(constraints);

    let report = HybridOptimizer::new(&evaluator, evaluator.buildings(), bounds)
        .with_sa_config(SaConfigBuilder::new().num_chains(4).chain_iterations(200).build())
        .with_ga_config(GaConfigBuilder::new().population_size(30).generations(20).build())
        .with_seed(42)
        .run()?;

    println!("best fitness: {:.4}", report.best.fitness.unwrap_or(0.0));
    for (name, score) in &report.best.objectives {
        println!("  {name}: {score:.4}");
    }
    for building in &buildings {
        if let Some(p) = report.best.position(&building.id) {
            println!("{:<16} -> ({:7.1}, {:7.1})", building.id, p.x, p.y);
        }
    }
    println!(
        "{} evaluations in {:.2}s ({} SA iterations, {} GA generations)",
        report.stats.evaluations,
        report.stats.runtime,
        report.stats.iterations,
        report.stats.ga_generations
    );

    Ok(())
}
