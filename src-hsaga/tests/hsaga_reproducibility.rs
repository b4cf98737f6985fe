mod common;

use common::CenterPull;

use campusplan_hsaga::{ChainExecutor, GaConfigBuilder, HybridOptimizer, SaConfigBuilder};
use campusplan_model::{Bounds, sample_campus};

/// Two sequential runs with the same master seed must be bit-identical.
#[test]
fn same_seed_single_chain_is_bit_identical() {
    let bounds = Bounds::new(0.0, 0.0, 1000.0, 1000.0).unwrap();
    let evaluator = CenterPull { bounds };
    let buildings = sample_campus();

    let sa = SaConfigBuilder::new()
        .num_chains(1)
        .chain_iterations(100)
        .initial_temp(1000.0)
        .cooling_rate(0.95)
        .build();
    let ga = GaConfigBuilder::new()
        .population_size(16)
        .generations(8)
        .build();

    let mut runs = Vec::new();
    for _ in 0..2 {
        let report = HybridOptimizer::new(&evaluator, &buildings, bounds)
            .with_sa_config(sa.clone())
            .with_ga_config(ga.clone())
            .with_seed(42)
            .with_executor(ChainExecutor::Sequential)
            .run()
            .unwrap();
        runs.push(report);
    }

    let (a, b) = (&runs[0], &runs[1]);
    assert_eq!(a.best.fitness, b.best.fitness);
    assert_eq!(a.convergence.sa_best_per_interval, b.convergence.sa_best_per_interval);
    assert_eq!(a.convergence.ga_best_per_generation, b.convergence.ga_best_per_generation);
    assert_eq!(a.convergence.ga_mean_per_generation, b.convergence.ga_mean_per_generation);
    assert_eq!(a.stats.evaluations, b.stats.evaluations);

    for building in &buildings {
        assert_eq!(
            a.best.position(&building.id).unwrap(),
            b.best.position(&building.id).unwrap()
        );
    }
}

/// Different seeds should explore differently (not a strict guarantee, but
/// with this much search the odds of a collision are negligible).
#[test]
fn different_seeds_diverge() {
    let bounds = Bounds::new(0.0, 0.0, 1000.0, 1000.0).unwrap();
    let evaluator = CenterPull { bounds };
    let buildings = sample_campus();

    let sa = SaConfigBuilder::new()
        .num_chains(1)
        .chain_iterations(50)
        .build();
    let ga = GaConfigBuilder::new()
        .population_size(10)
        .generations(3)
        .build();

    let run = |seed: u64| {
        HybridOptimizer::new(&evaluator, &buildings, bounds)
            .with_sa_config(sa.clone())
            .with_ga_config(ga.clone())
            .with_seed(seed)
            .with_executor(ChainExecutor::Sequential)
            .run()
            .unwrap()
    };

    let a = run(1);
    let b = run(2);
    let same_everywhere = buildings.iter().all(|bldg| {
        a.best.position(&bldg.id).unwrap() == b.best.position(&bldg.id).unwrap()
    });
    assert!(!same_everywhere);
}
