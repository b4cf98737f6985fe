//! Genetic-algorithm refinement
//!
//! Stage 2 of the hybrid pipeline: takes the SA finalists as seeds and
//! refines them with tournament selection, uniform position crossover, a
//! composite mutation mix and elitist replacement.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use campusplan_model::{Bounds, Building, Solution, sort_by_fitness_desc};

use crate::observer::{GenerationStats, ProgressObserver};
use crate::operators::{gaussian_move, random_solution, reset_move, swap_move, uniform_crossover};
use crate::selection::tournament;
use crate::{Evaluate, GaConfig, OptimizeError};

/// Sigma of the single gaussian move applied to perturbation-band seeds,
/// equivalent to the SA move at an effective temperature of 50 (T/10).
const SEED_PERTURBATION_SIGMA: f64 = 5.0;

/// How many finalists the refinement returns.
const FINALIST_COUNT: usize = 10;

/// Result of the GA stage.
#[derive(Debug, Clone)]
pub struct GaOutcome {
    /// Final population top, sorted by fitness descending.
    pub finalists: Vec<Solution>,
    pub best_history: Vec<f64>,
    pub mean_history: Vec<f64>,
    pub generations: usize,
    pub evaluations: usize,
}

/// Seed the initial population in three bands: exploitation (copies of the
/// top SA finalists), perturbation (jittered copies of the top five) and
/// diversification (fresh random solutions).
fn initialize_population<R: Rng + ?Sized>(
    sa_finalists: &[Solution],
    buildings: &[Building],
    bounds: Bounds,
    config: &GaConfig,
    rng: &mut R,
) -> Vec<Solution> {
    let pop_size = config.population_size;
    let mut population: Vec<Solution> = Vec::with_capacity(pop_size);

    let n_exploit = (pop_size / 2).min(sa_finalists.len());
    population.extend(sa_finalists.iter().take(n_exploit).cloned());

    let n_perturb = (pop_size as f64 * 0.3) as usize;
    let top = sa_finalists.len().min(5);
    if top > 0 {
        for _ in 0..n_perturb {
            let mut seed = sa_finalists[rng.random_range(0..top)].clone();
            gaussian_move(&mut seed, buildings, bounds, SEED_PERTURBATION_SIGMA, rng);
            population.push(seed);
        }
    }

    while population.len() < pop_size {
        population.push(random_solution(buildings, bounds, rng));
    }

    log::debug!(
        "GA init: {} exploitation, {} perturbation, {} random",
        n_exploit,
        n_perturb.min(pop_size.saturating_sub(n_exploit)),
        pop_size.saturating_sub(n_exploit + n_perturb)
    );

    population
}

/// Run the evolutionary refinement.
pub fn refine<E: Evaluate + ?Sized>(
    evaluator: &E,
    buildings: &[Building],
    bounds: Bounds,
    config: &GaConfig,
    sa_finalists: &[Solution],
    seed: u64,
    deadline: Option<Instant>,
    observer: &dyn ProgressObserver,
) -> Result<GaOutcome, OptimizeError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut evaluations = 0usize;

    let mut population = initialize_population(sa_finalists, buildings, bounds, config, &mut rng);
    for solution in &mut population {
        if solution.fitness.is_none() {
            evaluator.evaluate(solution);
            evaluations += 1;
        }
    }
    sort_by_fitness_desc(&mut population);

    let share_total = config.gaussian_share + config.swap_share + config.reset_share;

    let mut best_history = Vec::with_capacity(config.generations);
    let mut mean_history = Vec::with_capacity(config.generations);
    let mut generations = 0usize;

    for generation in 0..config.generations {
        if let Some(d) = deadline {
            if Instant::now() >= d {
                log::info!("GA stopped at generation {generation}: deadline reached");
                break;
            }
        }

        // Elites survive even a fully degenerate generation.
        let elites: Vec<Solution> = population
            .iter()
            .take(config.elite_size.max(1))
            .cloned()
            .collect();

        // Selection
        let n_parents = config.population_size / 2;
        let parents: Vec<Solution> = (0..n_parents)
            .map(|_| tournament(&population, config.tournament_size, &mut rng).clone())
            .collect();

        // Crossover
        let mut offspring: Vec<Solution> = Vec::with_capacity(parents.len() + 1);
        let mut pairs = parents.chunks_exact(2);
        for pair in &mut pairs {
            let (a, b) = uniform_crossover(
                &pair[0],
                &pair[1],
                buildings,
                config.crossover_rate,
                config.swap_probability,
                &mut rng,
            );
            offspring.push(a);
            offspring.push(b);
        }
        if let [leftover] = pairs.remainder() {
            let mut clone = leftover.clone();
            clone.invalidate();
            offspring.push(clone);
        }

        // Mutation: at most one operator per offspring
        for child in &mut offspring {
            if rng.random::<f64>() < config.mutation_rate {
                let roll = rng.random::<f64>() * share_total;
                if roll < config.gaussian_share {
                    gaussian_move(child, buildings, bounds, config.gaussian_sigma, &mut rng);
                } else if roll < config.gaussian_share + config.swap_share {
                    swap_move(child, buildings, &mut rng);
                } else {
                    reset_move(child, buildings, bounds, &mut rng);
                }
                child.invalidate();
            }
        }

        // Evaluate what the operators invalidated
        for child in &mut offspring {
            if child.fitness.is_none() {
                evaluator.evaluate(child);
                evaluations += 1;
            }
        }

        // Elitist replacement: merge, sort, truncate
        population.extend(offspring);
        sort_by_fitness_desc(&mut population);
        if population[0].fitness.is_none() {
            log::warn!(
                "GA generation {generation}: no evaluable individuals, keeping previous elites"
            );
            population = elites;
            if population.is_empty() || population[0].fitness.is_none() {
                return Err(OptimizeError::NoEvaluableIndividuals);
            }
        } else {
            population.truncate(config.population_size);
        }

        let best_fitness = population[0].fitness_key();
        let evaluated: Vec<f64> = population.iter().filter_map(|s| s.fitness).collect();
        let mean_fitness = evaluated.iter().sum::<f64>() / evaluated.len() as f64;

        best_history.push(best_fitness);
        mean_history.push(mean_fitness);
        generations = generation + 1;

        observer.on_generation(&GenerationStats {
            generation,
            best_fitness,
            mean_fitness,
        });

        if generation % 10 == 0 {
            log::info!(
                "GA gen {generation}/{}: best={best_fitness:.4}, mean={mean_fitness:.4}",
                config.generations
            );
        }
    }

    if population.is_empty() || population[0].fitness.is_none() {
        return Err(OptimizeError::NoEvaluableIndividuals);
    }

    sort_by_fitness_desc(&mut population);
    population.truncate(FINALIST_COUNT);

    Ok(GaOutcome {
        finalists: population,
        best_history,
        mean_history,
        generations,
        evaluations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NullObserver;
    use crate::operators::random_solution;
    use crate::{GaConfigBuilder, SaConfigBuilder};
    use campusplan_model::sample_campus;

    struct CenterPull {
        bounds: Bounds,
    }

    impl Evaluate for CenterPull {
        fn evaluate(&self, solution: &mut Solution) -> f64 {
            if let Some(f) = solution.fitness {
                return f;
            }
            let center = self.bounds.center();
            let mut ids: Vec<&String> = solution.positions().keys().collect();
            ids.sort();
            let mean_dist = ids
                .iter()
                .map(|id| solution.position(id).unwrap().distance(center))
                .sum::<f64>()
                / ids.len().max(1) as f64;
            let fitness = (1.0 - mean_dist / (self.bounds.diagonal() / 2.0)).clamp(0.0, 1.0);
            solution.fitness = Some(fitness);
            fitness
        }
    }

    fn seeds(buildings: &[Building], bounds: Bounds, evaluator: &CenterPull) -> Vec<Solution> {
        let config = SaConfigBuilder::new().chain_iterations(50).build();
        (0..4)
            .map(|i| crate::sa::run_chain(evaluator, buildings, bounds, &config, i, None).best)
            .collect()
    }

    #[test]
    fn test_best_history_is_monotone_under_elitism() {
        let buildings = sample_campus();
        let bounds = Bounds::new(0.0, 0.0, 1000.0, 1000.0).unwrap();
        let evaluator = CenterPull { bounds };
        let sa_finalists = seeds(&buildings, bounds, &evaluator);

        let config = GaConfigBuilder::new()
            .population_size(20)
            .generations(10)
            .crossover_rate(0.0)
            .mutation_rate(1.0)
            .build();

        let outcome = refine(
            &evaluator,
            &buildings,
            bounds,
            &config,
            &sa_finalists,
            42,
            None,
            &NullObserver,
        )
        .unwrap();

        assert_eq!(outcome.best_history.len(), 10);
        for pair in outcome.best_history.windows(2) {
            assert!(pair[1] >= pair[0], "elitism must not lose the best");
        }
    }

    #[test]
    fn test_population_invariants() {
        let buildings = sample_campus();
        let bounds = Bounds::new(0.0, 0.0, 1000.0, 1000.0).unwrap();
        let evaluator = CenterPull { bounds };
        let sa_finalists = seeds(&buildings, bounds, &evaluator);

        let config = GaConfigBuilder::new()
            .population_size(16)
            .generations(8)
            .build();

        let outcome = refine(
            &evaluator,
            &buildings,
            bounds,
            &config,
            &sa_finalists,
            1,
            None,
            &NullObserver,
        )
        .unwrap();

        assert!(!outcome.finalists.is_empty());
        assert!(outcome.finalists.len() <= 10);
        for solution in &outcome.finalists {
            // Exactly one position per input building id, nothing else.
            assert_eq!(solution.len(), buildings.len());
            for building in &buildings {
                let p = solution.position(&building.id).expect("id present");
                assert!(bounds.contains(p));
            }
            let f = solution.fitness.expect("finalists are evaluated");
            assert!((0.0..=1.0).contains(&f));
        }
        // Finalists sorted descending.
        for pair in outcome.finalists.windows(2) {
            assert!(pair[0].fitness_key() >= pair[1].fitness_key());
        }
    }

    #[test]
    fn test_refine_is_reproducible() {
        let buildings = sample_campus();
        let bounds = Bounds::new(0.0, 0.0, 1000.0, 1000.0).unwrap();
        let evaluator = CenterPull { bounds };
        let sa_finalists = seeds(&buildings, bounds, &evaluator);
        let config = GaConfigBuilder::new()
            .population_size(12)
            .generations(6)
            .build();

        let a = refine(
            &evaluator,
            &buildings,
            bounds,
            &config,
            &sa_finalists,
            9,
            None,
            &NullObserver,
        )
        .unwrap();
        let b = refine(
            &evaluator,
            &buildings,
            bounds,
            &config,
            &sa_finalists,
            9,
            None,
            &NullObserver,
        )
        .unwrap();

        assert_eq!(a.best_history, b.best_history);
        assert_eq!(a.mean_history, b.mean_history);
        assert_eq!(a.finalists[0].fitness, b.finalists[0].fitness);
    }

    #[test]
    fn test_seed_band_sizes() {
        let buildings = sample_campus();
        let bounds = Bounds::new(0.0, 0.0, 1000.0, 1000.0).unwrap();
        let evaluator = CenterPull { bounds };
        let mut finalists = Vec::new();
        for i in 0..8 {
            let mut s = random_solution(
                &buildings,
                bounds,
                &mut rand::rngs::StdRng::seed_from_u64(i),
            );
            evaluator.evaluate(&mut s);
            finalists.push(s);
        }
        sort_by_fitness_desc(&mut finalists);

        let config = GaConfigBuilder::new().population_size(20).build();
        let mut rng = StdRng::seed_from_u64(0);
        let population = initialize_population(&finalists, &buildings, bounds, &config, &mut rng);

        assert_eq!(population.len(), 20);
        // Exploitation band keeps the SA fitness; the rest start unevaluated.
        let kept = population.iter().filter(|s| s.fitness.is_some()).count();
        assert_eq!(kept, 8.min(10));
    }
}
