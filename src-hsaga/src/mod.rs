//! Hybrid simulated-annealing + genetic-algorithm placement optimizer
//!
//! Two-stage search over building placements:
//! - Stage 1: parallel SA chains explore the site globally (Metropolis
//!   acceptance, geometric cooling, temperature-adaptive composite moves)
//! - Stage 2: a GA refines the SA finalists (tournament selection, uniform
//!   position crossover, composite mutation, elitist replacement)
//!
//! Supported features:
//! - Explicit per-chain RNG seeding for reproducible runs
//! - Worker-pool or sequential chain execution
//! - Observer capability for progress reporting (never prints itself)
//! - Optional deadline checked at iteration/generation boundaries
//! - Convergence history (SA best per interval, GA best/mean per generation)
//!
//! The optimizer is generic over an [`Evaluate`] implementation; it knows
//! nothing about objectives or constraints beyond the scalar it receives.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use campusplan_model::{Bounds, Building, ModelError, Solution, sort_by_fitness_desc};

pub mod executor;
pub mod ga;
pub mod observer;
pub mod operators;
pub mod recorder;
pub mod sa;
pub mod selection;

pub use executor::ChainExecutor;
pub use ga::GaOutcome;
pub use observer::{ChainStats, GenerationStats, NullObserver, ProgressObserver};
pub use recorder::{ConvergenceRecord, ConvergenceRecorder};
pub use sa::{CONVERGENCE_INTERVAL, ChainOutcome};
pub use selection::{FitnessRank, Individual, tournament};

/// Fitness evaluation capability.
///
/// Implementations must be callable from multiple chains at once: `&self`
/// only, and the only thing they may mutate is the passed solution's cached
/// fields (plus internal atomics).
pub trait Evaluate: Sync {
    /// Evaluate a solution, cache the fitness inside it, and return it.
    /// A cached solution must be returned unchanged.
    fn evaluate(&self, solution: &mut Solution) -> f64;
}

/// Errors raised by the optimizer.
#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    #[error("buildings list cannot be empty")]
    EmptyBuildings,

    #[error("duplicate building id: {0}")]
    DuplicateBuildingId(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(
        "building {id} footprint ({footprint:.0} m²) exceeds 80% of the site area ({site_area:.0} m²)"
    )]
    OversizedFootprint {
        id: String,
        footprint: f64,
        site_area: f64,
    },

    #[error("GA population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),

    #[error("mutation shares must not all be zero")]
    ZeroMutationShares,

    #[error("no SA chain completed")]
    NoChainSucceeded,

    #[error("genetic refinement ended with no evaluable individuals")]
    NoEvaluableIndividuals,
}

/// Why the optimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Completed,
    Deadline,
    Fault,
}

/// Configuration of the SA stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SaConfig {
    /// Number of independent chains.
    pub num_chains: usize,
    /// Iterations per chain.
    pub chain_iterations: usize,
    /// Starting temperature.
    pub initial_temp: f64,
    /// Chains stop early once the temperature falls below this.
    pub final_temp: f64,
    /// Geometric cooling factor per iteration.
    pub cooling_rate: f64,
    /// Gaussian sigma is `max(T / sigma_divisor, 0.1)`.
    pub sigma_divisor: f64,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            num_chains: num_cpus::get().clamp(1, 8),
            chain_iterations: 300,
            initial_temp: 1000.0,
            final_temp: 0.1,
            cooling_rate: 0.95,
            sigma_divisor: 10.0,
        }
    }
}

/// Fluent builder for [`SaConfig`].
pub struct SaConfigBuilder {
    cfg: SaConfig,
}

impl SaConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: SaConfig::default(),
        }
    }
    pub fn num_chains(mut self, v: usize) -> Self {
        self.cfg.num_chains = v;
        self
    }
    pub fn chain_iterations(mut self, v: usize) -> Self {
        self.cfg.chain_iterations = v;
        self
    }
    pub fn initial_temp(mut self, v: f64) -> Self {
        self.cfg.initial_temp = v;
        self
    }
    pub fn final_temp(mut self, v: f64) -> Self {
        self.cfg.final_temp = v;
        self
    }
    pub fn cooling_rate(mut self, v: f64) -> Self {
        self.cfg.cooling_rate = v;
        self
    }
    pub fn sigma_divisor(mut self, v: f64) -> Self {
        self.cfg.sigma_divisor = v;
        self
    }
    pub fn build(self) -> SaConfig {
        self.cfg
    }
}

impl Default for SaConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration of the GA stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Probability that a parent pair actually crosses.
    pub crossover_rate: f64,
    /// Per-building exchange probability inside a crossing pair.
    pub swap_probability: f64,
    /// Probability that an offspring is mutated at all.
    pub mutation_rate: f64,
    /// Relative share of the gaussian operator in the mutation mix.
    pub gaussian_share: f64,
    pub swap_share: f64,
    pub reset_share: f64,
    /// Fixed sigma of the GA gaussian move, in meters.
    pub gaussian_sigma: f64,
    pub tournament_size: usize,
    /// Elites retained if a whole generation fails to evaluate.
    pub elite_size: usize,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 50,
            crossover_rate: 0.8,
            swap_probability: 0.5,
            mutation_rate: 0.15,
            gaussian_share: 0.7,
            swap_share: 0.2,
            reset_share: 0.1,
            gaussian_sigma: 30.0,
            tournament_size: 3,
            elite_size: 5,
        }
    }
}

/// Fluent builder for [`GaConfig`].
pub struct GaConfigBuilder {
    cfg: GaConfig,
}

impl GaConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: GaConfig::default(),
        }
    }
    pub fn population_size(mut self, v: usize) -> Self {
        self.cfg.population_size = v;
        self
    }
    pub fn generations(mut self, v: usize) -> Self {
        self.cfg.generations = v;
        self
    }
    pub fn crossover_rate(mut self, v: f64) -> Self {
        self.cfg.crossover_rate = v;
        self
    }
    pub fn swap_probability(mut self, v: f64) -> Self {
        self.cfg.swap_probability = v;
        self
    }
    pub fn mutation_rate(mut self, v: f64) -> Self {
        self.cfg.mutation_rate = v;
        self
    }
    pub fn mutation_shares(mut self, gaussian: f64, swap: f64, reset: f64) -> Self {
        self.cfg.gaussian_share = gaussian;
        self.cfg.swap_share = swap;
        self.cfg.reset_share = reset;
        self
    }
    pub fn gaussian_sigma(mut self, v: f64) -> Self {
        self.cfg.gaussian_sigma = v;
        self
    }
    pub fn tournament_size(mut self, v: usize) -> Self {
        self.cfg.tournament_size = v;
        self
    }
    pub fn elite_size(mut self, v: usize) -> Self {
        self.cfg.elite_size = v;
        self
    }
    pub fn build(self) -> GaConfig {
        self.cfg
    }
}

impl Default for GaConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runtime statistics of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Total wall time, seconds.
    pub runtime: f64,
    pub sa_time: f64,
    pub ga_time: f64,
    /// Fitness evaluations across both stages.
    pub evaluations: usize,
    /// SA iterations summed over chains.
    pub iterations: usize,
    /// Chains that contributed a finalist.
    pub sa_chains: usize,
    /// Generations the GA actually ran.
    pub ga_generations: usize,
}

/// Convergence history of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceHistory {
    /// Best fitness any chain had reached, per recording interval.
    pub sa_best_per_interval: Vec<f64>,
    pub ga_best_per_generation: Vec<f64>,
    pub ga_mean_per_generation: Vec<f64>,
}

/// Result of a hybrid optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub best: Solution,
    /// Top solutions across both stages, best first.
    pub finalists: Vec<Solution>,
    pub stats: RunStats,
    pub convergence: ConvergenceHistory,
    pub stop_reason: StopReason,
}

static NULL_OBSERVER: NullObserver = NullObserver;

/// The two-stage hybrid optimizer.
pub struct HybridOptimizer<'a, E: Evaluate + ?Sized> {
    evaluator: &'a E,
    buildings: &'a [Building],
    bounds: Bounds,
    sa: SaConfig,
    ga: GaConfig,
    seed: Option<u64>,
    executor: ChainExecutor,
    observer: &'a dyn ProgressObserver,
    deadline: Option<Instant>,
}

impl<'a, E: Evaluate + ?Sized> HybridOptimizer<'a, E> {
    pub fn new(evaluator: &'a E, buildings: &'a [Building], bounds: Bounds) -> Self {
        Self {
            evaluator,
            buildings,
            bounds,
            sa: SaConfig::default(),
            ga: GaConfig::default(),
            seed: None,
            executor: ChainExecutor::default(),
            observer: &NULL_OBSERVER,
            deadline: None,
        }
    }

    pub fn with_sa_config(mut self, config: SaConfig) -> Self {
        self.sa = config;
        self
    }

    pub fn with_ga_config(mut self, config: GaConfig) -> Self {
        self.ga = config;
        self
    }

    /// Master seed: chain `i` uses `seed + i`, the GA uses `seed + num_chains`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_executor(mut self, executor: ChainExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn validate(&self) -> Result<(), OptimizeError> {
        if self.buildings.is_empty() {
            return Err(OptimizeError::EmptyBuildings);
        }
        let mut seen = std::collections::HashSet::new();
        for building in self.buildings {
            if !seen.insert(building.id.as_str()) {
                return Err(OptimizeError::DuplicateBuildingId(building.id.clone()));
            }
        }
        self.bounds.validate()?;

        let site_area = self.bounds.area();
        for building in self.buildings {
            if building.footprint() > 0.8 * site_area {
                return Err(OptimizeError::OversizedFootprint {
                    id: building.id.clone(),
                    footprint: building.footprint(),
                    site_area,
                });
            }
        }

        if self.ga.population_size < 2 {
            return Err(OptimizeError::PopulationTooSmall(self.ga.population_size));
        }
        if self.ga.gaussian_share + self.ga.swap_share + self.ga.reset_share <= 0.0 {
            return Err(OptimizeError::ZeroMutationShares);
        }
        Ok(())
    }

    /// Run both stages and assemble the report.
    pub fn run(&mut self) -> Result<OptimizationReport, OptimizeError> {
        self.validate()?;

        let master_seed = self.seed.unwrap_or_else(|| rand::random());
        let start = Instant::now();

        log::info!(
            "hybrid optimization start: {} buildings, {} chains x {} iters, GA {} x {} gens, seed {master_seed}",
            self.buildings.len(),
            self.sa.num_chains,
            self.sa.chain_iterations,
            self.ga.population_size,
            self.ga.generations,
        );

        // Stage 1: simulated annealing
        let sa_start = Instant::now();
        let outcomes = self.simulated_annealing(master_seed)?;
        let sa_time = sa_start.elapsed().as_secs_f64();

        let sa_evaluations: usize = outcomes.iter().map(|o| o.evaluations).sum();
        let sa_iterations: usize = outcomes.iter().map(|o| o.iterations).sum();
        let sa_chains = outcomes.len();
        let sa_history = merge_chain_histories(&outcomes);

        let mut sa_finalists: Vec<Solution> = outcomes.into_iter().map(|o| o.best).collect();
        sort_by_fitness_desc(&mut sa_finalists);
        log::info!(
            "SA stage complete in {sa_time:.2}s: best={:.4} over {sa_chains} chains",
            sa_finalists[0].fitness_key()
        );

        // Stage 2: genetic refinement
        let ga_start = Instant::now();
        let ga_seed = master_seed.wrapping_add(self.sa.num_chains as u64);
        let ga_outcome = ga::refine(
            self.evaluator,
            self.buildings,
            self.bounds,
            &self.ga,
            &sa_finalists,
            ga_seed,
            self.deadline,
            self.observer,
        )?;
        let ga_time = ga_start.elapsed().as_secs_f64();
        log::info!(
            "GA stage complete in {ga_time:.2}s: best={:.4} after {} generations",
            ga_outcome.finalists[0].fitness_key(),
            ga_outcome.generations
        );

        // Best overall across both finalist sets (⊥ sorts last).
        let mut finalists = sa_finalists;
        finalists.extend(ga_outcome.finalists.iter().cloned());
        sort_by_fitness_desc(&mut finalists);
        finalists.truncate(10);
        let best = finalists[0].clone();

        let stop_reason = match self.deadline {
            Some(d) if Instant::now() >= d => StopReason::Deadline,
            _ => StopReason::Completed,
        };

        Ok(OptimizationReport {
            best,
            finalists,
            stats: RunStats {
                runtime: start.elapsed().as_secs_f64(),
                sa_time,
                ga_time,
                evaluations: sa_evaluations + ga_outcome.evaluations,
                iterations: sa_iterations,
                sa_chains,
                ga_generations: ga_outcome.generations,
            },
            convergence: ConvergenceHistory {
                sa_best_per_interval: sa_history,
                ga_best_per_generation: ga_outcome.best_history,
                ga_mean_per_generation: ga_outcome.mean_history,
            },
            stop_reason,
        })
    }

    /// Run the SA chains, retrying failed chains sequentially and excluding
    /// chains that fail both ways.
    fn simulated_annealing(&self, master_seed: u64) -> Result<Vec<ChainOutcome>, OptimizeError> {
        let results = executor::run_chains(
            self.executor,
            self.evaluator,
            self.buildings,
            self.bounds,
            &self.sa,
            master_seed,
            self.deadline,
        );

        let mut outcomes = Vec::with_capacity(results.len());
        for (chain, result) in results.into_iter().enumerate() {
            let outcome = match result {
                Ok(outcome) => Some(outcome),
                Err(message) => {
                    log::warn!("SA chain {chain} failed ({message}); re-running sequentially");
                    match executor::run_chain_guarded(
                        self.evaluator,
                        self.buildings,
                        self.bounds,
                        &self.sa,
                        master_seed.wrapping_add(chain as u64),
                        self.deadline,
                    ) {
                        Ok(outcome) => Some(outcome),
                        Err(message) => {
                            log::warn!(
                                "SA chain {chain} failed sequential re-run ({message}); excluding"
                            );
                            None
                        }
                    }
                }
            };

            if let Some(outcome) = outcome {
                self.observer.on_chain_complete(&ChainStats {
                    chain,
                    best_fitness: outcome.best.fitness_key(),
                    iterations: outcome.iterations,
                    evaluations: outcome.evaluations,
                });
                outcomes.push(outcome);
            }
        }

        if outcomes.is_empty() {
            return Err(OptimizeError::NoChainSucceeded);
        }
        Ok(outcomes)
    }
}

/// Best fitness any chain had reached by each recording interval.
fn merge_chain_histories(outcomes: &[ChainOutcome]) -> Vec<f64> {
    let len = outcomes.iter().map(|o| o.history.len()).max().unwrap_or(0);
    let mut merged = vec![f64::NEG_INFINITY; len];
    for outcome in outcomes {
        for (i, v) in outcome.history.iter().enumerate() {
            if *v > merged[i] {
                merged[i] = *v;
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_chain_histories_elementwise_max() {
        let mk = |history: Vec<f64>| ChainOutcome {
            best: Solution::default(),
            history,
            iterations: 0,
            evaluations: 0,
        };
        let merged = merge_chain_histories(&[mk(vec![0.1, 0.5]), mk(vec![0.3, 0.2, 0.9])]);
        assert_eq!(merged, vec![0.3, 0.5, 0.9]);
    }

    #[test]
    fn test_config_defaults_match_documented_values() {
        let sa = SaConfig::default();
        assert_eq!(sa.chain_iterations, 300);
        assert_eq!(sa.initial_temp, 1000.0);
        assert_eq!(sa.final_temp, 0.1);
        assert_eq!(sa.cooling_rate, 0.95);
        assert_eq!(sa.sigma_divisor, 10.0);
        assert!(sa.num_chains >= 1 && sa.num_chains <= 8);

        let ga = GaConfig::default();
        assert_eq!(ga.population_size, 50);
        assert_eq!(ga.generations, 50);
        assert_eq!(ga.crossover_rate, 0.8);
        assert_eq!(ga.swap_probability, 0.5);
        assert_eq!(ga.mutation_rate, 0.15);
        assert_eq!(
            (ga.gaussian_share, ga.swap_share, ga.reset_share),
            (0.7, 0.2, 0.1)
        );
        assert_eq!(ga.gaussian_sigma, 30.0);
        assert_eq!(ga.tournament_size, 3);
        assert_eq!(ga.elite_size, 5);
    }

    #[test]
    fn test_config_deserializes_with_partial_fields() {
        let sa: SaConfig = serde_json::from_str(r#"{"num_chains": 2}"#).unwrap();
        assert_eq!(sa.num_chains, 2);
        assert_eq!(sa.chain_iterations, 300);

        let ga: GaConfig = serde_json::from_str(r#"{"generations": 5}"#).unwrap();
        assert_eq!(ga.generations, 5);
        assert_eq!(ga.population_size, 50);
    }
}
