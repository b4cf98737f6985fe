//! Chain task executor
//!
//! SA chains are pure tasks over (evaluator, buildings, bounds, seed,
//! config); whether they run on a thread pool or inline cannot change the
//! result of any single chain. Panics inside a chain are caught and handed
//! back to the orchestrator, which decides on retry or exclusion.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use rayon::prelude::*;

use campusplan_model::{Bounds, Building};

use crate::sa::{ChainOutcome, run_chain};
use crate::{Evaluate, SaConfig};

/// How SA chains are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainExecutor {
    /// Worker pool sized to the chain count.
    #[default]
    Parallel,
    /// Run every chain in the caller; bit-identical reproducibility.
    Sequential,
}

pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic in chain task".to_string()
    }
}

/// Run one chain, converting a panic into an error message.
pub(crate) fn run_chain_guarded<E: Evaluate + ?Sized>(
    evaluator: &E,
    buildings: &[Building],
    bounds: Bounds,
    config: &SaConfig,
    seed: u64,
    deadline: Option<Instant>,
) -> Result<ChainOutcome, String> {
    catch_unwind(AssertUnwindSafe(|| {
        run_chain(evaluator, buildings, bounds, config, seed, deadline)
    }))
    .map_err(panic_message)
}

/// Run all chains under the chosen executor. Chain `i` uses seed
/// `master_seed + i`; results come back in chain order.
pub(crate) fn run_chains<E: Evaluate + ?Sized>(
    executor: ChainExecutor,
    evaluator: &E,
    buildings: &[Building],
    bounds: Bounds,
    config: &SaConfig,
    master_seed: u64,
    deadline: Option<Instant>,
) -> Vec<Result<ChainOutcome, String>> {
    let num_chains = config.num_chains.max(1);
    let run_one = |chain: usize| {
        run_chain_guarded(
            evaluator,
            buildings,
            bounds,
            config,
            master_seed.wrapping_add(chain as u64),
            deadline,
        )
    };

    match executor {
        ChainExecutor::Sequential => (0..num_chains).map(run_one).collect(),
        ChainExecutor::Parallel => {
            match rayon::ThreadPoolBuilder::new().num_threads(num_chains).build() {
                Ok(pool) => {
                    pool.install(|| (0..num_chains).into_par_iter().map(run_one).collect())
                }
                Err(e) => {
                    log::warn!("worker pool creation failed ({e}); running chains sequentially");
                    (0..num_chains).map(run_one).collect()
                }
            }
        }
    }
}
