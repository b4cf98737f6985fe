//! Progress observation
//!
//! The optimizer reports progress through this capability instead of writing
//! to standard output. Callers inject an observer at construction; the
//! default is a no-op.

/// Statistics for one completed SA chain.
#[derive(Debug, Clone, Copy)]
pub struct ChainStats {
    pub chain: usize,
    pub best_fitness: f64,
    pub iterations: usize,
    pub evaluations: usize,
}

/// Statistics for one completed GA generation.
#[derive(Debug, Clone, Copy)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
}

/// Observer capability injected into the optimizer.
pub trait ProgressObserver: Send + Sync {
    fn on_chain_complete(&self, _stats: &ChainStats) {}
    fn on_generation(&self, _stats: &GenerationStats) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {}
