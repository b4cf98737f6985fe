//! Convergence recording
//!
//! An observer that accumulates per-chain and per-generation statistics and
//! can dump them to a CSV file for offline analysis.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::observer::{ChainStats, GenerationStats, ProgressObserver};

/// One recorded progress row.
#[derive(Debug, Clone, Serialize)]
pub struct ConvergenceRecord {
    /// "sa" or "ga".
    pub phase: &'static str,
    /// Chain index (SA) or generation index (GA).
    pub index: usize,
    pub best_fitness: f64,
    /// Mean population fitness; zero for SA rows.
    pub mean_fitness: f64,
}

/// Records optimization progress; shareable across the chain pool.
#[derive(Debug)]
pub struct ConvergenceRecorder {
    run_name: String,
    records: Arc<Mutex<Vec<ConvergenceRecord>>>,
}

impl ConvergenceRecorder {
    pub fn new(run_name: impl Into<String>) -> Self {
        Self {
            run_name: run_name.into(),
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn records(&self) -> Vec<ConvergenceRecord> {
        self.records.lock().expect("recorder lock poisoned").clone()
    }

    pub fn clear(&self) {
        self.records.lock().expect("recorder lock poisoned").clear();
    }

    /// Write all records to `<dir>/<run_name>.csv` and return the path.
    pub fn save_to_csv(&self, dir: &Path) -> Result<PathBuf, csv::Error> {
        let path = dir.join(format!("{}.csv", self.run_name));
        let mut writer = csv::Writer::from_path(&path)?;
        for record in self.records.lock().expect("recorder lock poisoned").iter() {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(path)
    }
}

impl ProgressObserver for ConvergenceRecorder {
    fn on_chain_complete(&self, stats: &ChainStats) {
        self.records
            .lock()
            .expect("recorder lock poisoned")
            .push(ConvergenceRecord {
                phase: "sa",
                index: stats.chain,
                best_fitness: stats.best_fitness,
                mean_fitness: 0.0,
            });
    }

    fn on_generation(&self, stats: &GenerationStats) {
        self.records
            .lock()
            .expect("recorder lock poisoned")
            .push(ConvergenceRecord {
                phase: "ga",
                index: stats.generation,
                best_fitness: stats.best_fitness,
                mean_fitness: stats.mean_fitness,
            });
    }
}
