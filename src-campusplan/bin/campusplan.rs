//! CampusPlan - campus spatial-planning optimization
//! `campusplan` binary: optimize a campus layout from a JSON request
//!
//! Copyright (C) 2026 CampusPlan contributors
//!
//! This program is free software: you can redistribute it and/or modify
//! it under the terms of the GNU General Public License as published by
//! the Free Software Foundation, either version 3 of the License, or
//! (at your option) any later version.
//!
//! This program is distributed in the hope that it will be useful,
//! but WITHOUT ANY WARRANTY; without even the implied warranty of
//! MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//! GNU General Public License for more details.
//!
//! You should have received a copy of the GNU General Public License
//! along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::path::Path;
use std::process;

use clap::Parser;

use campusplan::cli::{Args, setup_logging};
use campusplan::hsaga::{
    ConvergenceRecorder, NullObserver, OptimizeError, ProgressObserver, StopReason,
};
use campusplan::request::{OptimizationRequest, RequestError};
use campusplan::result::OptimizationResult;
use campusplan::workflow::run_optimization;

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let args = Args::parse();
    if let Err(e) = setup_logging(args.verbose) {
        eprintln!("failed to initialize logging: {e}");
    }

    let mut request = match OptimizationRequest::from_json_file(&args.input) {
        Ok(request) => request,
        Err(e) => {
            log::error!("{e}");
            return 2;
        }
    };
    if let Some(seed) = args.seed {
        request.seed = Some(seed);
    }
    if let Some(deadline) = args.deadline {
        request.deadline_secs = Some(deadline);
    }

    let recorder = args
        .records
        .then(|| ConvergenceRecorder::new(run_name(&args.input)));
    let observer: &dyn ProgressObserver = match &recorder {
        Some(recorder) => recorder,
        None => &NullObserver,
    };

    let result = match run_optimization(&request, observer) {
        Ok(result) => result,
        Err(e) => {
            log::error!("optimization failed: {e}");
            return exit_code_for(&e);
        }
    };

    if let Some(recorder) = &recorder {
        save_records(recorder);
    }

    if let Err(e) = write_result(&args.output, &result) {
        log::error!("failed to write result: {e}");
        return 2;
    }

    match result.stop_reason {
        StopReason::Deadline => 3,
        _ => 0,
    }
}

fn run_name(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("optimization")
        .to_string()
}

fn save_records(recorder: &ConvergenceRecorder) {
    match campusplan::env::get_records_dir() {
        Ok(dir) => match recorder.save_to_csv(&dir) {
            Ok(path) => log::info!("convergence records saved to {}", path.display()),
            Err(e) => log::warn!("failed to save convergence records: {e}"),
        },
        Err(e) => log::warn!("convergence records not saved: {e}"),
    }
}

fn write_result(path: &Path, result: &OptimizationResult) -> Result<(), RequestError> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, result)?;
    Ok(())
}

fn exit_code_for(error: &RequestError) -> i32 {
    match error {
        RequestError::Optimize(
            OptimizeError::NoChainSucceeded | OptimizeError::NoEvaluableIndividuals,
        ) => 4,
        _ => 2,
    }
}
