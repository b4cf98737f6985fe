//! Environment variable utilities for CampusPlan
//!
//! This module provides utilities for handling environment variables,
//! particularly the CAMPUSPLAN_DIR variable that points to the project root
//! used for generated artifacts.

use crate::constants::{DATA_GENERATED, RECORDS_SUBDIR};
use std::env;
use std::path::PathBuf;

/// Error type for environment variable issues
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error(
        "CAMPUSPLAN_DIR environment variable is not set. Please set it to the directory where generated data should live (e.g., export CAMPUSPLAN_DIR=/path/to/campusplan)"
    )]
    CampusplanDirNotSet,

    #[error("CAMPUSPLAN_DIR points to a non-existent directory: {0}")]
    CampusplanDirNotFound(PathBuf),

    #[error("Failed to create data_generated directory: {0}")]
    DataGeneratedCreationFailed(std::io::Error),
}

/// Get the CAMPUSPLAN_DIR environment variable and validate it exists
///
/// # Errors
///
/// Returns an error if:
/// - CAMPUSPLAN_DIR is not set
/// - CAMPUSPLAN_DIR points to a non-existent directory
pub fn get_campusplan_dir() -> Result<PathBuf, EnvError> {
    dir_from(env::var_os("CAMPUSPLAN_DIR").map(PathBuf::from))
}

fn dir_from(var: Option<PathBuf>) -> Result<PathBuf, EnvError> {
    let path = var.ok_or(EnvError::CampusplanDirNotSet)?;

    if !path.exists() {
        return Err(EnvError::CampusplanDirNotFound(path));
    }

    Ok(path)
}

/// Get the path to the data_generated directory, creating it if necessary
///
/// # Errors
///
/// Returns an error if CAMPUSPLAN_DIR is not set or invalid, or if the
/// directory cannot be created.
pub fn get_data_generated_dir() -> Result<PathBuf, EnvError> {
    let root = get_campusplan_dir()?;
    let data_generated = root.join(DATA_GENERATED);

    if !data_generated.exists() {
        std::fs::create_dir_all(&data_generated).map_err(EnvError::DataGeneratedCreationFailed)?;
    }

    Ok(data_generated)
}

/// Get the path to the records subdirectory within data_generated
///
/// This is the directory the convergence recorder writes its per-run CSVs to.
///
/// # Errors
///
/// Returns an error if CAMPUSPLAN_DIR is not set or invalid, or if the
/// directories cannot be created.
pub fn get_records_dir() -> Result<PathBuf, EnvError> {
    let data_generated = get_data_generated_dir()?;
    let records_dir = data_generated.join(RECORDS_SUBDIR);

    if !records_dir.exists() {
        std::fs::create_dir_all(&records_dir).map_err(EnvError::DataGeneratedCreationFailed)?;
    }

    Ok(records_dir)
}
