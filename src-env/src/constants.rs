//! Shared constants for the CampusPlan workspace

/// Directory (relative to `CAMPUSPLAN_DIR`) where generated artifacts are written.
pub const DATA_GENERATED: &str = "data_generated";

/// Subdirectory of [`DATA_GENERATED`] holding convergence record CSVs.
pub const RECORDS_SUBDIR: &str = "records";
