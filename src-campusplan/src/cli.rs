//! CampusPlan - campus spatial-planning optimization
//! Common command-line interface definitions shared across binaries
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

use std::path::PathBuf;

use clap::Parser;

/// Shared CLI arguments for the CampusPlan binary.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the optimization request (JSON).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path the optimization result (JSON) is written to.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Master seed; overrides the request's seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Deadline in seconds; overrides the request's deadline.
    #[arg(long)]
    pub deadline: Option<f64>,

    /// Save convergence records as CSV under $CAMPUSPLAN_DIR/data_generated/records.
    #[arg(long, default_value_t = false)]
    pub records: bool,

    /// Increase verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Install a stderr logger honoring the verbosity flags.
pub fn setup_logging(verbosity: u8) -> Result<(), fern::InitError> {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}
