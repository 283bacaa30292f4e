//! # dpvcal
//!
//! Command-line front end for differential pulse voltammetry calibration.
//!
//! ## Usage
//!
//! ```bash
//! # Write a synthetic calibration series
//! dpvcal demo standards/
//!
//! # Extract peaks and fit calibration lines
//! dpvcal analyze standards/
//!
//! # Same, as CSV, with settings from a file
//! dpvcal analyze standards/ --config dpvcal.toml --format csv -o peaks.csv
//!
//! # Inspect the peaks of one export
//! dpvcal peaks standards/10_mu_M.csv
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
