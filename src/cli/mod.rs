use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod analyze;
mod demo;
mod peaks;

mod config;

/// dpvcal - Differential pulse voltammetry peak extraction and calibration
#[derive(Parser)]
#[command(name = "dpvcal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for batch results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table followed by the regression equations
    #[default]
    Table,
    /// Peak table as CSV
    Csv,
    /// Full result document as JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract peaks from a batch of exports and fit calibration lines
    Analyze {
        /// Export files or directories containing them
        #[arg(value_name = "PATHS", required = true)]
        paths: Vec<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long, default_value = "table", value_enum)]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Field delimiter (sniffed from the header when omitted)
        #[arg(short = 'd', long)]
        delimiter: Option<String>,
    },

    /// List every local maximum of a single export
    Peaks {
        /// Export file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Generate a synthetic calibration series
    Demo {
        /// Output directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Number of standards to write
        #[arg(short = 'n', long, default_value_t = demo::STANDARDS.len())]
        count: usize,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            paths,
            config,
            format,
            output,
            delimiter,
        } => analyze::run(analyze::AnalyzeArgs {
            paths,
            config,
            format,
            output,
            delimiter,
        }),
        Commands::Peaks { file, config } => peaks::run(file, config),
        Commands::Demo { dir, count } => demo::run(dir, count),
    }
}
