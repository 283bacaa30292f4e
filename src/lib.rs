//! # dpvcal - Differential Pulse Voltammetry Calibration
//!
//! `dpvcal` turns a set of differential pulse voltammograms, one per standard
//! solution, into calibration curves for the two analytes resolved in each sweep.
//!
//! ## Key Features
//!
//! - **Concentration from file names**: standards named like `10_mu_M.csv` or
//!   `500_n_M.csv` are decoded and normalized to micromolar.
//!
//! - **Peak extraction**: local maxima of the differential current, reported in sweep
//!   order; the first two are the primary and secondary analyte channels.
//!
//! - **Calibration**: ordinary least-squares fit of peak current against concentration
//!   for each channel, with correlation coefficient and standard errors.
//!
//! - **Forgiving batches**: files with missing columns, unreadable contents or
//!   unlabelled names never abort the batch; they are skipped or left out of the fit
//!   and reported.
//!
//! ## Quick Start
//!
//! ```rust
//! use dpvcal::pipeline::{AnalysisPipeline, Batch};
//! use dpvcal::peaks::Channel;
//! use dpvcal::table::{Column, DataTable};
//!
//! let sweep = |scale: f64| {
//!     DataTable::new()
//!         .with_column(Column::numeric(
//!             "Potential applied (V)",
//!             vec![-0.1, 0.0, 0.1, 0.2, 0.3],
//!         ))
//!         .with_column(Column::numeric(
//!             "WE(1).δ.Current (A)",
//!             vec![0.0, scale * 1e-8, 0.0, scale * 2e-8, 0.0],
//!         ))
//! };
//!
//! let batch: Batch = [
//!     ("1_mu_M", sweep(1.0)),
//!     ("5_mu_M", sweep(5.0)),
//!     ("10_mu_M", sweep(10.0)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let result = AnalysisPipeline::default().run(batch);
//!
//! assert_eq!(result.rows.len(), 3);
//! let hq = result.calibration(Channel::Primary).unwrap();
//! assert!((hq.r_squared() - 1.0).abs() < 1e-9);
//! println!("{}", hq.equation());
//! ```
//!
//! ## Reading Exports
//!
//! ```rust,no_run
//! use dpvcal::ingest::{load_batch, IngestOptions};
//! use dpvcal::pipeline::{AnalysisPipeline, ChannelLabels};
//! use dpvcal::report::BatchReport;
//! use std::path::PathBuf;
//!
//! let batch = load_batch(&[PathBuf::from("measurements/")], &IngestOptions::default())?;
//! let result = AnalysisPipeline::default().run(batch);
//! println!("{}", BatchReport::new(&result, &ChannelLabels::default()));
//! # Ok::<(), dpvcal::ingest::IngestError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`label`]: concentration labels decoded from sample identifiers
//! - [`peaks`]: local-maximum peak extraction and channel assignment
//! - [`calibration`]: per-channel least-squares calibration
//! - [`pipeline`]: batch orchestration, sorting and skip bookkeeping
//! - [`ingest`]: reading `.csv`/`.txt` exports into tables
//! - [`report`]: text, CSV and JSON rendering of results

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod calibration;
pub mod format;
pub mod ingest;
pub mod label;
pub mod peaks;
pub mod pipeline;
pub mod report;
pub mod sample;
pub mod table;

// Python bindings module (only compiled with the "python" feature)
#[cfg(feature = "python")]
mod python;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::calibration::{fit_linear, CalibrationResult, FitError, LinearFit};
    pub use crate::ingest::{load_batch, read_table, IngestError, IngestOptions};
    pub use crate::label::{ConcentrationLabel, ConcentrationUnit};
    pub use crate::peaks::{Channel, Peak, PeakFinder, PeakFinderConfig, PeakRecord};
    pub use crate::pipeline::{
        AnalysisPipeline, Batch, BatchResult, ChannelLabels, PeakRow, PipelineConfig,
        SkipReason, SkippedSample,
    };
    pub use crate::report::BatchReport;
    pub use crate::sample::{ColumnNames, Sample, SampleError};
    pub use crate::table::{Column, DataTable};
}
