//! Batch analysis pipeline
//!
//! The pipeline turns a [`Batch`] of named tables into a [`BatchResult`]:
//!
//! 1. Project each table onto (potential, current). Inputs that cannot be projected
//!    are recorded as skipped and the batch continues.
//! 2. Decode the concentration label from the identifier.
//! 3. Extract the primary and secondary peaks.
//! 4. Sort rows by concentration (stable, undefined concentrations last).
//! 5. Fit one calibration line per channel from rows where both the concentration and
//!    that channel's peak are defined.
//!
//! Samples are independent of each other; with the `parallel` feature the per-sample
//! steps run on the rayon thread pool. Output order does not depend on the feature.

mod config;
mod types;


pub use config::{ChannelLabels, PipelineConfig};
pub use types::{
    compare_concentration, Batch, BatchEntry, BatchResult, PeakRow, SkipReason, SkippedSample,
};

use chrono::Utc;
use log::{debug, info, warn};

use crate::calibration::{CalibrationResult, FitError};
use crate::label::ConcentrationLabel;
use crate::peaks::{Channel, PeakFinder};
use crate::sample::Sample;

/// Orchestrates label parsing, peak extraction and calibration over a batch
#[derive(Debug, Clone, Default)]
pub struct AnalysisPipeline {
    config: PipelineConfig,
    finder: PeakFinder,
}

impl AnalysisPipeline {
    /// Create a pipeline
    pub fn new(config: PipelineConfig) -> Self {
        let finder = PeakFinder::new(config.peaks.clone());
        Self { config, finder }
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Analyze a single table.
    pub fn analyze_table(
        &self,
        identifier: &str,
        table: &crate::table::DataTable,
    ) -> Result<PeakRow, SkipReason> {
        let sample = Sample::from_table(identifier, table, &self.config.columns)?;
        Ok(self.analyze_sample(&sample))
    }

    /// Label and peaks of a sample
    pub fn analyze_sample(&self, sample: &Sample) -> PeakRow {
        let concentration = ConcentrationLabel::parse(sample.identifier());
        let peaks = self.finder.extract(sample);

        if concentration.micromolar.is_none() {
            debug!(
                "{}: no concentration in identifier (label '{}')",
                sample.identifier(),
                concentration.label
            );
        }
        if peaks.is_empty() {
            debug!("{}: no peaks found", sample.identifier());
        }

        PeakRow {
            file: sample.identifier().to_string(),
            concentration,
            peaks,
        }
    }

    fn analyze_entry(&self, entry: BatchEntry) -> Result<PeakRow, SkippedSample> {
        let BatchEntry { identifier, source } = entry;
        source
            .map_err(SkipReason::from)
            .and_then(|table| self.analyze_table(&identifier, &table))
            .map_err(|reason| SkippedSample { identifier, reason })
    }

    #[cfg(not(feature = "parallel"))]
    fn analyze_entries(&self, entries: Vec<BatchEntry>) -> Vec<Result<PeakRow, SkippedSample>> {
        entries
            .into_iter()
            .map(|entry| self.analyze_entry(entry))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn analyze_entries(&self, entries: Vec<BatchEntry>) -> Vec<Result<PeakRow, SkippedSample>> {
        use rayon::prelude::*;

        entries
            .into_par_iter()
            .map(|entry| self.analyze_entry(entry))
            .collect()
    }

    /// Fit one channel, or explain why it has no calibration
    pub fn calibrate(
        &self,
        rows: &[PeakRow],
        channel: Channel,
    ) -> Result<CalibrationResult, FitError> {
        let points: Vec<(f64, f64)> = rows
            .iter()
            .filter_map(|row| row.calibration_point(channel))
            .collect();
        CalibrationResult::fit(channel, self.config.channels.get(channel), &points)
    }

    /// Run the full pipeline over a batch
    pub fn run(&self, batch: Batch) -> BatchResult {
        let total = batch.len();
        let mut rows = Vec::with_capacity(total);
        let mut skipped = Vec::new();

        for outcome in self.analyze_entries(batch.into_entries()) {
            match outcome {
                Ok(row) => rows.push(row),
                Err(skip) => {
                    warn!("Skipping sample '{}': {}", skip.identifier, skip.reason);
                    skipped.push(skip);
                }
            }
        }

        rows.sort_by(compare_concentration);

        let fit_channel = |channel: Channel| match self.calibrate(&rows, channel) {
            Ok(result) => Some(result),
            Err(err) => {
                warn!(
                    "No calibration for channel {}: {}",
                    self.config.channels.get(channel),
                    err
                );
                None
            }
        };
        let primary = fit_channel(Channel::Primary);
        let secondary = fit_channel(Channel::Secondary);

        info!(
            "Analyzed {} of {} samples ({} skipped)",
            rows.len(),
            total,
            skipped.len()
        );

        BatchResult {
            rows,
            primary,
            secondary,
            skipped,
            analyzed_at: Utc::now(),
        }
    }
}
