use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calibration::LinearFit;
use crate::peaks::Channel;
use crate::pipeline::{BatchResult, ChannelLabels, PeakRow, SkippedSample};

/// One row of the peak table, flattened
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    /// Sample identifier
    pub file: String,
    /// Normalized concentration label
    pub label: String,
    /// Primary peak potential (V)
    pub primary_potential: Option<f64>,
    /// Secondary peak potential (V)
    pub secondary_potential: Option<f64>,
    /// Primary peak current (A)
    pub primary_current: Option<f64>,
    /// Secondary peak current (A)
    pub secondary_current: Option<f64>,
    /// Concentration (μM)
    pub concentration_um: Option<f64>,
    /// Number of peaks found in the sweep
    pub peaks_detected: usize,
}

impl From<&PeakRow> for TableRow {
    fn from(row: &PeakRow) -> Self {
        let primary = row.peaks.channel(Channel::Primary);
        let secondary = row.peaks.channel(Channel::Secondary);
        Self {
            file: row.file.clone(),
            label: row.concentration.label.clone(),
            primary_potential: primary.map(|p| p.potential),
            secondary_potential: secondary.map(|p| p.potential),
            primary_current: primary.map(|p| p.current),
            secondary_current: secondary.map(|p| p.current),
            concentration_um: row.micromolar(),
            peaks_detected: row.peaks.detected,
        }
    }
}

/// Calibration of one channel with its display equation
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationEntry {
    /// Channel rank
    pub channel: Channel,
    /// Channel label
    pub label: String,
    /// Fit parameters, absent when the channel had too little data
    pub fit: Option<LinearFit>,
    /// Coefficient of determination
    pub r_squared: Option<f64>,
    /// Display equation
    pub equation: Option<String>,
}

/// Serializable form of a complete report
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    /// Crate version that produced the report
    pub generator: String,
    /// When the analysis ran (RFC 3339)
    pub analyzed_at: DateTime<Utc>,
    /// Peak table, sorted by concentration
    pub rows: Vec<TableRow>,
    /// One entry per channel
    pub calibrations: Vec<CalibrationEntry>,
    /// Samples left out
    pub skipped: Vec<SkippedSample>,
}

impl ReportDocument {
    /// Build the document for a result
    pub fn new(result: &BatchResult, labels: &ChannelLabels) -> Self {
        let calibrations = Channel::ALL
            .into_iter()
            .map(|channel| {
                let calibration = result.calibration(channel);
                CalibrationEntry {
                    channel,
                    label: labels.get(channel).to_string(),
                    fit: calibration.map(|c| c.fit),
                    r_squared: calibration.map(|c| c.r_squared()),
                    equation: calibration.map(|c| c.equation()),
                }
            })
            .collect();

        Self {
            generator: format!("dpvcal {}", env!("CARGO_PKG_VERSION")),
            analyzed_at: result.analyzed_at,
            rows: result.rows.iter().map(TableRow::from).collect(),
            calibrations,
            skipped: result.skipped.clone(),
        }
    }
}
