use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::calibration::CalibrationResult;
use crate::ingest::IngestError;
use crate::label::ConcentrationLabel;
use crate::peaks::{Channel, PeakRecord};
use crate::sample::SampleError;
use crate::table::DataTable;

/// One input of a batch: a table, or the error that prevented reading it
#[derive(Debug)]
pub struct BatchEntry {
    /// Sample identifier
    pub identifier: String,
    /// Table contents, or the read failure
    pub source: Result<DataTable, IngestError>,
}

/// Ordered set of inputs for one analysis run.
///
/// Identifiers are unique: pushing an identifier that already exists replaces the
/// earlier entry in place.
#[derive(Debug, Default)]
pub struct Batch {
    entries: Vec<BatchEntry>,
}

impl Batch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table
    pub fn push(&mut self, identifier: impl Into<String>, table: DataTable) {
        self.insert(identifier.into(), Ok(table));
    }

    /// Record an input that could not be read
    pub fn push_failed(&mut self, identifier: impl Into<String>, error: IngestError) {
        self.insert(identifier.into(), Err(error));
    }

    fn insert(&mut self, identifier: String, source: Result<DataTable, IngestError>) {
        match self.entries.iter_mut().find(|e| e.identifier == identifier) {
            Some(existing) => {
                warn!("Duplicate sample '{}' replaces the earlier one", identifier);
                existing.source = source;
            }
            None => self.entries.push(BatchEntry { identifier, source }),
        }
    }

    /// Number of inputs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch has no inputs
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers in insertion order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.identifier.as_str())
    }

    pub(crate) fn into_entries(self) -> Vec<BatchEntry> {
        self.entries
    }
}

impl<S: Into<String>> FromIterator<(S, DataTable)> for Batch {
    fn from_iter<I: IntoIterator<Item = (S, DataTable)>>(iter: I) -> Self {
        let mut batch = Batch::new();
        for (identifier, table) in iter {
            batch.push(identifier, table);
        }
        batch
    }
}

/// Why a sample was left out of the result table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Required measurement columns are absent
    MissingColumns {
        /// Headers that were not found
        columns: Vec<String>,
    },
    /// The source could not be read or parsed
    Unreadable {
        /// Underlying error
        message: String,
    },
    /// The measurement columns do not form a valid signal
    InvalidSignal {
        /// Underlying error
        message: String,
    },
}

impl From<SampleError> for SkipReason {
    fn from(err: SampleError) -> Self {
        match err {
            SampleError::MissingColumns(columns) => SkipReason::MissingColumns { columns },
            other => SkipReason::InvalidSignal {
                message: other.to_string(),
            },
        }
    }
}

impl From<IngestError> for SkipReason {
    fn from(err: IngestError) -> Self {
        SkipReason::Unreadable {
            message: err.to_string(),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingColumns { columns } => {
                write!(f, "missing required columns: {}", columns.join(", "))
            }
            SkipReason::Unreadable { message } => write!(f, "unreadable: {}", message),
            SkipReason::InvalidSignal { message } => write!(f, "invalid signal: {}", message),
        }
    }
}

/// A sample that did not make it into the result table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSample {
    /// Sample identifier
    pub identifier: String,
    /// Reason it was skipped
    pub reason: SkipReason,
}

/// One row of the peak table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakRow {
    /// Sample identifier
    pub file: String,
    /// Concentration decoded from the identifier
    pub concentration: ConcentrationLabel,
    /// Channel peaks
    pub peaks: PeakRecord,
}

impl PeakRow {
    /// Concentration in μM, when the identifier carried one
    pub fn micromolar(&self) -> Option<f64> {
        self.concentration.micromolar
    }

    /// (concentration, peak current) when both are defined for the channel
    pub fn calibration_point(&self, channel: Channel) -> Option<(f64, f64)> {
        Some((self.micromolar()?, self.peaks.channel(channel)?.current))
    }
}

/// Ascending by concentration; rows without one compare greater than any row with one.
pub fn compare_concentration(a: &PeakRow, b: &PeakRow) -> Ordering {
    match (a.micromolar(), b.micromolar()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Outcome of an analysis run
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    /// Rows sorted by concentration, undefined concentrations last
    pub rows: Vec<PeakRow>,
    /// Calibration of the primary channel
    pub primary: Option<CalibrationResult>,
    /// Calibration of the secondary channel
    pub secondary: Option<CalibrationResult>,
    /// Samples left out, in input order
    pub skipped: Vec<SkippedSample>,
    /// When the analysis ran
    pub analyzed_at: DateTime<Utc>,
}

impl BatchResult {
    /// Calibration of a channel
    pub fn calibration(&self, channel: Channel) -> Option<&CalibrationResult> {
        match channel {
            Channel::Primary => self.primary.as_ref(),
            Channel::Secondary => self.secondary.as_ref(),
        }
    }

    /// Row of a sample, looked up by identifier
    pub fn row(&self, file: &str) -> Option<&PeakRow> {
        self.rows.iter().find(|row| row.file == file)
    }

    /// Points that enter the calibration of a channel, in table order
    pub fn calibration_points(&self, channel: Channel) -> Vec<(f64, f64)> {
        self.rows
            .iter()
            .filter_map(|row| row.calibration_point(channel))
            .collect()
    }

    /// Number of rows without a usable concentration
    pub fn unlabeled_count(&self) -> usize {
        self.rows.iter().filter(|r| r.micromolar().is_none()).count()
    }
}
