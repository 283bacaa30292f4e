//! A single voltammetric sweep.

use serde::{Deserialize, Serialize};

use crate::table::DataTable;

/// Header of the applied-potential column in Autolab exports
pub const DEFAULT_POTENTIAL_COLUMN: &str = "Potential applied (V)";

/// Header of the differential current column in Autolab exports
pub const DEFAULT_CURRENT_COLUMN: &str = "WE(1).δ.Current (A)";

/// Errors that make a sample unusable
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SampleError {
    /// Required measurement columns are absent
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A projected cell is not a number
    #[error("Invalid number {value:?} in column '{column}' at row {row}")]
    InvalidNumber {
        /// Column header
        column: String,
        /// 1-based data row
        row: usize,
        /// Offending cell
        value: String,
    },

    /// Potential and current have different lengths
    #[error("Potential has {potentials} values but current has {currents}")]
    LengthMismatch {
        /// Number of potential values
        potentials: usize,
        /// Number of current values
        currents: usize,
    },

    /// The sweep has no data points
    #[error("Signal has no data points")]
    Empty,
}

/// Headers of the two columns projected out of every table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Applied potential, in volts
    pub potential: String,
    /// Differential current, in amperes
    pub current: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            potential: DEFAULT_POTENTIAL_COLUMN.to_string(),
            current: DEFAULT_CURRENT_COLUMN.to_string(),
        }
    }
}

/// One sample: potential and current in acquisition order.
///
/// The potential is not required to be monotonic; rows are never reordered.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    identifier: String,
    potentials: Vec<f64>,
    currents: Vec<f64>,
}

impl Sample {
    /// Create a sample, checking that both sequences are non-empty and aligned.
    pub fn new(
        identifier: impl Into<String>,
        potentials: Vec<f64>,
        currents: Vec<f64>,
    ) -> Result<Self, SampleError> {
        if potentials.len() != currents.len() {
            return Err(SampleError::LengthMismatch {
                potentials: potentials.len(),
                currents: currents.len(),
            });
        }
        if currents.is_empty() {
            return Err(SampleError::Empty);
        }
        Ok(Self {
            identifier: identifier.into(),
            potentials,
            currents,
        })
    }

    /// Project a table onto the (potential, current) schema.
    ///
    /// Missing columns are reported together, before any cell is parsed.
    pub fn from_table(
        identifier: impl Into<String>,
        table: &DataTable,
        columns: &ColumnNames,
    ) -> Result<Self, SampleError> {
        let missing: Vec<String> = [&columns.potential, &columns.current]
            .into_iter()
            .filter(|name| !table.has_column(name))
            .cloned()
            .collect();

        let (Some(potential), Some(current)) = (
            table.column(&columns.potential),
            table.column(&columns.current),
        ) else {
            return Err(SampleError::MissingColumns(missing));
        };

        let parse = |column: &crate::table::Column| {
            column
                .to_f64()
                .map_err(|(row, value)| SampleError::InvalidNumber {
                    column: column.name.clone(),
                    row: row + 1,
                    value,
                })
        };

        Self::new(identifier, parse(potential)?, parse(current)?)
    }

    /// Source identifier, usually the file name without extension
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Applied potential per row (V)
    pub fn potentials(&self) -> &[f64] {
        &self.potentials
    }

    /// Differential current per row (A)
    pub fn currents(&self) -> &[f64] {
        &self.currents
    }

    /// Number of data points
    pub fn len(&self) -> usize {
        self.currents.len()
    }

    /// Always false for a constructed sample
    pub fn is_empty(&self) -> bool {
        self.currents.is_empty()
    }

    /// (potential, current) at a row
    pub fn point(&self, index: usize) -> Option<(f64, f64)> {
        Some((*self.potentials.get(index)?, *self.currents.get(index)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn autolab_table() -> DataTable {
        DataTable::new()
            .with_column(Column::text(
                DEFAULT_POTENTIAL_COLUMN,
                vec!["-0.1".into(), "0.0".into(), "0.1".into()],
            ))
            .with_column(Column::text(
                DEFAULT_CURRENT_COLUMN,
                vec!["1e-7".into(), "3e-7".into(), "2e-7".into()],
            ))
    }

    #[test]
    fn test_from_table() {
        let sample = Sample::from_table("10_mu_M", &autolab_table(), &ColumnNames::default())
            .unwrap();
        assert_eq!(sample.identifier(), "10_mu_M");
        assert_eq!(sample.len(), 3);
        assert_eq!(sample.point(1), Some((0.0, 3e-7)));
    }

    #[test]
    fn test_missing_columns_reported_together() {
        let table = DataTable::new().with_column(Column::numeric("Time (s)", vec![0.0]));
        let err = Sample::from_table("x", &table, &ColumnNames::default()).unwrap_err();
        assert_eq!(
            err,
            SampleError::MissingColumns(vec![
                DEFAULT_POTENTIAL_COLUMN.to_string(),
                DEFAULT_CURRENT_COLUMN.to_string(),
            ])
        );
    }

    #[test]
    fn test_invalid_cell_is_located() {
        let table = DataTable::new()
            .with_column(Column::numeric(DEFAULT_POTENTIAL_COLUMN, vec![0.0, 0.1]))
            .with_column(Column::text(
                DEFAULT_CURRENT_COLUMN,
                vec!["1e-7".into(), "overflow".into()],
            ));
        let err = Sample::from_table("x", &table, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, SampleError::InvalidNumber { row: 2, .. }));
    }

    #[test]
    fn test_length_invariants() {
        assert_eq!(
            Sample::new("x", vec![0.0], vec![]).unwrap_err(),
            SampleError::LengthMismatch {
                potentials: 1,
                currents: 0
            }
        );
        assert_eq!(
            Sample::new("x", vec![], vec![]).unwrap_err(),
            SampleError::Empty
        );
    }
}
