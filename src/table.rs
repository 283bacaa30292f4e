//! Named-column tables handed to the pipeline.
//!
//! A table is what the presentation side has after reading an instrument export:
//! a set of named columns of equal length. Columns read from text keep their cells
//! as strings so that unrelated columns (timestamps, scan counters) never have to
//! parse; only the columns the pipeline projects are converted to numbers.

use serde::{Deserialize, Serialize};

/// Cell storage of a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnData {
    /// Already-numeric values
    Numeric(Vec<f64>),
    /// Raw text cells, parsed on demand
    Text(Vec<String>),
}

impl ColumnData {
    /// Number of cells in the column
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Text(cells) => cells.len(),
        }
    }

    /// Whether the column has no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Header as it appears in the source
    pub name: String,
    /// Cells
    pub data: ColumnData,
}

impl Column {
    /// Create a numeric column
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    /// Create a text column
    pub fn text(name: impl Into<String>, cells: Vec<String>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(cells),
        }
    }

    /// Convert the column to numbers.
    ///
    /// On failure returns the 0-based row and the offending cell.
    pub fn to_f64(&self) -> Result<Vec<f64>, (usize, String)> {
        match &self.data {
            ColumnData::Numeric(values) => Ok(values.clone()),
            ColumnData::Text(cells) => cells
                .iter()
                .enumerate()
                .map(|(row, cell)| {
                    cell.trim()
                        .parse::<f64>()
                        .map_err(|_| (row, cell.clone()))
                })
                .collect(),
        }
    }
}

/// Ordered collection of named columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    columns: Vec<Column>,
}

impl DataTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, builder style
    pub fn with_column(mut self, column: Column) -> Self {
        self.push(column);
        self
    }

    /// Append a column. A column with the same name replaces the earlier one.
    pub fn push(&mut self, column: Column) {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    /// Look up a column by header.
    ///
    /// An exact match wins. Otherwise a header whose undecodable characters
    /// (U+FFFD) stand in for single characters of `name` also matches, so an
    /// export that wrote `δ` in a legacy code page still finds its current column.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .or_else(|| {
                self.columns
                    .iter()
                    .find(|c| header_matches_lossy(&c.name, name))
            })
    }

    /// Whether a column with this header exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Column headers in source order
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// All columns in source order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of rows (length of the longest column)
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.data.len()).max().unwrap_or(0)
    }
}

fn header_matches_lossy(header: &str, name: &str) -> bool {
    header.contains(char::REPLACEMENT_CHARACTER)
        && header.chars().count() == name.chars().count()
        && header
            .chars()
            .zip(name.chars())
            .all(|(h, n)| h == n || h == char::REPLACEMENT_CHARACTER)
}
