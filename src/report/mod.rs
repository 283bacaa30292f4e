//! Rendering of analysis results
//!
//! A [`BatchReport`] presents a [`BatchResult`] in three forms:
//!
//! - plain or colorized text for the terminal (`Display` / [`BatchReport::format_colored`])
//! - the peak table as CSV ([`BatchReport::write_csv`])
//! - a JSON document with the table, calibrations and skip list ([`BatchReport::to_json`])
//!
//! Peak table columns, with the default channel labels:
//!
//! | Column | Description |
//! |--------|-------------|
//! | File | Sample identifier |
//! | HQ_Peak_Potential(V) | Potential of the first peak |
//! | CC_Peak_Potential(V) | Potential of the second peak |
//! | HQ_Peak_Current(A) | Current of the first peak |
//! | CC_Peak_Current(A) | Current of the second peak |
//! | Concentration(μM) | Concentration decoded from the identifier |

mod document;

#[cfg(test)]
mod tests;

pub use document::{CalibrationEntry, ReportDocument, TableRow};

use std::fmt;
use std::io::Write;

#[cfg(feature = "colorized_output")]
use console::style;

use crate::format;
use crate::peaks::Channel;
use crate::pipeline::{BatchResult, ChannelLabels, PeakRow};

/// Decimal places of currents in text and CSV output
pub const CURRENT_DECIMALS: usize = 2;

/// Column headers of the peak table for the given channel labels
pub fn table_headers(labels: &ChannelLabels) -> [String; 6] {
    [
        "File".to_string(),
        format!("{}_Peak_Potential(V)", labels.primary),
        format!("{}_Peak_Potential(V)", labels.secondary),
        format!("{}_Peak_Current(A)", labels.primary),
        format!("{}_Peak_Current(A)", labels.secondary),
        "Concentration(μM)".to_string(),
    ]
}

/// Display cells of one row; absent values are empty strings
fn row_cells(row: &PeakRow) -> [String; 6] {
    let potential = |channel| {
        row.peaks
            .channel(channel)
            .map(|p| p.potential.to_string())
            .unwrap_or_default()
    };
    let current = |channel| {
        row.peaks
            .channel(channel)
            .map(|p| format::scientific(p.current, CURRENT_DECIMALS))
            .unwrap_or_default()
    };
    [
        row.file.clone(),
        potential(Channel::Primary),
        potential(Channel::Secondary),
        current(Channel::Primary),
        current(Channel::Secondary),
        row.micromolar().map(|c| c.to_string()).unwrap_or_default(),
    ]
}

/// Presentation of a batch result
#[derive(Debug)]
pub struct BatchReport<'a> {
    result: &'a BatchResult,
    labels: &'a ChannelLabels,
}

impl<'a> BatchReport<'a> {
    /// Create a report
    pub fn new(result: &'a BatchResult, labels: &'a ChannelLabels) -> Self {
        Self { result, labels }
    }

    /// Peak table as display strings, header first
    pub fn table(&self) -> Vec<[String; 6]> {
        std::iter::once(table_headers(self.labels))
            .chain(self.result.rows.iter().map(row_cells))
            .collect()
    }

    /// Equation strings of the fitted channels
    pub fn equations(&self) -> Vec<String> {
        Channel::ALL
            .iter()
            .filter_map(|&channel| self.result.calibration(channel))
            .map(|c| c.equation())
            .collect()
    }

    /// Write the peak table as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in self.table() {
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Structured form of the report
    pub fn document(&self) -> ReportDocument {
        ReportDocument::new(self.result, self.labels)
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.document())
    }

    fn column_widths(table: &[[String; 6]]) -> [usize; 6] {
        let mut widths = [0; 6];
        for row in table {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    fn pad(cell: &str, width: usize) -> String {
        let len = cell.chars().count();
        format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let table = self.table();
            let widths = Self::column_widths(&table);
            let mut output = String::new();

            output.push_str(&format!("{}\n", style("Peak Analysis").bold().cyan()));
            output.push_str(&format!("{}\n", style("=============").cyan()));

            for (i, row) in table.iter().enumerate() {
                let line: Vec<String> = row
                    .iter()
                    .zip(widths)
                    .map(|(cell, width)| Self::pad(cell, width))
                    .collect();
                let line = line.join("  ");
                if i == 0 {
                    output.push_str(&format!("{}\n", style(line.trim_end()).bold()));
                } else {
                    output.push_str(&format!("{}\n", line.trim_end()));
                }
            }

            output.push('\n');
            output.push_str(&format!("{}\n", style("Linear Regression").bold().cyan()));
            for channel in Channel::ALL {
                let label = self.labels.get(channel);
                match self.result.calibration(channel) {
                    Some(calibration) => output.push_str(&format!(
                        "  {}: {}\n",
                        style(label).bold(),
                        style(calibration.equation()).green()
                    )),
                    None => output.push_str(&format!(
                        "  {}: {}\n",
                        style(label).bold(),
                        style("not enough data").yellow()
                    )),
                }
            }

            if !self.result.skipped.is_empty() {
                output.push('\n');
                output.push_str(&format!(
                    "{}\n",
                    style(format!("Skipped {} file(s)", self.result.skipped.len()))
                        .yellow()
                        .bold()
                ));
                for skip in &self.result.skipped {
                    output.push_str(&format!(
                        "  {} - {}\n",
                        skip.identifier,
                        style(&skip.reason).yellow()
                    ));
                }
            }

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for BatchReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table();
        let widths = Self::column_widths(&table);

        writeln!(f, "Peak Analysis")?;
        writeln!(f, "=============")?;
        for row in &table {
            let line: Vec<String> = row
                .iter()
                .zip(widths)
                .map(|(cell, width)| Self::pad(cell, width))
                .collect();
            writeln!(f, "{}", line.join("  ").trim_end())?;
        }

        writeln!(f)?;
        writeln!(f, "Linear Regression")?;
        for channel in Channel::ALL {
            let label = self.labels.get(channel);
            match self.result.calibration(channel) {
                Some(calibration) => writeln!(f, "  {}: {}", label, calibration.equation())?,
                None => writeln!(f, "  {}: not enough data", label)?,
            }
        }

        if !self.result.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped {} file(s)", self.result.skipped.len())?;
            for skip in &self.result.skipped {
                writeln!(f, "  {} - {}", skip.identifier, skip.reason)?;
            }
        }

        Ok(())
    }
}
