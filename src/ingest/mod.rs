//! Reading instrument exports into tables
//!
//! Potentiostat software exports one delimited text file per measurement, with a
//! header row naming each column:
//!
//! ```text
//! Potential applied (V),WE(1).Current (A),WE(1).δ.Current (A)
//! -0.2,1.02E-07,4.1E-09
//! ...
//! ```
//!
//! Both `.csv` and `.txt` exports are accepted. The delimiter is configurable; by
//! default it is sniffed from the header line. Cells are kept as text until the
//! pipeline projects the columns it needs. Non-UTF-8 bytes become U+FFFD rather than
//! an error; a header like `WE(1).\u{fffd}.Current (A)`, from an export that wrote `δ`
//! in a legacy code page, still matches its column (see [`DataTable::column`]).
//!
//! The sample identifier of a file is its name without the extension, so
//! `0.5_mu_M.csv` becomes `0.5_mu_M`. Undecodable bytes in the name are replaced.

mod error;


pub use error::IngestError;

use log::{debug, warn};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::pipeline::Batch;
use crate::table::{Column, DataTable};

/// Delimiters considered when sniffing, in order of preference on ties
const SNIFF_CANDIDATES: [u8; 3] = [b',', b';', b'\t'];

/// Options for reading exports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Field delimiter; sniffed from the header line when unset
    pub delimiter: Option<u8>,

    /// File extensions picked up when a directory is scanned
    pub extensions: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            extensions: vec!["csv".to_string(), "txt".to_string()],
        }
    }
}

impl IngestOptions {
    /// Use a fixed delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// Pick the candidate delimiter that occurs most often in a header line.
pub fn sniff_delimiter(header: &str) -> u8 {
    let mut best = SNIFF_CANDIDATES[0];
    let mut best_count = 0;
    for candidate in SNIFF_CANDIDATES {
        let count = header.bytes().filter(|&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Read a delimited table.
///
/// Every record must have as many fields as the header. Blank lines are ignored.
pub fn read_table<R: Read>(reader: R, delimiter: Option<u8>) -> Result<DataTable, IngestError> {
    let mut reader = BufReader::new(reader);

    let delimiter = match delimiter {
        Some(d) => d,
        None => {
            let header = reader.fill_buf()?;
            let line_end = header
                .iter()
                .position(|&b| b == b'\n')
                .unwrap_or(header.len());
            sniff_delimiter(&String::from_utf8_lossy(&header[..line_end]))
        }
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim_start_matches('\u{feff}').to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(IngestError::MissingHeader);
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in csv_reader.byte_records() {
        let record = record?;
        for (column, field) in cells.iter_mut().zip(record.iter()) {
            column.push(String::from_utf8_lossy(field).into_owned());
        }
    }

    let mut table = DataTable::new();
    for (name, column) in headers.into_iter().zip(cells) {
        table.push(Column::text(name, column));
    }
    Ok(table)
}

/// Read one export from disk
pub fn read_table_file(path: &Path, options: &IngestOptions) -> Result<DataTable, IngestError> {
    let file = File::open(path)?;
    read_table(file, options.delimiter)
}

/// Sample identifier of an export: the file name without its extension
pub fn sample_identifier(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

/// Expand the given paths into export files.
///
/// Directories contribute their files with an accepted extension, sorted by name;
/// explicit file paths are kept as given, whatever their extension.
pub fn collect_paths(
    paths: &[PathBuf],
    options: &IngestOptions,
) -> Result<Vec<PathBuf>, IngestError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            for entry in fs::read_dir(path)? {
                match entry {
                    Ok(entry) => {
                        let p = entry.path();
                        if p.is_file() && options.accepts(&p) {
                            found.push(p);
                        }
                    }
                    Err(err) => warn!("Skipping unreadable entry in {}: {}", path.display(), err),
                }
            }
            found.sort();
            debug!("{}: {} export files", path.display(), found.len());
            files.extend(found);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(IngestError::InvalidPath(path.clone()));
        }
    }
    Ok(files)
}

/// Read every export into a batch.
///
/// Files that fail to read are recorded in the batch as failed entries, so the
/// pipeline reports them alongside the other skipped samples.
pub fn load_batch(paths: &[PathBuf], options: &IngestOptions) -> Result<Batch, IngestError> {
    let mut batch = Batch::new();
    for path in collect_paths(paths, options)? {
        let Some(identifier) = sample_identifier(&path) else {
            warn!("No sample name in {}", path.display());
            batch.push_failed(
                path.to_string_lossy().into_owned(),
                IngestError::NoIdentifier(path.clone()),
            );
            continue;
        };
        match read_table_file(&path, options) {
            Ok(table) => {
                debug!(
                    "Loaded '{}' ({} columns, {} rows)",
                    identifier,
                    table.columns().len(),
                    table.row_count()
                );
                batch.push(identifier, table);
            }
            Err(err) => {
                warn!("Failed to read {}: {}", path.display(), err);
                batch.push_failed(identifier, err);
            }
        }
    }
    Ok(batch)
}
