//! TOML configuration file support.
//!
//! Settings that rarely change between runs can live in a config file instead of on
//! the command line:
//!
//! ```toml
//! # dpvcal.toml
//! [columns]
//! potential = "Potential applied (V)"
//! current = "WE(1).δ.Current (A)"
//!
//! [input]
//! delimiter = ";"
//! extensions = ["csv", "txt"]
//!
//! [peaks]
//! min_prominence = 1e-9
//! min_distance = 5
//!
//! [channels]
//! primary = "HQ"
//! secondary = "CC"
//! ```
//!
//! Every key is optional; anything left out keeps its default.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use dpvcal::ingest::IngestOptions;
use dpvcal::peaks::PeakFinderConfig;
use dpvcal::pipeline::{ChannelLabels, PipelineConfig};
use dpvcal::sample::ColumnNames;

/// Root configuration structure for dpvcal.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Measurement column headers.
    #[serde(default)]
    pub columns: ColumnsConfig,

    /// File reading settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Peak filters.
    #[serde(default)]
    pub peaks: PeakFinderConfig,

    /// Channel display names.
    #[serde(default)]
    pub channels: ChannelsConfig,
}

/// Overrides for the projected column headers.
#[derive(Debug, Default, Deserialize)]
pub struct ColumnsConfig {
    /// Applied potential column.
    pub potential: Option<String>,

    /// Differential current column.
    pub current: Option<String>,
}

/// File reading settings.
#[derive(Debug, Default, Deserialize)]
pub struct InputConfig {
    /// Field delimiter as a one-character string; "auto" or unset sniffs it.
    pub delimiter: Option<String>,

    /// Extensions picked up from directories.
    pub extensions: Option<Vec<String>>,
}

/// Overrides for the channel labels.
#[derive(Debug, Default, Deserialize)]
pub struct ChannelsConfig {
    /// Label of the first peak.
    pub primary: Option<String>,

    /// Label of the second peak.
    pub secondary: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load from an optional path, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Pipeline settings with file values merged over the defaults.
    pub fn pipeline_config(&self) -> PipelineConfig {
        let columns = ColumnNames::default();
        let channels = ChannelLabels::default();
        PipelineConfig {
            columns: ColumnNames {
                potential: self.columns.potential.clone().unwrap_or(columns.potential),
                current: self.columns.current.clone().unwrap_or(columns.current),
            },
            peaks: self.peaks.clone(),
            channels: ChannelLabels {
                primary: self.channels.primary.clone().unwrap_or(channels.primary),
                secondary: self.channels.secondary.clone().unwrap_or(channels.secondary),
            },
        }
    }

    /// Reader settings with file values merged over the defaults.
    pub fn ingest_options(&self) -> Result<IngestOptions> {
        let mut options = IngestOptions::default();
        if let Some(delimiter) = &self.input.delimiter {
            options.delimiter = parse_delimiter(delimiter)?;
        }
        if let Some(extensions) = &self.input.extensions {
            options.extensions = extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect();
        }
        Ok(options)
    }
}

/// Parse a delimiter setting; `auto` means sniff.
pub fn parse_delimiter(value: &str) -> Result<Option<u8>> {
    match value {
        "auto" => Ok(None),
        "\\t" | "tab" => Ok(Some(b'\t')),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() => Ok(Some(*byte)),
            _ => bail!("Delimiter must be a single ASCII character, got {:?}", value),
        },
    }
}
