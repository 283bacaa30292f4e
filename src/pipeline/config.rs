use serde::{Deserialize, Serialize};

use crate::peaks::{Channel, PeakFinderConfig};
use crate::sample::ColumnNames;

/// Display names of the two analyte channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelLabels {
    /// Label of the first peak, hydroquinone by convention
    pub primary: String,
    /// Label of the second peak, catechol by convention
    pub secondary: String,
}

impl Default for ChannelLabels {
    fn default() -> Self {
        Self {
            primary: "HQ".to_string(),
            secondary: "CC".to_string(),
        }
    }
}

impl ChannelLabels {
    /// Label of a channel
    pub fn get(&self, channel: Channel) -> &str {
        match channel {
            Channel::Primary => &self.primary,
            Channel::Secondary => &self.secondary,
        }
    }
}

/// Configuration for an analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Headers of the projected measurement columns
    pub columns: ColumnNames,
    /// Peak filters
    pub peaks: PeakFinderConfig,
    /// Channel display names
    pub channels: ChannelLabels,
}
