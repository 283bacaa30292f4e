use serde::{Deserialize, Serialize};

/// Filters applied on top of plain local-maximum detection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakFinderConfig {
    /// Minimum current at the peak (A)
    pub min_height: Option<f64>,

    /// Minimum topographic prominence (A)
    pub min_prominence: Option<f64>,

    /// Minimum separation between peaks, in samples.
    /// Values of 0 or 1 impose no constraint.
    pub min_distance: Option<usize>,
}

impl PeakFinderConfig {
    /// Require a minimum peak current
    pub fn with_min_height(mut self, height: f64) -> Self {
        self.min_height = Some(height);
        self
    }

    /// Require a minimum prominence
    pub fn with_min_prominence(mut self, prominence: f64) -> Self {
        self.min_prominence = Some(prominence);
        self
    }

    /// Require a minimum index separation
    pub fn with_min_distance(mut self, distance: usize) -> Self {
        self.min_distance = Some(distance);
        self
    }

    /// Whether any filter is active
    pub fn is_filtered(&self) -> bool {
        self.min_height.is_some() || self.min_prominence.is_some() || self.min_distance.is_some()
    }
}
