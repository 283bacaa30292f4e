/// Reasons a calibration line cannot be fitted
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    /// Fewer than two usable points
    #[error("Need at least 2 points for a linear fit, got {points}")]
    InsufficientData {
        /// Number of points available
        points: usize,
    },

    /// Every point has the same concentration, so the slope is undefined
    #[error("All points share the same concentration ({value}); slope is undefined")]
    DegenerateConcentration {
        /// The shared concentration
        value: f64,
    },
}
