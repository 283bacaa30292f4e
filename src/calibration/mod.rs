//! Linear calibration of peak current against concentration
//!
//! Each analyte channel is fitted independently with ordinary least squares,
//! current regressed on concentration (μM). Moments are taken about the mean with
//! the population normalization, which keeps the standard errors consistent with
//! common statistics packages.
//!
//! A fit needs at least two points with distinct concentrations; anything less
//! leaves the channel without a calibration rather than producing a degenerate line.

mod error;

#[cfg(test)]
mod tests;

pub use error::FitError;

use serde::{Deserialize, Serialize};

use crate::format;
use crate::peaks::Channel;

/// Significant figures of slope and intercept in equation strings
pub const EQUATION_SIGNIFICANT_DIGITS: usize = 2;

/// Decimal places of R² in equation strings
pub const R_SQUARED_DECIMALS: usize = 3;

/// Ordinary least-squares line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Change in current per μM (A/μM)
    pub slope: f64,
    /// Current at zero concentration (A)
    pub intercept: f64,
    /// Pearson correlation coefficient
    pub r: f64,
    /// Number of points in the fit
    pub points: usize,
    /// Standard error of the slope; undefined for two points
    pub slope_stderr: Option<f64>,
    /// Standard error of the intercept; undefined for two points
    pub intercept_stderr: Option<f64>,
}

impl LinearFit {
    /// Coefficient of determination
    pub fn r_squared(&self) -> f64 {
        self.r * self.r
    }

    /// Current predicted at a concentration (μM)
    pub fn predict(&self, concentration: f64) -> f64 {
        self.slope * concentration + self.intercept
    }

    /// Concentration (μM) that would produce `current`, when the line is not flat
    pub fn invert(&self, current: f64) -> Option<f64> {
        if self.slope == 0.0 {
            return None;
        }
        Some((current - self.intercept) / self.slope)
    }
}

/// Fit a line through `(x, y)` points.
pub fn fit_linear(points: &[(f64, f64)]) -> Result<LinearFit, FitError> {
    let n = points.len();
    if n < 2 {
        return Err(FitError::InsufficientData { points: n });
    }
    let count = n as f64;

    let x_mean = points.iter().map(|&(x, _)| x).sum::<f64>() / count;
    let y_mean = points.iter().map(|&(_, y)| y).sum::<f64>() / count;

    let (mut ssxm, mut ssym, mut ssxym) = (0.0, 0.0, 0.0);
    for &(x, y) in points {
        let dx = x - x_mean;
        let dy = y - y_mean;
        ssxm += dx * dx;
        ssym += dy * dy;
        ssxym += dx * dy;
    }
    ssxm /= count;
    ssym /= count;
    ssxym /= count;

    if ssxm == 0.0 {
        return Err(FitError::DegenerateConcentration { value: x_mean });
    }

    let slope = ssxym / ssxm;
    let intercept = y_mean - slope * x_mean;
    let r = if ssym == 0.0 {
        0.0
    } else {
        (ssxym / (ssxm * ssym).sqrt()).clamp(-1.0, 1.0)
    };

    let (slope_stderr, intercept_stderr) = if n > 2 {
        let dof = count - 2.0;
        let slope_stderr = ((1.0 - r * r) * ssym / ssxm / dof).max(0.0).sqrt();
        let intercept_stderr = slope_stderr * (ssxm + x_mean * x_mean).sqrt();
        (Some(slope_stderr), Some(intercept_stderr))
    } else {
        (None, None)
    };

    Ok(LinearFit {
        slope,
        intercept,
        r,
        points: n,
        slope_stderr,
        intercept_stderr,
    })
}

/// Calibration curve of one analyte channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    /// Channel the peaks were taken from
    pub channel: Channel,
    /// Display name of the channel, e.g. "HQ"
    pub label: String,
    /// Fitted line
    pub fit: LinearFit,
}

impl CalibrationResult {
    /// Fit a channel from (concentration μM, peak current A) pairs.
    pub fn fit(
        channel: Channel,
        label: impl Into<String>,
        points: &[(f64, f64)],
    ) -> Result<Self, FitError> {
        Ok(Self {
            channel,
            label: label.into(),
            fit: fit_linear(points)?,
        })
    }

    /// Slope (A/μM)
    pub fn slope(&self) -> f64 {
        self.fit.slope
    }

    /// Intercept (A)
    pub fn intercept(&self) -> f64 {
        self.fit.intercept
    }

    /// Correlation coefficient
    pub fn r(&self) -> f64 {
        self.fit.r
    }

    /// Coefficient of determination
    pub fn r_squared(&self) -> f64 {
        self.fit.r_squared()
    }

    /// Estimate the concentration (μM) of an unknown from its peak current
    pub fn estimate_concentration(&self, current: f64) -> Option<f64> {
        self.fit.invert(current)
    }

    /// Human-readable calibration equation, e.g.
    /// `Current(A) = 2e-08[HQ] + 1.5e-07, R² = 0.998`
    pub fn equation(&self) -> String {
        format!(
            "Current(A) = {}[{}] + {}, R² = {:.*}",
            format::general(self.fit.slope, EQUATION_SIGNIFICANT_DIGITS),
            self.label,
            format::general(self.fit.intercept, EQUATION_SIGNIFICANT_DIGITS),
            R_SQUARED_DECIMALS,
            self.fit.r_squared()
        )
    }
}
