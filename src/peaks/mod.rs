//! Peak extraction for differential pulse voltammograms
//!
//! A peak is a local maximum of the current along the sweep. Detection follows the
//! usual 1-D rule: a point (or a flat run of equal points) is a peak when the values
//! immediately before and after it are strictly lower. Flat runs report their middle
//! index, rounded down. The first and last samples are never peaks.
//!
//! Peaks are returned in sweep order, not by height. The first two become the primary
//! and secondary analyte channels of a [`PeakRecord`]; anything after the second is
//! dropped, since a sweep is expected to resolve exactly two analytes.
//!
//! Optional filters can be layered on through [`PeakFinderConfig`]. They are applied
//! in the order height, distance, prominence. All are disabled by default.

mod config;


pub use config::PeakFinderConfig;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::sample::Sample;

/// A detected peak
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Row index in the sample
    pub index: usize,
    /// Applied potential at the peak (V)
    pub potential: f64,
    /// Current at the peak (A)
    pub current: f64,
}

/// The first two peaks of a sweep, by rank
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakRecord {
    /// First peak along the sweep
    pub primary: Option<Peak>,
    /// Second peak along the sweep
    pub secondary: Option<Peak>,
    /// Total number of peaks detected, including discarded ones
    pub detected: usize,
}

impl PeakRecord {
    /// Build a record from peaks in sweep order
    pub fn from_peaks(peaks: &[Peak]) -> Self {
        Self {
            primary: peaks.first().copied(),
            secondary: peaks.get(1).copied(),
            detected: peaks.len(),
        }
    }

    /// Peak assigned to a channel
    pub fn channel(&self, channel: Channel) -> Option<&Peak> {
        match channel {
            Channel::Primary => self.primary.as_ref(),
            Channel::Secondary => self.secondary.as_ref(),
        }
    }

    /// Whether no peak was found at all
    pub fn is_empty(&self) -> bool {
        self.primary.is_none()
    }
}

/// Analyte channel, by detection rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// First peak in the sweep
    Primary,
    /// Second peak in the sweep
    Secondary,
}

impl Channel {
    /// Both channels, in rank order
    pub const ALL: [Channel; 2] = [Channel::Primary, Channel::Secondary];
}

/// Indices of all local maxima, in ascending order.
///
/// A flat run counts once, at its middle, and only when both of its borders are
/// strictly lower. NaN values are never peaks and block neighbouring runs.
pub fn local_maxima(values: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if values.len() < 3 {
        return maxima;
    }

    let last = values.len() - 1;
    let mut i = 1;
    while i < last {
        if values[i - 1] < values[i] {
            let mut ahead = i + 1;
            while ahead < last && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                maxima.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    maxima
}

/// Topographic prominence of the peak at `peak`.
///
/// Walks outward on both sides until a strictly higher value or the signal edge, and
/// measures the peak against the higher of the two minima found on the way.
pub fn prominence(values: &[f64], peak: usize) -> f64 {
    let height = values[peak];

    let mut left_min = height;
    for &v in values[..peak].iter().rev() {
        if v > height {
            break;
        }
        left_min = left_min.min(v);
    }

    let mut right_min = height;
    for &v in &values[peak + 1..] {
        if v > height {
            break;
        }
        right_min = right_min.min(v);
    }

    height - left_min.max(right_min)
}

/// Keep only peaks at least `distance` samples apart, preferring higher ones.
///
/// Equal heights favour the earlier peak. Input and output are in ascending order.
fn select_by_distance(values: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let mut keep = vec![true; peaks.len()];

    let mut priority: Vec<usize> = (0..peaks.len()).collect();
    priority.sort_by(|&a, &b| {
        values[peaks[b]]
            .total_cmp(&values[peaks[a]])
            .then(a.cmp(&b))
    });

    for &j in &priority {
        if !keep[j] {
            continue;
        }
        for k in (0..j).rev() {
            if peaks[j] - peaks[k] >= distance {
                break;
            }
            keep[k] = false;
        }
        for k in j + 1..peaks.len() {
            if peaks[k] - peaks[j] >= distance {
                break;
            }
            keep[k] = false;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

/// Peak finder with optional filters
#[derive(Debug, Clone, Default)]
pub struct PeakFinder {
    config: PeakFinderConfig,
}

impl PeakFinder {
    /// Create a finder with the given filters
    pub fn new(config: PeakFinderConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &PeakFinderConfig {
        &self.config
    }

    /// Peak indices of a current trace, in sweep order
    pub fn find_indices(&self, currents: &[f64]) -> Vec<usize> {
        let mut peaks = local_maxima(currents);

        if let Some(min_height) = self.config.min_height {
            peaks.retain(|&i| currents[i] >= min_height);
        }
        if let Some(distance) = self.config.min_distance.filter(|&d| d > 1) {
            peaks = select_by_distance(currents, &peaks, distance);
        }
        if let Some(min_prominence) = self.config.min_prominence {
            peaks.retain(|&i| prominence(currents, i) >= min_prominence);
        }

        peaks
    }

    /// All peaks of a sample, in sweep order
    pub fn find(&self, sample: &Sample) -> Vec<Peak> {
        self.find_indices(sample.currents())
            .into_iter()
            .filter_map(|index| {
                sample.point(index).map(|(potential, current)| Peak {
                    index,
                    potential,
                    current,
                })
            })
            .collect()
    }

    /// First two peaks of a sample as channel assignments
    pub fn extract(&self, sample: &Sample) -> PeakRecord {
        let peaks = self.find(sample);
        if peaks.len() > 2 {
            trace!(
                "{}: {} peaks detected, keeping the first two",
                sample.identifier(),
                peaks.len()
            );
        }
        PeakRecord::from_peaks(&peaks)
    }
}
