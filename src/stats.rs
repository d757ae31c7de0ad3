//! Descriptive statistics over per-image scores.
//!
//! The challenge score itself is a plain [`mean`]; [`Summary`] adds the
//! spread, which helps a participant see whether a few images dominate.

use serde::{Deserialize, Serialize};

/// Distribution of per-image scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of scored images.
    pub count: usize,
    /// Arithmetic mean; equals the challenge score.
    pub mean: f64,
    /// Median score.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Best (lowest) score.
    pub min: f64,
    /// Worst (highest) score.
    pub max: f64,
    /// 90th percentile.
    pub p90: f64,
}

impl Summary {
    /// Compute summary statistics for a slice of values.
    ///
    /// Returns `None` if the slice is empty.
    #[must_use]
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = mean(values);
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            mean,
            median: percentile_sorted(&sorted, 0.5),
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[count - 1],
            p90: percentile_sorted(&sorted, 0.9),
        })
    }
}

/// Arithmetic mean, summed in input order.
///
/// Returns 0.0 for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

// Linear interpolation between closest ranks (R-7).
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }

    let idx = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    let frac = idx - lower as f64;

    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}
