//! Letter-grade bands, cumulative thresholds and histograms over a set of
//! scores. Inputs are `Option<f64>` so a roster column can be passed as is;
//! missing scores are counted but never banded.

use serde::{Deserialize, Serialize};

use crate::analyzers::grade::{Letter, LetterScale};
use crate::analyzers::types::{BandCount, Distribution, Histogram, HistogramBin, ThresholdCount};
use crate::analyzers::utility::pct;
use crate::error::ConfigError;

/// Equal-width histogram layout over `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramLayout {
    pub bins: usize,
    pub low: f64,
    pub high: f64,
}

impl Default for HistogramLayout {
    fn default() -> Self {
        HistogramLayout {
            bins: 10,
            low: 0.0,
            high: 100.0,
        }
    }
}

impl HistogramLayout {
    pub(crate) fn is_valid(&self) -> bool {
        self.bins > 0 && self.low.is_finite() && self.high.is_finite() && self.low < self.high
    }
}

/// Counts per letter band plus each band's share of the present scores.
/// Percentages are `None` when no score is present.
pub fn distribution(
    scores: impl IntoIterator<Item = Option<f64>>,
    scale: &LetterScale,
) -> Distribution {
    let mut counts = [0usize; Letter::ALL.len()];
    let mut missing = 0;

    for score in scores {
        match score {
            Some(s) => counts[scale.letter_band(s) as usize] += 1,
            None => missing += 1,
        }
    }

    let total: usize = counts.iter().sum();

    Distribution {
        total,
        missing,
        bands: Letter::ALL
            .iter()
            .zip(counts)
            .map(|(&letter, count)| BandCount {
                letter,
                count,
                percentage: pct(count, total),
            })
            .collect(),
    }
}

/// For each threshold, the number of present scores at or above it. Each
/// threshold is counted independently, so the list need not be sorted.
pub fn cumulative_at_or_above(
    scores: impl IntoIterator<Item = Option<f64>>,
    thresholds: &[f64],
) -> Vec<ThresholdCount> {
    let present: Vec<f64> = scores.into_iter().flatten().collect();

    thresholds
        .iter()
        .map(|&threshold| ThresholdCount {
            threshold,
            count: present.iter().filter(|&&s| s >= threshold).count(),
        })
        .collect()
}

/// Bins present scores into `layout.bins` equal-width buckets.
///
/// Each bucket is half-open `[low, high)` except the last, which also takes
/// scores equal to `layout.high`. Scores outside the range are only counted.
///
/// # Errors
///
/// Returns [`ConfigError::BadHistogram`] if the layout has no bins or an
/// empty or non-finite range.
pub fn histogram(
    scores: impl IntoIterator<Item = Option<f64>>,
    layout: &HistogramLayout,
) -> Result<Histogram, ConfigError> {
    if !layout.is_valid() {
        return Err(ConfigError::BadHistogram);
    }

    let width = (layout.high - layout.low) / layout.bins as f64;
    let mut counts = vec![0usize; layout.bins];
    let mut out_of_range = 0;

    for score in scores.into_iter().flatten() {
        if score < layout.low || score > layout.high {
            out_of_range += 1;
            continue;
        }
        let idx = (((score - layout.low) / width) as usize).min(layout.bins - 1);
        counts[idx] += 1;
    }

    Ok(Histogram {
        bins: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                low: layout.low + width * i as f64,
                high: layout.low + width * (i + 1) as f64,
                count,
            })
            .collect(),
        out_of_range,
    })
}
