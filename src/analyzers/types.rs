//! Report types produced by the analyzers.
//!
//! Every statistic that can be undefined (empty partition, all-missing
//! student) is an `Option`, serialized as `null`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::grade::Letter;

/// Descriptive summary of a set of present scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
}

/// Pass/fail counts over student averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassSummary {
    pub threshold: f64,
    pub total_students: usize,
    pub passed: usize,
    pub failed: usize,
    /// Students with no present score at all.
    pub no_data: usize,
    /// Percentages of `total_students`.
    pub pass_rate: Option<f64>,
    pub fail_rate: Option<f64>,
}

/// Per-subject statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectReport {
    pub subject: String,
    pub stats: Option<DescriptiveStats>,
    pub present: usize,
    pub missing: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage of present scores that pass.
    pub pass_rate: Option<f64>,
}

/// Mean of one subject, flagged when it falls below the pass threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectMean {
    pub subject: String,
    pub mean: Option<f64>,
    pub struggling: bool,
}

/// Class-wide summary, the engine's main report.
#[derive(Debug, Clone, Serialize)]
pub struct ClassSummary {
    pub generated_at: DateTime<Utc>,
    pub roster_version: u64,
    /// Over every present score of every student and subject.
    pub all_scores: Option<DescriptiveStats>,
    /// Over the per-student Average column.
    pub averages: Option<DescriptiveStats>,
    pub pass: PassSummary,
    pub subjects: Vec<SubjectReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandCount {
    pub letter: Letter,
    pub count: usize,
    pub percentage: Option<f64>,
}

/// Letter-grade distribution of a set of scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    /// Number of present scores.
    pub total: usize,
    pub missing: usize,
    pub bands: Vec<BandCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdCount {
    pub threshold: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub low: f64,
    pub high: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    /// Present scores outside the binned range.
    pub out_of_range: usize,
}
