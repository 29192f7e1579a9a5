use crate::analyzers::types::DescriptiveStats;

/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// Linearly interpolated percentile (`p` in 0.0–1.0) of ascending values.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Summarizes present values. `None` when there is nothing to summarize.
pub fn describe(values: impl IntoIterator<Item = f64>) -> Option<DescriptiveStats> {
    let mut sorted: Vec<f64> = values.into_iter().collect();
    sorted.sort_by(f64::total_cmp);

    let mean = mean(&sorted)?;

    Some(DescriptiveStats {
        count: sorted.len(),
        mean,
        median: percentile_sorted(&sorted, 0.5),
        std_dev: stddev(&sorted, mean),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        q1: percentile_sorted(&sorted, 0.25),
        q3: percentile_sorted(&sorted, 0.75),
    })
}

/// Share of `part` in `total` as a percentage, undefined for an empty total.
pub fn pct(part: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some((part as f64 / total as f64) * 100.0)
    }
}
