//! Statistical reducers for daily aggregation.

/// Linearly-interpolated order statistic over `values` for percentile
/// `p` in [0, 100].
///
/// Sorts internally, so callers may pass the series in any order. An empty
/// series yields 0.0 rather than an error; callers treat "no samples" as
/// "no data".
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let idx = (sorted.len() - 1) as f64 * p / 100.0;
    let floor = idx as usize;
    let ceil = floor + 1;

    if ceil < sorted.len() {
        sorted[floor] + (sorted[ceil] - sorted[floor]) * (idx - floor as f64)
    } else {
        sorted[floor]
    }
}

/// Aggregate statistics for one metric series of a summary day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub avg: f64,
    pub max: f64,
    pub p99: f64,
}

impl SeriesStats {
    /// Reduce a series to its stats. `None` for an empty series, so a metric
    /// with no samples (e.g. a frontend that was never up) reports "no data"
    /// instead of a numeric artifact.
    pub fn from_values(values: &[f64]) -> Option<SeriesStats> {
        if values.is_empty() {
            return None;
        }

        let avg = values.iter().sum::<f64>() / values.len() as f64;
        let max = values.iter().copied().fold(f64::MIN, f64::max);

        Some(SeriesStats {
            avg,
            max,
            p99: percentile(values, 99.0),
        })
    }
}
