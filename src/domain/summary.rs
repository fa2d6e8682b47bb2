//! Summary statistics over the per-iteration results, plus persistence of
//! the raw values as a flat JSON list (the interchange format the separate
//! comparison tooling consumes).

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Summary statistics for a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// Sample standard deviation; only defined for more than one value
    pub stdev: Option<f64>,
}

impl Summary {
    /// Spread of the observed values.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Summarize a run's results. Returns `None` for an empty slice.
pub fn summarize(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let stdev = if values.len() > 1 {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        Some((sum_sq / (n - 1.0)).sqrt())
    } else {
        None
    };

    Some(Summary {
        min,
        max,
        median: median(values),
        stdev,
    })
}

/// Median of a non-empty slice. Averages the two middle values for even
/// lengths.
pub(crate) fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Write the raw result values to `path` as a JSON list.
pub fn write_values(path: &Path, values: &[f64]) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), values)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_basic() {
        let summary = summarize(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 3.0);
        assert_eq!(summary.median, 2.0);
        assert_eq!(summary.stdev, Some(1.0));
        assert_eq!(summary.range(), 2.0);
    }

    #[test]
    fn test_summarize_single_value_omits_stdev() {
        let summary = summarize(&[0.0025]).unwrap();
        assert_eq!(summary.min, 0.0025);
        assert_eq!(summary.max, 0.0025);
        assert_eq!(summary.median, 0.0025);
        assert_eq!(summary.stdev, None);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn test_summarize_unordered_input() {
        let summary = summarize(&[3.0, 1.0, 2.0, 0.5]).unwrap();
        assert_eq!(summary.min, 0.5);
        assert_eq!(summary.max, 3.0);
        assert_eq!(summary.median, 1.5);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[5.0]), 5.0);
        assert_eq!(median(&[2.0, 1.0, 3.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
    }

    #[test]
    fn test_write_values_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        write_values(&path, &[0.0, 1.0, 2.5]).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let back: Vec<f64> = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, vec![0.0, 1.0, 2.5]);
    }
}
