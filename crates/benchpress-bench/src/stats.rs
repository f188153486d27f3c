//! Timing statistics.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Summary of timed rounds, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation; zero for a single round.
    pub stddev: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    /// Rounds per second at the mean.
    pub ops: f64,
    pub total: f64,
    pub rounds: usize,
}

impl TimingStats {
    /// Summarize samples. Returns `None` when there are none.
    pub fn from_samples(samples: &[Duration]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut secs: Vec<f64> = samples.iter().map(Duration::as_secs_f64).collect();
        secs.sort_by(f64::total_cmp);

        let n = secs.len();
        let total: f64 = secs.iter().sum();
        let mean = total / n as f64;
        let stddev = if n > 1 {
            let var = secs.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };
        let q1 = quantile(&secs, 0.25);
        let q3 = quantile(&secs, 0.75);

        Some(Self {
            min: secs[0],
            max: secs[n - 1],
            mean,
            stddev,
            median: quantile(&secs, 0.5),
            q1,
            q3,
            iqr: q3 - q1,
            ops: if mean > 0.0 { 1.0 / mean } else { 0.0 },
            total,
            rounds: n,
        })
    }
}

/// Linear-interpolation quantile of sorted data.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|&v| Duration::from_millis(v)).collect()
    }

    #[test]
    fn test_empty() {
        assert!(TimingStats::from_samples(&[]).is_none());
    }

    #[test]
    fn test_single_round() {
        let stats = TimingStats::from_samples(&ms(&[250])).unwrap();
        assert_eq!(stats.rounds, 1);
        assert_eq!(stats.stddev, 0.0);
        assert_eq!(stats.median, 0.25);
        assert_eq!(stats.iqr, 0.0);
        assert_eq!(stats.ops, 4.0);
    }

    #[test]
    fn test_unsorted_samples() {
        let stats = TimingStats::from_samples(&ms(&[400, 100, 300, 200, 500])).unwrap();
        assert!((stats.min - 0.1).abs() < 1e-12);
        assert!((stats.max - 0.5).abs() < 1e-12);
        assert!((stats.mean - 0.3).abs() < 1e-12);
        assert!((stats.median - 0.3).abs() < 1e-12);
        assert!((stats.q1 - 0.2).abs() < 1e-12);
        assert!((stats.q3 - 0.4).abs() < 1e-12);
        assert!((stats.total - 1.5).abs() < 1e-12);
        // sqrt(0.1 / 4)
        assert!((stats.stddev - 0.158_113_883).abs() < 1e-6);
    }

    #[test]
    fn test_even_count_median() {
        let stats = TimingStats::from_samples(&ms(&[100, 200, 300, 400])).unwrap();
        assert!((stats.median - 0.25).abs() < 1e-12);
        assert!((stats.q1 - 0.175).abs() < 1e-12);
    }
}
