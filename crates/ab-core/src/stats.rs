//! Per-variant sufficient statistics, one struct per data family.
//!
//! Samplers trust these values; the experiment layer validates raw input
//! before building them.

use serde::{Deserialize, Serialize};

/// Conversion data: `positives` successes out of `total` trials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BernoulliStats {
    pub total: u64,
    pub positives: u64,
}

impl BernoulliStats {
    pub fn new(total: u64, positives: u64) -> Self {
        Self { total, positives }
    }
}

/// Real-valued data summarized by count, sum and sum of squares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalStats {
    pub total: u64,
    pub sum: f64,
    pub sum_of_squares: f64,
}

impl NormalStats {
    pub fn new(total: u64, sum: f64, sum_of_squares: f64) -> Self {
        Self {
            total,
            sum,
            sum_of_squares,
        }
    }

    /// Aggregate raw observations.
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            total: values.len() as u64,
            sum: values.iter().sum(),
            sum_of_squares: values.iter().map(|x| x * x).sum(),
        }
    }
}

/// Zero-inflated positive data; log statistics cover the positive subset only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaLognormalStats {
    pub total: u64,
    pub positives: u64,
    pub sum_of_logs: f64,
    pub sum_of_logs_squared: f64,
}

impl DeltaLognormalStats {
    pub fn new(total: u64, positives: u64, sum_of_logs: f64, sum_of_logs_squared: f64) -> Self {
        Self {
            total,
            positives,
            sum_of_logs,
            sum_of_logs_squared,
        }
    }

    /// Statistics of the log-transformed positive subset.
    pub fn log_stats(&self) -> NormalStats {
        NormalStats::new(self.positives, self.sum_of_logs, self.sum_of_logs_squared)
    }
}

/// Zero-inflated real data; sums cover the non-zero subset only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaNormalStats {
    pub total: u64,
    pub positives: u64,
    pub sum: f64,
    pub sum_of_squares: f64,
}

impl DeltaNormalStats {
    pub fn new(total: u64, positives: u64, sum: f64, sum_of_squares: f64) -> Self {
        Self {
            total,
            positives,
            sum,
            sum_of_squares,
        }
    }

    /// Statistics of the non-zero subset.
    pub fn non_zero_stats(&self) -> NormalStats {
        NormalStats::new(self.positives, self.sum, self.sum_of_squares)
    }
}

/// Categorical counts, one entry per state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirichletStats {
    pub concentration: Vec<f64>,
}

impl DirichletStats {
    pub fn new(concentration: Vec<f64>) -> Self {
        Self { concentration }
    }
}

/// Count or duration data summarized by count and sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateStats {
    pub total: u64,
    pub sum: f64,
}

impl RateStats {
    pub fn new(total: u64, sum: f64) -> Self {
        Self { total, sum }
    }
}
