//! Credible intervals from posterior draws.
//!
//! Quantile intervals use linear interpolation between order statistics.
//! Highest-density intervals are the narrowest window of sorted draws that
//! holds `ceil(alpha · S)` of them.

use crate::error::{Error, Result};
use crate::matrix::SampleMatrix;
use ab_math::round7;
use serde::{Deserialize, Serialize};

/// Closed interval `[low, high]` of a variant's effect parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// `(NaN, NaN)`, reported when nothing was sampled.
    pub fn undefined() -> Self {
        Self::new(f64::NAN, f64::NAN)
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    fn rounded(self) -> Self {
        Self::new(round7(self.low), round7(self.high))
    }
}

/// Reject interval masses outside the open interval (0, 1).
pub fn validate_interval_alpha(alpha: f64) -> Result<()> {
    if alpha.is_nan() || alpha <= 0.0 || alpha >= 1.0 {
        return Err(Error::InvalidIntervalAlpha(alpha));
    }
    Ok(())
}

fn sorted(row: &[f64]) -> Vec<f64> {
    let mut values = row.to_vec();
    values.sort_by(f64::total_cmp);
    values
}

/// Quantile `q ∈ [0, 1]` of sorted data with linear interpolation.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Equal-tailed interval `[q((1−α)/2), q((1+α)/2)]` of one row of draws.
pub fn quantile_interval(row: &[f64], alpha: f64) -> Interval {
    let values = sorted(row);
    Interval::new(
        quantile(&values, (1.0 - alpha) / 2.0),
        quantile(&values, (1.0 + alpha) / 2.0),
    )
}

/// Shortest window of one row of draws holding `ceil(α · S)` values.
pub fn hdi_interval(row: &[f64], alpha: f64) -> Interval {
    let values = sorted(row);
    let n = values.len();
    if n == 0 {
        return Interval::undefined();
    }
    let window = ((alpha * n as f64).ceil() as usize).clamp(1, n);
    let (start, _) = (0..=n - window)
        .map(|i| (i, values[i + window - 1] - values[i]))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best });
    Interval::new(values[start], values[start + window - 1])
}

/// Per-variant quantile credible intervals, rounded to 7 decimals.
pub fn credible_intervals(matrix: &SampleMatrix, interval_alpha: f64) -> Result<Vec<Interval>> {
    validate_interval_alpha(interval_alpha)?;
    Ok(matrix
        .rows()
        .map(|row| quantile_interval(row, interval_alpha).rounded())
        .collect())
}

/// Per-variant highest-density intervals, rounded to 7 decimals.
pub fn highest_density_intervals(
    matrix: &SampleMatrix,
    interval_alpha: f64,
) -> Result<Vec<Interval>> {
    validate_interval_alpha(interval_alpha)?;
    Ok(matrix
        .rows()
        .map(|row| hdi_interval(row, interval_alpha).rounded())
        .collect())
}
