//! Normal-Inverse-Gamma conjugate model for data with unknown mean and variance.
//!
//! The model uses:
//! - Prior: `σ² ~ InvGamma(a, b)`, `μ | σ² ~ Normal(m, σ²/w)`
//! - Likelihood: `x_i | μ, σ² ~ Normal(μ, σ²)`, summarized by `(n, Σx, Σx²)`
//! - Posterior: `σ² ~ InvGamma(a', b')`, `μ | σ² ~ Normal(m', σ²/(n+w))`
//!
//! where
//! - `x̄ = Σx / n`
//! - `a' = a + n/2`
//! - `b' = b + ½(Σx² − 2·Σx·x̄ + n·x̄²) + n·w / (2(n+w)) · (x̄ − m)²`
//! - `m' = (n·x̄ + w·m) / (n + w)`
//!
//! `b` is used as a *scale* for the inverse gamma, so a sampler draws
//! `σ² = 1 / Gamma(a', scale = 1/b')`.
//!
//! `a = 0, b = 0` is accepted as the flat limit since the update always
//! folds in at least one observation.

use serde::{Deserialize, Serialize};

/// Normal-Inverse-Gamma hyperparameters `(m, a, b, w)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalInverseGammaParams {
    /// Mean of μ.
    pub mean: f64,
    /// Inverse-gamma shape `a`.
    pub shape: f64,
    /// Inverse-gamma scale `b`.
    pub scale: f64,
    /// Effective sample size `w` backing the mean.
    pub weight: f64,
}

impl NormalInverseGammaParams {
    pub fn new(mean: f64, shape: f64, scale: f64, weight: f64) -> Self {
        Self {
            mean,
            shape,
            scale,
            weight,
        }
    }

    /// Expected value of μ (the posterior point estimate when these are posterior params).
    pub fn mean_of_mean(&self) -> f64 {
        self.mean
    }

    /// Standard deviation scale applied to a σ² draw: `sqrt(σ² / w)`.
    pub fn mean_std_dev(&self, sigma2: f64) -> f64 {
        (sigma2 / self.weight).sqrt()
    }
}

/// Compute posterior hyperparameters after observing `(total, sum, sum_of_squares)`.
///
/// Returns None when `total <= 0` or any input is NaN; callers pick a fallback.
pub fn posterior_params(
    total: f64,
    sum: f64,
    sum_of_squares: f64,
    prior: &NormalInverseGammaParams,
) -> Option<NormalInverseGammaParams> {
    if total.is_nan() || sum.is_nan() || sum_of_squares.is_nan() || total <= 0.0 {
        return None;
    }
    let NormalInverseGammaParams {
        mean: m,
        shape: a,
        scale: b,
        weight: w,
    } = *prior;

    let x_bar = sum / total;
    let shape = a + total / 2.0;
    let spread = sum_of_squares - 2.0 * sum * x_bar + total * x_bar * x_bar;
    let shrink = (total * w) / (2.0 * (total + w)) * (x_bar - m).powi(2);
    let scale = b + 0.5 * spread + shrink;
    let mean = (total * x_bar + w * m) / (total + w);

    Some(NormalInverseGammaParams {
        mean,
        shape,
        scale: scale.max(0.0),
        weight: total + w,
    })
}

/// Log-normal mean transform `exp(μ + σ²/2)`.
pub fn lognormal_mean(mu: f64, sigma2: f64) -> f64 {
    (mu + sigma2 / 2.0).exp()
}
