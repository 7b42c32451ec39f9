//! Beta distribution utilities for Beta-Bernoulli conversion models.

/// Posterior Beta parameters after observing `positives` successes in `total` trials.
///
/// Returns `(positives + prior_alpha, total - positives + prior_beta)`.
pub fn beta_posterior_params(
    positives: f64,
    total: f64,
    prior_alpha: f64,
    prior_beta: f64,
) -> (f64, f64) {
    (positives + prior_alpha, total - positives + prior_beta)
}

/// Mean of Beta(alpha, beta) = alpha / (alpha + beta).
pub fn beta_mean(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    alpha / (alpha + beta)
}
