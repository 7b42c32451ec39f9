//! Gamma conjugate updates for Poisson and exponential rate models.
//!
//! # Parameterization
//!
//! Uses **rate parameterization**: `Gamma(α, β)` where:
//! - `α` = shape parameter (α > 0)
//! - `β` = rate parameter (β > 0)
//!
//! This is equivalent to scale parameterization with `θ = 1/β`; samplers in
//! `ab-core` convert at the call site.

/// Posterior `(shape, rate)` of a Poisson rate after `total` observations summing to `sum`.
///
/// `λ | data ~ Gamma(α + Σx, β + n)`
pub fn poisson_posterior_params(total: f64, sum: f64, prior_shape: f64, prior_rate: f64) -> (f64, f64) {
    (prior_shape + sum, prior_rate + total)
}

/// Posterior `(shape, rate)` of an exponential rate after `total` durations summing to `sum`.
///
/// `λ | data ~ Gamma(α + n, β + Σx)`
pub fn exponential_posterior_params(
    total: f64,
    sum: f64,
    prior_shape: f64,
    prior_rate: f64,
) -> (f64, f64) {
    (prior_shape + total, prior_rate + sum)
}

/// Mean of Gamma(α, β).
///
/// E[T] = α / β
pub fn gamma_mean(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    alpha / beta
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn poisson_update_adds_sum_to_shape() {
        let (shape, rate) = poisson_posterior_params(100.0, 77.0, 0.1, 0.1);
        assert!(approx_eq(shape, 77.1, 1e-12));
        assert!(approx_eq(rate, 100.1, 1e-12));
    }

    #[test]
    fn exponential_update_adds_count_to_shape() {
        let (shape, rate) = exponential_posterior_params(100.0, 1040.3, 0.1, 0.1);
        assert!(approx_eq(shape, 100.1, 1e-12));
        assert!(approx_eq(rate, 1040.4, 1e-9));
    }

    #[test]
    fn mean_of_posterior() {
        assert!(approx_eq(gamma_mean(3.0, 2.0), 1.5, 1e-12));
        let (shape, rate) = poisson_posterior_params(20.0, 45.0, 0.1, 0.1);
        assert!(approx_eq(gamma_mean(shape, rate), 45.1 / 20.1, 1e-12));
    }

    #[test]
    fn invalid_parameters_yield_nan() {
        assert!(gamma_mean(0.0, 1.0).is_nan());
        assert!(gamma_mean(1.0, 0.0).is_nan());
        assert!(gamma_mean(f64::NAN, 1.0).is_nan());
    }
}
