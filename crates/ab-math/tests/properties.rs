//! Property-based tests for ab-math numerical functions.
//!
//! Uses proptest to verify mathematical properties hold across many random inputs.

use ab_math::dirichlet::{posterior_params, DirichletParams};
use ab_math::normal_ig::{self, NormalInverseGammaParams};
use ab_math::{
    beta_mean, beta_posterior_params, exponential_posterior_params, gamma_mean,
    poisson_posterior_params, round7,
};
use proptest::prelude::*;

/// Helper to check approximate equality.
fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

// ============================================================================
// Beta / Gamma update properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// The Beta posterior mean lies between the prior mean and the observed rate.
    #[test]
    fn beta_posterior_mean_shrinks_toward_prior(
        (total, positives) in (1u32..100_000).prop_flat_map(|n| (Just(n), 0..=n)),
        a in 0.1..10.0f64,
        b in 0.1..10.0f64,
    ) {
        let (post_a, post_b) = beta_posterior_params(positives as f64, total as f64, a, b);
        let mean = beta_mean(post_a, post_b);
        let observed = positives as f64 / total as f64;
        let prior = beta_mean(a, b);
        prop_assert!(mean >= observed.min(prior) - 1e-12 && mean <= observed.max(prior) + 1e-12);
    }

    /// More data never widens the posterior: rate and shape only grow.
    #[test]
    fn gamma_updates_grow_parameters(
        total in 0.0..10_000.0f64,
        sum in 0.0..10_000.0f64,
        shape in 0.01..10.0f64,
        rate in 0.01..10.0f64,
    ) {
        let (ps, pr) = poisson_posterior_params(total, sum, shape, rate);
        prop_assert!(ps >= shape && pr >= rate);
        let (es, er) = exponential_posterior_params(total, sum, shape, rate);
        prop_assert!(es >= shape && er >= rate);
        prop_assert!(approx_eq(gamma_mean(ps, pr), (shape + sum) / (rate + total), 1e-12));
    }
}

// ============================================================================
// Conjugate update properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Posterior mean of μ lies between the prior mean and the sample mean.
    #[test]
    fn nig_posterior_mean_is_convex_combination(
        n in 1.0..1000.0f64,
        x_bar in -50.0..50.0f64,
        m in -50.0..50.0f64,
        w in 0.001..100.0f64,
    ) {
        let prior = NormalInverseGammaParams::new(m, 0.0, 0.0, w);
        let post = normal_ig::posterior_params(n, n * x_bar, n * x_bar * x_bar + n, &prior).unwrap();
        let lo = x_bar.min(m) - 1e-9;
        let hi = x_bar.max(m) + 1e-9;
        prop_assert!(post.mean >= lo && post.mean <= hi);
        prop_assert!(post.scale >= 0.0);
        prop_assert!(approx_eq(post.weight, n + w, 1e-12));
    }

    /// Dirichlet updates add counts to the prior concentration.
    #[test]
    fn dirichlet_posterior_adds_counts(counts in prop::collection::vec(0.0..500.0f64, 1..8)) {
        let prior = DirichletParams::new(vec![0.5; counts.len()]).unwrap();
        let post = posterior_params(&prior, &counts).unwrap();
        prop_assert_eq!(post.k(), counts.len());
        for (a, c) in post.alpha.iter().zip(&counts) {
            prop_assert!(approx_eq(*a, c + 0.5, 1e-9));
        }
    }

    /// Rounding is idempotent.
    #[test]
    fn round7_idempotent(x in -1e6..1e6f64) {
        prop_assert_eq!(round7(round7(x)), round7(x));
    }
}
