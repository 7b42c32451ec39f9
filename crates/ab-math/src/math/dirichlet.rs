//! Dirichlet-Multinomial conjugate model for categorical outcomes.
//!
//! This module provides posterior updates for categorical data with
//! numeric states (dice faces, 1-5 star ratings, ...).
//!
//! The model uses:
//! - Prior: `p = (p_1..p_K) ~ Dirichlet(α_1..α_K)`
//! - Likelihood: `n = (n_1..n_K) | p ~ Multinomial(N, p)` where `N = Σ_i n_i`
//! - Posterior: `p | n ~ Dirichlet(α_i + n_i)`

use serde::{Deserialize, Serialize};

/// Parameters for a Dirichlet distribution used in Dirichlet-Multinomial conjugate updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirichletParams {
    /// Concentration parameters (all must be > 0)
    pub alpha: Vec<f64>,
}

impl DirichletParams {
    /// Create new Dirichlet parameters with validation.
    ///
    /// Returns None if any parameter is non-positive, NaN, or if the vector is empty.
    pub fn new(alpha: Vec<f64>) -> Option<Self> {
        if alpha.is_empty() {
            return None;
        }
        for &a in &alpha {
            if a.is_nan() || a <= 0.0 {
                return None;
            }
        }
        Some(Self { alpha })
    }

    /// Number of categories K.
    pub fn k(&self) -> usize {
        self.alpha.len()
    }
}

/// Compute posterior parameters after observing counts: `α_i + n_i`.
///
/// Returns None when lengths differ, a count is negative/NaN, or the
/// resulting concentration is not strictly positive.
pub fn posterior_params(prior: &DirichletParams, counts: &[f64]) -> Option<DirichletParams> {
    if counts.len() != prior.k() {
        return None;
    }
    for &c in counts {
        if c.is_nan() || c < 0.0 {
            return None;
        }
    }

    let new_alpha: Vec<f64> = prior
        .alpha
        .iter()
        .zip(counts.iter())
        .map(|(&a, &n)| a + n)
        .collect();

    DirichletParams::new(new_alpha)
}

/// Expected numeric state under category probabilities: `Σ_i p_i · state_i`.
///
/// Returns NaN on length mismatch.
pub fn expected_state(probs: &[f64], states: &[f64]) -> f64 {
    if probs.len() != states.len() {
        return f64::NAN;
    }
    probs.iter().zip(states).map(|(p, s)| p * s).sum()
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
    fn dirichlet_params_new_valid() {
        let params = DirichletParams::new(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(params.k(), 3);
    }

    #[test]
    fn dirichlet_params_new_invalid() {
        assert!(DirichletParams::new(vec![]).is_none());
        assert!(DirichletParams::new(vec![1.0, 0.0]).is_none());
        assert!(DirichletParams::new(vec![1.0, -1.0]).is_none());
        assert!(DirichletParams::new(vec![f64::NAN]).is_none());
    }

    #[test]
    fn posterior_params_standard_update() {
        let prior = DirichletParams::new(vec![1.0; 3]).unwrap();
        let post = posterior_params(&prior, &[10.0, 0.0, 5.0]).unwrap();
        assert_eq!(post.alpha, vec![11.0, 1.0, 6.0]);
    }

    #[test]
    fn posterior_params_invalid_inputs() {
        let prior = DirichletParams::new(vec![1.0; 2]).unwrap();
        assert!(posterior_params(&prior, &[1.0]).is_none());
        assert!(posterior_params(&prior, &[1.0, -1.0]).is_none());
        assert!(posterior_params(&prior, &[1.0, f64::NAN]).is_none());
    }

    #[test]
    fn expected_state_of_fair_die() {
        let probs = vec![1.0 / 6.0; 6];
        let states = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert!(approx_eq(expected_state(&probs, &states), 3.5, 1e-12));
        assert!(expected_state(&probs, &states[..2]).is_nan());
    }
}
