//! Prior hyperparameter types.
//!
//! Every family has a low-information default. Defaults are constructed
//! fresh on each call; nothing is shared between variants.

use serde::{Deserialize, Serialize};

/// Beta distribution prior for conversion probabilities: Beta(alpha, beta).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaPrior {
    pub alpha: f64,
    pub beta: f64,
}

impl BetaPrior {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }
}

impl Default for BetaPrior {
    /// Jeffreys prior Beta(0.5, 0.5).
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.5,
        }
    }
}

/// Normal-Inverse-Gamma prior for data with unknown mean and variance.
///
/// `shape` and `scale` may start at 0: the posterior always folds in at
/// least one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalInverseGammaPrior {
    /// Prior mean `m`.
    pub mean: f64,
    /// Inverse-gamma shape `a`.
    pub shape: f64,
    /// Inverse-gamma scale `b`.
    pub scale: f64,
    /// Prior effective sample size `w`.
    pub weight: f64,
}

impl NormalInverseGammaPrior {
    pub fn new(mean: f64, shape: f64, scale: f64, weight: f64) -> Self {
        Self {
            mean,
            shape,
            scale,
            weight,
        }
    }
}

impl Default for NormalInverseGammaPrior {
    fn default() -> Self {
        Self {
            mean: 1.0,
            shape: 0.0,
            scale: 0.0,
            weight: 0.01,
        }
    }
}

/// Gamma distribution prior for rates: Gamma(shape, rate).
/// Note: uses RATE parameterization (rate = 1/scale).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaPrior {
    pub shape: f64,
    pub rate: f64,
}

impl GammaPrior {
    pub fn new(shape: f64, rate: f64) -> Self {
        Self { shape, rate }
    }
}

impl Default for GammaPrior {
    fn default() -> Self {
        Self {
            shape: 0.1,
            rate: 0.1,
        }
    }
}

/// Dirichlet prior over categorical state probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirichletPrior {
    pub alpha: Vec<f64>,
}

impl DirichletPrior {
    pub fn new(alpha: Vec<f64>) -> Self {
        Self { alpha }
    }

    /// Dirichlet(1, ..., 1): one pseudo-observation per state.
    pub fn uniform(k: usize) -> Self {
        Self {
            alpha: vec![1.0; k],
        }
    }

    pub fn len(&self) -> usize {
        self.alpha.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }
}
