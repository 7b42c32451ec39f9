//! Conjugate posterior samplers.
//!
//! Each sampler draws `sim_count` values of a variant's effect parameter
//! from its closed-form posterior. Generators are always passed in
//! explicitly; nothing here touches global random state.
//!
//! Note: `rand_distr` uses the shape-scale parameterization for Gamma,
//! so rates are inverted at the call site.

use crate::error::{check_length, Error, Result};
use crate::matrix::SampleMatrix;
use crate::stats::{BernoulliStats, NormalStats, RateStats};
use ab_config::{BetaPrior, GammaPrior, NormalInverseGammaPrior};
use ab_math::dirichlet::{self, DirichletParams};
use ab_math::normal_ig::{self, NormalInverseGammaParams};
use ab_math::{beta_posterior_params, exponential_posterior_params, poisson_posterior_params};
use rand::Rng;
use rand_distr::{Beta, Distribution, Gamma, StandardNormal};

/// Beta posterior draws of the conversion rate for one variant.
pub fn beta_posterior<R: Rng + ?Sized>(
    stats: &BernoulliStats,
    prior: &BetaPrior,
    sim_count: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let (alpha, beta) = beta_posterior_params(
        stats.positives as f64,
        stats.total as f64,
        prior.alpha,
        prior.beta,
    );
    let dist = Beta::new(alpha, beta).map_err(|e| Error::invalid_parameter("beta", e))?;
    Ok((0..sim_count).map(|_| dist.sample(rng)).collect())
}

/// Beta posterior rows for all variants, drawn in order from one generator.
pub fn beta_posteriors_all<R: Rng + ?Sized>(
    stats: &[BernoulliStats],
    priors: &[BetaPrior],
    sim_count: usize,
    rng: &mut R,
) -> Result<Vec<Vec<f64>>> {
    check_length("beta priors", stats.len(), priors.len())?;
    stats
        .iter()
        .zip(priors)
        .map(|(s, p)| beta_posterior(s, p, sim_count, rng))
        .collect()
}

/// Joint Normal-Inverse-Gamma draws `(μ, σ²)`.
///
/// With no observations both vectors are zeros. A zero posterior scale
/// (no spread and no disagreement with the prior mean) gives σ² = 0 and
/// μ fixed at the posterior mean.
pub fn normal_posteriors<R: Rng + ?Sized>(
    stats: &NormalStats,
    prior: &NormalInverseGammaPrior,
    sim_count: usize,
    rng: &mut R,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let params = NormalInverseGammaParams::new(prior.mean, prior.shape, prior.scale, prior.weight);
    let Some(post) = normal_ig::posterior_params(
        stats.total as f64,
        stats.sum,
        stats.sum_of_squares,
        &params,
    ) else {
        return Ok((vec![0.0; sim_count], vec![0.0; sim_count]));
    };

    let inv_scale = 1.0 / post.scale;
    let sigma2: Vec<f64> = if post.scale > 0.0 && inv_scale.is_finite() {
        let gamma = Gamma::new(post.shape, inv_scale)
            .map_err(|e| Error::invalid_parameter("inverse-gamma", e))?;
        (0..sim_count).map(|_| 1.0 / gamma.sample(rng)).collect()
    } else {
        vec![0.0; sim_count]
    };

    let mu = sigma2
        .iter()
        .map(|&s2| {
            let z: f64 = StandardNormal.sample(rng);
            post.mean + post.mean_std_dev(s2) * z
        })
        .collect();

    Ok((mu, sigma2))
}

/// Log-normal mean draws `exp(μ + σ²/2)` from statistics of the log data.
///
/// With very few positive observations the inverse-gamma variance draws are
/// heavy tailed, so `exp(μ + σ²/2)` can overflow to `inf`. Losses computed
/// from such rows come out as NaN.
pub fn lognormal_posteriors<R: Rng + ?Sized>(
    log_stats: &NormalStats,
    prior: &NormalInverseGammaPrior,
    sim_count: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    if log_stats.total == 0 {
        return Ok(vec![0.0; sim_count]);
    }
    let (mu, sigma2) = normal_posteriors(log_stats, prior, sim_count, rng)?;
    Ok(mu
        .iter()
        .zip(&sigma2)
        .map(|(&m, &s2)| normal_ig::lognormal_mean(m, s2))
        .collect())
}

/// Gamma(shape, rate) draws.
pub fn gamma_posterior<R: Rng + ?Sized>(
    shape: f64,
    rate: f64,
    sim_count: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    if !(rate > 0.0 && rate.is_finite()) {
        return Err(Error::invalid_parameter(
            "gamma",
            format!("rate must be positive and finite, got {rate}"),
        ));
    }
    let dist = Gamma::new(shape, 1.0 / rate).map_err(|e| Error::invalid_parameter("gamma", e))?;
    Ok((0..sim_count).map(|_| dist.sample(rng)).collect())
}

/// Poisson rate draws `λ ~ Gamma(a + Σx, b + n)`.
pub fn poisson_posterior<R: Rng + ?Sized>(
    stats: &RateStats,
    prior: &GammaPrior,
    sim_count: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let (shape, rate) = poisson_posterior_params(stats.total as f64, stats.sum, prior.shape, prior.rate);
    gamma_posterior(shape, rate, sim_count, rng)
}

/// Mean-duration draws `1/λ` where `λ ~ Gamma(a + n, b + Σx)`.
pub fn exponential_posterior<R: Rng + ?Sized>(
    stats: &RateStats,
    prior: &GammaPrior,
    sim_count: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let (shape, rate) =
        exponential_posterior_params(stats.total as f64, stats.sum, prior.shape, prior.rate);
    let rates = gamma_posterior(shape, rate, sim_count, rng)?;
    Ok(rates.into_iter().map(|lambda| 1.0 / lambda).collect())
}

/// Dirichlet posterior probability vectors, one row per draw (`S × K`).
///
/// Each row is a set of independent Gamma(α_k, 1) draws normalized to sum to 1.
pub fn dirichlet_posteriors<R: Rng + ?Sized>(
    concentration: &[f64],
    prior_alpha: &[f64],
    sim_count: usize,
    rng: &mut R,
) -> Result<SampleMatrix> {
    check_length("dirichlet prior", concentration.len(), prior_alpha.len())?;
    let post = DirichletParams::new(prior_alpha.to_vec())
        .and_then(|prior| dirichlet::posterior_params(&prior, concentration))
        .ok_or_else(|| {
            Error::invalid_parameter(
                "dirichlet",
                "concentration must be non-negative and prior alpha positive",
            )
        })?;
    let gammas = post
        .alpha
        .iter()
        .map(|&a| Gamma::new(a, 1.0).map_err(|e| Error::invalid_parameter("dirichlet", e)))
        .collect::<Result<Vec<_>>>()?;

    let rows = (0..sim_count)
        .map(|_| {
            let draws: Vec<f64> = gammas.iter().map(|g| g.sample(rng)).collect();
            let total: f64 = draws.iter().sum();
            draws.into_iter().map(|d| d / total).collect()
        })
        .collect();
    SampleMatrix::from_rows(rows)
}

/// Expected state value `Σ p_k · state_k` for each Dirichlet draw.
pub fn dirichlet_expected_values<R: Rng + ?Sized>(
    concentration: &[f64],
    prior_alpha: &[f64],
    states: &[f64],
    sim_count: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    check_length("states", concentration.len(), states.len())?;
    let probs = dirichlet_posteriors(concentration, prior_alpha, sim_count, rng)?;
    Ok(probs
        .rows()
        .map(|p| dirichlet::expected_state(p, states))
        .collect())
}
