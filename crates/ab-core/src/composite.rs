//! Zero-inflated ("delta") composite samplers.
//!
//! A delta model multiplies the Beta posterior of "observation is non-zero"
//! elementwise with a continuous posterior fitted on the non-zero subset.
//! The Beta rows for all variants come from one generator; each continuous
//! row gets its own.

use crate::error::{check_length, Result};
use crate::posterior::{beta_posteriors_all, lognormal_posteriors, normal_posteriors};
use crate::stats::{BernoulliStats, DeltaLognormalStats, DeltaNormalStats};
use ab_config::{BetaPrior, NormalInverseGammaPrior};
use rand::Rng;

/// Elementwise product of a Beta row and a continuous row.
pub fn delta_samples(beta_row: &[f64], continuous_row: &[f64]) -> Vec<f64> {
    beta_row
        .iter()
        .zip(continuous_row)
        .map(|(b, c)| b * c)
        .collect()
}

/// True when no variant has a single non-zero observation.
pub fn all_zero(positives: impl IntoIterator<Item = u64>) -> bool {
    positives.into_iter().all(|p| p == 0)
}

/// Delta-lognormal draws: P(non-zero) × exp(μ + σ²/2) of the positive values.
pub fn delta_lognormal_posteriors<R: Rng, C: Rng>(
    stats: &[DeltaLognormalStats],
    beta_priors: &[BetaPrior],
    nig_priors: &[NormalInverseGammaPrior],
    sim_count: usize,
    beta_rng: &mut R,
    continuous_rngs: &mut [C],
) -> Result<Vec<Vec<f64>>> {
    check_length("normal-inverse-gamma priors", stats.len(), nig_priors.len())?;
    check_length("generators", stats.len(), continuous_rngs.len())?;
    let bernoulli: Vec<BernoulliStats> = stats
        .iter()
        .map(|s| BernoulliStats::new(s.total, s.positives))
        .collect();
    let beta_rows = beta_posteriors_all(&bernoulli, beta_priors, sim_count, beta_rng)?;

    stats
        .iter()
        .zip(nig_priors)
        .zip(continuous_rngs.iter_mut())
        .zip(&beta_rows)
        .map(|(((s, prior), rng), beta_row)| {
            let continuous = lognormal_posteriors(&s.log_stats(), prior, sim_count, rng)?;
            Ok(delta_samples(beta_row, &continuous))
        })
        .collect()
}

/// Delta-normal draws: P(non-zero) × μ of the non-zero values.
pub fn delta_normal_posteriors<R: Rng, C: Rng>(
    stats: &[DeltaNormalStats],
    beta_priors: &[BetaPrior],
    nig_priors: &[NormalInverseGammaPrior],
    sim_count: usize,
    beta_rng: &mut R,
    continuous_rngs: &mut [C],
) -> Result<Vec<Vec<f64>>> {
    check_length("normal-inverse-gamma priors", stats.len(), nig_priors.len())?;
    check_length("generators", stats.len(), continuous_rngs.len())?;
    let bernoulli: Vec<BernoulliStats> = stats
        .iter()
        .map(|s| BernoulliStats::new(s.total, s.positives))
        .collect();
    let beta_rows = beta_posteriors_all(&bernoulli, beta_priors, sim_count, beta_rng)?;

    stats
        .iter()
        .zip(nig_priors)
        .zip(continuous_rngs.iter_mut())
        .zip(&beta_rows)
        .map(|(((s, prior), rng), beta_row)| {
            let (mu, _) = normal_posteriors(&s.non_zero_stats(), prior, sim_count, rng)?;
            Ok(delta_samples(beta_row, &mu))
        })
        .collect()
}
