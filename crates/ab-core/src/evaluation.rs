//! Evaluation orchestrators, one per data family.
//!
//! Each orchestrator validates its inputs, fills in default priors, derives
//! child generators from the root seed, samples every variant's posterior
//! into a [`SampleMatrix`] and reduces it to an [`EvaluationResult`].
//! Results are keyed by position: entry `i` belongs to input variant `i`.

use crate::composite::{all_zero, delta_lognormal_posteriors, delta_normal_posteriors};
use crate::error::{check_length, Error, Result};
use crate::intervals::{
    credible_intervals, highest_density_intervals, validate_interval_alpha, Interval,
};
use crate::matrix::SampleMatrix;
use crate::metrics::{expected_loss, probabilities_of_being_best};
use crate::posterior::{
    beta_posteriors_all, dirichlet_expected_values, exponential_posterior, normal_posteriors,
    poisson_posterior,
};
use crate::seeds::SeedSequence;
use crate::stats::{
    BernoulliStats, DeltaLognormalStats, DeltaNormalStats, DirichletStats, NormalStats, RateStats,
};
use ab_config::{BetaPrior, DirichletPrior, GammaPrior, NormalInverseGammaPrior, SimulationSettings};
use ab_math::round7;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Decision metrics and intervals for every variant of one evaluation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Probability each variant is the best.
    pub probabilities: Vec<f64>,
    /// Expected loss from choosing each variant.
    pub expected_loss: Vec<f64>,
    /// Equal-tailed credible interval of each variant's effect.
    pub credible_intervals: Vec<Interval>,
    /// Highest-density intervals, present when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdi_intervals: Option<Vec<Interval>>,
}

impl EvaluationResult {
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Result for `V = 0` variants.
    pub fn empty(settings: &SimulationSettings) -> Self {
        Self {
            hdi_intervals: settings.include_hdi.then(Vec::new),
            ..Self::default()
        }
    }

    /// Result when no variant has a non-zero observation: uniform
    /// probabilities, undefined losses and intervals.
    pub fn degenerate(n_variants: usize, settings: &SimulationSettings) -> Self {
        let share = round7(1.0 / n_variants as f64);
        Self {
            probabilities: vec![share; n_variants],
            expected_loss: vec![f64::NAN; n_variants],
            credible_intervals: vec![Interval::undefined(); n_variants],
            hdi_intervals: settings
                .include_hdi
                .then(|| vec![Interval::undefined(); n_variants]),
        }
    }

    /// Reduce a sample matrix to metrics and intervals.
    pub fn from_samples(matrix: &SampleMatrix, settings: &SimulationSettings) -> Result<Self> {
        let hdi_intervals = if settings.include_hdi {
            Some(highest_density_intervals(matrix, settings.interval_alpha)?)
        } else {
            None
        };
        Ok(Self {
            probabilities: probabilities_of_being_best(matrix, settings.min_is_best),
            expected_loss: expected_loss(matrix, settings.min_is_best),
            credible_intervals: credible_intervals(matrix, settings.interval_alpha)?,
            hdi_intervals,
        })
    }
}

fn check_settings(settings: &SimulationSettings) -> Result<()> {
    if settings.sim_count == 0 {
        return Err(Error::InvalidSimCount(settings.sim_count));
    }
    validate_interval_alpha(settings.interval_alpha)
}

/// Per-variant priors: the given slice (length-checked) or the default for every variant.
fn resolve_priors<T: Clone>(
    field: &'static str,
    priors: Option<&[T]>,
    n_variants: usize,
    default: impl Fn() -> T,
) -> Result<Vec<T>> {
    match priors {
        Some(priors) if !priors.is_empty() => {
            check_length(field, n_variants, priors.len())?;
            Ok(priors.to_vec())
        }
        _ => Ok((0..n_variants).map(|_| default()).collect()),
    }
}

fn finish(
    family: &str,
    rows: Vec<Vec<f64>>,
    settings: &SimulationSettings,
) -> Result<EvaluationResult> {
    let matrix = SampleMatrix::from_rows(rows)?;
    let result = EvaluationResult::from_samples(&matrix, settings)?;
    debug!(
        family,
        variants = matrix.n_variants(),
        sim_count = matrix.sim_count(),
        seeded = settings.seed.is_some(),
        min_is_best = settings.min_is_best,
        probabilities = ?result.probabilities,
        "evaluation complete"
    );
    Ok(result)
}

/// Beta-Bernoulli evaluation of conversion data.
pub fn evaluate_bernoulli(
    stats: &[BernoulliStats],
    priors: Option<&[BetaPrior]>,
    settings: &SimulationSettings,
) -> Result<EvaluationResult> {
    check_settings(settings)?;
    let priors = resolve_priors("beta priors", priors, stats.len(), BetaPrior::default)?;
    if stats.is_empty() {
        return Ok(EvaluationResult::empty(settings));
    }

    let mut rng = SeedSequence::new(settings.seed).spawn(1).remove(0);
    let rows = beta_posteriors_all(stats, &priors, settings.sim_count, &mut rng)?;
    finish("bernoulli", rows, settings)
}

/// Normal-Inverse-Gamma evaluation of the mean of real-valued data.
pub fn evaluate_normal(
    stats: &[NormalStats],
    priors: Option<&[NormalInverseGammaPrior]>,
    settings: &SimulationSettings,
) -> Result<EvaluationResult> {
    check_settings(settings)?;
    let priors = resolve_priors(
        "normal-inverse-gamma priors",
        priors,
        stats.len(),
        NormalInverseGammaPrior::default,
    )?;
    if stats.is_empty() {
        return Ok(EvaluationResult::empty(settings));
    }

    let mut rngs = SeedSequence::new(settings.seed).spawn(stats.len());
    let rows = stats
        .iter()
        .zip(&priors)
        .zip(rngs.iter_mut())
        .map(|((s, p), rng)| normal_posteriors(s, p, settings.sim_count, rng).map(|(mu, _)| mu))
        .collect::<Result<Vec<_>>>()?;
    finish("normal", rows, settings)
}

/// Delta-lognormal evaluation of zero-inflated positive data (e.g. revenue per session).
pub fn evaluate_delta_lognormal(
    stats: &[DeltaLognormalStats],
    beta_priors: Option<&[BetaPrior]>,
    nig_priors: Option<&[NormalInverseGammaPrior]>,
    settings: &SimulationSettings,
) -> Result<EvaluationResult> {
    check_settings(settings)?;
    let n = stats.len();
    let beta_priors = resolve_priors("beta priors", beta_priors, n, BetaPrior::default)?;
    let nig_priors = resolve_priors(
        "normal-inverse-gamma priors",
        nig_priors,
        n,
        NormalInverseGammaPrior::default,
    )?;
    if n == 0 {
        return Ok(EvaluationResult::empty(settings));
    }
    if all_zero(stats.iter().map(|s| s.positives)) {
        debug!(family = "delta_lognormal", variants = n, "no non-zero observations");
        return Ok(EvaluationResult::degenerate(n, settings));
    }

    let mut seeds = SeedSequence::new(settings.seed);
    let mut beta_rng = seeds.spawn(1).remove(0);
    let mut rngs = seeds.spawn(n);
    let rows = delta_lognormal_posteriors(
        stats,
        &beta_priors,
        &nig_priors,
        settings.sim_count,
        &mut beta_rng,
        &mut rngs,
    )?;
    finish("delta_lognormal", rows, settings)
}

/// Delta-normal evaluation of zero-inflated real data.
pub fn evaluate_delta_normal(
    stats: &[DeltaNormalStats],
    beta_priors: Option<&[BetaPrior]>,
    nig_priors: Option<&[NormalInverseGammaPrior]>,
    settings: &SimulationSettings,
) -> Result<EvaluationResult> {
    check_settings(settings)?;
    let n = stats.len();
    let beta_priors = resolve_priors("beta priors", beta_priors, n, BetaPrior::default)?;
    let nig_priors = resolve_priors(
        "normal-inverse-gamma priors",
        nig_priors,
        n,
        NormalInverseGammaPrior::default,
    )?;
    if n == 0 {
        return Ok(EvaluationResult::empty(settings));
    }
    if all_zero(stats.iter().map(|s| s.positives)) {
        debug!(family = "delta_normal", variants = n, "no non-zero observations");
        return Ok(EvaluationResult::degenerate(n, settings));
    }

    let mut seeds = SeedSequence::new(settings.seed);
    let mut beta_rng = seeds.spawn(1).remove(0);
    let mut rngs = seeds.spawn(n);
    let rows = delta_normal_posteriors(
        stats,
        &beta_priors,
        &nig_priors,
        settings.sim_count,
        &mut beta_rng,
        &mut rngs,
    )?;
    finish("delta_normal", rows, settings)
}

/// Dirichlet-multinomial evaluation of the expected state value of categorical data.
pub fn evaluate_dirichlet(
    states: &[f64],
    stats: &[DirichletStats],
    priors: Option<&[DirichletPrior]>,
    settings: &SimulationSettings,
) -> Result<EvaluationResult> {
    check_settings(settings)?;
    let priors = resolve_priors("dirichlet priors", priors, stats.len(), || {
        DirichletPrior::uniform(states.len())
    })?;
    for s in stats {
        check_length("concentration", states.len(), s.concentration.len())?;
    }
    if stats.is_empty() {
        return Ok(EvaluationResult::empty(settings));
    }

    let mut rngs = SeedSequence::new(settings.seed).spawn(stats.len());
    let rows = stats
        .iter()
        .zip(&priors)
        .zip(rngs.iter_mut())
        .map(|((s, p), rng)| {
            dirichlet_expected_values(&s.concentration, &p.alpha, states, settings.sim_count, rng)
        })
        .collect::<Result<Vec<_>>>()?;
    finish("dirichlet", rows, settings)
}

/// Gamma-Poisson evaluation of count rates.
pub fn evaluate_poisson(
    stats: &[RateStats],
    priors: Option<&[GammaPrior]>,
    settings: &SimulationSettings,
) -> Result<EvaluationResult> {
    check_settings(settings)?;
    let priors = resolve_priors("gamma priors", priors, stats.len(), GammaPrior::default)?;
    if stats.is_empty() {
        return Ok(EvaluationResult::empty(settings));
    }

    let mut rng = SeedSequence::new(settings.seed).spawn(1).remove(0);
    let rows = stats
        .iter()
        .zip(&priors)
        .map(|(s, p)| poisson_posterior(s, p, settings.sim_count, &mut rng))
        .collect::<Result<Vec<_>>>()?;
    finish("poisson", rows, settings)
}

/// Gamma-exponential evaluation of mean durations.
pub fn evaluate_exponential(
    stats: &[RateStats],
    priors: Option<&[GammaPrior]>,
    settings: &SimulationSettings,
) -> Result<EvaluationResult> {
    check_settings(settings)?;
    let priors = resolve_priors("gamma priors", priors, stats.len(), GammaPrior::default)?;
    if stats.is_empty() {
        return Ok(EvaluationResult::empty(settings));
    }

    let mut rng = SeedSequence::new(settings.seed).spawn(1).remove(0);
    let rows = stats
        .iter()
        .zip(&priors)
        .map(|(s, p)| exponential_posterior(s, p, settings.sim_count, &mut rng))
        .collect::<Result<Vec<_>>>()?;
    finish("exponential", rows, settings)
}
