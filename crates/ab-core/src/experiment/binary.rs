//! Conversion (0/1) experiments with a Beta-Bernoulli model.

use super::{prior_error, DataFamily, DecisionSummary, Experiment, ExperimentError, SUMMARY_DIGITS};
use crate::evaluation::{evaluate_bernoulli, EvaluationResult};
use crate::stats::BernoulliStats;
use ab_config::validate::validate_beta_prior;
use ab_config::{BetaPrior, SimulationSettings};
use ab_math::{beta_mean, beta_posterior_params, round_to};
use serde::{Deserialize, Serialize};

/// Binary data family.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binary;

/// Aggregated conversions of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinaryVariant {
    pub total: u64,
    pub positives: u64,
    #[serde(default)]
    pub prior: BetaPrior,
}

impl BinaryVariant {
    pub fn new(total: u64, positives: u64) -> Self {
        Self {
            total,
            positives,
            prior: BetaPrior::default(),
        }
    }

    pub fn with_prior(mut self, prior: BetaPrior) -> Self {
        self.prior = prior;
        self
    }

    pub fn stats(&self) -> BernoulliStats {
        BernoulliStats::new(self.total, self.positives)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryReport {
    pub variant: String,
    pub totals: u64,
    pub positives: u64,
    pub positive_rate: f64,
    pub posterior_mean: f64,
    #[serde(flatten)]
    pub decision: DecisionSummary,
}

impl DataFamily for Binary {
    type Variant = BinaryVariant;
    type Report = BinaryReport;

    fn name(&self) -> &'static str {
        "binary"
    }

    fn validate(&self, variant: &str, record: &BinaryVariant) -> Result<(), ExperimentError> {
        validate_beta_prior("prior", &record.prior).map_err(|e| prior_error(variant, e))?;
        if record.total == 0 {
            return Err(ExperimentError::invalid(variant, "'total' must be positive"));
        }
        if record.positives > record.total {
            return Err(ExperimentError::invalid(
                variant,
                format!(
                    "'positives' ({}) cannot exceed 'total' ({})",
                    record.positives, record.total
                ),
            ));
        }
        Ok(())
    }

    fn merge(&self, existing: &mut BinaryVariant, incoming: &BinaryVariant) {
        existing.total += incoming.total;
        existing.positives += incoming.positives;
    }

    fn evaluate(
        &self,
        records: &[&BinaryVariant],
        settings: &SimulationSettings,
    ) -> crate::Result<EvaluationResult> {
        let stats: Vec<BernoulliStats> = records.iter().map(|r| r.stats()).collect();
        let priors: Vec<BetaPrior> = records.iter().map(|r| r.prior).collect();
        evaluate_bernoulli(&stats, Some(&priors), settings)
    }

    fn report(&self, variant: &str, record: &BinaryVariant, decision: DecisionSummary) -> BinaryReport {
        let (alpha, beta) = beta_posterior_params(
            record.positives as f64,
            record.total as f64,
            record.prior.alpha,
            record.prior.beta,
        );
        BinaryReport {
            variant: variant.to_string(),
            totals: record.total,
            positives: record.positives,
            positive_rate: round_to(record.positives as f64 / record.total as f64, SUMMARY_DIGITS),
            posterior_mean: round_to(beta_mean(alpha, beta), SUMMARY_DIGITS),
            decision,
        }
    }
}

impl Experiment<Binary> {
    /// Add raw 0/1 observations for `name`.
    pub fn add_variant_data(
        &mut self,
        name: &str,
        data: &[i64],
        prior: Option<BetaPrior>,
        replace: bool,
    ) -> Result<(), ExperimentError> {
        if data.is_empty() {
            return Err(ExperimentError::invalid(name, "data needs at least one observation"));
        }
        if data.iter().any(|&x| x != 0 && x != 1) {
            return Err(ExperimentError::invalid(name, "data must contain only zeros and ones"));
        }
        let positives = data.iter().filter(|&&x| x == 1).count() as u64;
        let record = BinaryVariant::new(data.len() as u64, positives).with_prior(prior.unwrap_or_default());
        self.add_variant_data_agg(name, record, replace)
    }
}
