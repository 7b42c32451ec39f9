//! Real-valued experiments with a Normal-Inverse-Gamma model of the mean.

use super::{
    check_finite, prior_error, DataFamily, DecisionSummary, Experiment, ExperimentError,
    SUMMARY_DIGITS,
};
use crate::evaluation::{evaluate_normal, EvaluationResult};
use crate::stats::NormalStats;
use ab_config::validate::validate_nig_prior;
use ab_config::{NormalInverseGammaPrior, SimulationSettings};
use ab_math::normal_ig::{self, NormalInverseGammaParams};
use ab_math::round_to;
use serde::{Deserialize, Serialize};

/// Normal data family.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normal;

/// Aggregated real-valued observations of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalVariant {
    pub total: u64,
    pub sum: f64,
    pub sum_of_squares: f64,
    #[serde(default)]
    pub prior: NormalInverseGammaPrior,
}

impl NormalVariant {
    pub fn new(total: u64, sum: f64, sum_of_squares: f64) -> Self {
        Self {
            total,
            sum,
            sum_of_squares,
            prior: NormalInverseGammaPrior::default(),
        }
    }

    pub fn with_prior(mut self, prior: NormalInverseGammaPrior) -> Self {
        self.prior = prior;
        self
    }

    pub fn stats(&self) -> NormalStats {
        NormalStats::new(self.total, self.sum, self.sum_of_squares)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalReport {
    pub variant: String,
    pub totals: u64,
    pub sum_values: f64,
    pub avg_values: f64,
    pub posterior_mean: f64,
    #[serde(flatten)]
    pub decision: DecisionSummary,
}

impl DataFamily for Normal {
    type Variant = NormalVariant;
    type Report = NormalReport;

    fn name(&self) -> &'static str {
        "normal"
    }

    fn validate(&self, variant: &str, record: &NormalVariant) -> Result<(), ExperimentError> {
        validate_nig_prior("prior", &record.prior).map_err(|e| prior_error(variant, e))?;
        if record.total == 0 {
            return Err(ExperimentError::invalid(variant, "'total' must be positive"));
        }
        check_finite(variant, "sum", record.sum)?;
        check_finite(variant, "sum_of_squares", record.sum_of_squares)?;
        if record.sum_of_squares < 0.0 {
            return Err(ExperimentError::invalid(variant, "'sum_of_squares' cannot be negative"));
        }
        Ok(())
    }

    fn merge(&self, existing: &mut NormalVariant, incoming: &NormalVariant) {
        existing.total += incoming.total;
        existing.sum += incoming.sum;
        existing.sum_of_squares += incoming.sum_of_squares;
    }

    fn evaluate(
        &self,
        records: &[&NormalVariant],
        settings: &SimulationSettings,
    ) -> crate::Result<EvaluationResult> {
        let stats: Vec<NormalStats> = records.iter().map(|r| r.stats()).collect();
        let priors: Vec<NormalInverseGammaPrior> = records.iter().map(|r| r.prior).collect();
        evaluate_normal(&stats, Some(&priors), settings)
    }

    fn report(&self, variant: &str, record: &NormalVariant, decision: DecisionSummary) -> NormalReport {
        let prior = &record.prior;
        let posterior_mean = normal_ig::posterior_params(
            record.total as f64,
            record.sum,
            record.sum_of_squares,
            &NormalInverseGammaParams::new(prior.mean, prior.shape, prior.scale, prior.weight),
        )
        .map_or(f64::NAN, |p| p.mean_of_mean());

        NormalReport {
            variant: variant.to_string(),
            totals: record.total,
            sum_values: round_to(record.sum, SUMMARY_DIGITS),
            avg_values: round_to(record.sum / record.total as f64, SUMMARY_DIGITS),
            posterior_mean: round_to(posterior_mean, SUMMARY_DIGITS),
            decision,
        }
    }
}

impl Experiment<Normal> {
    /// Add raw real-valued observations for `name`.
    pub fn add_variant_data(
        &mut self,
        name: &str,
        data: &[f64],
        prior: Option<NormalInverseGammaPrior>,
        replace: bool,
    ) -> Result<(), ExperimentError> {
        if data.is_empty() {
            return Err(ExperimentError::invalid(name, "data needs at least one observation"));
        }
        let stats = NormalStats::from_values(data);
        let record = NormalVariant::new(stats.total, stats.sum, stats.sum_of_squares)
            .with_prior(prior.unwrap_or_default());
        self.add_variant_data_agg(name, record, replace)
    }
}
