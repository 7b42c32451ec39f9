//! Count (Poisson) and duration (exponential) experiments with Gamma priors.

use super::{
    check_finite, prior_error, DataFamily, DecisionSummary, Experiment, ExperimentError,
    SUMMARY_DIGITS,
};
use crate::evaluation::{evaluate_exponential, evaluate_poisson, EvaluationResult};
use crate::stats::RateStats;
use ab_config::validate::validate_gamma_prior;
use ab_config::{GammaPrior, SimulationSettings};
use ab_math::{gamma_mean, poisson_posterior_params, round_to};
use serde::{Deserialize, Serialize};

/// Aggregated counts or durations of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateVariant {
    pub total: u64,
    pub sum: f64,
    #[serde(default)]
    pub prior: GammaPrior,
}

impl RateVariant {
    pub fn new(total: u64, sum: f64) -> Self {
        Self {
            total,
            sum,
            prior: GammaPrior::default(),
        }
    }

    pub fn with_prior(mut self, prior: GammaPrior) -> Self {
        self.prior = prior;
        self
    }

    pub fn stats(&self) -> RateStats {
        RateStats::new(self.total, self.sum)
    }

    fn validate(&self, variant: &str) -> Result<(), ExperimentError> {
        validate_gamma_prior("prior", &self.prior).map_err(|e| prior_error(variant, e))?;
        if self.total == 0 {
            return Err(ExperimentError::invalid(variant, "'total' must be positive"));
        }
        check_finite(variant, "sum", self.sum)?;
        if self.sum < 0.0 {
            return Err(ExperimentError::invalid(variant, "'sum' cannot be negative"));
        }
        Ok(())
    }

    fn merge(&mut self, incoming: &RateVariant) {
        self.total += incoming.total;
        self.sum += incoming.sum;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateReport {
    pub variant: String,
    pub totals: u64,
    pub sum_values: f64,
    pub observed_average: f64,
    pub posterior_mean: f64,
    #[serde(flatten)]
    pub decision: DecisionSummary,
}

fn rate_report(
    variant: &str,
    record: &RateVariant,
    posterior_mean: f64,
    decision: DecisionSummary,
) -> RateReport {
    RateReport {
        variant: variant.to_string(),
        totals: record.total,
        sum_values: round_to(record.sum, SUMMARY_DIGITS),
        observed_average: round_to(record.sum / record.total as f64, SUMMARY_DIGITS),
        posterior_mean: round_to(posterior_mean, SUMMARY_DIGITS),
        decision,
    }
}

/// Poisson family: the effect is the event rate λ.
#[derive(Debug, Clone, Copy, Default)]
pub struct Poisson;

impl DataFamily for Poisson {
    type Variant = RateVariant;
    type Report = RateReport;

    fn name(&self) -> &'static str {
        "poisson"
    }

    fn validate(&self, variant: &str, record: &RateVariant) -> Result<(), ExperimentError> {
        record.validate(variant)
    }

    fn merge(&self, existing: &mut RateVariant, incoming: &RateVariant) {
        existing.merge(incoming);
    }

    fn evaluate(
        &self,
        records: &[&RateVariant],
        settings: &SimulationSettings,
    ) -> crate::Result<EvaluationResult> {
        let stats: Vec<RateStats> = records.iter().map(|r| r.stats()).collect();
        let priors: Vec<GammaPrior> = records.iter().map(|r| r.prior).collect();
        evaluate_poisson(&stats, Some(&priors), settings)
    }

    fn report(&self, variant: &str, record: &RateVariant, decision: DecisionSummary) -> RateReport {
        let (shape, rate) = poisson_posterior_params(
            record.total as f64,
            record.sum,
            record.prior.shape,
            record.prior.rate,
        );
        rate_report(variant, record, gamma_mean(shape, rate), decision)
    }
}

/// Exponential family: the effect is the mean duration 1/λ.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exponential;

impl DataFamily for Exponential {
    type Variant = RateVariant;
    type Report = RateReport;

    fn name(&self) -> &'static str {
        "exponential"
    }

    fn validate(&self, variant: &str, record: &RateVariant) -> Result<(), ExperimentError> {
        record.validate(variant)
    }

    fn merge(&self, existing: &mut RateVariant, incoming: &RateVariant) {
        existing.merge(incoming);
    }

    fn evaluate(
        &self,
        records: &[&RateVariant],
        settings: &SimulationSettings,
    ) -> crate::Result<EvaluationResult> {
        let stats: Vec<RateStats> = records.iter().map(|r| r.stats()).collect();
        let priors: Vec<GammaPrior> = records.iter().map(|r| r.prior).collect();
        evaluate_exponential(&stats, Some(&priors), settings)
    }

    fn report(&self, variant: &str, record: &RateVariant, decision: DecisionSummary) -> RateReport {
        // (β + Σx) / (α + n)
        let mean_duration =
            (record.prior.rate + record.sum) / (record.prior.shape + record.total as f64);
        rate_report(variant, record, mean_duration, decision)
    }
}

fn check_non_negative(name: &str, data: impl IntoIterator<Item = f64>) -> Result<(), ExperimentError> {
    let mut seen = false;
    for x in data {
        seen = true;
        if x.is_nan() || x < 0.0 {
            return Err(ExperimentError::invalid(name, "data must be non-negative"));
        }
    }
    if !seen {
        return Err(ExperimentError::invalid(name, "data needs at least one observation"));
    }
    Ok(())
}

impl Experiment<Poisson> {
    /// Add raw non-negative counts for `name`.
    pub fn add_variant_data(
        &mut self,
        name: &str,
        data: &[i64],
        prior: Option<GammaPrior>,
        replace: bool,
    ) -> Result<(), ExperimentError> {
        check_non_negative(name, data.iter().map(|&x| x as f64))?;
        let record = RateVariant::new(data.len() as u64, data.iter().map(|&x| x as f64).sum())
            .with_prior(prior.unwrap_or_default());
        self.add_variant_data_agg(name, record, replace)
    }
}

impl Experiment<Exponential> {
    /// Add raw non-negative durations for `name`.
    pub fn add_variant_data(
        &mut self,
        name: &str,
        data: &[f64],
        prior: Option<GammaPrior>,
        replace: bool,
    ) -> Result<(), ExperimentError> {
        check_non_negative(name, data.iter().copied())?;
        let record = RateVariant::new(data.len() as u64, data.iter().sum())
            .with_prior(prior.unwrap_or_default());
        self.add_variant_data_agg(name, record, replace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poisson_raw_data() {
        let mut test = Experiment::new(Poisson);
        test.add_variant_data("A", &[1, 0, 3, 2], None, true).unwrap();
        assert_eq!(test.variant("A"), Some(&RateVariant::new(4, 6.0)));
        assert!(test.add_variant_data("B", &[1, -1], None, true).is_err());
        assert!(test.add_variant_data("B", &[], None, true).is_err());
    }

    #[test]
    fn test_poisson_posterior_mean() {
        let mut test = Experiment::new(Poisson);
        test.add_variant_data_agg("A", RateVariant::new(20, 45.0), true)
            .unwrap();
        let report = test.evaluate(&SimulationSettings::seeded(1)).unwrap();
        // (0.1 + 45) / (0.1 + 20)
        assert_eq!(report[0].posterior_mean, 2.24378);
        assert_eq!(report[0].observed_average, 2.25);
    }

    #[test]
    fn test_exponential_posterior_mean() {
        let mut test = Experiment::new(Exponential);
        test.add_variant_data_agg("A", RateVariant::new(20, 45.13), true)
            .unwrap();
        let report = test.evaluate(&SimulationSettings::seeded(1)).unwrap();
        // (0.1 + 45.13) / (0.1 + 20)
        assert_eq!(report[0].posterior_mean, 2.25025);
    }

    #[test]
    fn test_exponential_rejects_negative_durations() {
        let mut test = Experiment::new(Exponential);
        assert!(test
            .add_variant_data("A", &[1.5, -0.1], None, true)
            .is_err());
        assert!(test
            .add_variant_data_agg("A", RateVariant::new(3, -1.0), true)
            .is_err());
    }
}
