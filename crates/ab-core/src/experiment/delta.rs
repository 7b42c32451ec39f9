//! Zero-inflated experiments: a Beta model of the non-zero share combined
//! with a continuous model of the non-zero values.

use super::{
    check_finite, prior_error, DataFamily, DecisionSummary, Experiment, ExperimentError,
    SUMMARY_DIGITS,
};
use crate::evaluation::{evaluate_delta_lognormal, evaluate_delta_normal, EvaluationResult};
use crate::stats::{DeltaLognormalStats, DeltaNormalStats};
use ab_config::validate::{validate_beta_prior, validate_nig_prior};
use ab_config::{BetaPrior, NormalInverseGammaPrior, SimulationSettings};
use ab_math::round_to;
use serde::{Deserialize, Serialize};

fn check_priors(
    variant: &str,
    beta_prior: &BetaPrior,
    nig_prior: &NormalInverseGammaPrior,
) -> Result<(), ExperimentError> {
    validate_beta_prior("beta_prior", beta_prior).map_err(|e| prior_error(variant, e))?;
    validate_nig_prior("nig_prior", nig_prior).map_err(|e| prior_error(variant, e))
}

fn check_counts(variant: &str, total: u64, non_zero: u64, label: &str) -> Result<(), ExperimentError> {
    if total == 0 {
        return Err(ExperimentError::invalid(variant, "'total' must be positive"));
    }
    if non_zero > total {
        return Err(ExperimentError::invalid(
            variant,
            format!("'{}' ({}) cannot exceed 'total' ({})", label, non_zero, total),
        ));
    }
    Ok(())
}

fn ratio(sum: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        round_to(sum / count as f64, SUMMARY_DIGITS)
    }
}

/// Delta-lognormal family: non-negative data with a log-normal positive part.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaLognormal;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaLognormalVariant {
    pub total: u64,
    pub positives: u64,
    /// Sum of the raw values, reported only.
    pub sum: f64,
    pub sum_of_logs: f64,
    pub sum_of_logs_squared: f64,
    #[serde(default)]
    pub beta_prior: BetaPrior,
    #[serde(default)]
    pub nig_prior: NormalInverseGammaPrior,
}

impl DeltaLognormalVariant {
    pub fn new(
        total: u64,
        positives: u64,
        sum: f64,
        sum_of_logs: f64,
        sum_of_logs_squared: f64,
    ) -> Self {
        Self {
            total,
            positives,
            sum,
            sum_of_logs,
            sum_of_logs_squared,
            beta_prior: BetaPrior::default(),
            nig_prior: NormalInverseGammaPrior::default(),
        }
    }

    pub fn with_priors(mut self, beta_prior: BetaPrior, nig_prior: NormalInverseGammaPrior) -> Self {
        self.beta_prior = beta_prior;
        self.nig_prior = nig_prior;
        self
    }

    pub fn stats(&self) -> DeltaLognormalStats {
        DeltaLognormalStats::new(
            self.total,
            self.positives,
            self.sum_of_logs,
            self.sum_of_logs_squared,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaLognormalReport {
    pub variant: String,
    pub totals: u64,
    pub positives: u64,
    pub sum_values: f64,
    pub avg_values: f64,
    pub avg_positive_values: f64,
    #[serde(flatten)]
    pub decision: DecisionSummary,
}

impl DataFamily for DeltaLognormal {
    type Variant = DeltaLognormalVariant;
    type Report = DeltaLognormalReport;

    fn name(&self) -> &'static str {
        "delta_lognormal"
    }

    fn validate(&self, variant: &str, record: &DeltaLognormalVariant) -> Result<(), ExperimentError> {
        check_priors(variant, &record.beta_prior, &record.nig_prior)?;
        check_counts(variant, record.total, record.positives, "positives")?;
        check_finite(variant, "sum", record.sum)?;
        check_finite(variant, "sum_of_logs", record.sum_of_logs)?;
        check_finite(variant, "sum_of_logs_squared", record.sum_of_logs_squared)?;
        if record.sum < 0.0 {
            return Err(ExperimentError::invalid(variant, "'sum' cannot be negative"));
        }
        if record.sum_of_logs_squared < 0.0 {
            return Err(ExperimentError::invalid(
                variant,
                "'sum_of_logs_squared' cannot be negative",
            ));
        }
        Ok(())
    }

    fn merge(&self, existing: &mut DeltaLognormalVariant, incoming: &DeltaLognormalVariant) {
        existing.total += incoming.total;
        existing.positives += incoming.positives;
        existing.sum += incoming.sum;
        existing.sum_of_logs += incoming.sum_of_logs;
        existing.sum_of_logs_squared += incoming.sum_of_logs_squared;
    }

    fn evaluate(
        &self,
        records: &[&DeltaLognormalVariant],
        settings: &SimulationSettings,
    ) -> crate::Result<EvaluationResult> {
        let stats: Vec<DeltaLognormalStats> = records.iter().map(|r| r.stats()).collect();
        let beta: Vec<BetaPrior> = records.iter().map(|r| r.beta_prior).collect();
        let nig: Vec<NormalInverseGammaPrior> = records.iter().map(|r| r.nig_prior).collect();
        evaluate_delta_lognormal(&stats, Some(&beta), Some(&nig), settings)
    }

    fn report(
        &self,
        variant: &str,
        record: &DeltaLognormalVariant,
        decision: DecisionSummary,
    ) -> DeltaLognormalReport {
        DeltaLognormalReport {
            variant: variant.to_string(),
            totals: record.total,
            positives: record.positives,
            sum_values: round_to(record.sum, SUMMARY_DIGITS),
            avg_values: ratio(record.sum, record.total),
            avg_positive_values: ratio(record.sum, record.positives),
            decision,
        }
    }
}

impl Experiment<DeltaLognormal> {
    /// Add raw non-negative observations for `name`; logs are taken of the positive ones.
    pub fn add_variant_data(
        &mut self,
        name: &str,
        data: &[f64],
        beta_prior: Option<BetaPrior>,
        nig_prior: Option<NormalInverseGammaPrior>,
        replace: bool,
    ) -> Result<(), ExperimentError> {
        if data.is_empty() {
            return Err(ExperimentError::invalid(name, "data needs at least one observation"));
        }
        if data.iter().any(|x| x.is_nan() || *x < 0.0) {
            return Err(ExperimentError::invalid(name, "data must be non-negative"));
        }
        let logs: Vec<f64> = data.iter().filter(|&&x| x > 0.0).map(|x| x.ln()).collect();
        let record = DeltaLognormalVariant::new(
            data.len() as u64,
            logs.len() as u64,
            data.iter().sum(),
            logs.iter().sum(),
            logs.iter().map(|l| l * l).sum(),
        )
        .with_priors(beta_prior.unwrap_or_default(), nig_prior.unwrap_or_default());
        self.add_variant_data_agg(name, record, replace)
    }
}

/// Delta-normal family: real data with a point mass at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaNormal;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaNormalVariant {
    pub total: u64,
    pub non_zeros: u64,
    pub sum: f64,
    pub sum_of_squares: f64,
    #[serde(default)]
    pub beta_prior: BetaPrior,
    #[serde(default)]
    pub nig_prior: NormalInverseGammaPrior,
}

impl DeltaNormalVariant {
    pub fn new(total: u64, non_zeros: u64, sum: f64, sum_of_squares: f64) -> Self {
        Self {
            total,
            non_zeros,
            sum,
            sum_of_squares,
            beta_prior: BetaPrior::default(),
            nig_prior: NormalInverseGammaPrior::default(),
        }
    }

    pub fn with_priors(mut self, beta_prior: BetaPrior, nig_prior: NormalInverseGammaPrior) -> Self {
        self.beta_prior = beta_prior;
        self.nig_prior = nig_prior;
        self
    }

    pub fn stats(&self) -> DeltaNormalStats {
        DeltaNormalStats::new(self.total, self.non_zeros, self.sum, self.sum_of_squares)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaNormalReport {
    pub variant: String,
    pub totals: u64,
    pub non_zeros: u64,
    pub sum_values: f64,
    pub avg_values: f64,
    pub avg_non_zero_values: f64,
    #[serde(flatten)]
    pub decision: DecisionSummary,
}

impl DataFamily for DeltaNormal {
    type Variant = DeltaNormalVariant;
    type Report = DeltaNormalReport;

    fn name(&self) -> &'static str {
        "delta_normal"
    }

    fn validate(&self, variant: &str, record: &DeltaNormalVariant) -> Result<(), ExperimentError> {
        check_priors(variant, &record.beta_prior, &record.nig_prior)?;
        check_counts(variant, record.total, record.non_zeros, "non_zeros")?;
        check_finite(variant, "sum", record.sum)?;
        check_finite(variant, "sum_of_squares", record.sum_of_squares)?;
        if record.sum_of_squares < 0.0 {
            return Err(ExperimentError::invalid(variant, "'sum_of_squares' cannot be negative"));
        }
        Ok(())
    }

    fn merge(&self, existing: &mut DeltaNormalVariant, incoming: &DeltaNormalVariant) {
        existing.total += incoming.total;
        existing.non_zeros += incoming.non_zeros;
        existing.sum += incoming.sum;
        existing.sum_of_squares += incoming.sum_of_squares;
    }

    fn evaluate(
        &self,
        records: &[&DeltaNormalVariant],
        settings: &SimulationSettings,
    ) -> crate::Result<EvaluationResult> {
        let stats: Vec<DeltaNormalStats> = records.iter().map(|r| r.stats()).collect();
        let beta: Vec<BetaPrior> = records.iter().map(|r| r.beta_prior).collect();
        let nig: Vec<NormalInverseGammaPrior> = records.iter().map(|r| r.nig_prior).collect();
        evaluate_delta_normal(&stats, Some(&beta), Some(&nig), settings)
    }

    fn report(
        &self,
        variant: &str,
        record: &DeltaNormalVariant,
        decision: DecisionSummary,
    ) -> DeltaNormalReport {
        DeltaNormalReport {
            variant: variant.to_string(),
            totals: record.total,
            non_zeros: record.non_zeros,
            sum_values: round_to(record.sum, SUMMARY_DIGITS),
            avg_values: ratio(record.sum, record.total),
            avg_non_zero_values: ratio(record.sum, record.non_zeros),
            decision,
        }
    }
}

impl Experiment<DeltaNormal> {
    /// Add raw real-valued observations for `name`; zeros only count toward `total`.
    pub fn add_variant_data(
        &mut self,
        name: &str,
        data: &[f64],
        beta_prior: Option<BetaPrior>,
        nig_prior: Option<NormalInverseGammaPrior>,
        replace: bool,
    ) -> Result<(), ExperimentError> {
        if data.is_empty() {
            return Err(ExperimentError::invalid(name, "data needs at least one observation"));
        }
        let non_zero: Vec<f64> = data.iter().copied().filter(|&x| x != 0.0).collect();
        let record = DeltaNormalVariant::new(
            data.len() as u64,
            non_zero.len() as u64,
            non_zero.iter().sum(),
            non_zero.iter().map(|x| x * x).sum(),
        )
        .with_priors(beta_prior.unwrap_or_default(), nig_prior.unwrap_or_default());
        self.add_variant_data_agg(name, record, replace)
    }
}
