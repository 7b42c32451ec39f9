//! Experiment layer: named variants collected per data family.
//!
//! An [`Experiment`] is an ordered table of `(name, record)` rows. Records
//! hold one variant's sufficient statistics together with its priors, so
//! validation, merging and reporting all happen row by row.
//!
//! # Usage
//!
//! ```ignore
//! use ab_core::experiment::{Binary, BinaryVariant, Experiment};
//! use ab_config::SimulationSettings;
//!
//! let mut test = Experiment::new(Binary);
//! test.add_variant_data_agg("A", BinaryVariant::new(31500, 1580), true)?;
//! test.add_variant_data("B", &[0, 1, 0, 0, 1], None, true)?;
//! let report = test.evaluate(&SimulationSettings::seeded(52))?;
//! ```

pub mod binary;
pub mod delta;
pub mod discrete;
pub mod file;
pub mod normal;
pub mod rate;

pub use binary::{Binary, BinaryReport, BinaryVariant};
pub use delta::{
    DeltaLognormal, DeltaLognormalReport, DeltaLognormalVariant, DeltaNormal, DeltaNormalReport,
    DeltaNormalVariant,
};
pub use discrete::{Discrete, DiscreteReport, DiscreteVariant, StateCount};
pub use file::{ExperimentFile, ExperimentReport, Named};
pub use normal::{Normal, NormalReport, NormalVariant};
pub use rate::{Exponential, Poisson, RateReport, RateVariant};

use crate::evaluation::EvaluationResult;
use crate::intervals::Interval;
use ab_config::SimulationSettings;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Digits used for observed averages in reports.
pub(crate) const SUMMARY_DIGITS: i32 = 5;

/// Experiment input errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExperimentError {
    #[error("invalid input for variant '{variant}': {message}")]
    InvalidInput { variant: String, message: String },

    #[error("invalid experiment definition: {0}")]
    InvalidDefinition(String),

    #[error("failed to read experiment file: {0}")]
    Io(String),

    #[error("failed to parse experiment file: {0}")]
    Parse(String),
}

impl ExperimentError {
    pub(crate) fn invalid(variant: &str, message: impl Into<String>) -> Self {
        ExperimentError::InvalidInput {
            variant: variant.to_string(),
            message: message.into(),
        }
    }
}

/// Behavior shared by every data family.
pub trait DataFamily {
    /// Aggregated statistics plus priors of one variant.
    type Variant: Clone + std::fmt::Debug;
    /// Per-variant evaluation record.
    type Report: Serialize + Clone + std::fmt::Debug;

    /// Short family name used in logs.
    fn name(&self) -> &'static str;

    /// Reject records the samplers cannot handle.
    fn validate(&self, variant: &str, record: &Self::Variant) -> Result<(), ExperimentError>;

    /// Fold `incoming` statistics into `existing`, keeping the existing priors.
    fn merge(&self, existing: &mut Self::Variant, incoming: &Self::Variant);

    /// Run the family's orchestrator over the records, in order.
    fn evaluate(
        &self,
        records: &[&Self::Variant],
        settings: &SimulationSettings,
    ) -> crate::Result<EvaluationResult>;

    /// Build the report record of one variant.
    fn report(&self, variant: &str, record: &Self::Variant, decision: DecisionSummary)
        -> Self::Report;
}

/// Decision metrics of one variant, shared by every report type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionSummary {
    pub credible_interval: Interval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_density_interval: Option<Interval>,
    pub prob_being_best: f64,
    pub expected_loss: f64,
}

impl DecisionSummary {
    fn from_result(result: &EvaluationResult, i: usize) -> Self {
        Self {
            credible_interval: result.credible_intervals[i],
            high_density_interval: result.hdi_intervals.as_ref().map(|h| h[i]),
            prob_being_best: result.probabilities[i],
            expected_loss: result.expected_loss[i],
        }
    }
}

/// One named variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantRow<V> {
    pub name: String,
    pub data: V,
}

/// Ordered collection of variants of one data family.
#[derive(Debug, Clone)]
pub struct Experiment<F: DataFamily> {
    family: F,
    rows: Vec<VariantRow<F::Variant>>,
}

impl<F: DataFamily + Default> Default for Experiment<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<F: DataFamily> Experiment<F> {
    pub fn new(family: F) -> Self {
        Self {
            family,
            rows: Vec::new(),
        }
    }

    pub fn family(&self) -> &F {
        &self.family
    }

    /// Insert aggregated data for `name`.
    ///
    /// An existing variant is overwritten when `replace` is set; otherwise
    /// the new statistics are added to it and its original priors are kept.
    pub fn add_variant_data_agg(
        &mut self,
        name: &str,
        record: F::Variant,
        replace: bool,
    ) -> Result<(), ExperimentError> {
        if name.is_empty() {
            return Err(ExperimentError::invalid(name, "variant name must not be empty"));
        }
        self.family.validate(name, &record)?;

        match self.rows.iter().position(|row| row.name == name) {
            None => self.rows.push(VariantRow {
                name: name.to_string(),
                data: record,
            }),
            Some(i) if replace => {
                info!(
                    family = self.family.name(),
                    variant = name,
                    "variant already exists, replacing its data (use replace=false to append)"
                );
                self.rows[i].data = record;
            }
            Some(i) => {
                info!(
                    family = self.family.name(),
                    variant = name,
                    "variant already exists, appending data and keeping its original priors"
                );
                self.family.merge(&mut self.rows[i].data, &record);
            }
        }
        Ok(())
    }

    /// Remove a variant. Returns false (and logs a warning) when it does not exist.
    pub fn delete_variant(&mut self, name: &str) -> bool {
        match self.rows.iter().position(|row| row.name == name) {
            Some(i) => {
                self.rows.remove(i);
                true
            }
            None => {
                warn!(
                    family = self.family.name(),
                    variant = name,
                    "nothing to delete, variant is not in the experiment"
                );
                false
            }
        }
    }

    pub fn variant_names(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.name.as_str()).collect()
    }

    pub fn variants(&self) -> impl Iterator<Item = (&str, &F::Variant)> {
        self.rows.iter().map(|row| (row.name.as_str(), &row.data))
    }

    pub fn variant(&self, name: &str) -> Option<&F::Variant> {
        self.rows
            .iter()
            .find(|row| row.name == name)
            .map(|row| &row.data)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw evaluation result, in variant order.
    pub fn evaluation(&self, settings: &SimulationSettings) -> crate::Result<EvaluationResult> {
        let records: Vec<&F::Variant> = self.rows.iter().map(|row| &row.data).collect();
        self.family.evaluate(&records, settings)
    }

    /// Per-variant report records.
    pub fn evaluate(&self, settings: &SimulationSettings) -> crate::Result<Vec<F::Report>> {
        let result = self.evaluation(settings)?;
        Ok(self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                self.family
                    .report(&row.name, &row.data, DecisionSummary::from_result(&result, i))
            })
            .collect())
    }

    /// Probability of being best, keyed by variant name.
    pub fn probabilities_of_being_best(
        &self,
        settings: &SimulationSettings,
    ) -> crate::Result<Vec<(String, f64)>> {
        let result = self.evaluation(settings)?;
        Ok(self.keyed(result.probabilities))
    }

    /// Expected loss, keyed by variant name.
    pub fn expected_loss(&self, settings: &SimulationSettings) -> crate::Result<Vec<(String, f64)>> {
        let result = self.evaluation(settings)?;
        Ok(self.keyed(result.expected_loss))
    }

    /// Credible intervals, keyed by variant name.
    pub fn credible_intervals(
        &self,
        settings: &SimulationSettings,
    ) -> crate::Result<Vec<(String, Interval)>> {
        let result = self.evaluation(settings)?;
        Ok(self.keyed(result.credible_intervals))
    }

    fn keyed<T>(&self, values: Vec<T>) -> Vec<(String, T)> {
        self.rows
            .iter()
            .map(|row| row.name.clone())
            .zip(values)
            .collect()
    }
}

/// Reject NaN and infinite aggregates.
pub(crate) fn check_finite(variant: &str, field: &str, value: f64) -> Result<(), ExperimentError> {
    if !value.is_finite() {
        return Err(ExperimentError::invalid(
            variant,
            format!("'{}' must be a finite number, got {}", field, value),
        ));
    }
    Ok(())
}

/// Map a prior validation failure onto the variant.
pub(crate) fn prior_error(variant: &str, err: ab_config::ValidationError) -> ExperimentError {
    ExperimentError::invalid(variant, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experiment() -> Experiment<Binary> {
        let mut test = Experiment::new(Binary);
        test.add_variant_data_agg("A", BinaryVariant::new(100, 10), true)
            .unwrap();
        test.add_variant_data_agg("B", BinaryVariant::new(100, 20), true)
            .unwrap();
        test
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut test = experiment();
        test.add_variant_data_agg("0", BinaryVariant::new(5, 1), true)
            .unwrap();
        assert_eq!(test.variant_names(), vec!["A", "B", "0"]);
    }

    #[test]
    fn test_replace_and_append() {
        let mut test = experiment();
        test.add_variant_data_agg("A", BinaryVariant::new(50, 5), true)
            .unwrap();
        assert_eq!(test.variant("A"), Some(&BinaryVariant::new(50, 5)));

        let custom = BinaryVariant::new(10, 1).with_prior(ab_config::BetaPrior::new(2.0, 3.0));
        test.add_variant_data_agg("A", custom, false).unwrap();
        // statistics added, original prior kept
        assert_eq!(test.variant("A"), Some(&BinaryVariant::new(60, 6)));
    }

    #[test]
    fn test_delete_variant() {
        let mut test = experiment();
        assert!(test.delete_variant("A"));
        assert!(!test.delete_variant("A"));
        assert_eq!(test.variant_names(), vec!["B"]);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut test = experiment();
        assert!(test
            .add_variant_data_agg("", BinaryVariant::new(1, 1), true)
            .is_err());
    }

    #[test]
    fn test_keyed_views() {
        let test = experiment();
        let settings = SimulationSettings {
            sim_count: 1000,
            ..SimulationSettings::seeded(3)
        };
        let pbbs = test.probabilities_of_being_best(&settings).unwrap();
        assert_eq!(pbbs.len(), 2);
        assert_eq!(pbbs[0].0, "A");
        assert!(pbbs[1].1 > pbbs[0].1);
        let intervals = test.credible_intervals(&settings).unwrap();
        assert!(intervals[1].1.low > intervals[0].1.low);
    }

    #[test]
    fn test_empty_experiment_evaluates_to_nothing() {
        let test: Experiment<Binary> = Experiment::default();
        assert!(test.evaluate(&SimulationSettings::seeded(1)).unwrap().is_empty());
    }
}
