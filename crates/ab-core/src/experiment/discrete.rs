//! Categorical experiments over a fixed set of numeric states (e.g. ratings).

use super::{prior_error, DataFamily, DecisionSummary, Experiment, ExperimentError, SUMMARY_DIGITS};
use crate::evaluation::{evaluate_dirichlet, EvaluationResult};
use crate::stats::DirichletStats;
use ab_config::validate::validate_dirichlet_prior;
use ab_config::{DirichletPrior, SimulationSettings};
use ab_math::round_to;
use serde::{Deserialize, Serialize};

/// Discrete family over `states`.
#[derive(Debug, Clone, PartialEq)]
pub struct Discrete {
    states: Vec<f64>,
}

impl Discrete {
    pub fn new(states: Vec<f64>) -> Result<Self, ExperimentError> {
        if states.is_empty() {
            return Err(ExperimentError::InvalidDefinition(
                "discrete experiments need at least one state".to_string(),
            ));
        }
        if let Some(bad) = states.iter().find(|s| !s.is_finite()) {
            return Err(ExperimentError::InvalidDefinition(format!(
                "states must be finite numbers, got {}",
                bad
            )));
        }
        Ok(Self { states })
    }

    pub fn states(&self) -> &[f64] {
        &self.states
    }
}

/// Per-state counts of one variant, in the order of the family's states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteVariant {
    pub concentration: Vec<f64>,
    /// Uniform `Dir(1, …, 1)` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior: Option<DirichletPrior>,
}

impl DiscreteVariant {
    pub fn new(concentration: Vec<f64>) -> Self {
        Self {
            concentration,
            prior: None,
        }
    }

    pub fn with_prior(mut self, prior: DirichletPrior) -> Self {
        self.prior = Some(prior);
        self
    }

    fn observations(&self) -> f64 {
        self.concentration.iter().sum()
    }
}

/// Count of one state in a report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateCount {
    pub state: f64,
    pub count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscreteReport {
    pub variant: String,
    pub concentration: Vec<StateCount>,
    pub average_value: f64,
    #[serde(flatten)]
    pub decision: DecisionSummary,
}

impl DataFamily for Discrete {
    type Variant = DiscreteVariant;
    type Report = DiscreteReport;

    fn name(&self) -> &'static str {
        "discrete"
    }

    fn validate(&self, variant: &str, record: &DiscreteVariant) -> Result<(), ExperimentError> {
        if record.concentration.len() != self.states.len() {
            return Err(ExperimentError::invalid(
                variant,
                format!(
                    "'concentration' has {} entries but the experiment has {} states",
                    record.concentration.len(),
                    self.states.len()
                ),
            ));
        }
        if record
            .concentration
            .iter()
            .any(|c| !c.is_finite() || *c < 0.0)
        {
            return Err(ExperimentError::invalid(
                variant,
                "'concentration' counts must be non-negative finite numbers",
            ));
        }
        if let Some(prior) = &record.prior {
            validate_dirichlet_prior("prior", prior, self.states.len())
                .map_err(|e| prior_error(variant, e))?;
        }
        Ok(())
    }

    fn merge(&self, existing: &mut DiscreteVariant, incoming: &DiscreteVariant) {
        for (e, i) in existing
            .concentration
            .iter_mut()
            .zip(&incoming.concentration)
        {
            *e += i;
        }
    }

    fn evaluate(
        &self,
        records: &[&DiscreteVariant],
        settings: &SimulationSettings,
    ) -> crate::Result<EvaluationResult> {
        let stats: Vec<DirichletStats> = records
            .iter()
            .map(|r| DirichletStats::new(r.concentration.clone()))
            .collect();
        let priors: Vec<DirichletPrior> = records
            .iter()
            .map(|r| {
                r.prior
                    .clone()
                    .unwrap_or_else(|| DirichletPrior::uniform(self.states.len()))
            })
            .collect();
        evaluate_dirichlet(&self.states, &stats, Some(&priors), settings)
    }

    fn report(&self, variant: &str, record: &DiscreteVariant, decision: DecisionSummary) -> DiscreteReport {
        let n = record.observations();
        let average = if n > 0.0 {
            self.states
                .iter()
                .zip(&record.concentration)
                .map(|(s, c)| s * c)
                .sum::<f64>()
                / n
        } else {
            0.0
        };
        DiscreteReport {
            variant: variant.to_string(),
            concentration: self
                .states
                .iter()
                .zip(&record.concentration)
                .map(|(&state, &count)| StateCount { state, count })
                .collect(),
            average_value: round_to(average, SUMMARY_DIGITS),
            decision,
        }
    }
}

impl Experiment<Discrete> {
    /// Add raw observations for `name`; every value must be one of the states.
    pub fn add_variant_data(
        &mut self,
        name: &str,
        data: &[f64],
        prior: Option<DirichletPrior>,
        replace: bool,
    ) -> Result<(), ExperimentError> {
        if data.is_empty() {
            return Err(ExperimentError::invalid(name, "data needs at least one observation"));
        }
        let states = self.family().states();
        let mut counts = vec![0.0; states.len()];
        for value in data {
            match states.iter().position(|s| s == value) {
                Some(i) => counts[i] += 1.0,
                None => {
                    return Err(ExperimentError::invalid(
                        name,
                        format!("value {} is not one of the states {:?}", value, states),
                    ))
                }
            }
        }
        let mut record = DiscreteVariant::new(counts);
        record.prior = prior;
        self.add_variant_data_agg(name, record, replace)
    }
}
