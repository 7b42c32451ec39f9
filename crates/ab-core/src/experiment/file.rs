//! Experiment definition files.
//!
//! A file names its data family and lists aggregated variant records:
//!
//! ```json
//! {
//!   "family": "binary",
//!   "variants": [
//!     {"name": "A", "total": 31500, "positives": 1580},
//!     {"name": "B", "total": 32000, "positives": 1700, "prior": {"alpha": 1.0, "beta": 1.0}}
//!   ]
//! }
//! ```
//!
//! Discrete experiments add a top-level `states` list. Files ending in
//! `.toml` are parsed as TOML, everything else as JSON. Repeated variant
//! names are appended to the first occurrence.

use super::{
    Binary, BinaryReport, BinaryVariant, DataFamily, DeltaLognormal, DeltaLognormalReport,
    DeltaLognormalVariant, DeltaNormal, DeltaNormalReport, DeltaNormalVariant, Discrete,
    DiscreteReport, DiscreteVariant, Experiment, ExperimentError, Exponential, Normal,
    NormalReport, NormalVariant, Poisson, RateReport, RateVariant,
};
use ab_config::SimulationSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A variant record with its name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Named<V> {
    pub name: String,
    #[serde(flatten)]
    pub data: V,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ExperimentFile {
    Binary {
        variants: Vec<Named<BinaryVariant>>,
    },
    Normal {
        variants: Vec<Named<NormalVariant>>,
    },
    DeltaLognormal {
        variants: Vec<Named<DeltaLognormalVariant>>,
    },
    DeltaNormal {
        variants: Vec<Named<DeltaNormalVariant>>,
    },
    Discrete {
        states: Vec<f64>,
        variants: Vec<Named<DiscreteVariant>>,
    },
    Poisson {
        variants: Vec<Named<RateVariant>>,
    },
    Exponential {
        variants: Vec<Named<RateVariant>>,
    },
}

/// Evaluated experiment, serialized as `{"family": ..., "variants": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "family", content = "variants", rename_all = "snake_case")]
pub enum ExperimentReport {
    Binary(Vec<BinaryReport>),
    Normal(Vec<NormalReport>),
    DeltaLognormal(Vec<DeltaLognormalReport>),
    DeltaNormal(Vec<DeltaNormalReport>),
    Discrete(Vec<DiscreteReport>),
    Poisson(Vec<RateReport>),
    Exponential(Vec<RateReport>),
}

impl ExperimentReport {
    pub fn len(&self) -> usize {
        match self {
            ExperimentReport::Binary(r) => r.len(),
            ExperimentReport::Normal(r) => r.len(),
            ExperimentReport::DeltaLognormal(r) => r.len(),
            ExperimentReport::DeltaNormal(r) => r.len(),
            ExperimentReport::Discrete(r) => r.len(),
            ExperimentReport::Poisson(r) | ExperimentReport::Exponential(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn run<F: DataFamily>(
    family: F,
    variants: Vec<Named<F::Variant>>,
    settings: &SimulationSettings,
) -> crate::Result<Vec<F::Report>> {
    let mut test = Experiment::new(family);
    for variant in variants {
        test.add_variant_data_agg(&variant.name, variant.data, false)?;
    }
    test.evaluate(settings)
}

impl ExperimentFile {
    /// Load a definition from disk.
    pub fn from_path(path: &Path) -> Result<Self, ExperimentError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ExperimentError::Io(format!("{}: {}", path.display(), e)))?;
        let parsed = if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }?;
        debug!(
            path = %path.display(),
            family = parsed.family(),
            "loaded experiment definition"
        );
        Ok(parsed)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ExperimentError> {
        serde_json::from_str(json).map_err(|e| ExperimentError::Parse(e.to_string()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ExperimentError> {
        toml::from_str(text).map_err(|e| ExperimentError::Parse(e.to_string()))
    }

    pub fn family(&self) -> &'static str {
        match self {
            ExperimentFile::Binary { .. } => "binary",
            ExperimentFile::Normal { .. } => "normal",
            ExperimentFile::DeltaLognormal { .. } => "delta_lognormal",
            ExperimentFile::DeltaNormal { .. } => "delta_normal",
            ExperimentFile::Discrete { .. } => "discrete",
            ExperimentFile::Poisson { .. } => "poisson",
            ExperimentFile::Exponential { .. } => "exponential",
        }
    }

    /// Build the experiment and evaluate it.
    pub fn evaluate(self, settings: &SimulationSettings) -> crate::Result<ExperimentReport> {
        Ok(match self {
            ExperimentFile::Binary { variants } => {
                ExperimentReport::Binary(run(Binary, variants, settings)?)
            }
            ExperimentFile::Normal { variants } => {
                ExperimentReport::Normal(run(Normal, variants, settings)?)
            }
            ExperimentFile::DeltaLognormal { variants } => {
                ExperimentReport::DeltaLognormal(run(DeltaLognormal, variants, settings)?)
            }
            ExperimentFile::DeltaNormal { variants } => {
                ExperimentReport::DeltaNormal(run(DeltaNormal, variants, settings)?)
            }
            ExperimentFile::Discrete { states, variants } => {
                ExperimentReport::Discrete(run(Discrete::new(states)?, variants, settings)?)
            }
            ExperimentFile::Poisson { variants } => {
                ExperimentReport::Poisson(run(Poisson, variants, settings)?)
            }
            ExperimentFile::Exponential { variants } => {
                ExperimentReport::Exponential(run(Exponential, variants, settings)?)
            }
        })
    }
}
