//! Simulation settings shared by every evaluation.

use crate::validate::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of posterior draws per variant.
pub const DEFAULT_SIM_COUNT: usize = 20_000;

/// Default credible interval mass.
pub const DEFAULT_INTERVAL_ALPHA: f64 = 0.95;

/// Environment overrides.
pub const ENV_SIM_COUNT: &str = "AB_SIM_COUNT";
pub const ENV_SEED: &str = "AB_SEED";
pub const ENV_INTERVAL_ALPHA: &str = "AB_INTERVAL_ALPHA";

/// Monte-Carlo settings for one evaluation.
///
/// Files may set any subset of the fields; missing ones take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Posterior draws per variant.
    pub sim_count: usize,

    /// Root seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Treat the smallest effect as best.
    pub min_is_best: bool,

    /// Credible interval mass, strictly inside (0, 1).
    pub interval_alpha: f64,

    /// Also compute highest-density intervals.
    pub include_hdi: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            sim_count: DEFAULT_SIM_COUNT,
            seed: None,
            min_is_best: false,
            interval_alpha: DEFAULT_INTERVAL_ALPHA,
            include_hdi: false,
        }
    }
}

impl SimulationSettings {
    /// Settings with a fixed seed and otherwise default values.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Load settings from a JSON or TOML file, chosen by extension.
    ///
    /// Files without a `.toml` extension are parsed as JSON.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Parse settings from a JSON string.
    pub fn from_json_str(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Parse settings from a TOML string.
    pub fn from_toml_str(text: &str) -> ValidationResult<Self> {
        toml::from_str(text).map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }

    /// Apply `AB_SIM_COUNT`, `AB_SEED` and `AB_INTERVAL_ALPHA` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> ValidationResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (used by tests).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ValidationResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_SIM_COUNT) {
            self.sim_count = parse_override(ENV_SIM_COUNT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SEED) {
            self.seed = Some(parse_override(ENV_SEED, &raw)?);
        }
        if let Some(raw) = lookup(ENV_INTERVAL_ALPHA) {
            self.interval_alpha = parse_override(ENV_INTERVAL_ALPHA, &raw)?;
        }
        Ok(())
    }
}

fn parse_override<T>(var: &str, raw: &str) -> ValidationResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ValidationError::EnvOverride {
            var: var.to_string(),
            message: format!("{:?}: {}", raw, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = SimulationSettings::default();
        assert_eq!(settings.sim_count, 20_000);
        assert_eq!(settings.seed, None);
        assert!(!settings.min_is_best);
        assert_eq!(settings.interval_alpha, 0.95);
        assert!(!settings.include_hdi);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = SimulationSettings::from_json_str(r#"{"seed": 52, "min_is_best": true}"#).unwrap();
        assert_eq!(settings.seed, Some(52));
        assert!(settings.min_is_best);
        assert_eq!(settings.sim_count, DEFAULT_SIM_COUNT);
    }

    #[test]
    fn test_toml_parse() {
        let settings = SimulationSettings::from_toml_str("sim_count = 5000\ninterval_alpha = 0.9\n").unwrap();
        assert_eq!(settings.sim_count, 5000);
        assert_eq!(settings.interval_alpha, 0.9);
    }

    #[test]
    fn test_parse_error_code() {
        let err = SimulationSettings::from_json_str("{ nope").unwrap_err();
        assert_eq!(err.code(), 61);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_SIM_COUNT, "1000"),
            (ENV_SEED, " 7 "),
            (ENV_INTERVAL_ALPHA, "0.8"),
        ]
        .into_iter()
        .collect();
        let mut settings = SimulationSettings::default();
        settings
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(settings.sim_count, 1000);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.interval_alpha, 0.8);
    }

    #[test]
    fn test_bad_override_reports_variable() {
        let mut settings = SimulationSettings::default();
        let err = settings
            .apply_overrides(|k| (k == ENV_SEED).then(|| "abc".to_string()))
            .unwrap_err();
        assert!(matches!(err, ValidationError::EnvOverride { ref var, .. } if var == ENV_SEED));
    }
}
