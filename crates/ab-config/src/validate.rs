//! Configuration validation errors and semantic validation.

use crate::priors::{BetaPrior, DirichletPrior, GammaPrior, NormalInverseGammaPrior};
use crate::settings::SimulationSettings;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Length mismatch for {field}: expected {expected}, got {actual}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid environment override {var}: {message}")]
    EnvOverride { var: String, message: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 62,
            ValidationError::InvalidValue { .. } => 63,
            ValidationError::LengthMismatch { .. } => 64,
            ValidationError::EnvOverride { .. } => 65,
        }
    }
}

/// Validate Beta prior parameters: both strictly positive.
pub fn validate_beta_prior(field: &str, prior: &BetaPrior) -> ValidationResult<()> {
    positive(&format!("{}.alpha", field), prior.alpha)?;
    positive(&format!("{}.beta", field), prior.beta)?;
    Ok(())
}

/// Validate Gamma prior parameters: shape and rate strictly positive.
pub fn validate_gamma_prior(field: &str, prior: &GammaPrior) -> ValidationResult<()> {
    positive(&format!("{}.shape", field), prior.shape)?;
    positive(&format!("{}.rate", field), prior.rate)?;
    Ok(())
}

/// Validate Normal-Inverse-Gamma prior parameters: all non-negative.
pub fn validate_nig_prior(field: &str, prior: &NormalInverseGammaPrior) -> ValidationResult<()> {
    non_negative(&format!("{}.mean", field), prior.mean)?;
    non_negative(&format!("{}.shape", field), prior.shape)?;
    non_negative(&format!("{}.scale", field), prior.scale)?;
    non_negative(&format!("{}.weight", field), prior.weight)?;
    Ok(())
}

/// Validate a Dirichlet prior against the number of states.
pub fn validate_dirichlet_prior(
    field: &str,
    prior: &DirichletPrior,
    states: usize,
) -> ValidationResult<()> {
    if prior.len() != states {
        return Err(ValidationError::LengthMismatch {
            field: format!("{}.alpha", field),
            expected: states,
            actual: prior.len(),
        });
    }
    for (i, &a) in prior.alpha.iter().enumerate() {
        positive(&format!("{}.alpha[{}]", field, i), a)?;
    }
    Ok(())
}

/// Validate simulation settings.
pub fn validate_settings(settings: &SimulationSettings) -> ValidationResult<()> {
    if settings.sim_count == 0 {
        return Err(ValidationError::InvalidValue {
            field: "sim_count".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    let alpha = settings.interval_alpha;
    if alpha.is_nan() || alpha <= 0.0 || alpha >= 1.0 {
        return Err(ValidationError::InvalidValue {
            field: "interval_alpha".to_string(),
            message: format!("Must be in (0, 1), got {}", alpha),
        });
    }

    Ok(())
}

fn positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be positive, got {}", value),
        });
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be non-negative, got {}", value),
        });
    }
    Ok(())
}
