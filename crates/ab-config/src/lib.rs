//! Bayesian A/B testing configuration loading and validation.
//!
//! This crate provides:
//! - Typed prior hyperparameters with per-family defaults
//! - Simulation settings (sample count, seed, interval mass)
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation with stable error codes

pub mod priors;
pub mod resolve;
pub mod settings;
pub mod validate;

pub use priors::{BetaPrior, DirichletPrior, GammaPrior, NormalInverseGammaPrior};
pub use resolve::{load_settings, resolve_config, ConfigPaths, ConfigSource};
pub use settings::SimulationSettings;
pub use validate::{ValidationError, ValidationResult};
