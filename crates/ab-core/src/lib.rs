//! Bayesian A/B testing core library.
//!
//! This library provides:
//! - Conjugate posterior samplers for binary, normal, delta, categorical,
//!   count and duration data
//! - Decision metrics: probability of being best and expected loss
//! - Quantile and highest-density credible intervals
//! - An experiment layer of named variants, loadable from JSON or TOML
//!
//! The binary entry point is in `main.rs`.

pub mod composite;
pub mod error;
pub mod evaluation;
pub mod exit_codes;
pub mod experiment;
pub mod intervals;
pub mod logging;
pub mod matrix;
pub mod metrics;
pub mod posterior;
pub mod seeds;
pub mod stats;

pub use error::{Error, Result};
pub use evaluation::{
    evaluate_bernoulli, evaluate_delta_lognormal, evaluate_delta_normal, evaluate_dirichlet,
    evaluate_exponential, evaluate_normal, evaluate_poisson, EvaluationResult,
};
pub use intervals::Interval;
pub use matrix::SampleMatrix;
