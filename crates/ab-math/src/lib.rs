//! Bayesian A/B testing math utilities.

pub mod math;

pub use math::stable::*;
pub use math::beta::*;
pub use math::gamma::*;
pub use math::dirichlet;
pub use math::normal_ig;
