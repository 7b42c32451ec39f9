//! Core math modules.

pub mod stable;
pub mod beta;
pub mod gamma;
pub mod dirichlet;
pub mod normal_ig;
