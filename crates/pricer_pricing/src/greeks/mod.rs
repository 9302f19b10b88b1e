//! Option sensitivities.
//!
//! - [`GreeksConfig`]: finite-difference bump sizes
//! - [`GreeksEstimator`]: closed-form Greeks for the analytic model, bump-and-reprice
//!   Greeks for lattice models
//! - [`GreeksResult`]: price plus all five sensitivities

mod config;
mod estimator;
mod result;

pub use config::GreeksConfig;
pub use estimator::GreeksEstimator;
pub use result::{GreeksMethod, GreeksResult};

#[cfg(test)]
mod tests;
