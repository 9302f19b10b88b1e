//! Model selection and lattice parameterisation.
//!
//! - [`config`]: [`ModelConfig`], [`LatticeArity`], [`PricingRequest`] and the optional outputs
//! - [`lattice`]: [`LatticeParams`], per-step branching factors and risk-neutral probabilities

pub mod config;
pub mod lattice;

pub use config::{ConvergenceGrid, LatticeArity, ModelConfig, PricingRequest, RequestedOutputs};
pub use lattice::{LatticeParams, PROBABILITY_TOLERANCE};
