//! Numeric helpers shared by the pricing layers.
//!
//! - [`guards`]: Finite-value checks that surface overflow as `PricingError::ComputationOverflow`

pub mod guards;

pub use guards::{ensure_finite, ensure_finite_slice};
