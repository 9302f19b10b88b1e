//! Core error types.
//!
//! This module provides:
//! - `error`: The structured error taxonomy for parameter validation and numeric failures
//!
//! # Re-exports
//!
//! For convenience, [`PricingError`] is re-exported at this module level.

pub mod error;

pub use error::PricingError;
