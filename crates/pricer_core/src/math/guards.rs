//! Finite-value guards.
//!
//! Extreme parameter combinations (very large volatility or step counts) can push
//! stock prices or option values outside the representable range. These helpers
//! turn such values into `PricingError::ComputationOverflow` at the point they are
//! produced instead of letting NaN/Infinity flow downstream.

use crate::types::PricingError;

/// Returns `value` unchanged if it is finite.
///
/// # Errors
/// `PricingError::ComputationOverflow` naming `context` if `value` is NaN or infinite.
///
/// # Examples
/// ```
/// use pricer_core::math::ensure_finite;
///
/// assert_eq!(ensure_finite(1.5, "price").unwrap(), 1.5);
/// assert!(ensure_finite(f64::INFINITY, "price").is_err());
/// ```
#[inline]
pub fn ensure_finite(value: f64, context: &str) -> Result<f64, PricingError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::ComputationOverflow(format!(
            "{} is not finite ({})",
            context, value
        )))
    }
}

/// Checks every element of `values` is finite.
///
/// # Errors
/// `PricingError::ComputationOverflow` reporting the first offending index.
pub fn ensure_finite_slice(values: &[f64], context: &str) -> Result<(), PricingError> {
    match values.iter().position(|v| !v.is_finite()) {
        None => Ok(()),
        Some(idx) => Err(PricingError::ComputationOverflow(format!(
            "{}[{}] is not finite ({})",
            context, idx, values[idx]
        ))),
    }
}
