//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors from parameter validation and lattice/analytic computation
//!
//! A degenerate analytic input (volatility or maturity effectively zero) is not an
//! error: it is reported through the `degenerate` flag on analytic results.

use thiserror::Error;

/// Categorised pricing errors.
///
/// Provides structured error handling for pricing operations with
/// descriptive context for each failure mode.
///
/// # Variants
/// - `InvalidParameter`: Non-positive spot/strike/maturity/volatility, fewer than one
///   step, an inadmissible derived probability, or a bump that leaves the valid domain
/// - `ComputationOverflow`: A non-finite intermediate value was produced
/// - `UnsupportedConfiguration`: An output was requested that does not exist for the
///   chosen model/exercise combination
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidParameter("spot must be positive".to_string());
/// assert_eq!(format!("{}", err), "Invalid parameter: spot must be positive");
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PricingError {
    /// Invalid input parameter, raised before any lattice is built.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Non-finite intermediate value (overflow, NaN) detected during computation.
    #[error("Computation overflow: {0}")]
    ComputationOverflow(String),

    /// Requested output is not defined for this configuration.
    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),
}

impl PricingError {
    /// Builds an `InvalidParameter` error for a named scalar.
    ///
    /// # Examples
    /// ```
    /// use pricer_core::types::PricingError;
    ///
    /// let err = PricingError::invalid("volatility", -0.2, "must be positive");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid parameter: volatility = -0.2 (must be positive)"
    /// );
    /// ```
    pub fn invalid(name: &str, value: f64, reason: &str) -> Self {
        PricingError::InvalidParameter(format!("{} = {} ({})", name, value, reason))
    }

    /// Returns whether this error was raised by parameter validation.
    #[inline]
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, PricingError::InvalidParameter(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = PricingError::InvalidParameter("steps must be at least 1".to_string());
        assert_eq!(format!("{}", err), "Invalid parameter: steps must be at least 1");
    }

    #[test]
    fn test_computation_overflow_display() {
        let err = PricingError::ComputationOverflow("terminal stock price".to_string());
        assert_eq!(
            format!("{}", err),
            "Computation overflow: terminal stock price"
        );
    }

    #[test]
    fn test_unsupported_configuration_display() {
        let err = PricingError::UnsupportedConfiguration("boundary for European".to_string());
        assert!(err.to_string().starts_with("Unsupported configuration"));
    }

    #[test]
    fn test_invalid_helper() {
        let err = PricingError::invalid("spot", 0.0, "must be positive");
        assert!(err.is_invalid_parameter());
        assert!(err.to_string().contains("spot = 0"));
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = PricingError::ComputationOverflow("x".to_string());
        let _: &dyn std::error::Error = &err;
        assert!(!err.is_invalid_parameter());
    }
}
