//! Bump sizes for finite-difference Greeks.

use pricer_core::types::PricingError;

/// Finite-difference bump configuration.
///
/// # Defaults
///
/// | Bump | Value |
/// |---|---|
/// | spot (relative) | 1 % of S0 |
/// | volatility (absolute) | 0.01 |
/// | rate (absolute) | 1e-4 |
/// | time (years) | 1/365 |
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::greeks::GreeksConfig;
///
/// let config = GreeksConfig::default().with_spot_bump(0.005);
/// assert!(config.validate().is_ok());
///
/// // Relative spot bump of 100 % would move S0 to zero
/// assert!(GreeksConfig::default().with_spot_bump(1.0).validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GreeksConfig {
    /// Relative spot bump h: S0·(1 ± h).
    pub spot_bump_relative: f64,
    /// Absolute volatility bump hσ.
    pub vol_bump_absolute: f64,
    /// Absolute rate bump hr.
    pub rate_bump_absolute: f64,
    /// Time bump Δθ in years.
    pub time_bump_years: f64,
}

impl Default for GreeksConfig {
    fn default() -> Self {
        Self {
            spot_bump_relative: 0.01,
            vol_bump_absolute: 0.01,
            rate_bump_absolute: 1e-4,
            time_bump_years: 1.0 / 365.0,
        }
    }
}

impl GreeksConfig {
    /// Sets the relative spot bump.
    pub fn with_spot_bump(mut self, relative: f64) -> Self {
        self.spot_bump_relative = relative;
        self
    }

    /// Sets the absolute volatility bump.
    pub fn with_vol_bump(mut self, absolute: f64) -> Self {
        self.vol_bump_absolute = absolute;
        self
    }

    /// Sets the absolute rate bump.
    pub fn with_rate_bump(mut self, absolute: f64) -> Self {
        self.rate_bump_absolute = absolute;
        self
    }

    /// Sets the time bump in years.
    pub fn with_time_bump(mut self, years: f64) -> Self {
        self.time_bump_years = years;
        self
    }

    /// Validates the bump sizes on their own.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidParameter` if any bump is non-finite or non-positive,
    /// or if the relative spot bump is 1 or more.
    pub fn validate(&self) -> Result<(), PricingError> {
        let bumps = [
            ("spot_bump_relative", self.spot_bump_relative),
            ("vol_bump_absolute", self.vol_bump_absolute),
            ("rate_bump_absolute", self.rate_bump_absolute),
            ("time_bump_years", self.time_bump_years),
        ];
        for (name, value) in bumps {
            if !value.is_finite() || value <= 0.0 {
                return Err(PricingError::invalid(name, value, "bump must be finite and positive"));
            }
        }
        if self.spot_bump_relative >= 1.0 {
            return Err(PricingError::invalid(
                "spot_bump_relative",
                self.spot_bump_relative,
                "down bump would make spot non-positive",
            ));
        }
        Ok(())
    }
}
