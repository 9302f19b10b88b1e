//! Validated market parameters.
//!
//! [`MarketParams`] is immutable once built. Bumped copies for finite-difference
//! sensitivities are produced through the `with_*` methods, which re-run the same
//! validation so a bump can never smuggle a non-positive spot, maturity or
//! volatility into a lattice build.

use crate::types::PricingError;

/// Market snapshot for one pricing request.
///
/// # Invariants
/// - `spot`, `strike`, `maturity`, `volatility` are finite and strictly positive
/// - `rate` is finite (negative rates are allowed)
/// - `dividend_yield` is finite and non-negative
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketParams;
///
/// let market = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
/// assert_eq!(market.dividend_yield(), 0.0);
///
/// // Invalid spot
/// assert!(MarketParams::new(0.0, 100.0, 1.0, 0.05, 0.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMarketParams"))]
pub struct MarketParams {
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    volatility: f64,
    dividend_yield: f64,
}

/// Unvalidated wire shape used when deserialising [`MarketParams`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMarketParams {
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    volatility: f64,
    #[serde(default)]
    dividend_yield: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMarketParams> for MarketParams {
    type Error = PricingError;

    fn try_from(raw: RawMarketParams) -> Result<Self, Self::Error> {
        MarketParams::new(raw.spot, raw.strike, raw.maturity, raw.rate, raw.volatility)?
            .with_dividend_yield(raw.dividend_yield)
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), PricingError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PricingError::invalid(name, value, "must be finite and positive"));
    }
    Ok(())
}

impl MarketParams {
    /// Creates market parameters with zero dividend yield.
    ///
    /// # Arguments
    /// * `spot` - Current stock price S0 (must be positive)
    /// * `strike` - Strike price K (must be positive)
    /// * `maturity` - Time to maturity T in years (must be positive)
    /// * `rate` - Continuously compounded risk-free rate r
    /// * `volatility` - Annualised volatility σ (must be positive)
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` naming the first offending input.
    pub fn new(
        spot: f64,
        strike: f64,
        maturity: f64,
        rate: f64,
        volatility: f64,
    ) -> Result<Self, PricingError> {
        require_positive("spot", spot)?;
        require_positive("strike", strike)?;
        require_positive("maturity", maturity)?;
        require_positive("volatility", volatility)?;
        if !rate.is_finite() {
            return Err(PricingError::invalid("rate", rate, "must be finite"));
        }

        Ok(Self {
            spot,
            strike,
            maturity,
            rate,
            volatility,
            dividend_yield: 0.0,
        })
    }

    /// Returns a copy with the continuous dividend yield q set.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if `dividend_yield` is negative or not finite.
    pub fn with_dividend_yield(self, dividend_yield: f64) -> Result<Self, PricingError> {
        if !dividend_yield.is_finite() || dividend_yield < 0.0 {
            return Err(PricingError::invalid(
                "dividend_yield",
                dividend_yield,
                "must be finite and non-negative",
            ));
        }
        Ok(Self {
            dividend_yield,
            ..self
        })
    }

    /// Returns a copy with a different spot price.
    pub fn with_spot(self, spot: f64) -> Result<Self, PricingError> {
        require_positive("spot", spot)?;
        Ok(Self { spot, ..self })
    }

    /// Returns a copy with a different maturity.
    pub fn with_maturity(self, maturity: f64) -> Result<Self, PricingError> {
        require_positive("maturity", maturity)?;
        Ok(Self { maturity, ..self })
    }

    /// Returns a copy with a different volatility.
    pub fn with_volatility(self, volatility: f64) -> Result<Self, PricingError> {
        require_positive("volatility", volatility)?;
        Ok(Self { volatility, ..self })
    }

    /// Returns a copy with a different risk-free rate.
    pub fn with_rate(self, rate: f64) -> Result<Self, PricingError> {
        if !rate.is_finite() {
            return Err(PricingError::invalid("rate", rate, "must be finite"));
        }
        Ok(Self { rate, ..self })
    }

    /// Returns the spot price S0.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the strike price K.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Returns the maturity T in years.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Returns the risk-free rate r.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the volatility σ.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the continuous dividend yield q.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// S0·e^(−qT)
    #[inline]
    pub fn discounted_spot(&self) -> f64 {
        self.spot * (-self.dividend_yield * self.maturity).exp()
    }

    /// K·e^(−rT)
    #[inline]
    pub fn discounted_strike(&self) -> f64 {
        self.strike * (-self.rate * self.maturity).exp()
    }

    /// Risk-neutral forward S0·e^((r−q)T).
    #[inline]
    pub fn forward(&self) -> f64 {
        self.spot * ((self.rate - self.dividend_yield) * self.maturity).exp()
    }

    /// Total volatility σ·√T.
    #[inline]
    pub fn total_volatility(&self) -> f64 {
        self.volatility * self.maturity.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn standard() -> MarketParams {
        MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap()
    }

    // ==========================================================
    // Constructor Tests
    // ==========================================================

    #[test]
    fn test_new_valid_parameters() {
        let market = standard();
        assert_eq!(market.spot(), 100.0);
        assert_eq!(market.strike(), 100.0);
        assert_eq!(market.maturity(), 1.0);
        assert_eq!(market.rate(), 0.05);
        assert_eq!(market.volatility(), 0.2);
        assert_eq!(market.dividend_yield(), 0.0);
    }

    #[test]
    fn test_non_positive_inputs_rejected() {
        assert!(MarketParams::new(-1.0, 100.0, 1.0, 0.05, 0.2).is_err());
        assert!(MarketParams::new(100.0, 0.0, 1.0, 0.05, 0.2).is_err());
        assert!(MarketParams::new(100.0, 100.0, 0.0, 0.05, 0.2).is_err());
        assert!(MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.0).is_err());
        assert!(MarketParams::new(100.0, 100.0, 1.0, 0.05, -0.2).is_err());
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        assert!(MarketParams::new(f64::NAN, 100.0, 1.0, 0.05, 0.2).is_err());
        assert!(MarketParams::new(100.0, 100.0, f64::INFINITY, 0.05, 0.2).is_err());
        assert!(MarketParams::new(100.0, 100.0, 1.0, f64::NAN, 0.2).is_err());
    }

    #[test]
    fn test_negative_rate_allowed() {
        assert!(MarketParams::new(100.0, 100.0, 1.0, -0.01, 0.2).is_ok());
    }

    #[test]
    fn test_error_names_parameter() {
        let err = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.0).unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(err.to_string().contains("volatility"));
    }

    // ==========================================================
    // Dividend Yield Tests
    // ==========================================================

    #[test]
    fn test_dividend_yield() {
        let market = standard().with_dividend_yield(0.03).unwrap();
        assert_eq!(market.dividend_yield(), 0.03);
        assert!(standard().with_dividend_yield(-0.01).is_err());
    }

    // ==========================================================
    // Bump Tests
    // ==========================================================

    #[test]
    fn test_bumps_revalidate() {
        let market = standard();
        assert_eq!(market.with_spot(101.0).unwrap().spot(), 101.0);
        assert!(market.with_spot(0.0).is_err());
        assert!(market.with_volatility(-0.01).is_err());
        assert!(market.with_maturity(0.0).is_err());
        assert_eq!(market.with_rate(-0.5).unwrap().rate(), -0.5);
    }

    #[test]
    fn test_bump_keeps_other_fields() {
        let market = standard().with_dividend_yield(0.02).unwrap();
        let bumped = market.with_volatility(0.25).unwrap();
        assert_eq!(bumped.dividend_yield(), 0.02);
        assert_eq!(bumped.spot(), 100.0);
    }

    // ==========================================================
    // Derived Quantities
    // ==========================================================

    #[test]
    fn test_derived_quantities() {
        let market = standard().with_dividend_yield(0.01).unwrap();
        assert_relative_eq!(market.discounted_spot(), 100.0 * (-0.01_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(market.discounted_strike(), 100.0 * (-0.05_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(market.forward(), 100.0 * (0.04_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(market.total_volatility(), 0.2, epsilon = 1e-15);
    }
}
