//! Black-Scholes pricing model for European options with continuous dividend yield.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^(-qT)·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·e^(-qT)·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! ## Degenerate inputs
//!
//! When σ√T falls below [`DEGENERATE_EPSILON`] the formulas above divide by an
//! effectively zero quantity. The model then prices the discounted intrinsic value
//! max(±(S·e^(-qT) - K·e^(-rT)), 0) and reports the exact derivatives of that
//! value: gamma and vega are zero.
//!
//! ## Greeks conventions
//!
//! All Greeks are per unit change and per year: theta is -∂V/∂T, vega is ∂V/∂σ
//! for an absolute change of 1.0 in σ, rho is ∂V/∂r for an absolute change of
//! 1.0 in r. Put Greeks are derived from call Greeks through put-call parity.

use num_traits::Float;
use pricer_core::market_data::MarketParams;
use pricer_core::math::ensure_finite;
use pricer_core::types::PricingError;

use super::distributions::{norm_cdf, norm_pdf};
use crate::instruments::OptionType;

/// Threshold on σ√T below which closed-form inputs are treated as degenerate.
pub const DEGENERATE_EPSILON: f64 = 1e-10;

/// Magnitude of d₁ reported for degenerate inputs.
const DEGENERATE_D1: f64 = 100.0;

#[inline]
fn constant<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

/// The five standard sensitivities of one option.
///
/// # Examples
/// ```
/// use pricer_models::analytical::Greeks;
///
/// let greeks: Greeks<f64> = Greeks { delta: 0.6, gamma: 0.02, theta: -6.4, vega: 37.5, rho: 53.2 };
/// let display = greeks.per_day_theta().per_percent_vega_rho();
/// assert!((display.theta - (-6.4 / 365.0)).abs() < 1e-12);
/// assert!((display.vega - 0.375).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Greeks<T> {
    /// ∂V/∂S
    pub delta: T,
    /// ∂²V/∂S²
    pub gamma: T,
    /// -∂V/∂T, per year
    pub theta: T,
    /// ∂V/∂σ
    pub vega: T,
    /// ∂V/∂r
    pub rho: T,
}

impl<T: Float> Greeks<T> {
    /// All sensitivities zero.
    pub fn zero() -> Self {
        Self {
            delta: T::zero(),
            gamma: T::zero(),
            theta: T::zero(),
            vega: T::zero(),
            rho: T::zero(),
        }
    }

    /// Theta expressed per calendar day (divided by 365).
    pub fn per_day_theta(self) -> Self {
        Self {
            theta: self.theta / constant::<T>(365.0),
            ..self
        }
    }

    /// Vega and rho expressed per percentage point (divided by 100).
    pub fn per_percent_vega_rho(self) -> Self {
        let hundred = constant::<T>(100.0);
        Self {
            vega: self.vega / hundred,
            rho: self.rho / hundred,
            ..self
        }
    }

    /// Returns whether every sensitivity is finite.
    pub fn is_finite(&self) -> bool {
        self.delta.is_finite()
            && self.gamma.is_finite()
            && self.theta.is_finite()
            && self.vega.is_finite()
            && self.rho.is_finite()
    }
}

/// Black-Scholes model for European option pricing.
///
/// # Type Parameters
/// * `T` - Floating-point type implementing `Float` (e.g., `f64`, `f32`)
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0_f64, 0.05, 0.2).unwrap();
/// let call_price = bs.price_call(100.0, 1.0);
/// let put_price = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call_price - put_price - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BlackScholes<T: Float> {
    spot: T,
    rate: T,
    volatility: T,
    dividend_yield: T,
}

impl<T: Float> BlackScholes<T> {
    /// Creates a new Black-Scholes model with zero dividend yield.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if spot or volatility is not positive.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// assert!(BlackScholes::new(100.0_f64, 0.05, 0.2).is_ok());
    /// assert!(BlackScholes::new(-100.0_f64, 0.05, 0.2).is_err());
    /// assert!(BlackScholes::new(100.0_f64, 0.05, 0.0).is_err());
    /// ```
    pub fn new(spot: T, rate: T, volatility: T) -> Result<Self, PricingError> {
        let zero = T::zero();

        if !(spot > zero) || !spot.is_finite() {
            return Err(PricingError::invalid(
                "spot",
                spot.to_f64().unwrap_or(f64::NAN),
                "must be finite and positive",
            ));
        }
        if !(volatility > zero) || !volatility.is_finite() {
            return Err(PricingError::invalid(
                "volatility",
                volatility.to_f64().unwrap_or(f64::NAN),
                "must be finite and positive",
            ));
        }

        Ok(Self {
            spot,
            rate,
            volatility,
            dividend_yield: zero,
        })
    }

    /// Returns a copy with continuous dividend yield `q`.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if `q` is negative.
    pub fn with_dividend_yield(self, dividend_yield: T) -> Result<Self, PricingError> {
        if dividend_yield < T::zero() || !dividend_yield.is_finite() {
            return Err(PricingError::invalid(
                "dividend_yield",
                dividend_yield.to_f64().unwrap_or(f64::NAN),
                "must be finite and non-negative",
            ));
        }
        Ok(Self {
            dividend_yield,
            ..self
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> T {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }

    /// Returns the dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> T {
        self.dividend_yield
    }

    /// Returns whether σ√T is below [`DEGENERATE_EPSILON`] for this expiry.
    #[inline]
    pub fn is_degenerate(&self, expiry: T) -> bool {
        let total_vol = self.volatility * expiry.max(T::zero()).sqrt();
        total_vol < constant::<T>(DEGENERATE_EPSILON)
    }

    #[inline]
    fn discounted_spot(&self, expiry: T) -> T {
        self.spot * (-self.dividend_yield * expiry).exp()
    }

    #[inline]
    fn discounted_strike(&self, strike: T, expiry: T) -> T {
        strike * (-self.rate * expiry).exp()
    }

    /// Computes d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T).
    ///
    /// For degenerate inputs returns ±100 according to the sign of the
    /// discounted moneyness, or zero when exactly at the money forward.
    #[inline]
    pub fn d1(&self, strike: T, expiry: T) -> T {
        if self.is_degenerate(expiry) {
            let forward_gap = self.discounted_spot(expiry) - self.discounted_strike(strike, expiry);
            let large = constant::<T>(DEGENERATE_D1);
            return if forward_gap > T::zero() {
                large
            } else if forward_gap < T::zero() {
                -large
            } else {
                T::zero()
            };
        }

        let half = constant::<T>(0.5);
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let log_moneyness = (self.spot / strike).ln();
        let drift =
            (self.rate - self.dividend_yield + half * self.volatility * self.volatility) * expiry;

        (log_moneyness + drift) / vol_sqrt_t
    }

    /// Computes d₂ = d₁ - σ√T.
    #[inline]
    pub fn d2(&self, strike: T, expiry: T) -> T {
        if self.is_degenerate(expiry) {
            return self.d1(strike, expiry);
        }
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// Computes the European call price.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// let bs = BlackScholes::new(100.0_f64, 0.05, 0.2).unwrap();
    /// assert!((bs.price_call(100.0, 1.0) - 10.4506).abs() < 1e-3);
    /// ```
    #[inline]
    pub fn price_call(&self, strike: T, expiry: T) -> T {
        let fwd_spot = self.discounted_spot(expiry);
        let fwd_strike = self.discounted_strike(strike, expiry);

        if self.is_degenerate(expiry) {
            return (fwd_spot - fwd_strike).max(T::zero());
        }

        let d1 = self.d1(strike, expiry);
        let d2 = d1 - self.volatility * expiry.sqrt();
        fwd_spot * norm_cdf(d1) - fwd_strike * norm_cdf(d2)
    }

    /// Computes the European put price.
    #[inline]
    pub fn price_put(&self, strike: T, expiry: T) -> T {
        let fwd_spot = self.discounted_spot(expiry);
        let fwd_strike = self.discounted_strike(strike, expiry);

        if self.is_degenerate(expiry) {
            return (fwd_strike - fwd_spot).max(T::zero());
        }

        let d1 = self.d1(strike, expiry);
        let d2 = d1 - self.volatility * expiry.sqrt();
        fwd_strike * norm_cdf(-d2) - fwd_spot * norm_cdf(-d1)
    }

    /// Computes the price for either option type.
    #[inline]
    pub fn price(&self, option_type: OptionType, strike: T, expiry: T) -> T {
        match option_type {
            OptionType::Call => self.price_call(strike, expiry),
            OptionType::Put => self.price_put(strike, expiry),
        }
    }

    /// Computes Delta (∂V/∂S).
    ///
    /// - Call Delta = e^(-qT)·N(d₁)
    /// - Put Delta = e^(-qT)·(N(d₁) - 1)
    #[inline]
    pub fn delta(&self, strike: T, expiry: T, option_type: OptionType) -> T {
        let div_discount = (-self.dividend_yield * expiry).exp();
        let call_delta = if self.is_degenerate(expiry) {
            let itm = self.discounted_spot(expiry) > self.discounted_strike(strike, expiry);
            if itm {
                div_discount
            } else {
                T::zero()
            }
        } else {
            div_discount * norm_cdf(self.d1(strike, expiry))
        };

        match option_type {
            OptionType::Call => call_delta,
            OptionType::Put => call_delta - div_discount,
        }
    }

    /// Computes Gamma (∂²V/∂S²) = e^(-qT)·φ(d₁) / (S·σ·√T).
    ///
    /// Identical for calls and puts; zero for degenerate inputs.
    #[inline]
    pub fn gamma(&self, strike: T, expiry: T) -> T {
        if self.is_degenerate(expiry) {
            return T::zero();
        }
        let d1 = self.d1(strike, expiry);
        let div_discount = (-self.dividend_yield * expiry).exp();
        div_discount * norm_pdf(d1) / (self.spot * self.volatility * expiry.sqrt())
    }

    /// Computes Vega (∂V/∂σ) = S·e^(-qT)·√T·φ(d₁).
    ///
    /// Identical for calls and puts; zero for degenerate inputs.
    #[inline]
    pub fn vega(&self, strike: T, expiry: T) -> T {
        if self.is_degenerate(expiry) {
            return T::zero();
        }
        let d1 = self.d1(strike, expiry);
        self.discounted_spot(expiry) * expiry.sqrt() * norm_pdf(d1)
    }

    /// Computes Theta (-∂V/∂T), usually negative.
    ///
    /// - Call Theta = -S·e^(-qT)·φ(d₁)·σ/(2√T) - r·K·e^(-rT)·N(d₂) + q·S·e^(-qT)·N(d₁)
    /// - Put Theta = Call Theta - q·S·e^(-qT) + r·K·e^(-rT)
    #[inline]
    pub fn theta(&self, strike: T, expiry: T, option_type: OptionType) -> T {
        let fwd_spot = self.discounted_spot(expiry);
        let fwd_strike = self.discounted_strike(strike, expiry);

        let call_theta = if self.is_degenerate(expiry) {
            if fwd_spot > fwd_strike {
                self.dividend_yield * fwd_spot - self.rate * fwd_strike
            } else {
                T::zero()
            }
        } else {
            let d1 = self.d1(strike, expiry);
            let d2 = d1 - self.volatility * expiry.sqrt();
            let two = constant::<T>(2.0);
            -(fwd_spot * norm_pdf(d1) * self.volatility) / (two * expiry.sqrt())
                - self.rate * fwd_strike * norm_cdf(d2)
                + self.dividend_yield * fwd_spot * norm_cdf(d1)
        };

        match option_type {
            OptionType::Call => call_theta,
            OptionType::Put => {
                call_theta - self.dividend_yield * fwd_spot + self.rate * fwd_strike
            }
        }
    }

    /// Computes Rho (∂V/∂r).
    ///
    /// - Call Rho = K·T·e^(-rT)·N(d₂)
    /// - Put Rho = Call Rho - K·T·e^(-rT)
    #[inline]
    pub fn rho(&self, strike: T, expiry: T, option_type: OptionType) -> T {
        let fwd_strike = self.discounted_strike(strike, expiry);

        let call_rho = if self.is_degenerate(expiry) {
            if self.discounted_spot(expiry) > fwd_strike {
                expiry * fwd_strike
            } else {
                T::zero()
            }
        } else {
            expiry * fwd_strike * norm_cdf(self.d2(strike, expiry))
        };

        match option_type {
            OptionType::Call => call_rho,
            OptionType::Put => call_rho - expiry * fwd_strike,
        }
    }

    /// Computes all five Greeks.
    pub fn greeks(&self, strike: T, expiry: T, option_type: OptionType) -> Greeks<T> {
        Greeks {
            delta: self.delta(strike, expiry, option_type),
            gamma: self.gamma(strike, expiry),
            theta: self.theta(strike, expiry, option_type),
            vega: self.vega(strike, expiry),
            rho: self.rho(strike, expiry, option_type),
        }
    }
}

/// Closed-form valuation of one European option.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalyticValuation {
    /// Option type valued.
    pub option_type: OptionType,
    /// Present value.
    pub price: f64,
    /// Closed-form sensitivities.
    pub greeks: Greeks<f64>,
    /// σ√T was below [`DEGENERATE_EPSILON`]; price is discounted intrinsic value.
    pub degenerate: bool,
}

impl BlackScholes<f64> {
    /// Builds the model from validated market parameters.
    pub fn from_market(market: &MarketParams) -> Self {
        Self {
            spot: market.spot(),
            rate: market.rate(),
            volatility: market.volatility(),
            dividend_yield: market.dividend_yield(),
        }
    }

    /// Prices a European option and its Greeks from market parameters.
    ///
    /// # Errors
    /// `PricingError::ComputationOverflow` if the price or any Greek is not finite.
    ///
    /// # Examples
    /// ```
    /// use pricer_core::market_data::MarketParams;
    /// use pricer_models::analytical::BlackScholes;
    /// use pricer_models::instruments::OptionType;
    ///
    /// let market = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
    /// let valuation = BlackScholes::valuation(&market, OptionType::Call).unwrap();
    /// assert!((valuation.price - 10.4506).abs() < 1e-3);
    /// assert!(!valuation.degenerate);
    /// ```
    pub fn valuation(
        market: &MarketParams,
        option_type: OptionType,
    ) -> Result<AnalyticValuation, PricingError> {
        let model = Self::from_market(market);
        let (strike, expiry) = (market.strike(), market.maturity());

        let price = ensure_finite(model.price(option_type, strike, expiry), "analytic price")?;
        let greeks = model.greeks(strike, expiry, option_type);
        if !greeks.is_finite() {
            return Err(PricingError::ComputationOverflow(format!(
                "analytic {} greeks are not finite",
                option_type
            )));
        }

        Ok(AnalyticValuation {
            option_type,
            price,
            greeks,
            degenerate: model.is_degenerate(expiry),
        })
    }
}
