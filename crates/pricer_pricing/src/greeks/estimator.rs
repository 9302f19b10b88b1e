//! Greeks estimation.
//!
//! Analytic models use closed-form derivatives. Lattice models are repriced under
//! eight bumped market snapshots, run in parallel with rayon:
//!
//! - delta = (V(S0·(1+h)) − V(S0·(1−h))) / (2·S0·h)
//! - gamma = (V(S0·(1+h)) − 2·V(S0) + V(S0·(1−h))) / (S0·h)²
//! - theta = −(V(T) − V(T−Δθ)) / Δθ
//! - vega = (V(σ+hσ) − V(σ−hσ)) / (2·hσ)
//! - rho = (V(r+hr) − V(r−hr)) / (2·hr)
//!
//! Every bumped snapshot is validated before the first reprice, so a bump that
//! leaves the valid domain fails the whole request without touching the engine.

use pricer_core::market_data::MarketParams;
use pricer_core::types::PricingError;
use pricer_models::analytical::{BlackScholes, Greeks};
use pricer_models::instruments::{ExerciseStyle, OptionType};
use pricer_models::models::{LatticeArity, ModelConfig};
use rayon::prelude::*;
use tracing::debug;

use super::config::GreeksConfig;
use super::result::{GreeksMethod, GreeksResult};
use crate::lattice::LatticeEngine;

/// Bumped market snapshots, in reprice order.
#[derive(Debug, Clone, Copy)]
enum Scenario {
    Base,
    SpotUp,
    SpotDown,
    TimeShort,
    VolUp,
    VolDown,
    RateUp,
    RateDown,
}

const SCENARIOS: [Scenario; 8] = [
    Scenario::Base,
    Scenario::SpotUp,
    Scenario::SpotDown,
    Scenario::TimeShort,
    Scenario::VolUp,
    Scenario::VolDown,
    Scenario::RateUp,
    Scenario::RateDown,
];

/// Computes Greeks for analytic and lattice models.
///
/// # Examples
///
/// ```rust
/// use pricer_core::market_data::MarketParams;
/// use pricer_models::instruments::{ExerciseStyle, OptionType};
/// use pricer_models::models::ModelConfig;
/// use pricer_pricing::greeks::{GreeksConfig, GreeksEstimator, GreeksMethod};
///
/// let market = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
/// let estimator = GreeksEstimator::new(GreeksConfig::default()).unwrap();
///
/// let model = ModelConfig::binomial(100, ExerciseStyle::American, OptionType::Put);
/// let result = estimator.estimate(&market, &model).unwrap();
/// assert_eq!(result.method, GreeksMethod::BumpAndReprice);
/// assert!(result.greeks.delta < 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GreeksEstimator {
    config: GreeksConfig,
}

impl GreeksEstimator {
    /// Creates an estimator after validating the bump sizes.
    pub fn new(config: GreeksConfig) -> Result<Self, PricingError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Bump configuration.
    #[inline]
    pub fn config(&self) -> &GreeksConfig {
        &self.config
    }

    /// Greeks for any model configuration.
    pub fn estimate(
        &self,
        market: &MarketParams,
        model: &ModelConfig,
    ) -> Result<GreeksResult, PricingError> {
        model.validate()?;
        match *model {
            ModelConfig::Analytic { option_type } => self.analytic(market, option_type),
            ModelConfig::Lattice {
                arity,
                steps,
                exercise,
                option_type,
            } => self.lattice(market, arity, steps, exercise, option_type),
        }
    }

    /// Closed-form Greeks of a European option.
    pub fn analytic(
        &self,
        market: &MarketParams,
        option_type: OptionType,
    ) -> Result<GreeksResult, PricingError> {
        let valuation = BlackScholes::valuation(market, option_type)?;
        Ok(GreeksResult {
            price: valuation.price,
            greeks: valuation.greeks,
            method: GreeksMethod::ClosedForm,
            degenerate: valuation.degenerate,
        })
    }

    /// Bump-and-reprice Greeks of a lattice option.
    ///
    /// # Errors
    ///
    /// - `PricingError::InvalidParameter` if a bump leaves the valid parameter domain
    ///   or a bumped lattice has inadmissible probabilities
    /// - `PricingError::ComputationOverflow` if any reprice overflows
    ///
    /// A failure in any single reprice fails the whole result.
    pub fn lattice(
        &self,
        market: &MarketParams,
        arity: LatticeArity,
        steps: usize,
        exercise: ExerciseStyle,
        option_type: OptionType,
    ) -> Result<GreeksResult, PricingError> {
        let snapshots = SCENARIOS
            .iter()
            .map(|&scenario| self.bumped(market, scenario))
            .collect::<Result<Vec<MarketParams>, PricingError>>()?;

        debug!(
            arity = %arity,
            steps,
            exercise = %exercise,
            option_type = %option_type,
            reprices = snapshots.len(),
            "bump-and-reprice greeks"
        );

        let values = snapshots
            .par_iter()
            .map(|snapshot| {
                LatticeEngine::new(snapshot, steps, arity)?.price(option_type, exercise)
            })
            .collect::<Result<Vec<f64>, PricingError>>()?;

        let [base, spot_up, spot_down, time_short, vol_up, vol_down, rate_up, rate_down] =
            values[..]
        else {
            return Err(PricingError::ComputationOverflow(format!(
                "expected {} reprices, got {}",
                SCENARIOS.len(),
                values.len()
            )));
        };

        let c = &self.config;
        let spot_step = market.spot() * c.spot_bump_relative;
        let greeks = Greeks {
            delta: (spot_up - spot_down) / (2.0 * spot_step),
            gamma: (spot_up - 2.0 * base + spot_down) / (spot_step * spot_step),
            theta: -(base - time_short) / c.time_bump_years,
            vega: (vol_up - vol_down) / (2.0 * c.vol_bump_absolute),
            rho: (rate_up - rate_down) / (2.0 * c.rate_bump_absolute),
        };

        if !greeks.is_finite() {
            return Err(PricingError::ComputationOverflow(format!(
                "finite-difference greeks for {} are not finite",
                option_type
            )));
        }

        Ok(GreeksResult {
            price: base,
            greeks,
            method: GreeksMethod::BumpAndReprice,
            degenerate: false,
        })
    }

    fn bumped(&self, market: &MarketParams, scenario: Scenario) -> Result<MarketParams, PricingError> {
        let c = &self.config;
        let domain = |result: Result<MarketParams, PricingError>, bump: &str| {
            result.map_err(|e| {
                PricingError::InvalidParameter(format!("{} bump leaves the valid domain: {}", bump, e))
            })
        };

        match scenario {
            Scenario::Base => Ok(*market),
            Scenario::SpotUp => domain(
                market.with_spot(market.spot() * (1.0 + c.spot_bump_relative)),
                "spot",
            ),
            Scenario::SpotDown => domain(
                market.with_spot(market.spot() * (1.0 - c.spot_bump_relative)),
                "spot",
            ),
            Scenario::TimeShort => domain(
                market.with_maturity(market.maturity() - c.time_bump_years),
                "time",
            ),
            Scenario::VolUp => domain(
                market.with_volatility(market.volatility() + c.vol_bump_absolute),
                "volatility",
            ),
            Scenario::VolDown => domain(
                market.with_volatility(market.volatility() - c.vol_bump_absolute),
                "volatility",
            ),
            Scenario::RateUp => domain(market.with_rate(market.rate() + c.rate_bump_absolute), "rate"),
            Scenario::RateDown => {
                domain(market.with_rate(market.rate() - c.rate_bump_absolute), "rate")
            }
        }
    }
}
