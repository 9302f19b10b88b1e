//! Backward-induction lattice engine.
//!
//! One routine serves both arities: the children of node `j` at level `i` are the
//! nodes `j..j + branches` at level `i + 1`, weighted by the probabilities
//! `[down, (mid), up]` from [`LatticeParams`]. Every pass values the European and
//! the American option together.
//!
//! # Retention modes
//!
//! - [`RetentionMode::PriceOnly`]: two rolling value buffers updated in place, O(N) memory
//! - [`RetentionMode::FullLattice`]: every level kept, O(N²) memory, needed for boundary
//!   extraction and lattice export
//!
//! Both modes run the same arithmetic in the same order and produce bit-identical
//! root values.

use pricer_core::market_data::MarketParams;
use pricer_core::math::{ensure_finite, ensure_finite_slice};
use pricer_core::types::PricingError;
use pricer_models::instruments::{ExerciseStyle, OptionType};
use pricer_models::models::{LatticeArity, LatticeParams};
use tracing::{debug, trace};

use super::node::{Lattice, LatticeLevel, LatticeNode};

/// Relative margin by which intrinsic value must exceed continuation to trigger exercise.
///
/// Exact and near-exact ties keep the continuation value.
pub const EXERCISE_TIE_TOLERANCE: f64 = 1e-12;

/// How much of the lattice to keep after backward induction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RetentionMode {
    /// Keep only the root values.
    #[default]
    PriceOnly,
    /// Keep every node of every level.
    FullLattice,
}

/// Result of one backward-induction pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeValuation {
    /// Parameters the lattice was built with.
    pub params: LatticeParams,
    /// Option type valued.
    pub option_type: OptionType,
    /// European root value.
    pub european: f64,
    /// American root value.
    pub american: f64,
    /// Retained lattice in [`RetentionMode::FullLattice`].
    pub lattice: Option<Lattice>,
}

impl LatticeValuation {
    /// Root value for the given exercise style.
    #[inline]
    pub fn price(&self, exercise: ExerciseStyle) -> f64 {
        match exercise {
            ExerciseStyle::European => self.european,
            ExerciseStyle::American => self.american,
        }
    }

    /// American minus European root value.
    #[inline]
    pub fn early_exercise_premium(&self) -> f64 {
        self.american - self.european
    }
}

/// Lattice pricer for one market snapshot, step count and arity.
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketParams;
/// use pricer_models::instruments::{ExerciseStyle, OptionType};
/// use pricer_models::models::LatticeArity;
/// use pricer_pricing::lattice::LatticeEngine;
///
/// let market = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
/// let engine = LatticeEngine::new(&market, 200, LatticeArity::Binomial).unwrap();
///
/// let european = engine.price(OptionType::Put, ExerciseStyle::European).unwrap();
/// let american = engine.price(OptionType::Put, ExerciseStyle::American).unwrap();
/// assert!(american >= european);
/// assert!((european - 5.5735).abs() < 0.02);
/// ```
#[derive(Debug, Clone)]
pub struct LatticeEngine {
    market: MarketParams,
    params: LatticeParams,
}

impl LatticeEngine {
    /// Derives lattice parameters and prepares an engine.
    ///
    /// # Errors
    /// Propagates [`LatticeParams::build`] failures (`steps < 1`, inadmissible
    /// probabilities, overflowing branching factors).
    pub fn new(
        market: &MarketParams,
        steps: usize,
        arity: LatticeArity,
    ) -> Result<Self, PricingError> {
        let params = LatticeParams::build(market, steps, arity)?;
        Ok(Self::from_params(market, params))
    }

    /// Wraps already-derived parameters.
    pub fn from_params(market: &MarketParams, params: LatticeParams) -> Self {
        Self {
            market: *market,
            params,
        }
    }

    /// Lattice parameters.
    #[inline]
    pub fn params(&self) -> &LatticeParams {
        &self.params
    }

    /// Market snapshot.
    #[inline]
    pub fn market(&self) -> &MarketParams {
        &self.market
    }

    /// Root value for one exercise style, in price-only mode.
    pub fn price(
        &self,
        option_type: OptionType,
        exercise: ExerciseStyle,
    ) -> Result<f64, PricingError> {
        Ok(self
            .value(option_type, RetentionMode::PriceOnly)?
            .price(exercise))
    }

    /// Runs backward induction for European and American exercise.
    ///
    /// # Errors
    /// `PricingError::ComputationOverflow` if a stock price or a root value is not finite.
    pub fn value(
        &self,
        option_type: OptionType,
        mode: RetentionMode,
    ) -> Result<LatticeValuation, PricingError> {
        let params = &self.params;
        let arity = params.arity();
        let steps = params.steps();
        let branches = arity.branches();
        let probs = params.probabilities();
        let discount = params.discount();
        let strike = self.market.strike();
        let retain = mode == RetentionMode::FullLattice;

        debug!(
            arity = %arity,
            steps,
            option_type = %option_type,
            ?mode,
            "building lattice"
        );

        // S0·u^k for k in -N..=N, indexed by k + N
        let prices: Vec<f64> = (-(steps as i64)..=steps as i64)
            .map(|k| self.market.spot() * params.up().powi(k as i32))
            .collect();
        ensure_finite_slice(&prices, "stock price")?;
        let stock = |level: usize, index: usize| -> f64 {
            let net = arity.net_up_moves(level, index) as i64;
            prices[(net + steps as i64) as usize]
        };

        let width = arity.nodes_at(steps);
        let mut european: Vec<f64> = (0..width)
            .map(|j| option_type.payoff(stock(steps, j), strike))
            .collect();
        let mut american = european.clone();

        let mut retained: Vec<LatticeLevel> = Vec::new();
        if retain {
            retained.reserve(steps + 1);
            retained.push(LatticeLevel {
                index: steps,
                time: steps as f64 * params.dt(),
                nodes: (0..width)
                    .map(|j| LatticeNode {
                        stock_price: stock(steps, j),
                        european: european[j],
                        american: american[j],
                        early_exercise: false,
                    })
                    .collect(),
            });
        }

        for level in (0..steps).rev() {
            let width = arity.nodes_at(level);
            let mut nodes = Vec::with_capacity(if retain { width } else { 0 });

            for j in 0..width {
                let eu_cont = discount * weighted(probs, &european[j..j + branches]);
                let am_cont = discount * weighted(probs, &american[j..j + branches]);

                let s = stock(level, j);
                let intrinsic = option_type.payoff(s, strike);
                let exercise = exercises(intrinsic, am_cont);
                let am_value = if exercise { intrinsic } else { am_cont };

                european[j] = eu_cont;
                american[j] = am_value;

                if retain {
                    nodes.push(LatticeNode {
                        stock_price: s,
                        european: eu_cont,
                        american: am_value,
                        early_exercise: exercise,
                    });
                }
            }

            european.truncate(width);
            american.truncate(width);

            if retain {
                retained.push(LatticeLevel {
                    index: level,
                    time: level as f64 * params.dt(),
                    nodes,
                });
            }
        }

        let european_root = ensure_finite(european[0], "european root value")?;
        let american_root = ensure_finite(american[0], "american root value")?;
        trace!(european_root, american_root, "backward induction complete");

        let lattice = if retain {
            retained.reverse();
            Some(Lattice {
                arity,
                option_type,
                steps,
                dt: params.dt(),
                levels: retained,
            })
        } else {
            None
        };

        Ok(LatticeValuation {
            params: *params,
            option_type,
            european: european_root,
            american: american_root,
            lattice,
        })
    }
}

/// Early exercise only when intrinsic clears continuation by the tie tolerance.
#[inline]
fn exercises(intrinsic: f64, continuation: f64) -> bool {
    intrinsic > continuation + EXERCISE_TIE_TOLERANCE * continuation.abs().max(1.0)
}

#[inline]
fn weighted(probs: &[f64], values: &[f64]) -> f64 {
    probs.iter().zip(values).map(|(p, v)| p * v).sum()
}
