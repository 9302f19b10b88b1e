//! Lattice branching parameters.
//!
//! ## Binomial (Cox-Ross-Rubinstein)
//!
//! - Δt = T/N, u = e^(σ√Δt), d = 1/u
//! - p = (e^((r−q)Δt) − d) / (u − d)
//!
//! ## Trinomial (Boyle)
//!
//! - Δt = T/N, u = e^(σ√(2Δt)), d = 1/u, m = 1
//! - a = e^((r−q)Δt/2), b = e^(σ√(Δt/2))
//! - p_up = ((a − 1/b)/(b − 1/b))², p_down = ((b − a)/(b − 1/b))², p_mid = 1 − p_up − p_down
//!
//! Probabilities are stored in the order the lattice engine consumes children:
//! `[down, up]` for binomial and `[down, mid, up]` for trinomial.

use pricer_core::market_data::MarketParams;
use pricer_core::math::ensure_finite;
use pricer_core::types::PricingError;

use super::config::LatticeArity;

/// Probabilities within this distance outside [0, 1] are clamped; beyond it they are rejected.
pub const PROBABILITY_TOLERANCE: f64 = 1e-12;

/// Derived, immutable per-step lattice parameters.
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketParams;
/// use pricer_models::models::{LatticeArity, LatticeParams};
///
/// let market = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
/// let params = LatticeParams::build(&market, 100, LatticeArity::Trinomial).unwrap();
///
/// let total: f64 = params.probabilities().iter().sum();
/// assert!((total - 1.0).abs() < 1e-12);
/// assert_eq!(params.probabilities().len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeParams {
    arity: LatticeArity,
    steps: usize,
    dt: f64,
    up: f64,
    down: f64,
    probs: [f64; 3],
    discount: f64,
}

fn admissible(name: &str, p: f64) -> Result<f64, PricingError> {
    if !p.is_finite() {
        return Err(PricingError::invalid(name, p, "probability is not finite"));
    }
    if p < -PROBABILITY_TOLERANCE || p > 1.0 + PROBABILITY_TOLERANCE {
        return Err(PricingError::invalid(
            name,
            p,
            "risk-neutral probability outside [0, 1]; increase steps or adjust parameters",
        ));
    }
    Ok(p.clamp(0.0, 1.0))
}

impl LatticeParams {
    /// Derives branching factors and risk-neutral probabilities.
    ///
    /// # Errors
    /// - `PricingError::InvalidParameter` if `steps < 1`, the up/down spread vanishes,
    ///   or a probability lies outside [0, 1] beyond [`PROBABILITY_TOLERANCE`]
    /// - `PricingError::ComputationOverflow` if a branching factor is not finite
    pub fn build(
        market: &MarketParams,
        steps: usize,
        arity: LatticeArity,
    ) -> Result<Self, PricingError> {
        if steps < 1 {
            return Err(PricingError::InvalidParameter(format!(
                "steps = {} (must be at least 1)",
                steps
            )));
        }

        let sigma = market.volatility();
        let carry = market.rate() - market.dividend_yield();
        let dt = market.maturity() / steps as f64;
        let discount = ensure_finite((-market.rate() * dt).exp(), "discount factor")?;

        let (up, probs) = match arity {
            LatticeArity::Binomial => {
                let up = ensure_finite((sigma * dt.sqrt()).exp(), "up factor")?;
                let down = 1.0 / up;
                let spread = up - down;
                if !(spread > 0.0) {
                    return Err(PricingError::invalid(
                        "up - down",
                        spread,
                        "branching spread vanishes; volatility too small for this step size",
                    ));
                }
                let p = admissible("p_up", ((carry * dt).exp() - down) / spread)?;
                (up, [1.0 - p, p, 0.0])
            }
            LatticeArity::Trinomial => {
                let up = ensure_finite((sigma * (2.0 * dt).sqrt()).exp(), "up factor")?;
                let a = (carry * dt / 2.0).exp();
                let b = ensure_finite((sigma * (dt / 2.0).sqrt()).exp(), "half-step factor")?;
                let inv_b = 1.0 / b;
                let spread = b - inv_b;
                if !(spread > 0.0) {
                    return Err(PricingError::invalid(
                        "b - 1/b",
                        spread,
                        "branching spread vanishes; volatility too small for this step size",
                    ));
                }
                let raw_up = ((a - inv_b) / spread).powi(2);
                let raw_down = ((b - a) / spread).powi(2);
                let p_up = admissible("p_up", raw_up)?;
                let p_down = admissible("p_down", raw_down)?;
                let p_mid = admissible("p_mid", 1.0 - raw_up - raw_down)?;
                (up, [p_down, p_mid, p_up])
            }
        };

        Ok(Self {
            arity,
            steps,
            dt,
            up,
            down: 1.0 / up,
            probs,
            discount,
        })
    }

    /// Branching arity.
    #[inline]
    pub fn arity(&self) -> LatticeArity {
        self.arity
    }

    /// Number of time steps N.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Time step Δt = T/N.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Up multiplier u.
    #[inline]
    pub fn up(&self) -> f64 {
        self.up
    }

    /// Down multiplier d = 1/u.
    #[inline]
    pub fn down(&self) -> f64 {
        self.down
    }

    /// Mid multiplier, `Some(1.0)` for trinomial lattices.
    #[inline]
    pub fn mid(&self) -> Option<f64> {
        match self.arity {
            LatticeArity::Binomial => None,
            LatticeArity::Trinomial => Some(1.0),
        }
    }

    /// Per-step discount factor e^(−rΔt).
    #[inline]
    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// Child probabilities ordered `[down, (mid), up]`.
    #[inline]
    pub fn probabilities(&self) -> &[f64] {
        &self.probs[..self.arity.branches()]
    }

    /// Probability of an up move.
    #[inline]
    pub fn p_up(&self) -> f64 {
        self.probs[self.arity.branches() - 1]
    }

    /// Probability of a down move.
    #[inline]
    pub fn p_down(&self) -> f64 {
        self.probs[0]
    }

    /// Probability of a mid move, `None` for binomial lattices.
    #[inline]
    pub fn p_mid(&self) -> Option<f64> {
        self.mid().map(|_| self.probs[1])
    }

    /// Child stock-price multipliers ordered like [`probabilities`](Self::probabilities).
    pub fn multipliers(&self) -> Vec<f64> {
        match self.arity {
            LatticeArity::Binomial => vec![self.down, self.up],
            LatticeArity::Trinomial => vec![self.down, 1.0, self.up],
        }
    }

    /// One-step risk-neutral expected growth Σ pₖ·mₖ of the stock price.
    pub fn expected_growth(&self) -> f64 {
        self.probabilities()
            .iter()
            .zip(self.multipliers())
            .map(|(p, m)| p * m)
            .sum()
    }

    /// Stock price at node `(level, index)`, computed directly as `S0·u^net`.
    #[inline]
    pub fn stock_price(&self, spot: f64, level: usize, index: usize) -> f64 {
        spot * self.up.powi(self.arity.net_up_moves(level, index))
    }

    /// Expected terminal stock price under the risk-neutral branching probabilities.
    ///
    /// The node distribution is pushed forward one level at a time, so trinomial
    /// nodes are weighted by their path counts without forming the coefficients.
    pub fn expected_terminal_price(&self, spot: f64) -> f64 {
        let probs = self.probabilities();
        let mut weights = vec![1.0];

        for level in 0..self.steps {
            let mut next = vec![0.0; self.arity.nodes_at(level + 1)];
            for (j, weight) in weights.iter().enumerate() {
                for (k, p) in probs.iter().enumerate() {
                    next[j + k] += weight * p;
                }
            }
            weights = next;
        }

        weights
            .iter()
            .enumerate()
            .map(|(j, weight)| weight * self.stock_price(spot, self.steps, j))
            .sum()
    }
}
