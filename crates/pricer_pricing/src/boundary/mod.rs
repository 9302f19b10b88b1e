//! Early-exercise boundary extraction.
//!
//! For every non-terminal level the nodes are scanned from the continuation side
//! towards the exercise side: puts from the highest stock price downwards, calls
//! from the lowest upwards. The first node flagged for early exercise gives the
//! critical stock price of that level. A level without any flagged node contributes
//! no point; the boundary is then simply absent at that time rather than zero.

use pricer_core::market_data::MarketParams;
use pricer_core::types::PricingError;
use pricer_models::instruments::OptionType;
use pricer_models::models::LatticeArity;
use tracing::debug;

use crate::lattice::{Lattice, LatticeEngine, LatticeValuation, RetentionMode};

/// One point of the discrete early-exercise frontier.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryPoint {
    /// Time t_i = i·Δt in years.
    pub time: f64,
    /// Critical stock price at t_i.
    pub critical_price: f64,
    /// Remaining time T − t_i.
    pub time_to_maturity: f64,
}

/// Scans retained lattices for the early-exercise frontier.
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketParams;
/// use pricer_models::instruments::OptionType;
/// use pricer_models::models::LatticeArity;
/// use pricer_pricing::boundary::BoundaryExtractor;
///
/// let market = MarketParams::new(90.0, 100.0, 1.0, 0.05, 0.4).unwrap();
/// let boundary =
///     BoundaryExtractor::compute(&market, 100, LatticeArity::Binomial, OptionType::Put).unwrap();
/// assert!(!boundary.is_empty());
/// assert!(boundary.iter().all(|p| p.critical_price < 100.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryExtractor;

impl BoundaryExtractor {
    /// Extracts the boundary from a retained lattice, ordered by time.
    pub fn from_lattice(lattice: &Lattice) -> Vec<BoundaryPoint> {
        let maturity = lattice.maturity();
        let option_type = lattice.option_type();
        let terminal = lattice.steps();

        let points: Vec<BoundaryPoint> = lattice
            .levels()
            .iter()
            .filter(|level| level.index < terminal)
            .filter_map(|level| {
                let critical = match option_type {
                    OptionType::Put => level.nodes.iter().rev().find(|n| n.early_exercise),
                    OptionType::Call => level.nodes.iter().find(|n| n.early_exercise),
                };
                critical.map(|node| BoundaryPoint {
                    time: level.time,
                    critical_price: node.stock_price,
                    time_to_maturity: maturity - level.time,
                })
            })
            .collect();

        debug!(
            option_type = %option_type,
            levels = terminal,
            points = points.len(),
            "extracted early-exercise boundary"
        );
        points
    }

    /// Extracts the boundary from a valuation run in full-lattice mode.
    ///
    /// # Errors
    /// `PricingError::UnsupportedConfiguration` if the lattice was not retained.
    pub fn extract(valuation: &LatticeValuation) -> Result<Vec<BoundaryPoint>, PricingError> {
        valuation
            .lattice
            .as_ref()
            .map(Self::from_lattice)
            .ok_or_else(|| {
                PricingError::UnsupportedConfiguration(
                    "boundary extraction requires a full lattice".to_string(),
                )
            })
    }

    /// Builds a full lattice and extracts the American boundary.
    pub fn compute(
        market: &MarketParams,
        steps: usize,
        arity: LatticeArity,
        option_type: OptionType,
    ) -> Result<Vec<BoundaryPoint>, PricingError> {
        let engine = LatticeEngine::new(market, steps, arity)?;
        let valuation = engine.value(option_type, RetentionMode::FullLattice)?;
        Self::extract(&valuation)
    }
}
