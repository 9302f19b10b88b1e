//! Market inputs for a pricing request.
//!
//! # Components
//!
//! - [`params`]: [`MarketParams`], the validated, immutable market snapshot
//!   (spot, strike, maturity, rate, volatility, dividend yield)
//!
//! # Example
//!
//! ```
//! use pricer_core::market_data::MarketParams;
//!
//! let market = MarketParams::new(100.0, 110.0, 0.5, 0.03, 0.25).unwrap();
//! let discounted = market.discounted_strike();
//! assert!((discounted - 110.0 * (-0.015_f64).exp()).abs() < 1e-12);
//! ```

pub mod params;

pub use params::MarketParams;
