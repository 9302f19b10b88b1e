//! Vanilla option instrument definitions.
//!
//! A vanilla option is fully described by its [`OptionType`] and
//! [`ExerciseStyle`]; strike and maturity live on
//! [`MarketParams`](pricer_core::market_data::MarketParams).

pub mod exercise;
pub mod payoff;

pub use exercise::ExerciseStyle;
pub use payoff::OptionType;
