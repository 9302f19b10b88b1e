//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

use clap::Args;
use pricer_core::market_data::MarketParams;

use crate::config::Settings;
use crate::Result;

pub mod boundary;
pub mod convergence;
pub mod lattice;
pub mod price;
pub mod validate;

/// Market parameters shared by every pricing command
#[derive(Debug, Clone, Args)]
pub struct MarketArgs {
    /// Spot price S0
    #[arg(long, default_value_t = 100.0)]
    pub spot: f64,

    /// Strike K
    #[arg(long, default_value_t = 100.0)]
    pub strike: f64,

    /// Maturity T in years
    #[arg(long, default_value_t = 1.0)]
    pub maturity: f64,

    /// Continuously compounded risk-free rate r
    #[arg(long, default_value_t = 0.05, allow_hyphen_values = true)]
    pub rate: f64,

    /// Volatility σ
    #[arg(long, default_value_t = 0.2)]
    pub volatility: f64,

    /// Continuous dividend yield q
    #[arg(long, default_value_t = 0.0)]
    pub dividend_yield: f64,
}

impl MarketArgs {
    /// Validated market snapshot.
    pub fn market(&self) -> Result<MarketParams> {
        Ok(MarketParams::new(
            self.spot,
            self.strike,
            self.maturity,
            self.rate,
            self.volatility,
        )?
        .with_dividend_yield(self.dividend_yield)?)
    }
}

/// Prints the effective settings.
pub fn show_config(settings: &Settings) -> Result<()> {
    print!("{}", settings.to_toml()?);
    Ok(())
}
