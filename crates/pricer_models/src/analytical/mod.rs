//! Closed-form pricing for European options.
//!
//! - [`BlackScholes`]: lognormal model with continuous dividend yield
//! - [`Greeks`]: delta, gamma, theta, vega, rho
//! - [`AnalyticValuation`]: price, Greeks and degenerate flag for one option
//!
//! ## Design Principles
//!
//! - **Generic over `T: Float`**: the model evaluates in `f32` or `f64`
//! - **No NaN on degenerate inputs**: σ√T below [`DEGENERATE_EPSILON`] falls back to
//!   discounted intrinsic value
//! - **Numerical Stability**: double-precision erfc-based CDF with exact Φ(x) + Φ(-x) = 1

pub mod black_scholes;
pub mod distributions;

pub use black_scholes::{AnalyticValuation, BlackScholes, Greeks, DEGENERATE_EPSILON};
pub use distributions::{norm_cdf, norm_pdf};
