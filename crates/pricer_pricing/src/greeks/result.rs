//! Greeks calculation result type.

use pricer_models::analytical::Greeks;

/// How a set of Greeks was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GreeksMethod {
    /// Closed-form partial derivatives.
    ClosedForm,
    /// Central finite differences over lattice reprices.
    BumpAndReprice,
}

/// Price together with its five sensitivities.
///
/// Either every sensitivity is present or the whole result is an error; there
/// are no partially filled results.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GreeksResult {
    /// Unbumped price.
    pub price: f64,
    /// Delta, gamma, theta, vega, rho.
    pub greeks: Greeks<f64>,
    /// Closed form or bump-and-reprice.
    pub method: GreeksMethod,
    /// The closed-form inputs were degenerate (σ√T effectively zero).
    pub degenerate: bool,
}
