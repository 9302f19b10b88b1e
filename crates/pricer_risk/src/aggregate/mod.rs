//! Aggregate pricing entry point.
//!
//! [`price`] takes one market snapshot and a set of [`PricingRequest`]s and
//! returns an [`AggregateResult`]: one outcome per request plus one validation
//! report. Requests and the validation battery run as independent rayon tasks.
//!
//! Failures are isolated: an invalid request yields an `Err` outcome for that
//! request only, and a failing validation run never removes priced results.

use pricer_core::market_data::MarketParams;
use pricer_core::types::PricingError;
use pricer_models::analytical::BlackScholes;
use pricer_models::instruments::OptionType;
use pricer_models::models::{ModelConfig, PricingRequest};
use pricer_pricing::boundary::{BoundaryExtractor, BoundaryPoint};
use pricer_pricing::convergence::{ConvergenceAnalyzer, ConvergenceSeries};
use pricer_pricing::greeks::{GreeksConfig, GreeksEstimator, GreeksMethod, GreeksResult};
use pricer_pricing::lattice::{Lattice, LatticeEngine, RetentionMode};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::validation::{ValidationConfig, ValidationReport, ValidationSuite};

/// Configuration of the aggregate pricer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AggregateConfig {
    /// Finite-difference bump sizes.
    pub greeks: GreeksConfig,
    /// Validation thresholds and step counts.
    pub validation: ValidationConfig,
}

/// Outputs of one successfully priced request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricedRequest {
    /// Model, exercise and option type.
    pub model: ModelConfig,
    /// Present value for the requested exercise style.
    pub price: f64,
    /// American minus European value (lattice models only).
    pub early_exercise_premium: Option<f64>,
    /// Analytic inputs were degenerate.
    pub degenerate: bool,
    /// Greeks, when requested.
    pub greeks: Option<GreeksResult>,
    /// Convergence series, when requested.
    pub convergence: Option<ConvergenceSeries>,
    /// Early-exercise boundary, when requested.
    pub boundary: Option<Vec<BoundaryPoint>>,
    /// Retained lattice, when requested.
    pub lattice: Option<Lattice>,
}

/// Outcome of one request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestOutcome {
    /// Short description such as `binomial(250)/american/put`.
    pub label: String,
    /// The request as submitted.
    pub request: PricingRequest,
    /// Priced outputs or the reason the request was rejected.
    pub result: Result<PricedRequest, PricingError>,
}

/// Everything computed for one market snapshot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregateResult {
    /// Market snapshot.
    pub market: MarketParams,
    /// One outcome per request, in request order.
    pub outcomes: Vec<RequestOutcome>,
    /// Validation battery over the closed form and both lattices.
    pub validation: Result<ValidationReport, PricingError>,
}

impl AggregateResult {
    /// Successfully priced requests.
    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &PricedRequest)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|r| (o.label.as_str(), r)))
    }

    /// Rejected requests.
    pub fn failed(&self) -> impl Iterator<Item = (&str, &PricingError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.label.as_str(), e)))
    }

    /// Returns whether every request was priced.
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Prices a set of requests with default bump sizes and thresholds.
///
/// # Examples
///
/// ```rust
/// use pricer_core::market_data::MarketParams;
/// use pricer_models::instruments::{ExerciseStyle, OptionType};
/// use pricer_models::models::{ModelConfig, PricingRequest};
/// use pricer_risk::aggregate::price;
///
/// let market = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
/// let requests = [
///     PricingRequest::new(ModelConfig::analytic(OptionType::Call)).with_greeks(),
///     PricingRequest::new(ModelConfig::binomial(100, ExerciseStyle::American, OptionType::Put))
///         .with_boundary(),
/// ];
///
/// let result = price(&market, &requests);
/// assert!(result.all_succeeded());
/// assert!(result.validation.as_ref().unwrap().overall_passed);
/// ```
pub fn price(market: &MarketParams, requests: &[PricingRequest]) -> AggregateResult {
    OptionPricer::default().price(market, requests)
}

/// Aggregate pricer with configured bump sizes and validation thresholds.
#[derive(Clone, Copy, Debug, Default)]
pub struct OptionPricer {
    greeks: GreeksEstimator,
    validation: ValidationSuite,
}

impl OptionPricer {
    /// Creates a pricer after validating both configurations.
    pub fn new(config: &AggregateConfig) -> Result<Self, PricingError> {
        Ok(Self {
            greeks: GreeksEstimator::new(config.greeks)?,
            validation: ValidationSuite::new(config.validation)?,
        })
    }

    /// Lattice steps the validation battery runs at: the largest requested step
    /// count, or the configured fallback when no lattice is requested.
    pub fn reference_steps(&self, requests: &[PricingRequest]) -> usize {
        requests
            .iter()
            .filter_map(|r| r.model.steps())
            .filter(|&n| n >= 1)
            .max()
            .unwrap_or(self.validation.config().reference_steps)
    }

    /// Prices every request and runs the validation battery concurrently.
    pub fn price(&self, market: &MarketParams, requests: &[PricingRequest]) -> AggregateResult {
        let reference_steps = self.reference_steps(requests);
        debug!(requests = requests.len(), reference_steps, "aggregate pricing");

        let (outcomes, validation) = rayon::join(
            || {
                requests
                    .par_iter()
                    .map(|request| self.outcome(market, request))
                    .collect::<Vec<_>>()
            },
            || self.validation.run(market, reference_steps),
        );

        if let Err(e) = &validation {
            warn!(error = %e, reference_steps, "validation battery failed");
        }

        AggregateResult {
            market: *market,
            outcomes,
            validation,
        }
    }

    fn outcome(&self, market: &MarketParams, request: &PricingRequest) -> RequestOutcome {
        let label = request.model.label();
        let result = self.price_request(market, request);
        if let Err(e) = &result {
            warn!(request = %label, error = %e, "pricing request rejected");
        }
        RequestOutcome {
            label,
            request: request.clone(),
            result,
        }
    }

    /// Prices one request with every output it asks for.
    ///
    /// # Errors
    /// Any failure of validation, pricing or a requested output fails the whole
    /// request.
    pub fn price_request(
        &self,
        market: &MarketParams,
        request: &PricingRequest,
    ) -> Result<PricedRequest, PricingError> {
        request.validate()?;
        match request.model {
            ModelConfig::Analytic { option_type } => {
                self.price_analytic(market, request, option_type)
            }
            ModelConfig::Lattice { .. } => self.price_lattice(market, request),
        }
    }

    fn price_analytic(
        &self,
        market: &MarketParams,
        request: &PricingRequest,
        option_type: OptionType,
    ) -> Result<PricedRequest, PricingError> {
        let valuation = BlackScholes::valuation(market, option_type)?;
        let greeks = request.outputs.greeks.then(|| GreeksResult {
            price: valuation.price,
            greeks: valuation.greeks,
            method: GreeksMethod::ClosedForm,
            degenerate: valuation.degenerate,
        });

        Ok(PricedRequest {
            model: request.model,
            price: valuation.price,
            early_exercise_premium: None,
            degenerate: valuation.degenerate,
            greeks,
            convergence: None,
            boundary: None,
            lattice: None,
        })
    }

    fn price_lattice(
        &self,
        market: &MarketParams,
        request: &PricingRequest,
    ) -> Result<PricedRequest, PricingError> {
        let ModelConfig::Lattice {
            arity,
            steps,
            exercise,
            option_type,
        } = request.model
        else {
            return Err(PricingError::UnsupportedConfiguration(format!(
                "{} is not a lattice model",
                request.model.label()
            )));
        };
        let outputs = &request.outputs;
        let engine = LatticeEngine::new(market, steps, arity)?;
        let mode = if outputs.needs_full_lattice() {
            RetentionMode::FullLattice
        } else {
            RetentionMode::PriceOnly
        };

        let (valuation, (greeks, convergence)) = rayon::join(
            || engine.value(option_type, mode),
            || {
                rayon::join(
                    || {
                        outputs
                            .greeks
                            .then(|| self.greeks.lattice(market, arity, steps, exercise, option_type))
                            .transpose()
                    },
                    || {
                        outputs
                            .convergence
                            .as_ref()
                            .map(|grid| ConvergenceAnalyzer::analyze(market, arity, option_type, grid))
                            .transpose()
                    },
                )
            },
        );
        let mut valuation = valuation?;
        let greeks = greeks?;
        let convergence = convergence?;

        let boundary = if outputs.boundary {
            Some(BoundaryExtractor::extract(&valuation)?)
        } else {
            None
        };
        let lattice = if outputs.lattice {
            valuation.lattice.take()
        } else {
            None
        };

        Ok(PricedRequest {
            model: request.model,
            price: valuation.price(exercise),
            early_exercise_premium: Some(valuation.early_exercise_premium()),
            degenerate: false,
            greeks,
            convergence,
            boundary,
            lattice,
        })
    }
}
