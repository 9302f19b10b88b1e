//! The validation battery.

use pricer_core::market_data::MarketParams;
use pricer_core::types::PricingError;
use pricer_models::instruments::OptionType;
use pricer_models::models::LatticeArity;
use tracing::debug;

use super::config::{ValidationConfig, TARGET_STEPS};
use super::inputs::{LatticeQuotes, ValidationInputs};
use super::report::{CheckFamily, ValidationCategory, ValidationReport, ValidationTest};

/// Benchmarks at or below this magnitude fall back to absolute error.
const ZERO_BENCHMARK: f64 = 1e-12;

fn relative_error(value: f64, benchmark: f64) -> f64 {
    let error = (value - benchmark).abs();
    if benchmark.abs() > ZERO_BENCHMARK {
        error / benchmark.abs()
    } else {
        error
    }
}

fn lattice_label(quotes: &LatticeQuotes) -> String {
    format!("{}({})", quotes.arity(), quotes.steps())
}

fn probability_names(arity: LatticeArity) -> &'static [&'static str] {
    match arity {
        LatticeArity::Binomial => &["p_down", "p_up"],
        LatticeArity::Trinomial => &["p_down", "p_mid", "p_up"],
    }
}

/// Runs the consistency battery over a completed result set.
///
/// # Examples
///
/// ```rust
/// use pricer_core::market_data::MarketParams;
/// use pricer_risk::validation::{ValidationConfig, ValidationSuite};
///
/// let market = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
/// let suite = ValidationSuite::new(ValidationConfig::default()).unwrap();
///
/// let report = suite.run(&market, 250).unwrap();
/// assert!(report.overall_passed);
/// assert_eq!(report.passed_tests, report.total_tests);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidationSuite {
    config: ValidationConfig,
}

impl ValidationSuite {
    /// Creates a suite after validating its thresholds.
    pub fn new(config: ValidationConfig) -> Result<Self, PricingError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Thresholds in use.
    #[inline]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Prices the inputs at `reference_steps` and runs every check.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` for zero steps or inadmissible lattice
    /// parameters at either step count; `PricingError::ComputationOverflow` if a
    /// price overflows.
    pub fn run(
        &self,
        market: &MarketParams,
        reference_steps: usize,
    ) -> Result<ValidationReport, PricingError> {
        if reference_steps < 1 {
            return Err(PricingError::InvalidParameter(
                "validation reference steps must be at least 1".to_string(),
            ));
        }
        let inputs =
            ValidationInputs::compute(market, reference_steps, self.config.convergence_steps)?;
        Ok(self.evaluate(&inputs))
    }

    /// Runs every check over already-computed inputs.
    pub fn evaluate(&self, inputs: &ValidationInputs) -> ValidationReport {
        let categories: Vec<ValidationCategory> = CheckFamily::ALL
            .iter()
            .map(|&family| {
                let tests = match family {
                    CheckFamily::NoArbitrageBounds => self.bounds(inputs),
                    CheckFamily::PutCallParity => self.parity(inputs),
                    CheckFamily::EarlyExercise => self.early_exercise(inputs),
                    CheckFamily::ConvergenceTargets => self.convergence_targets(inputs),
                    CheckFamily::PricingAccuracy => self.pricing_accuracy(inputs),
                    CheckFamily::ProbabilityValidity => self.probabilities(inputs),
                    CheckFamily::Martingale => self.martingale(inputs),
                };
                let category = ValidationCategory::new(family, tests);
                debug!(
                    family = %family,
                    passed = category.passed,
                    tests = category.tests.len(),
                    "validation category"
                );
                category
            })
            .collect();

        let reference_steps = inputs.reference.first().map_or(0, |q| q.steps());
        let report = ValidationReport::new(reference_steps, self.config.convergence_steps, categories);
        debug!(
            overall_passed = report.overall_passed,
            passed = report.passed_tests,
            total = report.total_tests,
            "validation report"
        );
        report
    }

    /// European prices from the closed form and each reference lattice.
    fn european_sources(inputs: &ValidationInputs) -> Vec<(String, f64, f64)> {
        std::iter::once(("analytic".to_string(), inputs.analytic_call, inputs.analytic_put))
            .chain(
                inputs
                    .reference
                    .iter()
                    .map(|q| (lattice_label(q), q.european_call, q.european_put)),
            )
            .collect()
    }

    fn bounds(&self, inputs: &ValidationInputs) -> Vec<ValidationTest> {
        let market = &inputs.market;
        let slack = self.config.bounds_slack;
        let spot = market.spot();
        let fwd_spot = market.discounted_spot();
        let fwd_strike = market.discounted_strike();

        Self::european_sources(inputs)
            .into_iter()
            .flat_map(|(source, call, put)| {
                [
                    ValidationTest::at_least(format!("{} call ≥ 0", source), call, -slack),
                    ValidationTest::at_most(format!("{} call ≤ S0", source), call, spot + slack),
                    ValidationTest::at_least(
                        format!("{} call ≥ max(S0·e^(−qT) − K·e^(−rT), 0)", source),
                        call,
                        (fwd_spot - fwd_strike).max(0.0) - slack,
                    ),
                    ValidationTest::at_least(format!("{} put ≥ 0", source), put, -slack),
                    ValidationTest::at_most(
                        format!("{} put ≤ K·e^(−rT)", source),
                        put,
                        fwd_strike + slack,
                    ),
                    ValidationTest::at_least(
                        format!("{} put ≥ max(K·e^(−rT) − S0·e^(−qT), 0)", source),
                        put,
                        (fwd_strike - fwd_spot).max(0.0) - slack,
                    ),
                ]
            })
            .collect()
    }

    fn parity(&self, inputs: &ValidationInputs) -> Vec<ValidationTest> {
        let market = &inputs.market;
        let parity = market.discounted_spot() - market.discounted_strike();
        let limit = self.config.parity_tolerance * market.spot();

        Self::european_sources(inputs)
            .into_iter()
            .map(|(source, call, put)| {
                ValidationTest::at_most(
                    format!("{} |call − put − (S0·e^(−qT) − K·e^(−rT))|", source),
                    (call - put - parity).abs(),
                    limit,
                )
            })
            .collect()
    }

    fn early_exercise(&self, inputs: &ValidationInputs) -> Vec<ValidationTest> {
        let no_dividend = inputs.market.dividend_yield() == 0.0;
        let mut tests = Vec::new();

        for quotes in &inputs.reference {
            let label = lattice_label(quotes);
            for option_type in OptionType::ALL {
                tests.push(ValidationTest::at_least(
                    format!("{} American {} − European {}", label, option_type, option_type),
                    quotes.american(option_type) - quotes.european(option_type),
                    -self.config.american_slack,
                ));
            }
            if no_dividend {
                tests.push(ValidationTest::at_most(
                    format!("{} |American call − European call| with q = 0", label),
                    (quotes.american_call - quotes.european_call).abs(),
                    self.config.american_call_tolerance,
                ));
            }
        }
        tests
    }

    fn target(&self, arity: LatticeArity) -> f64 {
        match arity {
            LatticeArity::Binomial => self.config.binomial_target,
            LatticeArity::Trinomial => self.config.trinomial_target,
        }
    }

    fn convergence_targets(&self, inputs: &ValidationInputs) -> Vec<ValidationTest> {
        inputs
            .convergence
            .iter()
            .map(|quotes| {
                ValidationTest::at_most(
                    format!("{} European call relative error", lattice_label(quotes)),
                    relative_error(quotes.european_call, inputs.analytic_call),
                    self.target(quotes.arity()),
                )
            })
            .collect()
    }

    fn pricing_accuracy(&self, inputs: &ValidationInputs) -> Vec<ValidationTest> {
        let mut tests = Vec::new();
        for quotes in &inputs.reference {
            let scale = TARGET_STEPS as f64 / quotes.steps() as f64;
            let target = self.target(quotes.arity()) * scale;
            for option_type in OptionType::ALL {
                tests.push(ValidationTest::at_most(
                    format!(
                        "{} European {} relative error",
                        lattice_label(quotes),
                        option_type
                    ),
                    relative_error(quotes.european(option_type), inputs.analytic(option_type)),
                    target,
                ));
            }
        }
        tests
    }

    fn probabilities(&self, inputs: &ValidationInputs) -> Vec<ValidationTest> {
        let mut tests = Vec::new();
        for quotes in &inputs.reference {
            let label = lattice_label(quotes);
            let arity = quotes.arity();
            let probs = quotes.params.probabilities();

            for (name, &p) in probability_names(arity).iter().zip(probs) {
                tests.push(ValidationTest::at_least(format!("{} {} ≥ 0", label, name), p, 0.0));
                tests.push(ValidationTest::at_most(format!("{} {} ≤ 1", label, name), p, 1.0));
            }
            if arity == LatticeArity::Trinomial {
                tests.push(ValidationTest::at_most(
                    format!("{} |Σp − 1|", label),
                    (probs.iter().sum::<f64>() - 1.0).abs(),
                    self.config.probability_sum_tolerance,
                ));
            }
        }
        tests
    }

    fn martingale(&self, inputs: &ValidationInputs) -> Vec<ValidationTest> {
        let market = &inputs.market;
        inputs
            .reference
            .iter()
            .map(|quotes| {
                let expected = quotes.params.expected_terminal_price(market.spot());
                ValidationTest::at_most(
                    format!("{} |E[S_T] − S0·e^((r−q)T)| / S0", lattice_label(quotes)),
                    (expected - market.forward()).abs() / market.spot(),
                    self.config.martingale_tolerance,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn market() -> MarketParams {
        MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap()
    }

    fn suite() -> ValidationSuite {
        ValidationSuite::new(ValidationConfig::default()).unwrap()
    }

    // ==========================================================
    // Whole battery
    // ==========================================================

    #[test]
    fn test_reference_market_passes() {
        let report = suite().run(&market(), 250).unwrap();
        assert!(report.overall_passed, "{:?}", report.failures().collect::<Vec<_>>());
        assert_eq!(report.categories.len(), CheckFamily::ALL.len());
        assert_eq!(report.reference_steps, 250);
        assert_eq!(report.convergence_steps, 250);
        assert_eq!(report.passed_tests, report.total_tests);
    }

    #[test]
    fn test_dividend_market_passes_and_skips_call_equality() {
        let m = market().with_dividend_yield(0.03).unwrap();
        let report = suite().run(&m, 300).unwrap();
        assert!(report.overall_passed, "{:?}", report.failures().collect::<Vec<_>>());

        let early = report.category(CheckFamily::EarlyExercise).unwrap();
        // two premiums per lattice, no q = 0 equality
        assert_eq!(early.tests.len(), 4);
    }

    #[test]
    fn test_category_sizes() {
        let report = suite().run(&market(), 250).unwrap();
        let size = |family| report.category(family).unwrap().tests.len();

        assert_eq!(size(CheckFamily::NoArbitrageBounds), 18);
        assert_eq!(size(CheckFamily::PutCallParity), 3);
        assert_eq!(size(CheckFamily::EarlyExercise), 6);
        assert_eq!(size(CheckFamily::ConvergenceTargets), 2);
        assert_eq!(size(CheckFamily::PricingAccuracy), 4);
        assert_eq!(size(CheckFamily::ProbabilityValidity), 11);
        assert_eq!(size(CheckFamily::Martingale), 2);
    }

    #[test]
    fn test_convergence_steps_independent_of_reference() {
        let config = ValidationConfig::default().with_convergence_steps(400);
        let report = ValidationSuite::new(config).unwrap().run(&market(), 100).unwrap();
        assert_eq!(report.reference_steps, 100);
        assert_eq!(report.convergence_steps, 400);
        assert!(report.category(CheckFamily::ConvergenceTargets).unwrap().passed);
    }

    #[test]
    fn test_tight_targets_fail_only_accuracy_families() {
        let config = ValidationConfig::default().with_targets(1e-9, 1e-9);
        let report = ValidationSuite::new(config).unwrap().run(&market(), 250).unwrap();

        assert!(!report.overall_passed);
        assert!(!report.category(CheckFamily::ConvergenceTargets).unwrap().passed);
        assert!(!report.category(CheckFamily::PricingAccuracy).unwrap().passed);
        assert!(report.category(CheckFamily::PutCallParity).unwrap().passed);
        assert!(report.category(CheckFamily::Martingale).unwrap().passed);
        assert!(report.failures().all(|(family, _)| matches!(
            family,
            CheckFamily::ConvergenceTargets | CheckFamily::PricingAccuracy
        )));
    }

    // ==========================================================
    // Failure propagation
    // ==========================================================

    #[test]
    fn test_zero_reference_steps_rejected() {
        assert!(suite().run(&market(), 0).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_inadmissible_reference_lattice_is_error() {
        let m = MarketParams::new(100.0, 100.0, 1.0, 0.5, 0.05).unwrap();
        assert!(suite().run(&m, 10).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ValidationConfig::default().with_parity_tolerance(-1.0);
        assert!(ValidationSuite::new(config).is_err());
        let config = ValidationConfig::default().with_reference_steps(0);
        assert!(ValidationSuite::new(config).is_err());
    }

    #[test]
    fn test_relative_error_zero_benchmark() {
        assert_eq!(relative_error(0.5, 0.0), 0.5);
        assert_relative_eq!(relative_error(1.1, 1.0), 0.1, epsilon = 1e-12);
    }
}
