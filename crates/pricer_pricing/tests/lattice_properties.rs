//! Cross-crate properties of the lattice models against the closed form.

use approx::assert_relative_eq;
use pricer_core::market_data::MarketParams;
use pricer_models::analytical::BlackScholes;
use pricer_models::instruments::{ExerciseStyle, OptionType};
use pricer_models::models::{LatticeArity, LatticeParams};
use pricer_pricing::boundary::BoundaryExtractor;
use pricer_pricing::convergence::ConvergenceAnalyzer;
use pricer_pricing::lattice::{LatticeEngine, RetentionMode};
use proptest::prelude::*;

fn analytic(market: &MarketParams, option_type: OptionType) -> f64 {
    BlackScholes::valuation(market, option_type).unwrap().price
}

// =============================================================================
// Reference scenario
// =============================================================================

#[test]
fn test_reference_scenario_accuracy() {
    let market = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.2).unwrap();
    let targets = [
        (LatticeArity::Binomial, 0.0015),
        (LatticeArity::Trinomial, 0.0008),
    ];

    for option_type in OptionType::ALL {
        let benchmark = analytic(&market, option_type);
        for (arity, target) in targets {
            let engine = LatticeEngine::new(&market, 250, arity).unwrap();
            let price = engine.price(option_type, ExerciseStyle::European).unwrap();
            let relative_error = (price - benchmark).abs() / benchmark;
            assert!(
                relative_error <= target,
                "{} {}: {} > {}",
                arity,
                option_type,
                relative_error,
                target
            );
        }
    }
}

#[test]
fn test_textbook_call_price() {
    let market = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
    assert_relative_eq!(analytic(&market, OptionType::Call), 10.4506, epsilon = 1e-3);
}

// =============================================================================
// Convergence
// =============================================================================

#[test]
fn test_error_at_400_not_above_error_at_25() {
    let market = MarketParams::new(100.0, 95.0, 0.75, 0.03, 0.25)
        .unwrap()
        .with_dividend_yield(0.01)
        .unwrap();
    for arity in LatticeArity::ALL {
        for option_type in OptionType::ALL {
            let series = ConvergenceAnalyzer::run(&market, arity, option_type, &[25, 400]).unwrap();
            assert!(series.points[1].absolute_error <= series.points[0].absolute_error);
        }
    }
}

// =============================================================================
// Probabilities and martingale property
// =============================================================================

#[test]
fn test_probability_grid() {
    for steps in [10, 50, 200] {
        for vol in [0.1, 0.3, 0.5] {
            for rate in [0.0, 0.05] {
                let market = MarketParams::new(100.0, 100.0, 1.0, rate, vol).unwrap();
                for arity in LatticeArity::ALL {
                    let params = LatticeParams::build(&market, steps, arity).unwrap();
                    let probs = params.probabilities();
                    assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
                    if arity == LatticeArity::Trinomial {
                        assert!((probs.iter().sum::<f64>() - 1.0).abs() <= 1e-9);
                    }
                }
            }
        }
    }
}

#[test]
fn test_martingale_forward_propagation() {
    let market = MarketParams::new(100.0, 110.0, 2.0, 0.04, 0.3)
        .unwrap()
        .with_dividend_yield(0.015)
        .unwrap();
    for steps in [50, 120] {
        for arity in LatticeArity::ALL {
            let params = LatticeParams::build(&market, steps, arity).unwrap();
            let expected = params.expected_terminal_price(market.spot());
            let error = (expected - market.forward()).abs() / market.spot();
            assert!(error <= 1e-3, "{} N={}: {}", arity, steps, error);
        }
    }
}

// =============================================================================
// Early exercise
// =============================================================================

#[test]
fn test_american_call_equals_european_without_dividend() {
    let market = MarketParams::new(95.0, 100.0, 1.5, 0.06, 0.35).unwrap();
    for arity in LatticeArity::ALL {
        let valuation = LatticeEngine::new(&market, 150, arity)
            .unwrap()
            .value(OptionType::Call, RetentionMode::PriceOnly)
            .unwrap();
        assert!((valuation.american - valuation.european).abs() <= 1e-6);
    }
}

#[test]
fn test_boundary_scenarios() {
    let itm = MarketParams::new(90.0, 100.0, 1.0, 0.05, 0.4).unwrap();
    let otm_without_rates = MarketParams::new(200.0, 100.0, 1.0, 0.0, 0.4).unwrap();

    for arity in LatticeArity::ALL {
        let boundary = BoundaryExtractor::compute(&itm, 100, arity, OptionType::Put).unwrap();
        assert!(!boundary.is_empty());

        let boundary =
            BoundaryExtractor::compute(&otm_without_rates, 250, arity, OptionType::Put).unwrap();
        assert!(boundary.is_empty(), "{}", arity);
    }
}

// =============================================================================
// Property-based tests
// =============================================================================

fn market_strategy() -> impl Strategy<Value = MarketParams> {
    (
        50.0..150.0_f64,
        50.0..150.0_f64,
        0.1..2.0_f64,
        0.0..0.1_f64,
        0.1..0.5_f64,
        0.0..0.05_f64,
    )
        .prop_map(|(spot, strike, maturity, rate, vol, q)| {
            MarketParams::new(spot, strike, maturity, rate, vol)
                .unwrap()
                .with_dividend_yield(q)
                .unwrap()
        })
}

fn arity_strategy() -> impl Strategy<Value = LatticeArity> {
    prop_oneof![Just(LatticeArity::Binomial), Just(LatticeArity::Trinomial)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_american_not_below_european(
        market in market_strategy(),
        arity in arity_strategy(),
        steps in 10usize..60,
    ) {
        let engine = LatticeEngine::new(&market, steps, arity).unwrap();
        for option_type in OptionType::ALL {
            let v = engine.value(option_type, RetentionMode::PriceOnly).unwrap();
            prop_assert!(v.american >= v.european - 1e-9);
            prop_assert!(v.european >= 0.0);
        }
    }

    #[test]
    fn prop_lattice_parity(
        market in market_strategy(),
        arity in arity_strategy(),
        steps in 10usize..60,
    ) {
        let engine = LatticeEngine::new(&market, steps, arity).unwrap();
        let call = engine.price(OptionType::Call, ExerciseStyle::European).unwrap();
        let put = engine.price(OptionType::Put, ExerciseStyle::European).unwrap();
        let parity = market.discounted_spot() - market.discounted_strike();
        prop_assert!((call - put - parity).abs() < 1e-8 * market.spot().max(market.strike()));
    }
}
