//! Tests for Greeks configuration and estimation.

use super::*;
use approx::assert_relative_eq;
use pricer_core::market_data::MarketParams;
use pricer_core::types::PricingError;
use pricer_models::analytical::BlackScholes;
use pricer_models::instruments::{ExerciseStyle, OptionType};
use pricer_models::models::{LatticeArity, ModelConfig};

fn atm_market() -> MarketParams {
    MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap()
}

// =============================================================================
// GreeksConfig
// =============================================================================

mod greeks_config_tests {
    use super::*;

    #[test]
    fn test_default_bumps() {
        let config = GreeksConfig::default();
        assert_eq!(config.spot_bump_relative, 0.01);
        assert_eq!(config.vol_bump_absolute, 0.01);
        assert_eq!(config.rate_bump_absolute, 1e-4);
        assert_relative_eq!(config.time_bump_years, 1.0 / 365.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = GreeksConfig::default()
            .with_spot_bump(0.005)
            .with_vol_bump(0.002)
            .with_rate_bump(1e-5)
            .with_time_bump(1.0 / 252.0);
        assert_eq!(config.spot_bump_relative, 0.005);
        assert_eq!(config.vol_bump_absolute, 0.002);
        assert_eq!(config.rate_bump_absolute, 1e-5);
        assert_relative_eq!(config.time_bump_years, 1.0 / 252.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_positive_bumps_rejected() {
        let bad = [
            GreeksConfig::default().with_spot_bump(0.0),
            GreeksConfig::default().with_vol_bump(-0.01),
            GreeksConfig::default().with_rate_bump(f64::NAN),
            GreeksConfig::default().with_time_bump(f64::INFINITY),
            GreeksConfig::default().with_spot_bump(1.0),
        ];
        for config in bad {
            assert!(matches!(
                config.validate(),
                Err(PricingError::InvalidParameter(_))
            ));
            assert!(GreeksEstimator::new(config).is_err());
        }
    }
}

// =============================================================================
// Closed-form path
// =============================================================================

mod analytic_tests {
    use super::*;

    #[test]
    fn test_analytic_model_uses_closed_form() {
        let estimator = GreeksEstimator::default();
        let result = estimator
            .estimate(&atm_market(), &ModelConfig::analytic(OptionType::Call))
            .unwrap();

        let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
        let expected = bs.greeks(100.0, 1.0, OptionType::Call);

        assert_eq!(result.method, GreeksMethod::ClosedForm);
        assert!(!result.degenerate);
        assert_relative_eq!(result.price, 10.4506, epsilon = 1e-3);
        assert_relative_eq!(result.greeks.delta, expected.delta, epsilon = 1e-12);
        assert_relative_eq!(result.greeks.gamma, expected.gamma, epsilon = 1e-12);
        assert_relative_eq!(result.greeks.vega, expected.vega, epsilon = 1e-12);
        assert_relative_eq!(result.greeks.theta, expected.theta, epsilon = 1e-12);
        assert_relative_eq!(result.greeks.rho, expected.rho, epsilon = 1e-12);
    }

    #[test]
    fn test_analytic_put_delta_negative() {
        let result = GreeksEstimator::default()
            .analytic(&atm_market(), OptionType::Put)
            .unwrap();
        assert!(result.greeks.delta < 0.0);
        assert!(result.greeks.gamma > 0.0);
        assert!(result.greeks.vega > 0.0);
        assert!(result.greeks.rho < 0.0);
    }

    #[test]
    fn test_zero_step_lattice_rejected() {
        let model = ModelConfig::Lattice {
            arity: LatticeArity::Binomial,
            steps: 0,
            exercise: ExerciseStyle::American,
            option_type: OptionType::Put,
        };
        assert!(GreeksEstimator::default()
            .estimate(&atm_market(), &model)
            .is_err());
    }
}

// =============================================================================
// Bump-and-reprice path
// =============================================================================

mod lattice_tests {
    use super::*;

    #[test]
    fn test_lattice_greeks_track_closed_form() {
        let market = atm_market();
        let estimator = GreeksEstimator::default();

        for arity in LatticeArity::ALL {
            for option_type in OptionType::ALL {
                let model = ModelConfig::lattice(arity, 250, ExerciseStyle::European, option_type);
                let lattice = estimator.estimate(&market, &model).unwrap();
                let closed = estimator.analytic(&market, option_type).unwrap();

                assert_eq!(lattice.method, GreeksMethod::BumpAndReprice);
                assert!(!lattice.degenerate);
                assert_relative_eq!(lattice.price, closed.price, max_relative = 2e-3);
                assert_relative_eq!(lattice.greeks.delta, closed.greeks.delta, epsilon = 2e-3);
                assert_relative_eq!(lattice.greeks.theta, closed.greeks.theta, epsilon = 2e-2);
                assert_relative_eq!(lattice.greeks.vega, closed.greeks.vega, epsilon = 0.1);
                assert_relative_eq!(lattice.greeks.rho, closed.greeks.rho, epsilon = 0.05);
                assert!(lattice.greeks.gamma.is_finite());
            }
        }
    }

    #[test]
    fn test_american_put_sensitivities_signs() {
        let model = ModelConfig::trinomial(200, ExerciseStyle::American, OptionType::Put);
        let result = GreeksEstimator::default()
            .estimate(&atm_market(), &model)
            .unwrap();

        assert!(result.greeks.delta < 0.0 && result.greeks.delta > -1.0);
        assert!(result.greeks.gamma > 0.0);
        assert!(result.greeks.vega > 0.0);
        assert!(result.greeks.rho < 0.0);
        assert!(result.greeks.theta < 0.0);
    }

    #[test]
    fn test_vol_bump_below_zero_rejected() {
        let market = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.005).unwrap();
        let model = ModelConfig::binomial(50, ExerciseStyle::European, OptionType::Call);
        let err = GreeksEstimator::default()
            .estimate(&market, &model)
            .unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(err.to_string().contains("volatility bump"));
    }

    #[test]
    fn test_time_bump_past_maturity_rejected() {
        let market = MarketParams::new(100.0, 100.0, 0.001, 0.05, 0.2).unwrap();
        let model = ModelConfig::trinomial(10, ExerciseStyle::American, OptionType::Put);
        let err = GreeksEstimator::default()
            .estimate(&market, &model)
            .unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(err.to_string().contains("time bump"));
    }

    #[test]
    fn test_bump_and_reprice_is_deterministic() {
        let market = atm_market();
        let model = ModelConfig::binomial(120, ExerciseStyle::American, OptionType::Put);
        let estimator = GreeksEstimator::default();
        let a = estimator.estimate(&market, &model).unwrap();
        let b = estimator.estimate(&market, &model).unwrap();
        assert_eq!(a, b);
    }
}
