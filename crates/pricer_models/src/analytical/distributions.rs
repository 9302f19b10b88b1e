//! Standard normal distribution functions.
//!
//! - `norm_cdf`: Cumulative distribution function Φ
//! - `norm_pdf`: Probability density function φ
//!
//! Both are generic over `T: Float` so the closed-form pricer can be evaluated in
//! `f32` or `f64`.

use num_traits::Float;

/// Square root of 2.
const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

#[inline]
fn constant<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

/// Complementary error function at double precision.
///
/// Evaluated in `f64` through `statrs`. Negative arguments use
/// erfc(-x) = 2 - erfc(x), which keeps Φ(x) + Φ(-x) = 1 exact up to rounding.
#[inline]
fn erfc<T: Float>(x: T) -> T {
    let abs_x = x.abs().to_f64().unwrap_or(f64::NAN);
    let erfc_abs = statrs::function::erf::erfc(abs_x);

    if x < T::zero() {
        constant::<T>(2.0 - erfc_abs)
    } else {
        constant::<T>(erfc_abs)
    }
}

/// Standard normal cumulative distribution function.
///
/// Φ(x) = ½·erfc(−x/√2), accurate to double precision.
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-15);
/// assert!(norm_cdf(-3.0_f64) < 0.01);
/// assert!(norm_cdf(3.0_f64) > 0.99);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    constant::<T>(0.5) * erfc(-x / constant::<T>(SQRT_2))
}

/// Standard normal probability density function.
///
/// φ(x) = (1 / sqrt(2π)) · exp(−x²/2)
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_pdf;
///
/// assert!((norm_pdf(0.0_f64) - 0.3989422804).abs() < 1e-7);
/// assert!((norm_pdf(1.0_f64) - 0.2419707245).abs() < 1e-7);
/// ```
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    constant::<T>(FRAC_1_SQRT_2PI) * (constant::<T>(-0.5) * x * x).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    // ==========================================================
    // norm_cdf tests
    // ==========================================================

    #[test]
    fn test_norm_cdf_at_zero() {
        assert_relative_eq!(norm_cdf(0.0_f64), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_relative_eq!(norm_cdf(1.0_f64), 0.8413447460685429, epsilon = 1e-15);
        assert_relative_eq!(norm_cdf(-1.0_f64), 0.15865525393145707, epsilon = 1e-15);
        assert_relative_eq!(norm_cdf(2.0_f64), 0.9772498680518208, epsilon = 1e-15);
        assert_relative_eq!(norm_cdf(-2.0_f64), 0.02275013194817922, epsilon = 1e-15);
        assert_relative_eq!(norm_cdf(0.35_f64), 0.636830651175619, epsilon = 1e-15);
    }

    #[test]
    fn test_norm_cdf_far_tail_relative_accuracy() {
        assert_relative_eq!(norm_cdf(-5.0_f64), 2.866515718791946e-7, max_relative = 1e-12);
        assert_relative_eq!(norm_cdf(-8.0_f64), 6.220960574271819e-16, max_relative = 1e-12);
    }

    #[test]
    fn test_norm_cdf_symmetry_is_exact() {
        for x in [-3.0, -1.2, -0.1, 0.4, 2.5, 7.0] {
            assert_relative_eq!(norm_cdf(x) + norm_cdf(-x), 1.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_norm_cdf_tails_stay_in_unit_interval() {
        for x in [-40.0_f64, -10.0, -8.0, 8.0, 10.0, 40.0] {
            let p = norm_cdf(x);
            assert!((0.0..=1.0).contains(&p), "Φ({}) = {}", x, p);
        }
        assert!(norm_cdf(-10.0_f64) < 1e-22);
        assert!(norm_cdf(10.0_f64) > 1.0 - 1e-15);
    }

    #[test]
    fn test_norm_cdf_monotonic() {
        let values: Vec<f64> = (-50..=50).map(|i| i as f64 * 0.1).collect();
        for pair in values.windows(2) {
            assert!(norm_cdf(pair[1]) >= norm_cdf(pair[0]));
        }
    }

    #[test]
    fn test_norm_cdf_f32() {
        assert!((norm_cdf(1.0_f32) - 0.841_344_7).abs() < 1e-5);
    }

    // ==========================================================
    // norm_pdf tests
    // ==========================================================

    #[test]
    fn test_norm_pdf_reference_values() {
        assert_relative_eq!(norm_pdf(0.0_f64), FRAC_1_SQRT_2PI, epsilon = 1e-15);
        assert_relative_eq!(norm_pdf(2.0_f64), 0.05399096651318806, epsilon = 1e-12);
        assert_relative_eq!(norm_pdf(-2.0_f64), norm_pdf(2.0_f64), epsilon = 1e-15);
    }

    #[test]
    fn test_cdf_pdf_relationship() {
        let h = 1e-4;
        for x in [-2.0, -1.0, 0.0, 1.0, 2.0] {
            let numerical = (norm_cdf(x + h) - norm_cdf(x - h)) / (2.0 * h);
            assert_relative_eq!(numerical, norm_pdf(x), epsilon = 1e-8);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_cdf_in_unit_interval(x in -50.0_f64..50.0) {
            let p = norm_cdf(x);
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
