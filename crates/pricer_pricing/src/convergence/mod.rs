//! Convergence of European lattice prices towards the closed-form benchmark.
//!
//! The analyzer reprices a European option at every step count of a grid and
//! records the absolute and relative error against the Black-Scholes price. The
//! error envelope shrinks roughly like O(1/√N) to O(1/N) for the binomial lattice
//! and O(1/N) for the trinomial one; at-the-money prices oscillate between even and
//! odd N, so individual points need not decrease monotonically.

use pricer_core::market_data::MarketParams;
use pricer_core::types::PricingError;
use pricer_models::analytical::BlackScholes;
use pricer_models::instruments::{ExerciseStyle, OptionType};
use pricer_models::models::{ConvergenceGrid, LatticeArity};
use rayon::prelude::*;
use tracing::debug;

use crate::lattice::LatticeEngine;

/// Largest `max_steps` for which the default grid is dense.
pub const DENSE_GRID_LIMIT: usize = 500;

/// Stride of the default grid above [`DENSE_GRID_LIMIT`].
pub const SPARSE_GRID_STRIDE: usize = 3;

/// Benchmarks at or below this magnitude report the absolute error as relative error.
const ZERO_BENCHMARK: f64 = 1e-12;

/// Lattice price at one step count.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergencePoint {
    /// Step count N.
    pub steps: usize,
    /// European lattice price.
    pub price: f64,
    /// |price − benchmark|
    pub absolute_error: f64,
    /// |price − benchmark| / |benchmark|, or the absolute error when the benchmark is zero.
    pub relative_error: f64,
}

impl ConvergencePoint {
    fn new(steps: usize, price: f64, benchmark: f64) -> Self {
        let absolute_error = (price - benchmark).abs();
        let relative_error = if benchmark.abs() > ZERO_BENCHMARK {
            absolute_error / benchmark.abs()
        } else {
            absolute_error
        };
        Self {
            steps,
            price,
            absolute_error,
            relative_error,
        }
    }
}

/// Ordered convergence points for one arity and option type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceSeries {
    /// Lattice arity.
    pub arity: LatticeArity,
    /// Option type.
    pub option_type: OptionType,
    /// Closed-form European price.
    pub benchmark: f64,
    /// Points in ascending step order.
    pub points: Vec<ConvergencePoint>,
}

impl ConvergenceSeries {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns whether the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at step count `steps`, if sampled.
    pub fn point(&self, steps: usize) -> Option<&ConvergencePoint> {
        self.points.iter().find(|p| p.steps == steps)
    }

    /// Point with the largest step count.
    pub fn last(&self) -> Option<&ConvergencePoint> {
        self.points.last()
    }

    /// Empirical convergence order.
    ///
    /// Least-squares slope of −ln(absolute error) against ln(N) over the points with
    /// a non-zero error. Roughly 0.5 to 1 for the binomial lattice and 1 for the
    /// trinomial lattice. `None` with fewer than two usable points.
    pub fn observed_order(&self) -> Option<f64> {
        let samples: Vec<(f64, f64)> = self
            .points
            .iter()
            .filter(|p| p.absolute_error > 0.0 && p.absolute_error.is_finite())
            .map(|p| ((p.steps as f64).ln(), -p.absolute_error.ln()))
            .collect();

        if samples.len() < 2 {
            return None;
        }

        let n = samples.len() as f64;
        let mean_x = samples.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = samples.iter().map(|(_, y)| y).sum::<f64>() / n;
        let (sxy, sxx) = samples.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
            let dx = x - mean_x;
            (sxy + dx * (y - mean_y), sxx + dx * dx)
        });

        (sxx > 0.0).then(|| sxy / sxx)
    }
}

/// Runs European lattice prices over a grid of step counts.
///
/// # Examples
///
/// ```rust
/// use pricer_core::market_data::MarketParams;
/// use pricer_models::instruments::OptionType;
/// use pricer_models::models::LatticeArity;
/// use pricer_pricing::convergence::ConvergenceAnalyzer;
///
/// let market = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
/// let series = ConvergenceAnalyzer::run(
///     &market,
///     LatticeArity::Trinomial,
///     OptionType::Call,
///     &[25, 50, 100, 200, 400],
/// )
/// .unwrap();
///
/// let first = series.points[0].absolute_error;
/// let last = series.points[4].absolute_error;
/// assert!(last < first);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvergenceAnalyzer;

impl ConvergenceAnalyzer {
    /// Step counts `1..=max_steps`, or every third N from 1 above [`DENSE_GRID_LIMIT`].
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if `max_steps` is zero.
    pub fn default_grid(max_steps: usize) -> Result<Vec<usize>, PricingError> {
        if max_steps < 1 {
            return Err(PricingError::InvalidParameter(
                "convergence max_steps must be at least 1".to_string(),
            ));
        }
        let grid = if max_steps <= DENSE_GRID_LIMIT {
            (1..=max_steps).collect()
        } else {
            (1..=max_steps).step_by(SPARSE_GRID_STRIDE).collect()
        };
        Ok(grid)
    }

    /// Runs the series described by `grid`.
    ///
    /// The default grid skips step counts whose lattice parameters are
    /// inadmissible; an explicit grid fails on the first one.
    pub fn analyze(
        market: &MarketParams,
        arity: LatticeArity,
        option_type: OptionType,
        grid: &ConvergenceGrid,
    ) -> Result<ConvergenceSeries, PricingError> {
        match grid {
            ConvergenceGrid::Default { max_steps } => {
                let steps = Self::default_grid(*max_steps)?;
                Self::series(market, arity, option_type, &steps, true)
            }
            ConvergenceGrid::Explicit(steps) => Self::run(market, arity, option_type, steps),
        }
    }

    /// Runs the series over an explicit, strictly ascending grid.
    ///
    /// # Errors
    ///
    /// - `PricingError::InvalidParameter` for an empty grid, a zero or out-of-order
    ///   step count, or inadmissible lattice parameters at any N
    /// - `PricingError::ComputationOverflow` if any price overflows
    pub fn run(
        market: &MarketParams,
        arity: LatticeArity,
        option_type: OptionType,
        steps: &[usize],
    ) -> Result<ConvergenceSeries, PricingError> {
        if steps.is_empty() || steps.contains(&0) {
            return Err(PricingError::InvalidParameter(
                "convergence grid must be non-empty with every N at least 1".to_string(),
            ));
        }
        if steps.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PricingError::InvalidParameter(
                "convergence grid must be strictly ascending".to_string(),
            ));
        }
        Self::series(market, arity, option_type, steps, false)
    }

    fn series(
        market: &MarketParams,
        arity: LatticeArity,
        option_type: OptionType,
        steps: &[usize],
        skip_inadmissible: bool,
    ) -> Result<ConvergenceSeries, PricingError> {
        let benchmark = BlackScholes::valuation(market, option_type)?.price;

        let sampled = steps
            .par_iter()
            .map(|&n| {
                let priced = LatticeEngine::new(market, n, arity)
                    .and_then(|engine| engine.price(option_type, ExerciseStyle::European));
                match priced {
                    Ok(price) => Ok(Some(ConvergencePoint::new(n, price, benchmark))),
                    Err(e) if skip_inadmissible && e.is_invalid_parameter() => {
                        debug!(steps = n, arity = %arity, error = %e, "skipping step count");
                        Ok(None)
                    }
                    Err(e) => Err(e),
                }
            })
            .collect::<Result<Vec<Option<ConvergencePoint>>, PricingError>>()?;

        let points: Vec<ConvergencePoint> = sampled.into_iter().flatten().collect();
        if points.is_empty() {
            return Err(PricingError::InvalidParameter(format!(
                "no admissible step count up to N = {} for the {} lattice",
                steps.last().copied().unwrap_or_default(),
                arity
            )));
        }

        debug!(
            arity = %arity,
            option_type = %option_type,
            requested = steps.len(),
            sampled = points.len(),
            benchmark,
            "convergence series"
        );

        Ok(ConvergenceSeries {
            arity,
            option_type,
            benchmark,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn market() -> MarketParams {
        MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap()
    }

    const GRID: [usize; 5] = [25, 50, 100, 200, 400];

    // ==========================================================
    // Grid construction
    // ==========================================================

    #[test]
    fn test_default_grid_dense() {
        let grid = ConvergenceAnalyzer::default_grid(500).unwrap();
        assert_eq!(grid.len(), 500);
        assert_eq!(grid[0], 1);
        assert_eq!(grid[499], 500);
    }

    #[test]
    fn test_default_grid_sparse() {
        let grid = ConvergenceAnalyzer::default_grid(1000).unwrap();
        assert_eq!(&grid[..4], &[1, 4, 7, 10]);
        assert_eq!(grid.len(), 334);
        assert_eq!(*grid.last().unwrap(), 1000);
    }

    #[test]
    fn test_default_grid_zero_rejected() {
        assert!(ConvergenceAnalyzer::default_grid(0)
            .unwrap_err()
            .is_invalid_parameter());
    }

    #[test]
    fn test_explicit_grid_shape_rejected() {
        for steps in [vec![], vec![0, 10], vec![50, 25], vec![25, 25]] {
            let err = ConvergenceAnalyzer::run(
                &market(),
                LatticeArity::Binomial,
                OptionType::Call,
                &steps,
            )
            .unwrap_err();
            assert!(err.is_invalid_parameter(), "{:?}", steps);
        }
    }

    // ==========================================================
    // Error behaviour
    // ==========================================================

    #[test]
    fn test_error_shrinks_over_grid() {
        for arity in LatticeArity::ALL {
            for option_type in OptionType::ALL {
                let series =
                    ConvergenceAnalyzer::run(&market(), arity, option_type, &GRID).unwrap();
                assert_eq!(series.len(), GRID.len());
                let first = series.point(25).unwrap();
                let last = series.point(400).unwrap();
                assert!(last.absolute_error <= first.absolute_error);
                assert!(last.relative_error < 2e-3);
            }
        }
    }

    #[test]
    fn test_points_keep_grid_order_and_error_definition() {
        let series =
            ConvergenceAnalyzer::run(&market(), LatticeArity::Binomial, OptionType::Put, &GRID)
                .unwrap();
        let steps: Vec<usize> = series.points.iter().map(|p| p.steps).collect();
        assert_eq!(steps, GRID.to_vec());

        for p in &series.points {
            assert_relative_eq!(p.absolute_error, (p.price - series.benchmark).abs());
            assert_relative_eq!(p.relative_error, p.absolute_error / series.benchmark);
        }
    }

    #[test]
    fn test_observed_order() {
        let binomial =
            ConvergenceAnalyzer::run(&market(), LatticeArity::Binomial, OptionType::Call, &GRID)
                .unwrap();
        let trinomial =
            ConvergenceAnalyzer::run(&market(), LatticeArity::Trinomial, OptionType::Call, &GRID)
                .unwrap();

        let b = binomial.observed_order().unwrap();
        let t = trinomial.observed_order().unwrap();
        assert!(b > 0.4 && b < 1.5, "binomial order {}", b);
        assert!(t > 0.8 && t < 1.5, "trinomial order {}", t);
    }

    #[test]
    fn test_observed_order_needs_two_points() {
        let series =
            ConvergenceAnalyzer::run(&market(), LatticeArity::Binomial, OptionType::Call, &[50])
                .unwrap();
        assert!(series.observed_order().is_none());
    }

    #[test]
    fn test_zero_benchmark_uses_absolute_error() {
        let p = ConvergencePoint::new(10, 1e-3, 0.0);
        assert_eq!(p.relative_error, p.absolute_error);
    }

    // ==========================================================
    // Inadmissible step counts
    // ==========================================================

    fn high_drift_market() -> MarketParams {
        // binomial p > 1 for every N below 100
        MarketParams::new(100.0, 100.0, 1.0, 0.5, 0.05).unwrap()
    }

    #[test]
    fn test_default_grid_skips_inadmissible_steps() {
        let series = ConvergenceAnalyzer::analyze(
            &high_drift_market(),
            LatticeArity::Binomial,
            OptionType::Call,
            &ConvergenceGrid::Default { max_steps: 150 },
        )
        .unwrap();

        assert!(series.len() >= 50);
        assert!(series.points[0].steps >= 100);
        assert_eq!(series.last().unwrap().steps, 150);
    }

    #[test]
    fn test_explicit_grid_fails_fast() {
        let err = ConvergenceAnalyzer::analyze(
            &high_drift_market(),
            LatticeArity::Binomial,
            OptionType::Call,
            &ConvergenceGrid::Explicit(vec![10, 200]),
        )
        .unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_default_grid_with_nothing_admissible() {
        let err = ConvergenceAnalyzer::analyze(
            &high_drift_market(),
            LatticeArity::Binomial,
            OptionType::Call,
            &ConvergenceGrid::Default { max_steps: 20 },
        )
        .unwrap_err();
        assert!(err.is_invalid_parameter());
    }
}
