//! Validation results.

use std::fmt;

/// Family of consistency checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CheckFamily {
    /// 0 ≤ call ≤ S0, 0 ≤ put ≤ K·e^(−rT) and the forward intrinsic lower bounds.
    NoArbitrageBounds,
    /// European call − put against S0·e^(−qT) − K·e^(−rT).
    PutCallParity,
    /// American ≥ European; American call ≈ European call when q = 0.
    EarlyExercise,
    /// Relative error at the fixed convergence step count.
    ConvergenceTargets,
    /// Relative error at the reference step count, scaled by resolution.
    PricingAccuracy,
    /// Risk-neutral probabilities in [0, 1] that sum to one.
    ProbabilityValidity,
    /// E[S_T] against the risk-neutral forward.
    Martingale,
}

impl CheckFamily {
    /// Every family in report order.
    pub const ALL: [CheckFamily; 7] = [
        CheckFamily::NoArbitrageBounds,
        CheckFamily::PutCallParity,
        CheckFamily::EarlyExercise,
        CheckFamily::ConvergenceTargets,
        CheckFamily::PricingAccuracy,
        CheckFamily::ProbabilityValidity,
        CheckFamily::Martingale,
    ];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            CheckFamily::NoArbitrageBounds => "no-arbitrage bounds",
            CheckFamily::PutCallParity => "put-call parity",
            CheckFamily::EarlyExercise => "early exercise",
            CheckFamily::ConvergenceTargets => "convergence targets",
            CheckFamily::PricingAccuracy => "pricing accuracy",
            CheckFamily::ProbabilityValidity => "probability validity",
            CheckFamily::Martingale => "martingale",
        }
    }
}

impl fmt::Display for CheckFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction of the threshold comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Comparison {
    /// Passes when measured ≤ threshold.
    AtMost,
    /// Passes when measured ≥ threshold.
    AtLeast,
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparison::AtMost => write!(f, "<="),
            Comparison::AtLeast => write!(f, ">="),
        }
    }
}

/// One check: a measured value against its threshold.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationTest {
    /// What was checked.
    pub name: String,
    /// Measured value.
    pub measured: f64,
    /// Threshold, slack included.
    pub threshold: f64,
    /// Comparison direction.
    pub comparison: Comparison,
    /// Outcome.
    pub passed: bool,
}

impl ValidationTest {
    /// `measured ≤ threshold`
    pub fn at_most(name: impl Into<String>, measured: f64, threshold: f64) -> Self {
        Self {
            name: name.into(),
            measured,
            threshold,
            comparison: Comparison::AtMost,
            passed: measured <= threshold,
        }
    }

    /// `measured ≥ threshold`
    pub fn at_least(name: impl Into<String>, measured: f64, threshold: f64) -> Self {
        Self {
            name: name.into(),
            measured,
            threshold,
            comparison: Comparison::AtLeast,
            passed: measured >= threshold,
        }
    }
}

/// Checks of one family.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationCategory {
    /// Check family.
    pub family: CheckFamily,
    /// Individual checks.
    pub tests: Vec<ValidationTest>,
    /// Every check passed.
    pub passed: bool,
}

impl ValidationCategory {
    /// Groups `tests` under `family`.
    pub fn new(family: CheckFamily, tests: Vec<ValidationTest>) -> Self {
        let passed = tests.iter().all(|t| t.passed);
        Self {
            family,
            tests,
            passed,
        }
    }
}

/// Outcome of the whole battery.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationReport {
    /// Lattice steps of the bounds, parity, early-exercise, accuracy, probability
    /// and martingale checks.
    pub reference_steps: usize,
    /// Lattice steps of the convergence targets.
    pub convergence_steps: usize,
    /// Categories in [`CheckFamily::ALL`] order.
    pub categories: Vec<ValidationCategory>,
    /// Conjunction of all categories.
    pub overall_passed: bool,
    /// Number of checks.
    pub total_tests: usize,
    /// Number of passing checks.
    pub passed_tests: usize,
}

impl ValidationReport {
    /// Assembles a report and its summary counts.
    pub fn new(
        reference_steps: usize,
        convergence_steps: usize,
        categories: Vec<ValidationCategory>,
    ) -> Self {
        let overall_passed = categories.iter().all(|c| c.passed);
        let total_tests = categories.iter().map(|c| c.tests.len()).sum();
        let passed_tests = categories
            .iter()
            .flat_map(|c| &c.tests)
            .filter(|t| t.passed)
            .count();
        Self {
            reference_steps,
            convergence_steps,
            categories,
            overall_passed,
            total_tests,
            passed_tests,
        }
    }

    /// Category of `family`, if present.
    pub fn category(&self, family: CheckFamily) -> Option<&ValidationCategory> {
        self.categories.iter().find(|c| c.family == family)
    }

    /// Every failing check with its family.
    pub fn failures(&self) -> impl Iterator<Item = (CheckFamily, &ValidationTest)> {
        self.categories
            .iter()
            .flat_map(|c| c.tests.iter().map(move |t| (c.family, t)))
            .filter(|(_, t)| !t.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparisons() {
        assert!(ValidationTest::at_most("a", 1.0, 1.0).passed);
        assert!(!ValidationTest::at_most("a", 1.1, 1.0).passed);
        assert!(ValidationTest::at_least("b", 0.0, 0.0).passed);
        assert!(!ValidationTest::at_least("b", -0.1, 0.0).passed);
        assert!(!ValidationTest::at_most("nan", f64::NAN, 1.0).passed);
    }

    #[test]
    fn test_report_counts() {
        let ok = ValidationCategory::new(
            CheckFamily::PutCallParity,
            vec![ValidationTest::at_most("x", 0.0, 1.0)],
        );
        let bad = ValidationCategory::new(
            CheckFamily::Martingale,
            vec![
                ValidationTest::at_most("y", 0.0, 1.0),
                ValidationTest::at_most("z", 2.0, 1.0),
            ],
        );
        assert!(ok.passed);
        assert!(!bad.passed);

        let report = ValidationReport::new(250, 250, vec![ok, bad]);
        assert!(!report.overall_passed);
        assert_eq!(report.total_tests, 3);
        assert_eq!(report.passed_tests, 2);

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, CheckFamily::Martingale);
        assert_eq!(failures[0].1.name, "z");
        assert!(report.category(CheckFamily::EarlyExercise).is_none());
    }
}
