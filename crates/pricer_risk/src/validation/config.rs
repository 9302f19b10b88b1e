//! Thresholds and step counts for the validation battery.

use pricer_core::types::PricingError;

/// Validation thresholds.
///
/// Slacks are absolute; the parity tolerance is a fraction of S0 and the
/// martingale tolerance a relative error against S0.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidationConfig {
    /// Lattice steps when no lattice model is requested.
    pub reference_steps: usize,
    /// Steps for the fixed convergence targets.
    pub convergence_steps: usize,
    /// Slack on the no-arbitrage bounds.
    pub bounds_slack: f64,
    /// Parity residual limit as a fraction of S0.
    pub parity_tolerance: f64,
    /// Slack on American ≥ European.
    pub american_slack: f64,
    /// |American call − European call| limit when q = 0.
    pub american_call_tolerance: f64,
    /// |Σp − 1| limit for the trinomial lattice.
    pub probability_sum_tolerance: f64,
    /// |E[S_T] − S0·e^((r−q)T)| / S0 limit.
    pub martingale_tolerance: f64,
    /// Binomial relative-error target at 250 steps.
    pub binomial_target: f64,
    /// Trinomial relative-error target at 250 steps.
    pub trinomial_target: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            reference_steps: 250,
            convergence_steps: 250,
            bounds_slack: 1e-6,
            parity_tolerance: 2e-4,
            american_slack: 1e-6,
            american_call_tolerance: 1e-6,
            probability_sum_tolerance: 1e-9,
            martingale_tolerance: 1e-3,
            binomial_target: 0.0015,
            trinomial_target: 0.0008,
        }
    }
}

/// Step count at which [`ValidationConfig::binomial_target`] and
/// [`ValidationConfig::trinomial_target`] apply.
pub const TARGET_STEPS: usize = 250;

impl ValidationConfig {
    /// Sets the fallback reference step count.
    pub fn with_reference_steps(mut self, steps: usize) -> Self {
        self.reference_steps = steps;
        self
    }

    /// Sets the step count of the convergence targets.
    pub fn with_convergence_steps(mut self, steps: usize) -> Self {
        self.convergence_steps = steps;
        self
    }

    /// Sets the parity residual limit (fraction of S0).
    pub fn with_parity_tolerance(mut self, tolerance: f64) -> Self {
        self.parity_tolerance = tolerance;
        self
    }

    /// Sets the martingale relative-error limit.
    pub fn with_martingale_tolerance(mut self, tolerance: f64) -> Self {
        self.martingale_tolerance = tolerance;
        self
    }

    /// Sets the binomial and trinomial relative-error targets.
    pub fn with_targets(mut self, binomial: f64, trinomial: f64) -> Self {
        self.binomial_target = binomial;
        self.trinomial_target = trinomial;
        self
    }

    /// Validates step counts and thresholds.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` for a zero step count or a negative or
    /// non-finite threshold.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.reference_steps < 1 || self.convergence_steps < 1 {
            return Err(PricingError::InvalidParameter(format!(
                "validation steps must be at least 1 (reference {}, convergence {})",
                self.reference_steps, self.convergence_steps
            )));
        }
        let thresholds = [
            ("bounds_slack", self.bounds_slack),
            ("parity_tolerance", self.parity_tolerance),
            ("american_slack", self.american_slack),
            ("american_call_tolerance", self.american_call_tolerance),
            ("probability_sum_tolerance", self.probability_sum_tolerance),
            ("martingale_tolerance", self.martingale_tolerance),
            ("binomial_target", self.binomial_target),
            ("trinomial_target", self.trinomial_target),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(PricingError::invalid(name, value, "threshold must be finite and non-negative"));
            }
        }
        Ok(())
    }
}
