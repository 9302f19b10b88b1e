//! Model selection and pricing requests.
//!
//! The combinatorial space model × exercise × option type is spelled out as
//! tagged variants. The analytic model carries no exercise style because only
//! European exercise has a closed form; an "analytic American" request cannot be
//! constructed.
//!
//! ## Example
//!
//! ```
//! use pricer_models::instruments::{ExerciseStyle, OptionType};
//! use pricer_models::models::{LatticeArity, ModelConfig, PricingRequest};
//!
//! let model = ModelConfig::lattice(LatticeArity::Trinomial, 200, ExerciseStyle::American, OptionType::Put);
//! let request = PricingRequest::new(model).with_greeks().with_boundary();
//! assert!(request.validate().is_ok());
//!
//! // Boundary extraction needs early exercise
//! let european = ModelConfig::lattice(LatticeArity::Binomial, 200, ExerciseStyle::European, OptionType::Put);
//! assert!(PricingRequest::new(european).with_boundary().validate().is_err());
//! ```

use pricer_core::types::PricingError;

use crate::instruments::{ExerciseStyle, OptionType};

/// Branching arity of a recombining lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LatticeArity {
    /// Two branches per node (Cox-Ross-Rubinstein).
    Binomial,
    /// Three branches per node (Boyle).
    Trinomial,
}

impl LatticeArity {
    /// Both arities, binomial first.
    pub const ALL: [LatticeArity; 2] = [LatticeArity::Binomial, LatticeArity::Trinomial];

    /// Number of children per node.
    #[inline]
    pub fn branches(&self) -> usize {
        match self {
            LatticeArity::Binomial => 2,
            LatticeArity::Trinomial => 3,
        }
    }

    /// Number of nodes at `level`: `level + 1` (binomial) or `2·level + 1` (trinomial).
    #[inline]
    pub fn nodes_at(&self, level: usize) -> usize {
        match self {
            LatticeArity::Binomial => level + 1,
            LatticeArity::Trinomial => 2 * level + 1,
        }
    }

    /// Net number of up moves of node `(level, index)`.
    ///
    /// Nodes are indexed in increasing stock price, so index 0 is the all-down node.
    /// The stock price at the node is `S0·u^net`.
    #[inline]
    pub fn net_up_moves(&self, level: usize, index: usize) -> i32 {
        let (level, index) = (level as i64, index as i64);
        let net = match self {
            LatticeArity::Binomial => 2 * index - level,
            LatticeArity::Trinomial => index - level,
        };
        net as i32
    }

    /// Lowercase display name.
    pub fn name(&self) -> &'static str {
        match self {
            LatticeArity::Binomial => "binomial",
            LatticeArity::Trinomial => "trinomial",
        }
    }
}

impl std::fmt::Display for LatticeArity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for LatticeArity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binomial" | "crr" | "2" => Ok(LatticeArity::Binomial),
            "trinomial" | "boyle" | "3" => Ok(LatticeArity::Trinomial),
            other => Err(format!("unknown lattice arity '{}'", other)),
        }
    }
}

/// Pricing model for one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "model", rename_all = "lowercase"))]
pub enum ModelConfig {
    /// Closed-form Black-Scholes, European exercise.
    Analytic {
        /// Call or put.
        option_type: OptionType,
    },
    /// Recombining lattice with backward induction.
    Lattice {
        /// Binomial or trinomial.
        arity: LatticeArity,
        /// Number of time steps N (at least 1).
        steps: usize,
        /// European or American.
        exercise: ExerciseStyle,
        /// Call or put.
        option_type: OptionType,
    },
}

impl ModelConfig {
    /// Closed-form European option.
    pub fn analytic(option_type: OptionType) -> Self {
        ModelConfig::Analytic { option_type }
    }

    /// Lattice option of the given arity.
    pub fn lattice(
        arity: LatticeArity,
        steps: usize,
        exercise: ExerciseStyle,
        option_type: OptionType,
    ) -> Self {
        ModelConfig::Lattice {
            arity,
            steps,
            exercise,
            option_type,
        }
    }

    /// Binomial lattice option.
    pub fn binomial(steps: usize, exercise: ExerciseStyle, option_type: OptionType) -> Self {
        Self::lattice(LatticeArity::Binomial, steps, exercise, option_type)
    }

    /// Trinomial lattice option.
    pub fn trinomial(steps: usize, exercise: ExerciseStyle, option_type: OptionType) -> Self {
        Self::lattice(LatticeArity::Trinomial, steps, exercise, option_type)
    }

    /// Option type priced by this configuration.
    pub fn option_type(&self) -> OptionType {
        match self {
            ModelConfig::Analytic { option_type } | ModelConfig::Lattice { option_type, .. } => {
                *option_type
            }
        }
    }

    /// Exercise style; always European for the analytic model.
    pub fn exercise(&self) -> ExerciseStyle {
        match self {
            ModelConfig::Analytic { .. } => ExerciseStyle::European,
            ModelConfig::Lattice { exercise, .. } => *exercise,
        }
    }

    /// Lattice arity, `None` for the analytic model.
    pub fn arity(&self) -> Option<LatticeArity> {
        match self {
            ModelConfig::Analytic { .. } => None,
            ModelConfig::Lattice { arity, .. } => Some(*arity),
        }
    }

    /// Lattice step count, `None` for the analytic model.
    pub fn steps(&self) -> Option<usize> {
        match self {
            ModelConfig::Analytic { .. } => None,
            ModelConfig::Lattice { steps, .. } => Some(*steps),
        }
    }

    /// Short label such as `trinomial(250)/american/put`.
    pub fn label(&self) -> String {
        match self {
            ModelConfig::Analytic { option_type } => format!("analytic/european/{}", option_type),
            ModelConfig::Lattice {
                arity,
                steps,
                exercise,
                option_type,
            } => format!("{}({})/{}/{}", arity, steps, exercise, option_type),
        }
    }

    /// Checks the step count.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if a lattice has fewer than one step.
    pub fn validate(&self) -> Result<(), PricingError> {
        if let ModelConfig::Lattice { steps, .. } = self {
            if *steps < 1 {
                return Err(PricingError::InvalidParameter(format!(
                    "steps = {} (must be at least 1)",
                    steps
                )));
            }
        }
        Ok(())
    }
}

/// Step counts for a convergence series.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ConvergenceGrid {
    /// Dense grid `1..=max_steps` (every third N above 500); inadmissible N are skipped.
    Default {
        /// Largest step count.
        max_steps: usize,
    },
    /// Caller-supplied ascending step counts; any inadmissible N fails the series.
    Explicit(Vec<usize>),
}

/// Optional outputs for a pricing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RequestedOutputs {
    /// Compute the five Greeks.
    pub greeks: bool,
    /// Convergence series against the analytic price (European lattices only).
    pub convergence: Option<ConvergenceGrid>,
    /// Early-exercise boundary (American lattices only).
    pub boundary: bool,
    /// Export the full retained lattice (lattice models only).
    pub lattice: bool,
}

impl RequestedOutputs {
    /// Returns whether the full lattice has to be retained.
    pub fn needs_full_lattice(&self) -> bool {
        self.boundary || self.lattice
    }
}

/// One model configuration together with the outputs wanted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingRequest {
    /// Model, exercise and option type.
    pub model: ModelConfig,
    /// Optional outputs.
    #[cfg_attr(feature = "serde", serde(default))]
    pub outputs: RequestedOutputs,
}

impl PricingRequest {
    /// Request for the price only.
    pub fn new(model: ModelConfig) -> Self {
        Self {
            model,
            outputs: RequestedOutputs::default(),
        }
    }

    /// Also compute Greeks.
    pub fn with_greeks(mut self) -> Self {
        self.outputs.greeks = true;
        self
    }

    /// Also compute a convergence series on `grid`.
    pub fn with_convergence(mut self, grid: ConvergenceGrid) -> Self {
        self.outputs.convergence = Some(grid);
        self
    }

    /// Also extract the early-exercise boundary.
    pub fn with_boundary(mut self) -> Self {
        self.outputs.boundary = true;
        self
    }

    /// Also export the full lattice.
    pub fn with_lattice(mut self) -> Self {
        self.outputs.lattice = true;
        self
    }

    /// Checks that every requested output exists for the model.
    ///
    /// # Errors
    /// - `PricingError::InvalidParameter` for a lattice with zero steps or an empty or
    ///   zero-containing convergence grid, or an explicit grid that is not strictly
    ///   ascending
    /// - `PricingError::UnsupportedConfiguration` for convergence on American or
    ///   analytic models, a boundary on European or analytic models, or a lattice
    ///   export for the analytic model
    pub fn validate(&self) -> Result<(), PricingError> {
        self.model.validate()?;
        let label = self.model.label();
        let is_lattice = self.model.arity().is_some();

        if let Some(grid) = &self.outputs.convergence {
            if !is_lattice || self.model.exercise().is_american() {
                return Err(PricingError::UnsupportedConfiguration(format!(
                    "convergence is defined for European lattice models only, got {}",
                    label
                )));
            }
            match grid {
                ConvergenceGrid::Default { max_steps } if *max_steps < 1 => {
                    return Err(PricingError::InvalidParameter(
                        "convergence max_steps must be at least 1".to_string(),
                    ));
                }
                ConvergenceGrid::Explicit(steps) if steps.is_empty() || steps.contains(&0) => {
                    return Err(PricingError::InvalidParameter(
                        "convergence grid must be non-empty with every N at least 1".to_string(),
                    ));
                }
                ConvergenceGrid::Explicit(steps) if steps.windows(2).any(|w| w[0] >= w[1]) => {
                    return Err(PricingError::InvalidParameter(
                        "convergence grid must be strictly ascending".to_string(),
                    ));
                }
                _ => {}
            }
        }

        if self.outputs.boundary && (!is_lattice || self.model.exercise().is_european()) {
            return Err(PricingError::UnsupportedConfiguration(format!(
                "early-exercise boundary is defined for American lattice models only, got {}",
                label
            )));
        }

        if self.outputs.lattice && !is_lattice {
            return Err(PricingError::UnsupportedConfiguration(format!(
                "lattice export requires a lattice model, got {}",
                label
            )));
        }

        Ok(())
    }
}
