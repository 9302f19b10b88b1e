//! Retained lattice storage.
//!
//! The node grid is an array of levels addressed by `(level, index)`. Within a
//! level nodes are ordered by increasing stock price.

use pricer_models::instruments::OptionType;
use pricer_models::models::LatticeArity;

/// One node of a retained lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeNode {
    /// Stock price S at this node.
    pub stock_price: f64,
    /// European option value.
    pub european: f64,
    /// American option value, max(continuation, intrinsic).
    pub american: f64,
    /// Intrinsic value strictly exceeded the American continuation value.
    pub early_exercise: bool,
}

/// All nodes at one time step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeLevel {
    /// Level index i (0 is the root).
    pub index: usize,
    /// Time t_i = i·Δt in years.
    pub time: f64,
    /// Nodes ordered by increasing stock price.
    pub nodes: Vec<LatticeNode>,
}

/// A fully retained lattice from root (level 0) to maturity (level N).
///
/// Both European and American values are stored at every node, so a single
/// lattice serves either exercise style.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lattice {
    pub(crate) arity: LatticeArity,
    pub(crate) option_type: OptionType,
    pub(crate) steps: usize,
    pub(crate) dt: f64,
    pub(crate) levels: Vec<LatticeLevel>,
}

impl Lattice {
    /// Branching arity.
    #[inline]
    pub fn arity(&self) -> LatticeArity {
        self.arity
    }

    /// Option type the values belong to.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Number of time steps N.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Time step Δt.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Maturity T = N·Δt.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.steps as f64 * self.dt
    }

    /// Levels from root to maturity.
    #[inline]
    pub fn levels(&self) -> &[LatticeLevel] {
        &self.levels
    }

    /// Level `i`, if it exists.
    #[inline]
    pub fn level(&self, i: usize) -> Option<&LatticeLevel> {
        self.levels.get(i)
    }

    /// Node `(level, index)`, if it exists.
    #[inline]
    pub fn node(&self, level: usize, index: usize) -> Option<&LatticeNode> {
        self.levels.get(level).and_then(|l| l.nodes.get(index))
    }

    /// The single root node.
    #[inline]
    pub fn root(&self) -> Option<&LatticeNode> {
        self.node(0, 0)
    }

    /// Total number of stored nodes.
    pub fn node_count(&self) -> usize {
        self.levels.iter().map(|l| l.nodes.len()).sum()
    }
}
