//! Recombining binomial and trinomial lattices.
//!
//! - [`LatticeEngine`]: terminal payoffs plus backward induction with early exercise
//! - [`RetentionMode`]: root values only, or every node retained
//! - [`Lattice`], [`LatticeLevel`], [`LatticeNode`]: the retained node grid
//! - [`LatticeValuation`]: European and American root values from one pass

mod engine;
mod node;

pub use engine::{LatticeEngine, LatticeValuation, RetentionMode, EXERCISE_TIE_TOLERANCE};
pub use node::{Lattice, LatticeLevel, LatticeNode};
