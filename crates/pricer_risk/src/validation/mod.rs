//! Model validation battery.
//!
//! Cross-checks the closed form and both lattices on one market snapshot:
//!
//! | Family | Check |
//! |---|---|
//! | no-arbitrage bounds | 0 ≤ call ≤ S0, 0 ≤ put ≤ K·e^(−rT), forward intrinsic floors |
//! | put-call parity | residual within a fraction of S0 |
//! | early exercise | American ≥ European; American call = European call when q = 0 |
//! | convergence targets | call relative error at a fixed N |
//! | pricing accuracy | call and put relative error at the reference N |
//! | probability validity | probabilities in [0, 1], trinomial sum one |
//! | martingale | E[S_T] against S0·e^((r−q)T) |
//!
//! Overall pass is the conjunction of all families.

mod config;
mod inputs;
mod report;
mod suite;

pub use config::{ValidationConfig, TARGET_STEPS};
pub use inputs::{LatticeQuotes, ValidationInputs};
pub use report::{CheckFamily, Comparison, ValidationCategory, ValidationReport, ValidationTest};
pub use suite::ValidationSuite;
