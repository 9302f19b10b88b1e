//! # pricer_core: Foundation for Lattice Option Pricing
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the pricing workspace, providing:
//! - Market inputs for one pricing request: [`market_data::MarketParams`]
//! - The error taxonomy shared by every layer: [`types::PricingError`]
//! - Numeric guards that turn non-finite intermediates into errors (`math::guards`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::MarketParams;
//!
//! let market = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2)
//!     .unwrap()
//!     .with_dividend_yield(0.01)
//!     .unwrap();
//!
//! assert_eq!(market.spot(), 100.0);
//! assert!(market.forward() > market.spot());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for market parameters and errors

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;
