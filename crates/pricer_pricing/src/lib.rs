//! # Pricer Pricing (L3: Lattice Engine)
//!
//! Backward induction on recombining lattices and the analyses built on it.
//!
//! This crate provides:
//! - [`lattice`]: binomial and trinomial valuation with early exercise, in
//!   price-only or full-lattice retention mode
//! - [`greeks`]: closed-form or bump-and-reprice sensitivities
//! - [`boundary`]: the discrete early-exercise frontier of a retained lattice
//! - [`convergence`]: European lattice error against the Black-Scholes benchmark
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::market_data::MarketParams;
//! use pricer_models::instruments::{ExerciseStyle, OptionType};
//! use pricer_models::models::LatticeArity;
//! use pricer_pricing::lattice::LatticeEngine;
//!
//! let market = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
//! let engine = LatticeEngine::new(&market, 200, LatticeArity::Binomial).unwrap();
//!
//! let european = engine.price(OptionType::Put, ExerciseStyle::European).unwrap();
//! let american = engine.price(OptionType::Put, ExerciseStyle::American).unwrap();
//! assert!(american >= european);
//! ```
//!
//! ## Determinism
//!
//! Nodes are processed in a fixed index order and parallel work is collected in
//! input order, so identical inputs reproduce bit-identical results.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod boundary;
pub mod convergence;
pub mod greeks;
pub mod lattice;
