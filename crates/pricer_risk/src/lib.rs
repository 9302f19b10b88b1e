//! # Pricer Risk (L4: Application)
//!
//! Model validation and the aggregate pricing entry point.
//!
//! This crate provides:
//! - [`validation`]: the consistency battery (no-arbitrage bounds, parity, early
//!   exercise, convergence targets, accuracy, probability validity, martingale)
//! - [`aggregate`]: [`aggregate::price`], which prices a set of requests on one
//!   market snapshot and validates the models against each other
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            pricer_risk (L4)             │
//! │  aggregate/   - price(), outcomes       │
//! │  validation/  - ValidationSuite         │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │           pricer_pricing (L3)           │
//! │  lattice, greeks, boundary, convergence │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │   pricer_models (L2) / pricer_core (L1) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use pricer_core::market_data::MarketParams;
//! use pricer_models::instruments::{ExerciseStyle, OptionType};
//! use pricer_models::models::{ModelConfig, PricingRequest};
//! use pricer_risk::aggregate::price;
//!
//! let market = MarketParams::new(90.0, 100.0, 1.0, 0.05, 0.4).unwrap();
//! let request = PricingRequest::new(ModelConfig::binomial(
//!     100,
//!     ExerciseStyle::American,
//!     OptionType::Put,
//! ))
//! .with_boundary();
//!
//! let result = price(&market, &[request]);
//! let (_, priced) = result.succeeded().next().unwrap();
//! assert!(!priced.boundary.as_ref().unwrap().is_empty());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod aggregate;
pub mod validation;
