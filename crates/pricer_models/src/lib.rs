//! # Pricer Models (L2: Business Logic)
//!
//! Vanilla option definitions, model selection, closed-form pricing and lattice
//! parameterisation.
//!
//! This crate provides:
//! - Instrument definitions ([`instruments::OptionType`], [`instruments::ExerciseStyle`])
//! - Model selection as tagged variants ([`models::ModelConfig`], [`models::PricingRequest`])
//! - Closed-form Black-Scholes prices and Greeks with dividend yield ([`analytical`])
//! - Binomial (CRR) and trinomial (Boyle) branching parameters ([`models::LatticeParams`])
//!
//! ## Design Principles
//!
//! - **Enum-based configuration**: illegal model/exercise combinations are unrepresentable
//! - **Fail fast**: inadmissible lattice probabilities are rejected before any lattice is built
//! - **Degenerate inputs are values, not errors**: see [`analytical::AnalyticValuation::degenerate`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
pub mod models;
