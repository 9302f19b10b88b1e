//! CLI error types.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Errors surfaced by the `optlattice` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Pricing library rejected the inputs or failed to compute.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Configuration file or environment could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Effective settings could not be rendered as TOML.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialisation failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialisation failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Argument combination the command cannot serve.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
