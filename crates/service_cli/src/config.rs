//! CLI settings
//!
//! Loaded from an optional TOML file, then `OPTLATTICE_*` environment variables
//! (nested keys separated by `__`, e.g. `OPTLATTICE_GREEKS__SPOT_BUMP_RELATIVE`).

use std::path::Path;
use std::str::FromStr;

use pricer_pricing::greeks::GreeksConfig;
use pricer_risk::aggregate::AggregateConfig;
use pricer_risk::validation::ValidationConfig;
use serde::{Deserialize, Serialize};

use crate::{CliError, Result};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "OPTLATTICE";

/// Log levels accepted by `--log-level` and the settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!(
                "invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                s
            )),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Effective CLI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level when `RUST_LOG` is unset
    pub log_level: LogLevel,
    /// Lattice steps when a command does not pass `--steps`
    pub default_steps: usize,
    /// Finite-difference bump sizes
    pub greeks: GreeksConfig,
    /// Validation thresholds
    pub validation: ValidationConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            default_steps: 250,
            greeks: GreeksConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl Settings {
    /// Loads `path` (if it exists) and applies environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validates step counts, bumps and thresholds.
    pub fn validate(&self) -> Result<()> {
        if self.default_steps < 1 {
            return Err(CliError::InvalidArgument(
                "default_steps must be at least 1".to_string(),
            ));
        }
        self.greeks.validate()?;
        self.validation.validate()?;
        Ok(())
    }

    /// Configuration for the aggregate pricer.
    pub fn aggregate(&self) -> AggregateConfig {
        AggregateConfig {
            greeks: self.greeks,
            validation: self.validation,
        }
    }

    /// Renders the settings as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
