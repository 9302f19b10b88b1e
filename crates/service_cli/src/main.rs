//! optlattice - vanilla option pricing from the command line
//!
//! # Commands
//!
//! - `optlattice price` - Price calls and puts under the analytic, binomial and trinomial models
//! - `optlattice validate` - Run the model validation battery
//! - `optlattice convergence` - Lattice error against the analytic price across step counts
//! - `optlattice boundary` - Early-exercise boundary of an American option
//! - `optlattice lattice` - Export every node of a retained lattice
//! - `optlattice config` - Print the effective settings
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate only parses arguments, loads
//! settings, installs logging and renders results; all pricing happens in the
//! library crates.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

use crate::config::{LogLevel, Settings};

/// Vanilla option pricing on analytic, binomial and trinomial models
#[derive(Parser)]
#[command(name = "optlattice")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file path (TOML, optional)
    #[arg(short, long, global = true, default_value = "optlattice.toml")]
    config: PathBuf,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price every requested model/exercise/type combination
    Price(commands::price::PriceArgs),

    /// Run the validation battery
    Validate(commands::validate::ValidateArgs),

    /// Convergence of European lattice prices to the analytic price
    Convergence(commands::convergence::ConvergenceArgs),

    /// Early-exercise boundary of an American option
    Boundary(commands::boundary::BoundaryArgs),

    /// Export a full lattice
    Lattice(commands::lattice::LatticeArgs),

    /// Print the effective settings as TOML
    Config,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?;

    let level = cli.log_level.unwrap_or(settings.log_level);
    init_tracing(level.as_filter_str());
    debug!(config = %cli.config.display(), log_level = %level, "settings loaded");

    match cli.command {
        Commands::Price(args) => commands::price::run(&args, &settings),
        Commands::Validate(args) => commands::validate::run(&args, &settings),
        Commands::Convergence(args) => commands::convergence::run(&args, &settings),
        Commands::Boundary(args) => commands::boundary::run(&args, &settings),
        Commands::Lattice(args) => commands::lattice::run(&args),
        Commands::Config => commands::show_config(&settings),
    }
}
