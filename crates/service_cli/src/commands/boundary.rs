//! Boundary command implementation.

use clap::Args;
use pricer_models::instruments::OptionType;
use pricer_models::models::LatticeArity;
use pricer_pricing::boundary::{BoundaryExtractor, BoundaryPoint};
use tracing::info;

use super::MarketArgs;
use crate::config::Settings;
use crate::output::{num, print_csv, print_json, OutputFormat, Table};
use crate::Result;

/// Arguments of `optlattice boundary`.
#[derive(Debug, Args)]
pub struct BoundaryArgs {
    #[command(flatten)]
    market: MarketArgs,

    /// Lattice arity (binomial or trinomial)
    #[arg(long, default_value = "binomial")]
    arity: LatticeArity,

    /// Option type (call or put)
    #[arg(long, default_value = "put")]
    option_type: OptionType,

    /// Lattice steps (defaults to the configured step count)
    #[arg(long)]
    steps: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

/// Runs `optlattice boundary`.
pub fn run(args: &BoundaryArgs, settings: &Settings) -> Result<()> {
    let market = args.market.market()?;
    let steps = args.steps.unwrap_or(settings.default_steps);
    let boundary = BoundaryExtractor::compute(&market, steps, args.arity, args.option_type)?;
    info!(points = boundary.len(), steps, "early-exercise boundary extracted");

    match args.format {
        OutputFormat::Json => print_json(&boundary),
        OutputFormat::Csv => print_csv(&boundary),
        OutputFormat::Table => {
            if boundary.is_empty() {
                println!("no early exercise at this resolution");
            } else {
                boundary_table(&boundary).print();
            }
            Ok(())
        }
    }
}

fn boundary_table(boundary: &[BoundaryPoint]) -> Table {
    let mut table = Table::new(["time", "time_to_maturity", "critical_price"]);
    for point in boundary {
        table.row([
            num(point.time),
            num(point.time_to_maturity),
            num(point.critical_price),
        ]);
    }
    table
}
