//! Lattice export command implementation.

use clap::Args;
use pricer_models::instruments::OptionType;
use pricer_models::models::LatticeArity;
use pricer_pricing::lattice::{Lattice, LatticeEngine, RetentionMode};
use serde::Serialize;
use tracing::info;

use super::MarketArgs;
use crate::output::{num, print_csv, print_json, OutputFormat, Table};
use crate::{CliError, Result};

/// Arguments of `optlattice lattice`.
#[derive(Debug, Args)]
pub struct LatticeArgs {
    #[command(flatten)]
    market: MarketArgs,

    /// Lattice arity (binomial or trinomial)
    #[arg(long, default_value = "binomial")]
    arity: LatticeArity,

    /// Option type (call or put)
    #[arg(long, default_value = "put")]
    option_type: OptionType,

    /// Lattice steps
    #[arg(long, default_value_t = 10)]
    steps: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

/// One node flattened for CSV and table output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct NodeRow {
    level: usize,
    index: usize,
    time: f64,
    stock_price: f64,
    european: f64,
    american: f64,
    early_exercise: bool,
}

fn node_rows(lattice: &Lattice) -> Vec<NodeRow> {
    lattice
        .levels()
        .iter()
        .flat_map(|level| {
            level.nodes.iter().enumerate().map(move |(index, node)| NodeRow {
                level: level.index,
                index,
                time: level.time,
                stock_price: node.stock_price,
                european: node.european,
                american: node.american,
                early_exercise: node.early_exercise,
            })
        })
        .collect()
}

/// Runs `optlattice lattice`.
pub fn run(args: &LatticeArgs) -> Result<()> {
    let market = args.market.market()?;
    let valuation = LatticeEngine::new(&market, args.steps, args.arity)?
        .value(args.option_type, RetentionMode::FullLattice)?;
    let lattice = valuation.lattice.ok_or_else(|| {
        CliError::InvalidArgument("lattice was not retained".to_string())
    })?;
    info!(
        nodes = lattice.node_count(),
        european = valuation.european,
        american = valuation.american,
        "lattice built"
    );

    match args.format {
        OutputFormat::Json => print_json(&lattice),
        OutputFormat::Csv => print_csv(&node_rows(&lattice)),
        OutputFormat::Table => {
            let mut table = Table::new([
                "level", "index", "time", "stock", "european", "american", "exercise",
            ]);
            for row in node_rows(&lattice) {
                table.row([
                    row.level.to_string(),
                    row.index.to_string(),
                    num(row.time),
                    num(row.stock_price),
                    num(row.european),
                    num(row.american),
                    if row.early_exercise { "yes" } else { "" }.to_string(),
                ]);
            }
            table.print();
            Ok(())
        }
    }
}
