//! Convergence command implementation.

use clap::Args;
use pricer_models::instruments::OptionType;
use pricer_models::models::{ConvergenceGrid, LatticeArity};
use pricer_pricing::convergence::{ConvergenceAnalyzer, ConvergenceSeries};
use tracing::info;

use super::MarketArgs;
use crate::config::Settings;
use crate::output::{num, print_csv, print_json, OutputFormat, Table};
use crate::Result;

/// Arguments of `optlattice convergence`.
#[derive(Debug, Args)]
pub struct ConvergenceArgs {
    #[command(flatten)]
    market: MarketArgs,

    /// Lattice arity (binomial or trinomial)
    #[arg(long, default_value = "binomial")]
    arity: LatticeArity,

    /// Option type (call or put)
    #[arg(long, default_value = "call")]
    option_type: OptionType,

    /// Largest step count of the default grid (defaults to the configured step count)
    #[arg(long, conflicts_with = "steps")]
    max_steps: Option<usize>,

    /// Explicit ascending step counts, e.g. 25,50,100
    #[arg(long, value_delimiter = ',')]
    steps: Option<Vec<usize>>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl ConvergenceArgs {
    fn grid(&self, settings: &Settings) -> ConvergenceGrid {
        match &self.steps {
            Some(steps) => ConvergenceGrid::Explicit(steps.clone()),
            None => ConvergenceGrid::Default {
                max_steps: self.max_steps.unwrap_or(settings.default_steps),
            },
        }
    }
}

/// Runs `optlattice convergence`.
pub fn run(args: &ConvergenceArgs, settings: &Settings) -> Result<()> {
    let market = args.market.market()?;
    let series =
        ConvergenceAnalyzer::analyze(&market, args.arity, args.option_type, &args.grid(settings))?;
    info!(
        arity = %series.arity,
        option_type = %series.option_type,
        points = series.len(),
        "convergence series computed"
    );

    match args.format {
        OutputFormat::Json => print_json(&series),
        OutputFormat::Csv => print_csv(&series.points),
        OutputFormat::Table => {
            series_table(&series).print();
            println!();
            println!("analytic benchmark: {}", num(series.benchmark));
            if let Some(order) = series.observed_order() {
                println!("observed order: {:.3}", order);
            }
            Ok(())
        }
    }
}

fn series_table(series: &ConvergenceSeries) -> Table {
    let mut table = Table::new(["steps", "price", "abs_error", "rel_error"]);
    for point in &series.points {
        table.row([
            point.steps.to_string(),
            num(point.price),
            format!("{:.3e}", point.absolute_error),
            format!("{:.3e}", point.relative_error),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ConvergenceArgs,
    }

    fn parse(argv: &[&str]) -> std::result::Result<ConvergenceArgs, clap::Error> {
        Harness::try_parse_from(std::iter::once("convergence").chain(argv.iter().copied()))
            .map(|h| h.args)
    }

    #[test]
    fn test_grid_selection() {
        let settings = Settings::default();
        let default = parse(&[]).unwrap();
        assert_eq!(
            default.grid(&settings),
            ConvergenceGrid::Default { max_steps: 250 }
        );

        let explicit = parse(&["--steps", "25,50,100", "--arity", "trinomial"]).unwrap();
        assert_eq!(explicit.arity, LatticeArity::Trinomial);
        assert_eq!(
            explicit.grid(&settings),
            ConvergenceGrid::Explicit(vec![25, 50, 100])
        );
    }

    #[test]
    fn test_max_steps_conflicts_with_steps() {
        assert!(parse(&["--steps", "10", "--max-steps", "20"]).is_err());
    }

    #[test]
    fn test_series_table_rows() {
        let args = parse(&["--steps", "10,20"]).unwrap();
        let market = args.market.market().unwrap();
        let series = ConvergenceAnalyzer::analyze(
            &market,
            args.arity,
            args.option_type,
            &args.grid(&Settings::default()),
        )
        .unwrap();
        let rendered = series_table(&series).render();
        assert_eq!(rendered.lines().count(), 4);
    }
}
