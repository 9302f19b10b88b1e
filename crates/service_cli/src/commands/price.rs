//! Price command implementation.

use clap::{Args, ValueEnum};
use pricer_models::instruments::{ExerciseStyle, OptionType};
use pricer_models::models::{LatticeArity, ModelConfig, PricingRequest};
use pricer_risk::aggregate::{AggregateResult, OptionPricer};
use tracing::{debug, info, warn};

use super::MarketArgs;
use crate::config::Settings;
use crate::output::{num, print_json, GreeksDisplay, OutputFormat, Table};
use crate::{CliError, Result};

/// Pricing model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    /// Closed-form Black-Scholes-Merton (European only)
    Analytic,
    /// Cox-Ross-Rubinstein binomial lattice
    Binomial,
    /// Boyle trinomial lattice
    Trinomial,
}

impl ModelKind {
    fn arity(self) -> Option<LatticeArity> {
        match self {
            ModelKind::Analytic => None,
            ModelKind::Binomial => Some(LatticeArity::Binomial),
            ModelKind::Trinomial => Some(LatticeArity::Trinomial),
        }
    }
}

/// Arguments of `optlattice price`.
#[derive(Debug, Args)]
pub struct PriceArgs {
    #[command(flatten)]
    market: MarketArgs,

    /// Models to price
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values = ["analytic", "binomial", "trinomial"]
    )]
    models: Vec<ModelKind>,

    /// Exercise styles
    #[arg(long, value_delimiter = ',', default_values = ["european", "american"])]
    exercise: Vec<ExerciseStyle>,

    /// Option types
    #[arg(long = "option-types", value_delimiter = ',', default_values = ["call", "put"])]
    option_types: Vec<OptionType>,

    /// Lattice steps (defaults to the configured step count)
    #[arg(long)]
    steps: Option<usize>,

    /// Also compute delta, gamma, theta, vega and rho
    #[arg(long)]
    greeks: bool,

    /// Report theta per calendar day
    #[arg(long)]
    per_day_theta: bool,

    /// Report vega and rho per 1% move
    #[arg(long)]
    percent_vega_rho: bool,

    /// Output format (table or json)
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl PriceArgs {
    /// Expands the model/exercise/type selection into requests.
    ///
    /// The analytic model is European only; American selections are skipped for it.
    fn requests(&self, steps: usize) -> Vec<PricingRequest> {
        let mut requests = Vec::new();
        for &model in &self.models {
            for &option_type in &self.option_types {
                match model.arity() {
                    None => {
                        if !self.exercise.iter().any(ExerciseStyle::is_european) {
                            debug!(%option_type, "analytic model skipped: no european exercise selected");
                            continue;
                        }
                        requests.push(self.with_outputs(ModelConfig::analytic(option_type)));
                    }
                    Some(arity) => {
                        for &exercise in &self.exercise {
                            requests.push(self.with_outputs(ModelConfig::lattice(
                                arity,
                                steps,
                                exercise,
                                option_type,
                            )));
                        }
                    }
                }
            }
        }
        requests
    }

    fn with_outputs(&self, model: ModelConfig) -> PricingRequest {
        let request = PricingRequest::new(model);
        if self.greeks {
            request.with_greeks()
        } else {
            request
        }
    }

    fn display(&self) -> GreeksDisplay {
        GreeksDisplay {
            per_day_theta: self.per_day_theta,
            percent_vega_rho: self.percent_vega_rho,
        }
    }
}

/// Runs `optlattice price`.
pub fn run(args: &PriceArgs, settings: &Settings) -> Result<()> {
    if args.format == OutputFormat::Csv {
        return Err(CliError::InvalidArgument(
            "price supports table and json output".to_string(),
        ));
    }
    let market = args.market.market()?;
    let steps = args.steps.unwrap_or(settings.default_steps);
    let requests = args.requests(steps);
    if requests.is_empty() {
        return Err(CliError::InvalidArgument(
            "selection produced no pricing requests".to_string(),
        ));
    }

    info!(requests = requests.len(), steps, "pricing");
    let pricer = OptionPricer::new(&settings.aggregate())?;
    let mut result = pricer.price(&market, &requests);
    scale_greeks(&mut result, args.display());

    for (label, error) in result.failed() {
        warn!(%label, %error, "request failed");
    }

    match args.format {
        OutputFormat::Json => print_json(&result),
        _ => {
            render_table(&result, args.greeks);
            Ok(())
        }
    }
}

fn scale_greeks(result: &mut AggregateResult, display: GreeksDisplay) {
    for outcome in &mut result.outcomes {
        if let Ok(priced) = &mut outcome.result {
            if let Some(greeks) = &mut priced.greeks {
                greeks.greeks = display.apply(greeks.greeks);
            }
        }
    }
}

fn render_table(result: &AggregateResult, with_greeks: bool) {
    let mut header = vec!["request", "price", "premium"];
    if with_greeks {
        header.extend(["delta", "gamma", "theta", "vega", "rho"]);
    }
    let mut table = Table::new(header);

    for outcome in &result.outcomes {
        let mut row = vec![outcome.label.clone()];
        match &outcome.result {
            Ok(priced) => {
                row.push(num(priced.price));
                row.push(priced.early_exercise_premium.map(num).unwrap_or_default());
                if let Some(g) = priced.greeks.map(|r| r.greeks) {
                    row.extend([g.delta, g.gamma, g.theta, g.vega, g.rho].map(num));
                }
            }
            Err(error) => {
                row.push(format!("error: {}", error));
            }
        }
        table.row(row);
    }
    table.print();

    match &result.validation {
        Ok(report) => {
            println!();
            println!(
                "validation at N={}: {}/{} checks passed",
                report.reference_steps, report.passed_tests, report.total_tests
            );
            for (family, test) in report.failures() {
                println!(
                    "  FAILED {}: {} (measured {:e}, threshold {:e})",
                    family, test.name, test.measured, test.threshold
                );
            }
        }
        Err(error) => {
            println!();
            println!("validation failed to run: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: PriceArgs,
    }

    fn parse(argv: &[&str]) -> PriceArgs {
        Harness::parse_from(std::iter::once("price").chain(argv.iter().copied())).args
    }

    #[test]
    fn test_default_selection_expands_to_ten_requests() {
        let args = parse(&[]);
        let requests = args.requests(100);
        assert_eq!(requests.len(), 10);
        assert_eq!(
            requests
                .iter()
                .filter(|r| r.model.arity().is_none())
                .count(),
            2
        );
        assert!(requests.iter().all(|r| !r.outputs.greeks));
    }

    #[test]
    fn test_american_only_skips_analytic() {
        let args = parse(&["--exercise", "american", "--option-types", "put", "--greeks"]);
        let requests = args.requests(50);
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.outputs.greeks));
        assert!(requests
            .iter()
            .all(|r| r.model.exercise() == ExerciseStyle::American));
    }

    #[test]
    fn test_market_arguments() {
        let args = parse(&["--spot", "90", "--rate=-0.01", "--dividend-yield", "0.02"]);
        let market = args.market.market().unwrap();
        assert_eq!(market.spot(), 90.0);
        assert_eq!(market.rate(), -0.01);
        assert_eq!(market.dividend_yield(), 0.02);
    }

    #[test]
    fn test_invalid_market_rejected() {
        let args = parse(&["--volatility", "0"]);
        assert!(args.market.market().is_err());
    }
}
