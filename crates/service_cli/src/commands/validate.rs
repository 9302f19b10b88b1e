//! Validate command implementation.

use clap::Args;
use pricer_risk::validation::{ValidationReport, ValidationSuite};
use tracing::{info, warn};

use super::MarketArgs;
use crate::config::Settings;
use crate::output::{print_json, OutputFormat, Table};
use crate::{CliError, Result};

/// Arguments of `optlattice validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    market: MarketArgs,

    /// Reference lattice steps (defaults to the configured reference steps)
    #[arg(long)]
    steps: Option<usize>,

    /// Output format (table or json)
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

/// Runs `optlattice validate`.
pub fn run(args: &ValidateArgs, settings: &Settings) -> Result<()> {
    if args.format == OutputFormat::Csv {
        return Err(CliError::InvalidArgument(
            "validate supports table and json output".to_string(),
        ));
    }
    let market = args.market.market()?;
    let steps = args.steps.unwrap_or(settings.validation.reference_steps);

    let report = ValidationSuite::new(settings.validation)?.run(&market, steps)?;
    if report.overall_passed {
        info!(checks = report.total_tests, "all validation checks passed");
    } else {
        warn!(
            failed = report.total_tests - report.passed_tests,
            "validation checks failed"
        );
    }

    match args.format {
        OutputFormat::Json => print_json(&report),
        _ => {
            report_table(&report).print();
            println!();
            println!(
                "{}: {}/{} checks passed (reference N={}, convergence N={})",
                if report.overall_passed { "PASS" } else { "FAIL" },
                report.passed_tests,
                report.total_tests,
                report.reference_steps,
                report.convergence_steps
            );
            Ok(())
        }
    }
}

fn report_table(report: &ValidationReport) -> Table {
    let mut table = Table::new(["family", "check", "measured", "threshold", "result"]);
    for category in &report.categories {
        for test in &category.tests {
            table.row([
                category.family.name().to_string(),
                test.name.clone(),
                format!("{:.3e}", test.measured),
                format!("{} {:.3e}", test.comparison, test.threshold),
                if test.passed { "ok" } else { "FAIL" }.to_string(),
            ]);
        }
    }
    table
}
