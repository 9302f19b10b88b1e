//! Criterion benchmarks for the validation battery and aggregate pricing.
//!
//! Benchmarks cover:
//! - The full validation battery at increasing reference step counts
//! - Aggregate pricing of a mixed request set (prices, Greeks, boundary, convergence)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::market_data::MarketParams;
use pricer_models::instruments::{ExerciseStyle, OptionType};
use pricer_models::models::{ConvergenceGrid, ModelConfig, PricingRequest};
use pricer_risk::aggregate::OptionPricer;
use pricer_risk::validation::ValidationSuite;

fn market() -> MarketParams {
    MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap()
}

/// Benchmark the validation battery.
fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    let market = market();
    let suite = ValidationSuite::default();

    for steps in [100, 250, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, &steps| {
            b.iter(|| suite.run(black_box(&market), steps).unwrap());
        });
    }

    group.finish();
}

/// Benchmark aggregate pricing of every model/exercise/type combination.
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    group.sample_size(20);
    let market = market();
    let pricer = OptionPricer::default();

    for steps in [100, 250] {
        let mut requests: Vec<PricingRequest> = OptionType::ALL
            .iter()
            .map(|&t| PricingRequest::new(ModelConfig::analytic(t)).with_greeks())
            .collect();
        for option_type in OptionType::ALL {
            requests.push(
                PricingRequest::new(ModelConfig::binomial(
                    steps,
                    ExerciseStyle::European,
                    option_type,
                ))
                .with_convergence(ConvergenceGrid::Explicit(vec![25, 50, 100, 200])),
            );
            requests.push(
                PricingRequest::new(ModelConfig::trinomial(
                    steps,
                    ExerciseStyle::American,
                    option_type,
                ))
                .with_greeks()
                .with_boundary(),
            );
        }

        group.bench_with_input(
            BenchmarkId::new("mixed_requests", steps),
            &requests,
            |b, requests| {
                b.iter(|| pricer.price(black_box(&market), requests));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_validation, bench_aggregate);
criterion_main!(benches);
