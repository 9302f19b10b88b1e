//! Criterion benchmarks for the lattice engine.
//!
//! Measures backward induction in both retention modes across step counts, and
//! the cost of bump-and-reprice Greeks relative to a single price.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::market_data::MarketParams;
use pricer_models::instruments::{ExerciseStyle, OptionType};
use pricer_models::models::{LatticeArity, ModelConfig};
use pricer_pricing::greeks::GreeksEstimator;
use pricer_pricing::lattice::{LatticeEngine, RetentionMode};

fn market() -> MarketParams {
    MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap()
}

/// Benchmark root-price valuation (two rolling levels).
fn bench_price_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("price_only");
    let market = market();

    for arity in LatticeArity::ALL {
        for steps in [100, 500, 2000] {
            let engine = LatticeEngine::new(&market, steps, arity).unwrap();
            group.bench_with_input(
                BenchmarkId::new(arity.name(), steps),
                &engine,
                |b, engine| {
                    b.iter(|| {
                        engine
                            .price(black_box(OptionType::Put), ExerciseStyle::American)
                            .unwrap()
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark full-lattice retention (every level kept).
fn bench_full_lattice(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_lattice");
    let market = market();

    for arity in LatticeArity::ALL {
        for steps in [100, 500] {
            let engine = LatticeEngine::new(&market, steps, arity).unwrap();
            group.bench_with_input(
                BenchmarkId::new(arity.name(), steps),
                &engine,
                |b, engine| {
                    b.iter(|| {
                        engine
                            .value(black_box(OptionType::Put), RetentionMode::FullLattice)
                            .unwrap()
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark bump-and-reprice Greeks (eight reprices on the rayon pool).
fn bench_lattice_greeks(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice_greeks");
    let market = market();
    let estimator = GreeksEstimator::default();

    for steps in [100, 500] {
        let model = ModelConfig::binomial(steps, ExerciseStyle::American, OptionType::Put);
        group.bench_with_input(BenchmarkId::from_parameter(steps), &model, |b, model| {
            b.iter(|| estimator.estimate(black_box(&market), model).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_price_only,
    bench_full_lattice,
    bench_lattice_greeks
);
criterion_main!(benches);
