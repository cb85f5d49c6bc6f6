//! Criterion benchmarks for the autocall engine.
//!
//! Benchmarks cover:
//! - Correlated shock generation (1, 3 and 5 assets)
//! - Daily path simulation over one year
//! - Payoff evaluation per basket strategy

use autocall_core::market_data::curves::FlatCurve;
use autocall_core::types::time::Date;
use autocall_models::correlation::CorrelationMatrix;
use autocall_models::instruments::{AutocallTerms, BasketStrategy};
use autocall_models::underlying::Underlying;
use autocall_pricing::config::SimulationConfig;
use autocall_pricing::mc::{CorrelatedShocks, MonteCarloSimulation};
use autocall_pricing::payoff::Autocall;
use autocall_pricing::rng::PricerRng;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn equicorrelated(n: usize, rho: f64) -> CorrelationMatrix<f64> {
    let data: Vec<f64> = (0..n * n)
        .map(|k| if k / n == k % n { 1.0 } else { rho })
        .collect();
    CorrelationMatrix::new(&data, n).unwrap()
}

fn basket(n: usize) -> Vec<Underlying> {
    (0..n)
        .map(|i| Underlying::flat(format!("U{i}"), 100.0 + i as f64, 0.01, 0.2, 0.03).unwrap())
        .collect()
}

fn config(n_sims: usize) -> SimulationConfig {
    SimulationConfig::builder()
        .start_date(Date::from_ymd(2024, 1, 2).unwrap())
        .end_date(Date::from_ymd(2025, 1, 2).unwrap())
        .n_simulations(n_sims)
        .seed(42)
        .build()
        .unwrap()
}

fn terms() -> AutocallTerms {
    AutocallTerms::builder()
        .coupon_rate(0.02)
        .coupon_barrier(1.0)
        .autocall_barrier(1.1)
        .put_barrier(0.7)
        .build()
        .unwrap()
}

/// Benchmark shock generation by basket size.
fn bench_shocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlated_shocks");

    for n_assets in [1, 3, 5] {
        let corr = equicorrelated(n_assets, 0.5);
        group.bench_with_input(BenchmarkId::new("one_year", n_assets), &corr, |b, corr| {
            b.iter(|| {
                let mut rng = PricerRng::from_seed(42);
                CorrelatedShocks::generate(black_box(corr), 366, 1_000, 1.0 / 360.0, &mut rng)
            });
        });
    }

    group.finish();
}

/// Benchmark full path simulation with varying simulation counts.
fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_simulation");
    group.sample_size(20);

    let assets = basket(3);
    let corr = equicorrelated(3, 0.5);
    for n_sims in [1_000, 10_000] {
        let cfg = config(n_sims);
        group.bench_with_input(BenchmarkId::new("three_assets", n_sims), &cfg, |b, cfg| {
            b.iter(|| MonteCarloSimulation::run(black_box(&assets), &corr, cfg).unwrap());
        });
    }

    group.finish();
}

/// Benchmark payoff evaluation on a fixed simulation.
fn bench_payoff(c: &mut Criterion) {
    let mut group = c.benchmark_group("payoff");

    let assets = basket(3);
    let corr = equicorrelated(3, 0.5);
    let cfg = config(10_000);
    let sim = MonteCarloSimulation::run(&assets, &corr, &cfg).unwrap();
    let curve = FlatCurve::new(0.03);

    for strategy in [BasketStrategy::Mono, BasketStrategy::WorstOf, BasketStrategy::BestOf] {
        group.bench_with_input(
            BenchmarkId::new("evaluate", strategy.name()),
            &strategy,
            |b, &strategy| {
                b.iter(|| {
                    Autocall::new(&sim, strategy, terms(), &curve)
                        .unwrap()
                        .average_price()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_shocks, bench_simulation, bench_payoff);
criterion_main!(benches);
