use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use vl_cashflows::CashFlowSchedule;
use vl_models::{IntegrationGrid, Lgm, ValuationSpreads};
use vl_termstructures::FlatCurve;

fn callable_bond() -> CashFlowSchedule {
    CashFlowSchedule::fixed_rate_bond(0.0, 10.0, 0.5, 100.0, 0.03, false)
        .expect("bond schedule should be valid")
}

fn bench_european(c: &mut Criterion) {
    let cf = callable_bond();
    let curve = FlatCurve::new(0.02).expect("curve should be valid");
    let lgm = Lgm::new(0.03).expect("model should be valid");
    let spreads = ValuationSpreads::default();

    c.bench_function("lgm_european_call", |b| {
        b.iter(|| {
            black_box(lgm.european_call(
                black_box(&cf),
                3.0,
                &curve,
                black_box(0.0003),
                &spreads,
                None,
            ))
        })
    });
}

fn bench_bermudan_dates(c: &mut Criterion) {
    let cf = callable_bond();
    let curve = FlatCurve::new(0.02).expect("curve should be valid");
    let spreads = ValuationSpreads::default();
    let mut group = c.benchmark_group("lgm_bermudan_call");

    for dates in [1usize, 4, 18] {
        let times: Vec<f64> = (0..dates).map(|i| 1.0 + 0.5 * i as f64).collect();
        let mut lgm = Lgm::new(0.03).expect("model should be valid");
        lgm.set_times_and_constant_volatility(&times, 0.007)
            .expect("grid should be valid");
        group.bench_with_input(BenchmarkId::from_parameter(dates), &dates, |b, _| {
            b.iter(|| {
                lgm.bermudan_call(black_box(&cf), lgm.t_ex(), &curve, lgm.xi(), &spreads)
                    .expect("valuation should succeed")
            })
        });
    }
    group.finish();
}

fn bench_bermudan_resolution(c: &mut Criterion) {
    let cf = callable_bond();
    let curve = FlatCurve::new(0.02).expect("curve should be valid");
    let spreads = ValuationSpreads::default();
    let times: Vec<f64> = (0..8).map(|i| 1.0 + i as f64).collect();
    let mut group = c.benchmark_group("lgm_bermudan_resolution");

    for resolution in [6usize, 12, 24] {
        let grid = IntegrationGrid::new(6, resolution).expect("grid should be valid");
        let mut lgm = Lgm::new(0.03)
            .expect("model should be valid")
            .with_integration_grid(grid);
        lgm.set_times_and_constant_volatility(&times, 0.007)
            .expect("grid should be valid");
        group.bench_with_input(BenchmarkId::from_parameter(resolution), &resolution, |b, _| {
            b.iter(|| {
                lgm.bermudan_call(black_box(&cf), lgm.t_ex(), &curve, lgm.xi(), &spreads)
                    .expect("valuation should succeed")
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_european,
    bench_bermudan_dates,
    bench_bermudan_resolution
);
criterion_main!(benches);
