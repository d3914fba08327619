//! Run these benches with `cargo bench --bench overturn -- --verbose`
use criterion::{criterion_group, criterion_main, Criterion};
use thorpe_transect::{eps_overturn, normalize_cast, MabAxis, OverturnParams};

mod utils;

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(200)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(overturn_benches);

criterion_group!(
    name = overturn_benches;
    config = build_tester();
    targets = eps_overturn_bench, normalize_cast_bench
);

fn eps_overturn_bench(c: &mut Criterion) {
    let casts = utils::make_transect_casts();
    let params = OverturnParams::default();

    c.bench_function("eps_overturn", |b| {
        b.iter(|| {
            for cast in &casts {
                let _x = eps_overturn(cast, &params);
            }
        });
    });
}

fn normalize_cast_bench(c: &mut Criterion) {
    let casts = utils::make_transect_casts();
    let params = OverturnParams::default();
    let axis = MabAxis::new(5000);
    let diagnostics: Vec<_> = casts
        .iter()
        .map(|cast| eps_overturn(cast, &params).unwrap())
        .collect();

    c.bench_function("normalize_cast", |b| {
        b.iter(|| {
            for (cast, diag) in casts.iter().zip(&diagnostics) {
                let _x = normalize_cast(cast, diag, &axis);
            }
        });
    });
}
