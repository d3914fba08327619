//! Run these benches with `cargo bench --bench binning -- --verbose`
use criterion::{criterion_group, criterion_main, Criterion};
use thorpe_transect::{
    bin_table, fill_background, process, LongitudeBins, TransectConfig, Variable,
};

mod utils;

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(100)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(binning_benches);

criterion_group!(
    name = binning_benches;
    config = build_tester();
    targets = fill_and_bin_bench, process_bench
);

fn fill_and_bin_bench(c: &mut Criterion) {
    let cfg = TransectConfig::default();
    let processed = process(&utils::make_transect_casts(), &cfg).unwrap();
    let transect = &processed.transect;
    let bins = LongitudeBins::fixed(cfg.bins.start, cfg.bins.stop, cfg.bins.width).unwrap();

    c.bench_function("fill_and_bin", |b| {
        b.iter(|| {
            let filled = fill_background(
                transect.table(Variable::Dissipation),
                transect.table(Variable::NeutralDensity),
                cfg.background_dissipation,
            )
            .unwrap();
            let _x = bin_table(&filled, &bins);
        });
    });
}

fn process_bench(c: &mut Criterion) {
    let cfg = TransectConfig::default();
    let casts = utils::make_transect_casts();

    c.bench_function("process", |b| {
        b.iter(|| {
            let _x = process(&casts, &cfg);
        });
    });
}
