//! Benchmarks for density clustering, culling and trail construction.
//!
//! Run with: `cargo bench --features synthetic`
//!
//! Sessions come from the seeded synthetic generator, so runs are comparable.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dwellmap::synthetic::SyntheticSession;
use dwellmap::{
    BoundingVolume, ClusterAnalyzer, CullConfig, Point3, PointSource, ScanStrategy, TrailBuilder,
    cull,
};

fn bench_cluster_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_analysis");
    group.sample_size(20);

    for &count in &[250usize, 1_000, 4_000] {
        let dataset = SyntheticSession::with_samples(count).generate();
        let points = dataset.records.points(PointSource::Gaze).unwrap();

        for strategy in [ScanStrategy::Pairwise, ScanStrategy::RTree] {
            let analyzer = ClusterAnalyzer::new(0.05, 5).with_strategy(strategy);
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", strategy), count),
                &points,
                |b, points| b.iter(|| analyzer.analyze_points(black_box(points))),
            );
        }
    }

    group.finish();
}

fn bench_cull(c: &mut Criterion) {
    let dataset = SyntheticSession::with_samples(10_000).generate();
    let config = CullConfig {
        by_range: true,
        from: 1_000,
        to: 9_000,
        by_volume: true,
        volume: Some(BoundingVolume::new(
            Point3::new(-2.5, 0.0, -2.5),
            Point3::new(2.5, 2.5, 2.5),
        )),
    };

    c.bench_function("cull_range_then_volume_10k", |b| {
        b.iter(|| cull(black_box(&dataset.records), &config, PointSource::Gaze).unwrap())
    });
}

fn bench_trail(c: &mut Criterion) {
    let dataset = SyntheticSession::with_samples(10_000).generate();
    let points = dataset.records.points(PointSource::Gaze).unwrap();
    let builder = TrailBuilder::new(true, 1.0);

    c.bench_function("trail_close_only_10k", |b| {
        b.iter(|| builder.build_points(black_box(&points)))
    });
}

criterion_group!(benches, bench_cluster_strategies, bench_cull, bench_trail);
criterion_main!(benches);
