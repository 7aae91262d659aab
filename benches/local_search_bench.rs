//! Criterion benchmarks for the local search engine and the drivers.
//!
//! Uses random Euclidean instances so that the neighbourhood variants can
//! be compared on the same starting paths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_selective_tsp::construction::random_path;
use u_selective_tsp::ils::{IlsConfig, IlsRunner};
use u_selective_tsp::lns::{LnsConfig, LnsRunner};
use u_selective_tsp::local_search::{LocalSearch, LocalSearchConfig, NeighborhoodKind};
use u_selective_tsp::vns::{VnsConfig, VnsRunner};
use u_selective_tsp::Instance;

fn euclidean_instance(n: usize, seed: u64) -> Instance {
    let mut rng = StdRng::seed_from_u64(seed);
    let points: Vec<(i64, i64)> = (0..n)
        .map(|_| (rng.random_range(0..4000), rng.random_range(0..2000)))
        .collect();
    let costs = (0..n).map(|_| rng.random_range(0..2000)).collect();
    Instance::from_coordinates(&points, costs).expect("valid instance")
}

// ===========================================================================
// Steepest descent from a random path, per neighbourhood
// ===========================================================================

fn bench_steepest_neighborhoods(c: &mut Criterion) {
    let mut group = c.benchmark_group("steepest_descent");
    group.sample_size(10);

    for &n in &[100, 200] {
        let instance = euclidean_instance(n, 42);
        let start = random_path(&instance, &mut StdRng::seed_from_u64(7));
        for kind in [
            NeighborhoodKind::Full,
            NeighborhoodKind::Candidates,
            NeighborhoodKind::CachedCandidates,
        ] {
            let config = LocalSearchConfig::default().with_neighborhood(kind);
            let search = LocalSearch::new(&instance, config).expect("valid config");
            group.bench_with_input(
                BenchmarkId::new(format!("{kind:?}"), n),
                &start,
                |b, path| {
                    b.iter(|| {
                        let mut rng = StdRng::seed_from_u64(1);
                        let result = search.optimize(black_box(path.clone()), &mut rng);
                        black_box(result)
                    })
                },
            );
        }
    }
    group.finish();
}

// ===========================================================================
// Short driver runs
// ===========================================================================

fn bench_drivers(c: &mut Criterion) {
    let mut group = c.benchmark_group("drivers");
    group.sample_size(10);
    let instance = euclidean_instance(100, 3);

    let ils = IlsConfig::default().with_max_iterations(50).with_seed(42);
    group.bench_function("ils_50", |b| {
        b.iter(|| black_box(IlsRunner::run(black_box(&instance), &ils)))
    });

    let vns = VnsConfig::default().with_max_iterations(20).with_seed(42);
    group.bench_function("vns_20", |b| {
        b.iter(|| black_box(VnsRunner::run(black_box(&instance), &vns)))
    });

    let lns = LnsConfig::default().with_max_iterations(50).with_seed(42);
    group.bench_function("lns_50", |b| {
        b.iter(|| black_box(LnsRunner::run(black_box(&instance), &lns)))
    });

    group.finish();
}

criterion_group!(benches, bench_steepest_neighborhoods, bench_drivers);
criterion_main!(benches);
