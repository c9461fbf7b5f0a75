//! Benchmarks for field queries and basis transforms
//!
//! Run with: cargo bench -p antpat-core --bench field_bench

use antpat_core::basis::tangential_to_cartesian;
use antpat_core::jones::{DualPolarizedField, JonesMatrix};
use antpat_core::prelude::*;
use antpat_core::rotation::reexpress;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array3;

fn make_field(n_theta: usize, n_phi: usize, n_freq: usize) -> TangentialField {
    let grid = SphericalGrid::full_sphere(n_theta, n_phi).unwrap();
    let (m, n) = grid.dim();
    let f_th = Array3::from_shape_fn((n_freq, m, n), |(r, i, j)| {
        Complex::new((i as f64 * 0.1).cos() + r as f64, (j as f64 * 0.2).sin())
    });
    let f_ph = f_th.mapv(|z| z * Complex::new(0.0, 1.0));
    let freqs: Vec<f64> = (0..n_freq).map(|k| 1.0e8 + 1.0e6 * k as f64).collect();
    TangentialField::with_radial_axis(grid, freqs, f_th, f_ph, BasisType::Polar).unwrap()
}

fn query_points(n: usize) -> (Vec<f64>, Vec<f64>) {
    let thetas = (0..n).map(|k| (k as f64 * 0.618).rem_euclid(3.1)).collect();
    let phis = (0..n).map(|k| k as f64 * 0.731 - 10.0).collect();
    (thetas, phis)
}

// ============================================================================
// Interpolation
// ============================================================================

fn bench_value_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_at");
    let field = make_field(91, 180, 3);

    for n in [100usize, 1_000, 10_000].iter() {
        let (thetas, phis) = query_points(*n);
        group.throughput(Throughput::Elements(*n as u64 * 3));
        group.bench_with_input(BenchmarkId::new("all_freqs", n), n, |b, _| {
            b.iter(|| field.value_at(black_box(&thetas), black_box(&phis), None).unwrap())
        });
    }

    group.finish();
}

#[cfg(feature = "parallel")]
fn bench_value_at_parallel(c: &mut Criterion) {
    use antpat_core::parallel::ParallelEvaluator;

    let mut group = c.benchmark_group("value_at_parallel");
    let field = make_field(91, 180, 3);
    let evaluator = ParallelEvaluator::new(2048);
    let (thetas, phis) = query_points(50_000);
    group.throughput(Throughput::Elements(50_000 * 3));
    group.bench_function("chunked", |b| {
        b.iter(|| evaluator.value_at(&field, black_box(&thetas), black_box(&phis), None).unwrap())
    });
    group.finish();
}

#[cfg(not(feature = "parallel"))]
fn bench_value_at_parallel(_c: &mut Criterion) {}

// ============================================================================
// Basis transforms
// ============================================================================

fn bench_reexpress(c: &mut Criterion) {
    let mut group = c.benchmark_group("reexpress");
    let rotation = Mat3::from_euler_zyx(0.3, 0.2, -0.1);

    for n in [1_000usize, 10_000].iter() {
        let (thetas, phis) = query_points(*n);
        let thetas: Vec<f64> = thetas.iter().map(|t| t.clamp(0.01, 3.13)).collect();
        let f_th = vec![Complex::new(1.0, 0.5); *n];
        let f_ph = vec![Complex::new(-0.2, 1.0); *n];
        group.throughput(Throughput::Elements(*n as u64));
        group.bench_with_input(BenchmarkId::new("points", n), n, |b, _| {
            b.iter(|| reexpress(&rotation, black_box(&thetas), &phis, &f_th, &f_ph).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("to_cartesian", n), n, |b, _| {
            b.iter(|| tangential_to_cartesian(black_box(&thetas), &phis, &f_th, &f_ph).unwrap())
        });
    }

    group.finish();
}

fn bench_canonicalize(c: &mut Criterion) {
    let field = make_field(91, 360, 4);
    c.bench_function("rotate90z", |b| {
        b.iter_batched(
            || field.clone(),
            |mut f| {
                f.rotate90z(Sense::Positive);
                f
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

// ============================================================================
// Dual polarization
// ============================================================================

fn bench_jones(c: &mut Criterion) {
    let mut group = c.benchmark_group("jones");
    let p = make_field(46, 90, 1);
    let q = p.clone();
    let dual = DualPolarizedField::new(p, q).unwrap();
    let grid = SphericalGrid::zenith_hemisphere(46, 90).unwrap();
    let thetas: Vec<f64> = grid.theta().iter().copied().collect();
    let phis: Vec<f64> = grid.phi().iter().copied().collect();

    group.throughput(Throughput::Elements(thetas.len() as u64));
    group.bench_function("gain_and_ixr_hemisphere", |b| {
        b.iter(|| dual.gain_and_ixr_at(black_box(&thetas), &phis, None).unwrap())
    });

    let m = JonesMatrix([
        [Complex::new(1.0, 0.1), Complex::new(0.05, 0.0)],
        [Complex::new(0.02, -0.01), Complex::new(0.9, 0.2)],
    ]);
    group.bench_function("single_svd", |b| b.iter(|| gain_and_ixr(black_box(&m))));

    group.finish();
}

criterion_group!(
    benches,
    bench_value_at,
    bench_value_at_parallel,
    bench_reexpress,
    bench_canonicalize,
    bench_jones,
);
criterion_main!(benches);
