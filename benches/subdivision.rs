//! Benchmarks for the subdivision solver

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rootr::algorithm::fft::fftn_real;
use rootr::prelude::*;
use rootr::subdivision::transform::interval_approximate_nd;

// ---------------------------------------------------------------------------
// Chebyshev transform
// ---------------------------------------------------------------------------

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("chebyshev_transform");
    let f = |p: &[f64]| (3.0 * p[0]).sin() * (2.0 * p[1]).cos() - 0.1;
    let interval = Interval::unit(2);

    for deg in [5usize, 10, 20, 40] {
        group.bench_with_input(BenchmarkId::new("2d", deg), &deg, |b, &deg| {
            b.iter(|| black_box(interval_approximate_nd(&f, &interval, &[deg, deg], true).unwrap()))
        });
    }

    for n in [16usize, 64, 256] {
        let data: Vec<f64> = (0..n * n).map(|i| (i as f64 * 0.37).sin()).collect();
        group.bench_with_input(BenchmarkId::new("fftn_real", n), &data, |b, data| {
            b.iter(|| black_box(fftn_real(data, &[n, n])))
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Full solves
// ---------------------------------------------------------------------------

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");

    group.bench_function("1d_oscillating", |b| {
        let f = |x: &[f64]| (40.0 * x[0]).sin() + 0.3 * x[0];
        b.iter(|| black_box(solve_1d(&f, -1.0, 1.0).unwrap()))
    });

    group.bench_function("2d_circle_line", |b| {
        let f = |p: &[f64]| p[0] * p[0] + p[1] * p[1] - 1.0;
        let g = |p: &[f64]| p[1];
        b.iter(|| black_box(solve(&[&f, &g], &[-1.0, -1.0], &[1.0, 1.0]).unwrap()))
    });

    group.bench_function("2d_transcendental", |b| {
        let f = |p: &[f64]| (5.0 * p[0]).sin() - p[1];
        let g = |p: &[f64]| p[0] * p[0] + p[1] * p[1] - 0.5;
        b.iter(|| black_box(solve(&[&f, &g], &[-1.0, -1.0], &[1.0, 1.0]).unwrap()))
    });

    group.bench_function("3d_quadrics", |b| {
        let f = |p: &[f64]| p[0] * p[0] + p[1] * p[1] + p[2] * p[2] - 0.8;
        let g = |p: &[f64]| p[0] - p[1] * p[2];
        let h = |p: &[f64]| p[2] - 0.2;
        let solver = SubdivisionSolver::default();
        b.iter(|| {
            black_box(
                solver
                    .solve(&[&f, &g, &h], &[-1.0, -1.0, -1.0], &[1.0, 1.0, 1.0])
                    .unwrap(),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_transform, bench_solve);
criterion_main!(benches);
