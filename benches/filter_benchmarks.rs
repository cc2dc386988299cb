//! Kalman filter benchmarks using Criterion.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::DVector;

use kalman_filter_rs::{constant_velocity, KalmanFilter};

/// Create a constant-velocity filter and a matching measurement.
fn create_filter(n_dims: usize) -> (KalmanFilter, DVector<f64>) {
    let kf = constant_velocity(n_dims, 0.1, 0.1, 1.0).expect("valid filter");
    let z = DVector::from_fn(n_dims, |i, _| i as f64);
    (kf, z)
}

fn benchmark_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");
    for n_dims in [1, 3, 8, 32] {
        let (mut kf, _) = create_filter(n_dims);
        group.bench_with_input(BenchmarkId::from_parameter(n_dims * 2), &n_dims, |b, _| {
            b.iter(|| kf.predict())
        });
    }
    group.finish();
}

fn benchmark_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    for n_dims in [1, 3, 8, 32] {
        let (mut kf, z) = create_filter(n_dims);
        group.bench_with_input(BenchmarkId::from_parameter(n_dims * 2), &z, |b, z| {
            b.iter(|| kf.update(black_box(z)).expect("non-singular"))
        });
    }
    group.finish();
}

/// One tracking cycle of the 6-state / 3-measurement model.
fn benchmark_predict_update_cycle_3d(c: &mut Criterion) {
    let (mut kf, z) = create_filter(3);

    c.bench_function("predict_update_cycle_3d", |b| {
        b.iter(|| {
            kf.predict();
            kf.update(black_box(&z)).expect("non-singular");
        })
    });
}

criterion_group!(
    benches,
    benchmark_predict,
    benchmark_update,
    benchmark_predict_update_cycle_3d,
);
criterion_main!(benches);
