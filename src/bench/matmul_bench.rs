use cachemul::{
    LoopOrder, Matrix, matmul_blocked, multiply_blocked_parallel, multiply_rows_parallel,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

const SIZES: [usize; 3] = [64, 128, 256];
const WORKERS: usize = 4;
const BLOCK: usize = 32;

fn inputs(n: usize) -> (Matrix, Matrix) {
    let mut rng = StdRng::seed_from_u64(n as u64);
    (
        Matrix::random_with(n, n, 1000, &mut rng),
        Matrix::random_with(n, n, 1000, &mut rng),
    )
}

pub fn loop_order_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Loop order");

    for n in SIZES {
        let (a, b) = inputs(n);
        for order in LoopOrder::ALL {
            group.bench_with_input(BenchmarkId::new(order.name(), n), &n, |bench, &n| {
                bench.iter(|| {
                    let mut out = Matrix::zeros(n, n);
                    order.run(black_box(&a), black_box(&b), &mut out);
                    out
                })
            });
        }
        group.bench_with_input(BenchmarkId::new("blocked", n), &n, |bench, &n| {
            bench.iter(|| {
                let mut out = Matrix::zeros(n, n);
                matmul_blocked(black_box(&a), black_box(&b), &mut out, BLOCK);
                out
            })
        });
    }
    group.finish();
}

pub fn parallel_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parallel");

    for n in SIZES {
        let (a, b) = inputs(n);
        group.bench_with_input(BenchmarkId::new("rows i-k-j", n), &n, |bench, &n| {
            bench.iter(|| {
                let mut out = Matrix::zeros(n, n);
                multiply_rows_parallel(
                    black_box(&a),
                    black_box(&b),
                    &mut out,
                    LoopOrder::Ikj,
                    WORKERS,
                );
                out
            })
        });
        group.bench_with_input(BenchmarkId::new("blocked", n), &n, |bench, &n| {
            bench.iter(|| {
                let mut out = Matrix::zeros(n, n);
                multiply_blocked_parallel(black_box(&a), black_box(&b), &mut out, WORKERS, BLOCK);
                out
            })
        });
    }
    group.finish();
}

criterion_group!(benches, loop_order_benchmark, parallel_benchmark);
criterion_main!(benches);
