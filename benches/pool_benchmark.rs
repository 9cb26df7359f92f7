use bytepool_graph::pool::PoolAllocator;
use bytepool_graph::token::GhostToken;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_pool_alloc_free(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_alloc_free");

    group.bench_function("pool_allocator_alloc_free", |b| {
        b.iter(|| {
            GhostToken::new(|mut token| {
                let pool: PoolAllocator<'_, i32> = PoolAllocator::new(1000);
                let mut indices = Vec::with_capacity(1000);
                for i in 0..1000 {
                    indices.push(pool.alloc(&mut token, i).unwrap());
                }
                for idx in indices {
                    unsafe { pool.free(&mut token, idx) };
                }
            });
        });
    });

    group.bench_function("std_box_alloc_free", |b| {
        b.iter(|| {
            let mut boxes = Vec::with_capacity(1000);
            for i in 0..1000 {
                boxes.push(Box::new(i));
            }
            black_box(boxes);
        });
    });

    group.finish();
}

fn bench_pool_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_reuse");

    group.bench_function("pool_allocator_reuse", |b| {
        b.iter(|| {
            GhostToken::new(|mut token| {
                let pool: PoolAllocator<'_, i32> = PoolAllocator::new(1);
                let idx = pool.alloc(&mut token, 0).unwrap();
                unsafe { pool.free(&mut token, idx) };

                for i in 0..1000 {
                    let idx = pool.alloc(&mut token, i).unwrap();
                    unsafe { pool.free(&mut token, idx) };
                }
            });
        });
    });

    group.bench_function("std_box_reuse", |b| {
        b.iter(|| {
            for i in 0..1000 {
                let b = Box::new(i);
                black_box(b);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pool_alloc_free, bench_pool_reuse);
criterion_main!(benches);
