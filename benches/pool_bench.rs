use criterion::{criterion_group, criterion_main, Criterion};
use crossbeam_utils::sync::WaitGroup;
use workpool::SharedQueueThreadPool;

fn spawn_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn_bench");
    for threads in &[1u32, 2, 4, 8, 16] {
        group.bench_with_input(format!("workers_{}", threads), threads, |b, &threads| {
            let pool = SharedQueueThreadPool::new(threads).unwrap();
            b.iter(|| {
                let wg = WaitGroup::new();
                for _ in 0..1000 {
                    let wg = wg.clone();
                    pool.spawn(move || drop(wg)).unwrap();
                }
                wg.wait();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, spawn_bench);
criterion_main!(benches);
