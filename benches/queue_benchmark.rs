/*!
 * Queue Benchmark
 * Enqueue/dispatch churn through the multilevel queue
 */

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mlfq_sim::{DynamicQueue, Process, ProcessClass};
use std::time::Duration;

fn bench_enqueue_dispatch(c: &mut Criterion) {
    c.bench_function("enqueue_dispatch_256", |b| {
        b.iter(|| {
            let queue = DynamicQueue::new(256);
            for pid in 0..256u32 {
                let class = if pid % 2 == 0 {
                    ProcessClass::Foreground
                } else {
                    ProcessClass::Background
                };
                queue.enqueue(Process::new(pid, class, 3));
            }
            while let Some(process) = queue.dequeue_timeout(Duration::ZERO) {
                black_box(process);
            }
        })
    });

    c.bench_function("promotion_pass_64_levels", |b| {
        b.iter(|| {
            let queue = DynamicQueue::with_threshold(1);
            for pid in 0..64u32 {
                queue.enqueue(Process::new(pid, ProcessClass::Foreground, 1));
            }
            queue.promote();
            black_box(queue.level_count());
        })
    });
}

criterion_group!(benches, bench_enqueue_dispatch);
criterion_main!(benches);
