/// Queue performance benchmark
///
/// 对比 waitring 与 rtrb 的性能
///
/// 重点测试：
/// 1. push/pop 吞吐性能
/// 2. 批量操作与逐个操作的差异
/// 3. 自旋与挂起两种等待方式的跨线程表现

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::thread;
use std::time::Duration;
use waitring::{BothAwait, Spsc};

/// Benchmark: Single-threaded push/pop throughput
///
/// 单线程 push/pop 吞吐量测试
fn benchmark_single_thread_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_single_thread");

    for capacity in [8, 32, 128] {
        let operations = 10000;
        group.throughput(Throughput::Elements(operations));

        group.bench_with_input(BenchmarkId::new("waitring", capacity), &capacity, |b, &cap| {
            let mut queue: Spsc<u64> = Spsc::with_capacity(cap);
            let (mut producer, mut consumer) = queue.split();
            b.iter(|| {
                for i in 0..operations {
                    let _ = producer.emplace(black_box(i));
                    let _ = consumer.pop();
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("rtrb", capacity), &capacity, |b, &cap| {
            let (mut producer, mut consumer) = rtrb::RingBuffer::<u64>::new(cap);
            b.iter(|| {
                for i in 0..operations {
                    let _ = producer.push(black_box(i));
                    let _ = consumer.pop();
                }
            });
        });
    }

    group.finish();
}

/// Benchmark: Batch push/pop operations
///
/// 批量 push/pop 操作性能
fn benchmark_batch_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_batch_ops");

    let capacity = 64;
    let batch: Vec<u64> = (0..32).collect();
    group.throughput(Throughput::Elements(batch.len() as u64));

    group.bench_function("waitring_emplace_multiple", |b| {
        let mut queue: Spsc<u64> = Spsc::with_capacity(capacity);
        let (mut producer, mut consumer) = queue.split();
        let mut out = Vec::with_capacity(batch.len());
        b.iter(|| {
            assert!(producer.emplace_multiple(black_box(&batch)).is_empty());
            out.clear();
            black_box(consumer.pop_multiple(&mut out));
        });
    });

    group.bench_function("waitring_single", |b| {
        let mut queue: Spsc<u64> = Spsc::with_capacity(capacity);
        let (mut producer, mut consumer) = queue.split();
        b.iter(|| {
            for &i in &batch {
                producer.emplace(black_box(i)).unwrap();
            }
            for _ in 0..batch.len() {
                black_box(consumer.pop().unwrap());
            }
        });
    });

    group.bench_function("rtrb_single", |b| {
        let (mut producer, mut consumer) = rtrb::RingBuffer::<u64>::new(capacity);
        b.iter(|| {
            for &i in &batch {
                producer.push(black_box(i)).unwrap();
            }
            for _ in 0..batch.len() {
                black_box(consumer.pop().unwrap());
            }
        });
    });

    group.finish();
}

/// Benchmark: Multi-threaded producer-consumer
///
/// 多线程生产者-消费者性能
fn benchmark_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_concurrent");
    group.measurement_time(Duration::from_secs(10));

    let capacity = 128;
    let messages = 10000;
    group.throughput(Throughput::Elements(messages));

    // Both sides spin
    group.bench_function("waitring_spin", |b| {
        b.iter(|| {
            let mut queue: Spsc<u64> = Spsc::with_capacity(capacity);
            let (mut producer, mut consumer) = queue.split();

            thread::scope(|s| {
                s.spawn(move || {
                    for i in 0..messages {
                        while producer.emplace(black_box(i)).is_err() {
                            std::hint::spin_loop();
                        }
                    }
                });

                let mut count = 0;
                while count < messages {
                    if consumer.pop().is_ok() {
                        count += 1;
                    } else {
                        std::hint::spin_loop();
                    }
                }
            });
        });
    });

    // Both sides park
    group.bench_function("waitring_park", |b| {
        b.iter(|| {
            let mut queue: Spsc<u64, BothAwait> = Spsc::with_capacity(capacity);
            let (mut producer, mut consumer) = queue.split();

            thread::scope(|s| {
                s.spawn(move || {
                    for i in 0..messages {
                        producer.emplace_await(black_box(i));
                    }
                    producer.end_pop_waiting();
                });

                while let Some(value) = consumer.pop_await() {
                    black_box(value);
                }
            });
        });
    });

    group.bench_function("rtrb_spin", |b| {
        b.iter(|| {
            let (mut producer, mut consumer) = rtrb::RingBuffer::<u64>::new(capacity);

            thread::scope(|s| {
                s.spawn(move || {
                    for i in 0..messages {
                        while producer.push(black_box(i)).is_err() {
                            std::hint::spin_loop();
                        }
                    }
                });

                let mut count = 0;
                while count < messages {
                    if consumer.pop().is_ok() {
                        count += 1;
                    } else {
                        std::hint::spin_loop();
                    }
                }
            });
        });
    });

    group.finish();
}

/// Benchmark: Pop performance
///
/// Pop 性能测试
fn benchmark_pop_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_pop");

    let capacity = 64;
    let items = 50;

    group.bench_function("waitring_pop", |b| {
        b.iter_batched(
            || {
                let queue: Spsc<u64> = Spsc::with_capacity(capacity);
                let (mut producer, consumer) = queue.into_split();
                for i in 0..items {
                    producer.emplace(i).unwrap();
                }
                consumer
            },
            |mut consumer| {
                for _ in 0..items {
                    black_box(consumer.pop().unwrap());
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("rtrb_pop", |b| {
        b.iter_batched(
            || {
                let (mut producer, consumer) = rtrb::RingBuffer::<u64>::new(capacity);
                for i in 0..items {
                    producer.push(i).unwrap();
                }
                consumer
            },
            |mut consumer| {
                for _ in 0..items {
                    black_box(consumer.pop().unwrap());
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_thread_throughput,
    benchmark_batch_operations,
    benchmark_concurrent,
    benchmark_pop_only,
);

criterion_main!(benches);
