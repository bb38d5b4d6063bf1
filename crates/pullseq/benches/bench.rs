use core::hint::black_box;
use criterion::async_executor::SmolExecutor;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use futures::StreamExt;
use pullseq::{
    Generator, Sequence, SequenceAsyncSmolExt, SequenceAsyncTokioExt, SequenceExt, from_iter,
    multi_consume,
};
use std::time::Instant;
use tokio::runtime::Builder;

// Number of elements pulled per benchmark iteration.
const TOTAL_ELEMS: usize = 4096;

fn counter() -> Generator<u64> {
    Generator::new(|e| {
        let mut n = 0_u64;
        while e.emit(n) {
            n += 1;
        }
    })
}

/// Baseline: an in-thread sequence with no handshake at all.
fn bench_from_iter(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential/from_iter");
    group.throughput(Throughput::Elements(TOTAL_ELEMS as u64));

    group.bench_function(format!("elems/{}", TOTAL_ELEMS), |b| {
        b.iter(|| {
            let mut seq = from_iter(0..TOTAL_ELEMS as u64);
            let mut x = 0;
            while seq.next(&mut x) {
                black_box(x);
            }
        });
    });

    group.finish();
}

/// Benchmarks the producer/reader rendezvous, including thread start-up and
/// close.
fn bench_generator(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential/generator");
    group.throughput(Throughput::Elements(TOTAL_ELEMS as u64));

    group.bench_function(format!("elems/{}", TOTAL_ELEMS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let mut seq = counter().take(TOTAL_ELEMS);
                let mut x = 0;
                while seq.next(&mut x) {
                    black_box(x);
                }
                seq.into_inner().close();
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one upstream fanned out to a growing number of consumers.
fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan-out/from_iter");
    let mut counts = vec![1, 2, 4];
    let cpus = num_cpus::get();
    if !counts.contains(&cpus) {
        counts.push(cpus);
    }

    for consumer_count in counts {
        group.throughput(Throughput::Elements((TOTAL_ELEMS * consumer_count) as u64));
        group.bench_function(
            format!("elems/{}/consumers/{}", TOTAL_ELEMS, consumer_count),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let mut sums = vec![0_u64; consumer_count];
                        let mut consumers: Vec<_> = sums
                            .iter_mut()
                            .map(|sum| {
                                move |seq: &mut dyn Sequence<u64>| {
                                    let mut x = 0;
                                    while seq.next(&mut x) {
                                        *sum += x;
                                    }
                                }
                            })
                            .collect();
                        let mut refs: Vec<&mut (dyn pullseq::Consumer<u64> + Send)> = consumers
                            .iter_mut()
                            .map(|c| c as &mut (dyn pullseq::Consumer<u64> + Send))
                            .collect();

                        multi_consume(from_iter(0..TOTAL_ELEMS as u64), &mut 0, &mut refs);
                        drop(refs);
                        drop(consumers);
                        black_box(sums);
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

/// Benchmarks a generator consumed as a stream on Tokio's blocking pool.
fn bench_stream_tokio(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream/tokio");
    group.throughput(Throughput::Elements(TOTAL_ELEMS as u64));

    group.bench_function(format!("elems/{}", TOTAL_ELEMS), |b| {
        let rt = Builder::new_multi_thread()
            .enable_all()
            .worker_threads(1)
            .build()
            .unwrap();

        b.to_async(&rt).iter_custom(|iters| async move {
            let start = Instant::now();

            for _ in 0..iters {
                let mut stream = counter().into_tokio_stream(0).take(TOTAL_ELEMS);
                while let Some(x) = stream.next().await {
                    black_box(x);
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks a generator consumed as a stream on smol's blocking pool.
fn bench_stream_smol(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream/smol");
    group.throughput(Throughput::Elements(TOTAL_ELEMS as u64));

    group.bench_function(format!("elems/{}", TOTAL_ELEMS), |b| {
        b.to_async(SmolExecutor).iter_custom(|iters| async move {
            let start = Instant::now();

            for _ in 0..iters {
                let mut stream = counter().into_smol_stream(0).take(TOTAL_ELEMS);
                while let Some(x) = stream.next().await {
                    black_box(x);
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_from_iter,
    bench_generator,
    bench_fan_out,
    bench_stream_tokio,
    bench_stream_smol,
);
criterion_main!(benches);
