use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndring::RingBuffer;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::time::Duration;

fn random_buffer(len: usize, seed: u64) -> RingBuffer<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut buf: RingBuffer<f64> = RingBuffer::with_shape([len]);
    for i in 0..len {
        *buf.at_mut(i) = rng.sample(StandardNormal);
    }
    buf
}

/// Two full laps of summation: raw slice passes vs circular access paths.
fn bench_circular_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("circular_sum");
    for size in [4096usize, 65536] {
        group.throughput(Throughput::Elements(2 * size as u64));
        let buf = random_buffer(size, 1);

        group.bench_with_input(BenchmarkId::new("slice", size), &size, |b, _| {
            b.iter(|| {
                let data = buf.data();
                let total: f64 = data.iter().chain(data.iter()).sum();
                black_box(total)
            })
        });

        group.bench_with_input(BenchmarkId::new("circ_iter", size), &size, |b, _| {
            b.iter(|| {
                let total: f64 = buf.circ_iter(0, 2).sum();
                black_box(total)
            })
        });

        group.bench_with_input(BenchmarkId::new("circ_at", size), &size, |b, _| {
            b.iter(|| {
                let mut total = 0.0;
                for i in 0..(2 * size) as isize {
                    total += *buf.circ_at(i);
                }
                black_box(total)
            })
        });
    }
    group.finish();
}

/// Summing a centered window: iterator traversal vs nested checked access.
fn bench_window_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_sum");
    group.measurement_time(Duration::from_secs(3));
    for size in [256usize, 1024] {
        let win = size / 2;
        group.throughput(Throughput::Elements((win * win) as u64));

        let mut rng = StdRng::seed_from_u64(2);
        let mut buf: RingBuffer<f64> = RingBuffer::with_shape([size, size]);
        for i in 0..buf.len() {
            *buf.at_mut(i) = rng.sample(StandardNormal);
        }
        buf.set_roi([win, win], [size / 4, size / 4]).unwrap();

        group.bench_with_input(BenchmarkId::new("roi_iter", size), &size, |b, _| {
            b.iter(|| {
                let total: f64 = buf.roi_iter().sum();
                black_box(total)
            })
        });

        group.bench_with_input(BenchmarkId::new("nested_at2", size), &size, |b, _| {
            b.iter(|| {
                let off = size / 4;
                let mut total = 0.0;
                for col in 0..win {
                    for row in 0..win {
                        total += *buf.at2(row + off, col + off);
                    }
                }
                black_box(total)
            })
        });

        #[cfg(feature = "parallel")]
        {
            use rayon::iter::ParallelIterator;
            group.bench_with_input(BenchmarkId::new("par_roi_iter", size), &size, |b, _| {
                b.iter(|| {
                    let total: f64 = buf.par_roi_iter().copied().sum();
                    black_box(total)
                })
            });
        }
    }
    group.finish();
}

/// Appending a half-capacity payload: slice writes vs element-wise writes.
fn bench_stream_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_write");
    for size in [4096usize, 65536] {
        let payload: Vec<f32> = {
            let mut rng = StdRng::seed_from_u64(3);
            (0..size / 2).map(|_| rng.sample(StandardNormal)).collect()
        };
        group.throughput(Throughput::Bytes(std::mem::size_of_val(&payload[..]) as u64));
        let ring: RingBuffer<f32> = RingBuffer::with_shape([size]);

        group.bench_with_input(BenchmarkId::new("write_slice", size), &size, |b, _| {
            b.iter(|| black_box(ring.write_slice(&payload)))
        });

        group.bench_with_input(BenchmarkId::new("write_iter", size), &size, |b, _| {
            b.iter(|| black_box(ring.write_iter(payload.iter().copied())))
        });
    }
    group.finish();
}

/// Steady-state pump: one producer chunk in, one reader batch out.
fn bench_stream_pump(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_pump");
    let chunk: Vec<u64> = {
        let mut rng = StdRng::seed_from_u64(4);
        (0..4096).map(|_| rng.gen()).collect()
    };
    group.throughput(Throughput::Bytes(std::mem::size_of_val(&chunk[..]) as u64));

    let ring: RingBuffer<u64> = RingBuffer::with_shape([65536]);
    ring.register_reader(0);
    let mut out = vec![0u64; 4096];

    group.bench_function("write_then_read", |b| {
        b.iter(|| {
            ring.write_slice(&chunk);
            black_box(ring.read(0, &mut out).unwrap())
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_circular_sum,
    bench_window_traversal,
    bench_stream_write,
    bench_stream_pump
);
criterion_main!(benches);
