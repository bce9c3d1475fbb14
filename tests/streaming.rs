use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use bytemuck::{Pod, Zeroable};
use ndring::{RingBuffer, RingError};

/// A producer that never laps its consumer is lossless: the consumer drains
/// the exact sequence the producer appended.
#[test]
fn test_lossless_stream_when_writer_never_laps() {
    let ring: RingBuffer<u64> = RingBuffer::with_shape([1024]);
    assert!(ring.register_reader(0));
    let total: u64 = 512;

    thread::scope(|s| {
        let ring = &ring;
        s.spawn(move || {
            for chunk in (0..total).collect::<Vec<u64>>().chunks(16) {
                assert_eq!(ring.write_slice(chunk), chunk.len() * 8);
            }
        });

        let mut seen: Vec<u64> = Vec::new();
        let mut out = [0u64; 64];
        while seen.len() < total as usize {
            let n = ring.read(0, &mut out).unwrap();
            seen.extend_from_slice(&out[..n]);
            if n == 0 {
                thread::yield_now();
            }
        }
        let expected: Vec<u64> = (0..total).collect();
        assert_eq!(seen, expected);
    });
}

/// While one thread sits inside a blocking write, `*_no_wait` calls from
/// other threads fail fast with 0 instead of queueing.
#[test]
fn test_no_wait_refuses_while_writer_is_busy() {
    let ring: RingBuffer<u32> = RingBuffer::with_shape([8]);
    let (entered_tx, entered_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    thread::scope(|s| {
        let ring_ref = &ring;
        s.spawn(move || {
            let blocker = [7u32].into_iter().inspect(|_| {
                entered_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            });
            assert_eq!(ring_ref.write_iter(blocker), 1);
        });

        entered_rx.recv().unwrap();
        assert!(ring.is_writing());
        assert_eq!(ring.write_value_no_wait(&1u32), 0);
        assert_eq!(ring.write_slice_no_wait(&[1u32, 2]), 0);
        assert_eq!(ring.write_iter_no_wait([9u32]), 0);
        release_tx.send(()).unwrap();
    });

    assert!(!ring.is_writing());
    assert_eq!(ring.write_value_no_wait(&2u32), 4);
    assert_eq!(*ring.at(0), 7);
    assert_eq!(*ring.at(1), 2);
}

/// Distinct reader identities drain independently and see the same data.
#[test]
fn test_independent_readers_share_nothing() {
    let ring: RingBuffer<i64> = RingBuffer::with_shape([10]);
    ring.write_iter(0..25);
    assert!(ring.register_reader(1));
    assert!(ring.register_reader(2));

    let expected: Vec<i64> = (15..25).collect();
    thread::scope(|s| {
        let ring = &ring;
        for id in [1u32, 2u32] {
            let expected = expected.clone();
            s.spawn(move || {
                let mut out = [0i64; 10];
                let n = ring.read(id, &mut out).unwrap();
                assert_eq!(n, 10);
                assert_eq!(&out[..], &expected[..]);
                assert_eq!(ring.available(id).unwrap(), 0);
            });
        }
    });
}

/// Readers registered from another thread are visible everywhere.
#[test]
fn test_registry_is_shared_across_threads() {
    let ring: RingBuffer<u8> = RingBuffer::with_shape([16]);
    thread::scope(|s| {
        let ring = &ring;
        s.spawn(move || {
            assert!(ring.register_reader(42));
        });
    });
    assert_eq!(ring.reader_ids(), [42]);
    assert!(!ring.register_reader(42));
    assert!(ring.unregister_reader(42));
    assert_eq!(
        ring.available(42).unwrap_err(),
        RingError::UnknownReader(42)
    );
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct Sample {
    ts: u64,
    value: f64,
}

/// Custom plain-data records stream whole, one element per record.
#[test]
fn test_streaming_custom_pod_records() {
    let ring: RingBuffer<Sample> = RingBuffer::with_shape([4]);
    ring.register_reader(0);

    for i in 0..6u64 {
        let sample = Sample {
            ts: 1_000 + i,
            value: i as f64 * 0.5,
        };
        assert_eq!(ring.write_value(&sample), std::mem::size_of::<Sample>());
    }
    assert_eq!(ring.writer_laps(), 1);

    let mut out = [Sample::default(); 4];
    let n = ring.read(0, &mut out).unwrap();
    assert_eq!(n, 4);
    assert_eq!(out[0], Sample { ts: 1_002, value: 1.0 });
    assert_eq!(out[3], Sample { ts: 1_005, value: 2.5 });
}

/// A slow reader racing a fast writer holds the cursor invariants: it never
/// overtakes the writer, availability never exceeds capacity, and after the
/// writer stops it drains up to the final element.
#[test]
fn test_lapped_reader_holds_cursor_invariants() {
    let ring: RingBuffer<u64> = RingBuffer::with_shape([32]);
    assert!(ring.register_reader(0));
    let total: u64 = 10_000;
    let mut consumed = 0usize;

    thread::scope(|s| {
        let ring = &ring;
        let writer = s.spawn(move || {
            for v in 0..total {
                ring.write_value(&v);
            }
        });

        let mut out = [0u64; 8];
        while !writer.is_finished() {
            consumed += ring.read(0, &mut out).unwrap();
            assert!(ring.available(0).unwrap() <= 32);
            assert!(ring.reader_pos(0).unwrap() <= ring.writer_pos());
            if ring.available(0).unwrap() == 0 {
                thread::sleep(Duration::from_micros(50));
            }
        }
    });

    // Quiesced drain: data is exact again, ending at the last write.
    let mut tail = [0u64; 32];
    let n = ring.read(0, &mut tail).unwrap();
    consumed += n;
    if n > 0 {
        assert_eq!(tail[n - 1], total - 1);
    }
    assert_eq!(ring.available(0).unwrap(), 0);
    // Cursor positions never repeat, so consumption cannot exceed production.
    assert!(consumed as u64 <= total);
}

/// Chained rings: consuming from one ring through another preserves stream
/// order across different capacities.
#[test]
fn test_ring_to_ring_relay() {
    let upstream: RingBuffer<i64> = RingBuffer::with_shape([16]);
    let downstream: RingBuffer<i64> = RingBuffer::with_shape([8]);
    upstream.register_reader(0);
    downstream.register_reader(0);

    upstream.write_iter(100..112);
    assert_eq!(upstream.read_into(0, &downstream).unwrap(), 12);

    // Downstream only keeps the last 8 of the 12 relayed values.
    let mut out = [0i64; 8];
    assert_eq!(downstream.read(0, &mut out).unwrap(), 8);
    assert_eq!(out, [104, 105, 106, 107, 108, 109, 110, 111]);
}
