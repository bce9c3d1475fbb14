//! N-dimensional circular buffers with single-writer / multi-reader streaming.
//!
//! This crate provides a dense N-dimensional buffer that can be addressed
//! flat, by coordinate tuple, or circularly (any signed index wraps into
//! range), carved into an offset sub-window (region of interest), iterated
//! linearly or in endless laps, and streamed through by one writer and any
//! number of independently tracked readers.
//!
//! # Core Types
//!
//! - [`RingBuffer`]: The buffer itself; owns its elements or wraps foreign
//!   memory without copying
//! - [`Dims`] / [`FixedDims`]: Dimensional properties (sizes, column-major
//!   strides, per-dimension offsets)
//! - [`CircCursor`]: A signed circular cursor tracking laps around a ring
//! - [`Storage`]: Linear element storage with an exchangeable data pointer
//!
//! # Primary API
//!
//! ## Shaping and access
//!
//! - [`RingBuffer::create`]: Allocate a shape; failure collapses to 1-D
//!   instead of panicking
//! - [`RingBuffer::wrap_raw`] / [`RingBuffer::wrap_slice`]: Alias external
//!   memory under an N-dimensional shape
//! - `at` / `at2` / `at3` / `at_nd` (+ `_mut`, + unsafe `_unchecked`):
//!   checked element access, first dimension fastest
//! - `circ_at*`: the same families with every signed coordinate wrapped
//!   into range
//!
//! ## Region of interest
//!
//! - [`RingBuffer::set_roi`]: Validated sub-window (sizes plus offsets)
//! - `roi_at*` / `circ_roi_at*`: window-local access, translated through
//!   the offsets
//!
//! ## Iteration
//!
//! - [`RingBuffer::circ_iter`] / [`RingBuffer::circ_iter_rev`]: lap-bounded
//!   or endless circular walks
//! - [`RingBuffer::roi_iter`] / [`RingBuffer::roi_iter_mut`]: linear window
//!   traversal; `par_roi_iter` with the `parallel` feature
//!
//! ## Streaming
//!
//! - `write_bytes` / `write_value` / `write_slice` / `write_iter` and their
//!   `*_no_wait` twins: single-writer appends at the write cursor
//! - [`RingBuffer::register_reader`]: explicit reader identities; `read`,
//!   `read_bytes`, `read_into` consume per reader with lap correction
//!
//! # Example
//!
//! ```rust
//! use ndring::RingBuffer;
//!
//! let mut buf: RingBuffer<f64> = RingBuffer::new();
//! assert!(buf.create([4, 3]));
//! *buf.at2_mut(1, 2) = 2.5;
//! assert_eq!(*buf.at(2 * 4 + 1), 2.5);
//!
//! // Circular access wraps in both directions.
//! assert_eq!(buf.circ_at(12), buf.at(0));
//! assert_eq!(*buf.circ_at2(-3, 14), 2.5);
//! ```
//!
//! # Streaming Example
//!
//! ```rust
//! use ndring::RingBuffer;
//!
//! let ring: RingBuffer<i32> = RingBuffer::with_shape([8]);
//! ring.register_reader(0);
//! ring.write_iter(0..20); // wraps; only the last 8 values survive
//!
//! let mut out = [0i32; 8];
//! let n = ring.read(0, &mut out).unwrap();
//! assert_eq!(&out[..n], &[12, 13, 14, 15, 16, 17, 18, 19]);
//! ```
//!
//! # Concurrency
//!
//! Writers exclude each other behind a lock; the write position is published
//! with release/acquire atomics so readers observe completed writes. Reader
//! cursors are independent and never contend with each other. Element memory
//! is cell-backed, so writers mutate through `&self`; a borrowed view taken
//! before a write remains usable for the elements the write did not touch,
//! while written slots must be re-read through a fresh access. Plain-view
//! access racing a concurrent write is not synchronized and can observe torn
//! values; keep direct views on the producing thread or quiesce the writer
//! first.
//!
//! # Features
//!
//! - `parallel`: rayon-based parallel iteration over the region of interest.

mod buffer;
mod cursor;
mod dims;
mod index;
mod iter;
mod roi;
mod storage;
mod stream;

// ============================================================================
// Buffer
// ============================================================================
pub use buffer::RingBuffer;

// ============================================================================
// Dimensional properties and storage
// ============================================================================
pub use dims::{Dims, FixedDims};
pub use storage::Storage;

// ============================================================================
// Index arithmetic
// ============================================================================
pub use index::{checked_volume, circ_index, decompose, flat_index, volume};

// ============================================================================
// Cursors and iterators
// ============================================================================
pub use cursor::CircCursor;
pub use iter::{CircIter, CircRoiIter, RoiIter, RoiIterMut};

#[cfg(feature = "parallel")]
pub use iter::ParRoiIter;

// ============================================================================
// Streaming
// ============================================================================
pub use stream::ReaderId;

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during buffer operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// A coordinate or extent list has the wrong number of dimensions.
    #[error("rank mismatch: expected {0} dimensions, got {1}")]
    RankMismatch(usize, usize),

    /// A region-of-interest extent exceeds its dimension.
    #[error("window extent {size} exceeds dimension {dim} (size {max})")]
    RoiExtent { dim: usize, size: usize, max: usize },

    /// A region-of-interest offset pushes the window past its dimension.
    #[error("window offset {offset} plus extent {size} overruns dimension {dim} (size {max})")]
    RoiOffset {
        dim: usize,
        offset: usize,
        size: usize,
        max: usize,
    },

    /// A streaming read referenced a reader id that was never registered.
    #[error("unknown reader id {0}")]
    UnknownReader(ReaderId),
}

/// Result type for buffer operations.
pub type Result<T> = std::result::Result<T, RingError>;
