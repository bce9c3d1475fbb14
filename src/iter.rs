//! Circular and window iterators.
//!
//! Circular iterators walk the buffer (or its window) from any signed start
//! position, wrapping at the ends, for a bounded number of laps or forever.
//! A bounded iterator over `n` elements and `k` laps yields exactly `n * k`
//! items and then fuses; an unbounded one never finishes on its own, so cap
//! it with [`Iterator::take`] or a break condition.
//!
//! Window iterators traverse the region of interest in window-local flat
//! order (first dimension fastest). The mutable variant requires the window
//! to lie inside the full extent, which makes every yielded element distinct
//! and the `&mut` hand-out sound.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::buffer::RingBuffer;
use crate::dims::Dims;
use crate::index::circ_index;

// ============================================================================
// Circular iteration over the full extent
// ============================================================================

/// Circular iterator over a buffer's elements.
///
/// Returned by [`RingBuffer::circ_iter`] and [`RingBuffer::circ_iter_rev`].
#[derive(Debug, Clone)]
pub struct CircIter<'a, T> {
    data: &'a [T],
    pos: isize,
    step: isize,
    remaining: Option<usize>,
}

impl<'a, T> CircIter<'a, T> {
    fn new(data: &'a [T], start: isize, step: isize, max_laps: isize) -> Self {
        let remaining = if max_laps < 0 {
            None
        } else {
            Some(data.len().saturating_mul(max_laps as usize))
        };
        CircIter {
            data,
            pos: start,
            step,
            remaining,
        }
    }
}

impl<'a, T> Iterator for CircIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.data.is_empty() {
            return None;
        }
        match self.remaining.as_mut() {
            Some(0) => return None,
            Some(n) => *n -= 1,
            None => {}
        }
        let item = &self.data[circ_index(self.pos, self.data.len())];
        self.pos = self.pos.wrapping_add(self.step);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.data.is_empty() {
            return (0, Some(0));
        }
        match self.remaining {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

impl<T> FusedIterator for CircIter<'_, T> {}

// ============================================================================
// Window iteration
// ============================================================================

/// Linear iterator over the window in window-local flat order.
///
/// Returned by [`RingBuffer::roi_iter`].
#[derive(Debug, Clone)]
pub struct RoiIter<'a, T> {
    buf: &'a RingBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for RoiIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let item = self.buf.roi_at(self.front);
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<'a, T> DoubleEndedIterator for RoiIter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.buf.roi_at(self.back))
    }
}

impl<T> ExactSizeIterator for RoiIter<'_, T> {}
impl<T> FusedIterator for RoiIter<'_, T> {}

/// Mutable linear iterator over the window.
///
/// Returned by [`RingBuffer::roi_iter_mut`]. Holds a snapshot of the window
/// and the full-extent strides so the borrow of the buffer stays opaque.
#[derive(Debug)]
pub struct RoiIterMut<'a, T> {
    head: *mut T,
    roi: Dims,
    strides: Vec<usize>,
    front: usize,
    back: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for RoiIterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.front == self.back {
            return None;
        }
        let base = window_base(&self.roi, &self.strides, self.front);
        self.front += 1;
        // Distinct local indices map to distinct base indices inside a
        // contained window, so no element is handed out twice.
        Some(unsafe { &mut *self.head.add(base) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<'a, T> DoubleEndedIterator for RoiIterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        let base = window_base(&self.roi, &self.strides, self.back);
        Some(unsafe { &mut *self.head.add(base) })
    }
}

impl<T> ExactSizeIterator for RoiIterMut<'_, T> {}
impl<T> FusedIterator for RoiIterMut<'_, T> {}

/// Circular iterator over the window.
///
/// Returned by [`RingBuffer::circ_roi_iter`] and
/// [`RingBuffer::circ_roi_iter_rev`].
#[derive(Debug, Clone)]
pub struct CircRoiIter<'a, T> {
    buf: &'a RingBuffer<T>,
    pos: isize,
    step: isize,
    remaining: Option<usize>,
}

impl<'a, T> Iterator for CircRoiIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let len = self.buf.roi_len();
        if len == 0 {
            return None;
        }
        match self.remaining.as_mut() {
            Some(0) => return None,
            Some(n) => *n -= 1,
            None => {}
        }
        let item = self.buf.roi_at(circ_index(self.pos, len));
        self.pos = self.pos.wrapping_add(self.step);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.buf.roi_len() == 0 {
            return (0, Some(0));
        }
        match self.remaining {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

impl<T> FusedIterator for CircRoiIter<'_, T> {}

/// Local-to-base translation against an explicit window and stride set.
#[inline]
fn window_base(roi: &Dims, strides: &[usize], flat: usize) -> usize {
    let mut rem = flat;
    let mut base = 0usize;
    for d in (0..roi.rank()).rev() {
        let coord = rem / roi.stride(d);
        rem %= roi.stride(d);
        base += (coord + roi.offset(d)) * strides[d];
    }
    base
}

// ============================================================================
// Constructors
// ============================================================================

impl<T> RingBuffer<T> {
    /// Iterates circularly from `start`, wrapping at the ends.
    ///
    /// `max_laps < 0` iterates forever; otherwise the iterator yields
    /// `len() * max_laps` elements and fuses.
    pub fn circ_iter(&self, start: isize, max_laps: isize) -> CircIter<'_, T> {
        CircIter::new(self.data(), start, 1, max_laps)
    }

    /// Like [`RingBuffer::circ_iter`] but walking backwards.
    pub fn circ_iter_rev(&self, start: isize, max_laps: isize) -> CircIter<'_, T> {
        CircIter::new(self.data(), start, -1, max_laps)
    }

    /// Iterates the window once in window-local flat order.
    pub fn roi_iter(&self) -> RoiIter<'_, T> {
        RoiIter {
            buf: self,
            front: 0,
            back: self.roi_len(),
        }
    }

    /// Mutably iterates the window once in window-local flat order.
    ///
    /// # Panics
    ///
    /// Panics if the window exceeds the full extent, since overlapping
    /// translations would alias.
    pub fn roi_iter_mut(&mut self) -> RoiIterMut<'_, T> {
        assert!(self.roi_contained(), "window exceeds the full extent");
        let back = self.roi_len();
        RoiIterMut {
            head: self.storage.head_ptr(),
            roi: self.roi.clone(),
            strides: self.dims.strides().to_vec(),
            front: 0,
            back,
            _marker: PhantomData,
        }
    }

    /// Iterates the window circularly from window-local `start`.
    ///
    /// `max_laps < 0` iterates forever; otherwise the iterator yields
    /// `roi_len() * max_laps` elements and fuses.
    pub fn circ_roi_iter(&self, start: isize, max_laps: isize) -> CircRoiIter<'_, T> {
        let remaining = if max_laps < 0 {
            None
        } else {
            Some(self.roi_len().saturating_mul(max_laps as usize))
        };
        CircRoiIter {
            buf: self,
            pos: start,
            step: 1,
            remaining,
        }
    }

    /// Like [`RingBuffer::circ_roi_iter`] but walking backwards.
    pub fn circ_roi_iter_rev(&self, start: isize, max_laps: isize) -> CircRoiIter<'_, T> {
        let remaining = if max_laps < 0 {
            None
        } else {
            Some(self.roi_len().saturating_mul(max_laps as usize))
        };
        CircRoiIter {
            buf: self,
            pos: start,
            step: -1,
            remaining,
        }
    }
}

// ============================================================================
// Parallel window iteration
// ============================================================================

#[cfg(feature = "parallel")]
mod parallel {
    use rayon::iter::plumbing::{bridge_unindexed, Folder, UnindexedConsumer, UnindexedProducer};
    use rayon::iter::ParallelIterator;

    use crate::buffer::RingBuffer;

    /// Parallel iterator over the window, in unspecified order.
    ///
    /// Returned by [`RingBuffer::par_roi_iter`]. Splits the largest window
    /// dimension until rayon stops asking.
    #[derive(Debug)]
    pub struct ParRoiIter<'a, T> {
        buf: &'a RingBuffer<T>,
        sizes: Vec<usize>,
        offsets: Vec<usize>,
    }

    struct RoiProducer<'a, T> {
        buf: &'a RingBuffer<T>,
        sizes: Vec<usize>,
        offsets: Vec<usize>,
    }

    /// Odometer walk over an absolute sub-window of the full extent.
    struct WindowWalk<'a, T> {
        buf: &'a RingBuffer<T>,
        sizes: Vec<usize>,
        idx: Vec<usize>,
        flat: usize,
        remaining: usize,
    }

    impl<'a, T> WindowWalk<'a, T> {
        fn new(buf: &'a RingBuffer<T>, sizes: Vec<usize>, offsets: Vec<usize>) -> Self {
            let remaining = sizes.iter().product();
            let flat = offsets
                .iter()
                .zip(buf.strides())
                .map(|(&o, &s)| o * s)
                .sum();
            WindowWalk {
                buf,
                idx: vec![0; sizes.len()],
                sizes,
                flat,
                remaining,
            }
        }
    }

    impl<'a, T> Iterator for WindowWalk<'a, T> {
        type Item = &'a T;

        fn next(&mut self) -> Option<&'a T> {
            if self.remaining == 0 {
                return None;
            }
            self.remaining -= 1;
            let item = unsafe { self.buf.at_unchecked(self.flat) };
            let mut d = 0;
            while d < self.sizes.len() {
                self.idx[d] += 1;
                self.flat += self.buf.stride(d);
                if self.idx[d] < self.sizes[d] {
                    break;
                }
                self.flat -= self.sizes[d] * self.buf.stride(d);
                self.idx[d] = 0;
                d += 1;
            }
            Some(item)
        }

        fn size_hint(&self) -> (usize, Option<usize>) {
            (self.remaining, Some(self.remaining))
        }
    }

    impl<'a, T: Send + Sync> UnindexedProducer for RoiProducer<'a, T> {
        type Item = &'a T;

        fn split(self) -> (Self, Option<Self>) {
            let len: usize = self.sizes.iter().product();
            if len <= 1 {
                return (self, None);
            }
            // Split the largest dimension in half.
            let (dim, &size) = match self.sizes.iter().enumerate().max_by_key(|&(_, &s)| s) {
                Some(found) => found,
                None => return (self, None),
            };
            if size <= 1 {
                return (self, None);
            }
            let mid = size / 2;
            let mut right_sizes = self.sizes.clone();
            let mut right_offsets = self.offsets.clone();
            right_sizes[dim] = size - mid;
            right_offsets[dim] += mid;
            let mut left = self;
            left.sizes[dim] = mid;
            let right = RoiProducer {
                buf: left.buf,
                sizes: right_sizes,
                offsets: right_offsets,
            };
            (left, Some(right))
        }

        fn fold_with<F>(self, folder: F) -> F
        where
            F: Folder<Self::Item>,
        {
            folder.consume_iter(WindowWalk::new(self.buf, self.sizes, self.offsets))
        }
    }

    impl<'a, T: Send + Sync> ParallelIterator for ParRoiIter<'a, T> {
        type Item = &'a T;

        fn drive_unindexed<C>(self, consumer: C) -> C::Result
        where
            C: UnindexedConsumer<Self::Item>,
        {
            bridge_unindexed(
                RoiProducer {
                    buf: self.buf,
                    sizes: self.sizes,
                    offsets: self.offsets,
                },
                consumer,
            )
        }

        fn opt_len(&self) -> Option<usize> {
            Some(self.sizes.iter().product())
        }
    }

    impl<T: Send + Sync> RingBuffer<T> {
        /// Iterates the window in parallel.
        ///
        /// The full extent needs no dedicated machinery; use
        /// `data().par_iter()` for that.
        ///
        /// # Panics
        ///
        /// Panics if the window exceeds the full extent.
        pub fn par_roi_iter(&self) -> ParRoiIter<'_, T> {
            assert!(
                self.roi_contained(),
                "window exceeds the full extent"
            );
            ParRoiIter {
                buf: self,
                sizes: self.roi().dims().to_vec(),
                offsets: self.roi().offsets().to_vec(),
            }
        }
    }
}

#[cfg(feature = "parallel")]
pub use parallel::ParRoiIter;
