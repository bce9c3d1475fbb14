//! The circular cursor state machine shared by iterators and the streaming
//! layer.
//!
//! A cursor is a single unbounded signed position: it moves freely past the
//! container bounds in either direction and is reduced to a physical slot
//! with a true modulo only at dereference time. "End" is a derived
//! predicate over the lap count, not a stored state, and a negative lap
//! bound means the cursor never ends, which is what the streaming writer
//! and reader cursors rely on.

use crate::index::circ_index;

/// Position, origin, lap count, and lap bound of a circular traversal.
///
/// The lap count is `(pos - start) / len`, recomputed on every move with
/// truncating division, so walking backwards produces negative laps. The
/// cursor holds no container reference; every method that needs the ring
/// length takes it as an argument, which keeps the type a plain value that
/// the streaming layer can stash inside registries and atomics-adjacent
/// state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircCursor {
    pos: isize,
    start: isize,
    laps: isize,
    max_laps: isize,
}

impl CircCursor {
    /// A cursor at `start` with no laps walked yet.
    ///
    /// `max_laps < 0` makes the cursor unbounded.
    #[inline]
    pub fn new(start: isize, max_laps: isize) -> Self {
        CircCursor {
            pos: start,
            start,
            laps: 0,
            max_laps,
        }
    }

    /// Current unbounded position.
    #[inline]
    pub fn pos(&self) -> isize {
        self.pos
    }

    /// Position the traversal started from.
    #[inline]
    pub fn start(&self) -> isize {
        self.start
    }

    /// Whole laps between the start and the current position.
    #[inline]
    pub fn laps(&self) -> isize {
        self.laps
    }

    /// The lap bound (negative means unbounded).
    #[inline]
    pub fn max_laps(&self) -> isize {
        self.max_laps
    }

    /// Replaces the lap bound without moving the cursor.
    #[inline]
    pub fn set_max_laps(&mut self, max_laps: isize) {
        self.max_laps = max_laps;
    }

    /// Total signed distance iterated since the start position.
    #[inline]
    pub fn traveled(&self) -> isize {
        self.pos - self.start
    }

    /// Physical slot in a ring of `len` elements.
    ///
    /// # Panics
    ///
    /// Panics if `len == 0`.
    #[inline]
    pub fn phys(&self, len: usize) -> usize {
        circ_index(self.pos, len)
    }

    /// True once the lap bound has been met or passed.
    ///
    /// Ends only when the bound is non-negative; the comparison is on the
    /// lap count's magnitude so reversed traversals end too.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.max_laps >= 0 && self.laps.abs() >= self.max_laps
    }

    /// Moves the cursor by `by` positions (either direction).
    #[inline]
    pub fn advance(&mut self, by: isize, len: usize) {
        self.pos += by;
        self.recompute_laps(len);
    }

    /// Jumps `n` whole laps without changing the physical position.
    #[inline]
    pub fn advance_laps(&mut self, n: isize, len: usize) {
        self.pos += n * len as isize;
        self.recompute_laps(len);
    }

    /// Places the cursor at an absolute unbounded position.
    #[inline]
    pub fn set_pos(&mut self, pos: isize, len: usize) {
        self.pos = pos;
        self.recompute_laps(len);
    }

    /// Returns to the start position with zero laps.
    #[inline]
    pub fn reset(&mut self) {
        self.pos = self.start;
        self.laps = 0;
    }

    /// Elements left before the next wrap boundary: `len - phys`.
    ///
    /// This is the longest run a single contiguous copy can cover from the
    /// current position.
    #[inline]
    pub fn remaining_contiguous(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        len - self.phys(len)
    }

    /// Byte variant of [`CircCursor::remaining_contiguous`].
    #[inline]
    pub fn remaining_contiguous_bytes(&self, len: usize, elem_bytes: usize) -> usize {
        self.remaining_contiguous(len) * elem_bytes
    }

    /// Signed physical distance from `other` inside the ring, ignoring laps.
    ///
    /// Positive means this cursor sits physically ahead of `other` even if
    /// both have wrapped many times.
    #[inline]
    pub fn phys_distance_from(&self, other: &CircCursor, len: usize) -> isize {
        self.phys(len) as isize - other.phys(len) as isize
    }

    #[inline]
    fn recompute_laps(&mut self, len: usize) {
        self.laps = if len == 0 {
            0
        } else {
            (self.pos - self.start) / len as isize
        };
    }
}
