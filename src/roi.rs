//! Region-of-interest addressing.
//!
//! The ROI is a second set of dimensional properties layered over the full
//! extent: its own sizes (and therefore strides and length) plus an offset
//! per dimension locating the window inside the buffer. ROI accessors take
//! window-local coordinates, translate them through the offsets, and land on
//! the underlying element.
//!
//! A freshly shaped buffer has its ROI equal to the full extent. The window
//! can be narrowed with the validated [`RingBuffer::set_roi`], or mutated
//! freely through [`RingBuffer::roi_mut`] when the caller takes over
//! responsibility for containment; checked ROI accessors still bounds-check
//! the translated index against the full extent, so an inconsistent window
//! panics instead of reading out of bounds.

use crate::buffer::RingBuffer;
use crate::dims::Dims;
use crate::index::circ_index;
use crate::{Result, RingError};

impl<T> RingBuffer<T> {
    // ========================================================================
    // Window management
    // ========================================================================

    /// The current region-of-interest properties.
    #[inline]
    pub fn roi(&self) -> &Dims {
        &self.roi
    }

    /// Mutable access to the region-of-interest properties.
    ///
    /// No containment validation is performed here; prefer
    /// [`RingBuffer::set_roi`] unless the window is reshaped piecemeal.
    #[inline]
    pub fn roi_mut(&mut self) -> &mut Dims {
        &mut self.roi
    }

    /// Number of elements inside the window.
    #[inline]
    pub fn roi_len(&self) -> usize {
        self.roi.len()
    }

    /// Extent of window dimension `d`.
    #[inline]
    pub fn roi_dim(&self, d: usize) -> usize {
        self.roi.dim(d)
    }

    /// Restores the window to the full extent with zero offsets.
    pub fn reset_roi(&mut self) {
        self.roi = self.dims.clone();
    }

    /// Replaces the window after validating it against the full extent.
    ///
    /// Both slices must carry one entry per buffer dimension. Each extent
    /// must fit its dimension and each `offset + extent` must stay inside
    /// it. On error the current window is left untouched.
    pub fn set_roi<S, O>(&mut self, sizes: S, offsets: O) -> Result<()>
    where
        S: AsRef<[usize]>,
        O: AsRef<[usize]>,
    {
        let sizes = sizes.as_ref();
        let offsets = offsets.as_ref();
        let rank = self.dims.rank();
        if sizes.len() != rank {
            return Err(RingError::RankMismatch(rank, sizes.len()));
        }
        if offsets.len() != rank {
            return Err(RingError::RankMismatch(rank, offsets.len()));
        }
        for d in 0..rank {
            let max = self.dims.dim(d);
            if sizes[d] > max {
                return Err(RingError::RoiExtent {
                    dim: d,
                    size: sizes[d],
                    max,
                });
            }
            let end = offsets[d].checked_add(sizes[d]);
            if end.map_or(true, |end| end > max) {
                return Err(RingError::RoiOffset {
                    dim: d,
                    offset: offsets[d],
                    size: sizes[d],
                    max,
                });
            }
        }
        self.roi.set_sizes(sizes);
        self.roi.set_offsets(offsets);
        Ok(())
    }

    // ========================================================================
    // Window-local access
    // ========================================================================

    /// True when the window lies entirely inside the full extent.
    pub(crate) fn roi_contained(&self) -> bool {
        self.roi.rank() == self.dims.rank()
            && (0..self.dims.rank()).all(|d| {
                self.roi
                    .offset(d)
                    .checked_add(self.roi.dim(d))
                    .map_or(false, |end| end <= self.dims.dim(d))
            })
    }

    /// Translates a window-local flat index to a full-extent flat index.
    ///
    /// Decomposes against the window strides, shifts each coordinate by its
    /// offset, and recomposes against the full-extent strides.
    #[inline]
    pub(crate) fn roi_base(&self, flat: usize) -> usize {
        assert!(
            flat < self.roi.len(),
            "window index {} out of bounds for window length {}",
            flat,
            self.roi.len()
        );
        let mut rem = flat;
        let mut base = 0usize;
        for d in (0..self.roi.rank()).rev() {
            let coord = rem / self.roi.stride(d);
            rem %= self.roi.stride(d);
            base += (coord + self.roi.offset(d)) * self.dims.stride(d);
        }
        base
    }

    /// Element at a window-local flat index.
    ///
    /// # Panics
    ///
    /// Panics if `flat >= roi_len()`, or if the translated index falls
    /// outside the full extent (possible only after unchecked window
    /// mutation).
    #[inline]
    pub fn roi_at(&self, flat: usize) -> &T {
        self.at(self.roi_base(flat))
    }

    /// Mutable element at a window-local flat index.
    #[inline]
    pub fn roi_at_mut(&mut self, flat: usize) -> &mut T {
        let base = self.roi_base(flat);
        self.at_mut(base)
    }

    /// Element at a window-local flat index without bounds checking.
    ///
    /// # Safety
    ///
    /// `flat` must be less than `roi_len()` and the window must lie inside
    /// the full extent.
    #[inline]
    pub unsafe fn roi_at_unchecked(&self, flat: usize) -> &T {
        let mut rem = flat;
        let mut base = 0usize;
        for d in (0..self.roi.rank()).rev() {
            let stride = *self.roi.strides().get_unchecked(d);
            let coord = rem / stride;
            rem %= stride;
            base += (coord + *self.roi.offsets().get_unchecked(d))
                * *self.dims.strides().get_unchecked(d);
        }
        self.at_unchecked(base)
    }

    /// Mutable element at a window-local flat index without bounds checking.
    ///
    /// # Safety
    ///
    /// Same contract as [`RingBuffer::roi_at_unchecked`].
    #[inline]
    pub unsafe fn roi_at_unchecked_mut(&mut self, flat: usize) -> &mut T {
        let mut rem = flat;
        let mut base = 0usize;
        for d in (0..self.roi.rank()).rev() {
            let stride = *self.roi.strides().get_unchecked(d);
            let coord = rem / stride;
            rem %= stride;
            base += (coord + *self.roi.offsets().get_unchecked(d))
                * *self.dims.strides().get_unchecked(d);
        }
        self.at_unchecked_mut(base)
    }

    #[inline]
    fn roi_flat2(&self, row: usize, col: usize) -> usize {
        let rows = self.roi.dim(0);
        assert!(row < rows, "window row {} out of bounds ({})", row, rows);
        let cols = self.roi.dim(1);
        assert!(col < cols, "window col {} out of bounds ({})", col, cols);
        col * rows + row
    }

    #[inline]
    fn roi_flat3(&self, row: usize, col: usize, page: usize) -> usize {
        let flat = self.roi_flat2(row, col);
        let pages = self.roi.dim(2);
        assert!(
            page < pages,
            "window page {} out of bounds ({})",
            page,
            pages
        );
        page * self.roi.stride(2) + flat
    }

    /// Element at window-local `(row, col)`.
    ///
    /// Offsets of every dimension apply, including dimensions beyond the
    /// two addressed here.
    #[inline]
    pub fn roi_at2(&self, row: usize, col: usize) -> &T {
        self.roi_at(self.roi_flat2(row, col))
    }

    /// Mutable element at window-local `(row, col)`.
    #[inline]
    pub fn roi_at2_mut(&mut self, row: usize, col: usize) -> &mut T {
        let flat = self.roi_flat2(row, col);
        self.roi_at_mut(flat)
    }

    /// Element at window-local `(row, col, page)`.
    #[inline]
    pub fn roi_at3(&self, row: usize, col: usize, page: usize) -> &T {
        self.roi_at(self.roi_flat3(row, col, page))
    }

    /// Mutable element at window-local `(row, col, page)`.
    #[inline]
    pub fn roi_at3_mut(&mut self, row: usize, col: usize, page: usize) -> &mut T {
        let flat = self.roi_flat3(row, col, page);
        self.roi_at_mut(flat)
    }

    #[inline]
    fn roi_base_nd(&self, indices: &[usize]) -> usize {
        assert!(
            indices.len() == self.roi.rank(),
            "expected {} indices, got {}",
            self.roi.rank(),
            indices.len()
        );
        let mut base = 0usize;
        for (d, &i) in indices.iter().enumerate() {
            let size = self.roi.dim(d);
            assert!(
                i < size,
                "window index {} out of bounds for dimension {} (size {})",
                i,
                d,
                size
            );
            base += (i + self.roi.offset(d)) * self.dims.stride(d);
        }
        base
    }

    /// Element at a window-local N-dimensional coordinate tuple.
    #[inline]
    pub fn roi_at_nd(&self, indices: &[usize]) -> &T {
        self.at(self.roi_base_nd(indices))
    }

    /// Mutable element at a window-local N-dimensional coordinate tuple.
    #[inline]
    pub fn roi_at_nd_mut(&mut self, indices: &[usize]) -> &mut T {
        let base = self.roi_base_nd(indices);
        self.at_mut(base)
    }

    // ========================================================================
    // Circular window access
    // ========================================================================

    /// Element at a window-local flat position wrapped into the window.
    ///
    /// # Panics
    ///
    /// Panics if the window is empty.
    #[inline]
    pub fn circ_roi_at(&self, pos: isize) -> &T {
        let flat = circ_index(pos, self.roi.len());
        self.at(self.roi_base(flat))
    }

    /// Mutable variant of [`RingBuffer::circ_roi_at`].
    #[inline]
    pub fn circ_roi_at_mut(&mut self, pos: isize) -> &mut T {
        let flat = circ_index(pos, self.roi.len());
        let base = self.roi_base(flat);
        self.at_mut(base)
    }

    /// Element at window-local `(row, col)` with each coordinate wrapped
    /// against the window extent.
    #[inline]
    pub fn circ_roi_at2(&self, row: isize, col: isize) -> &T {
        let r = circ_index(row, self.roi.dim(0));
        let c = circ_index(col, self.roi.dim(1));
        self.roi_at2(r, c)
    }

    /// Mutable variant of [`RingBuffer::circ_roi_at2`].
    #[inline]
    pub fn circ_roi_at2_mut(&mut self, row: isize, col: isize) -> &mut T {
        let r = circ_index(row, self.roi.dim(0));
        let c = circ_index(col, self.roi.dim(1));
        self.roi_at2_mut(r, c)
    }

    /// Element at window-local `(row, col, page)` with each coordinate
    /// wrapped against the window extent.
    #[inline]
    pub fn circ_roi_at3(&self, row: isize, col: isize, page: isize) -> &T {
        let r = circ_index(row, self.roi.dim(0));
        let c = circ_index(col, self.roi.dim(1));
        let p = circ_index(page, self.roi.dim(2));
        self.roi_at3(r, c, p)
    }

    /// Mutable variant of [`RingBuffer::circ_roi_at3`].
    #[inline]
    pub fn circ_roi_at3_mut(&mut self, row: isize, col: isize, page: isize) -> &mut T {
        let r = circ_index(row, self.roi.dim(0));
        let c = circ_index(col, self.roi.dim(1));
        let p = circ_index(page, self.roi.dim(2));
        self.roi_at3_mut(r, c, p)
    }

    /// Element at a window-local tuple with per-dimension wrapping.
    #[inline]
    pub fn circ_roi_at_nd(&self, indices: &[isize]) -> &T {
        let base = self.circ_roi_base_nd(indices);
        self.at(base)
    }

    /// Mutable variant of [`RingBuffer::circ_roi_at_nd`].
    #[inline]
    pub fn circ_roi_at_nd_mut(&mut self, indices: &[isize]) -> &mut T {
        let base = self.circ_roi_base_nd(indices);
        self.at_mut(base)
    }

    #[inline]
    fn circ_roi_base_nd(&self, indices: &[isize]) -> usize {
        assert!(
            indices.len() == self.roi.rank(),
            "expected {} indices, got {}",
            self.roi.rank(),
            indices.len()
        );
        let mut base = 0usize;
        for (d, &i) in indices.iter().enumerate() {
            let coord = circ_index(i, self.roi.dim(d));
            base += (coord + self.roi.offset(d)) * self.dims.stride(d);
        }
        base
    }
}
