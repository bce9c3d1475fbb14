//! The buffer type: dimensional properties plus linear storage, addressed
//! flat, multi-dimensionally, or circularly.
//!
//! `RingBuffer<T>` composes the capability layers instead of inheriting
//! them: [`Dims`] describes the shape, a second `Dims` describes the ROI,
//! [`Storage`] holds or aliases the elements, and the streaming state rides
//! alongside. The accessor families live in separate `impl` blocks per
//! concern (ROI translation in `roi`, iterator constructors in `iter`,
//! streaming in `stream`).
//!
//! Linearization is column-major with the first dimension fastest:
//! `(row, col)` maps to `col * rows + row` and `(row, col, page)` maps to
//! `page * cols * rows + col * rows + row`.
//!
//! Every checked accessor has an `unsafe` unchecked twin for hot paths that
//! have already validated their coordinates.

use std::ops::{Index, IndexMut};
use std::ptr::NonNull;

use bytemuck::Pod;

use crate::dims::Dims;
use crate::index::{checked_volume, circ_index, volume};
use crate::storage::Storage;
use crate::stream::StreamCore;

/// An N-dimensional dense buffer with circular addressing and streaming.
///
/// The buffer either owns its elements (after [`RingBuffer::create`]) or
/// aliases foreign memory (after one of the wrap operations). The ROI is a
/// second set of dimensional properties carving an offset sub-window out of
/// the full extent; it starts equal to the full extent and survives until
/// the shape changes.
///
/// # Example
///
/// ```
/// use ndring::RingBuffer;
///
/// let mut buf: RingBuffer<i32> = RingBuffer::new();
/// assert!(buf.create([4, 4]));
/// *buf.at2_mut(1, 2) = 7;
/// assert_eq!(*buf.at(2 * 4 + 1), 7);
/// ```
#[derive(Debug, Default)]
pub struct RingBuffer<T> {
    pub(crate) dims: Dims,
    pub(crate) roi: Dims,
    pub(crate) storage: Storage<T>,
    pub(crate) stream: StreamCore,
}

// SAFETY: all mutation reachable through a shared reference goes through the
// streaming layer, which writes into the storage cells behind its admission
// lock and publishes the write position with release/acquire atomics. Wrapped foreign
// memory must outlive the buffer per the wrap contracts, which are the only
// way a non-owned pointer gets in.
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send + Sync> Sync for RingBuffer<T> {}

impl<T> RingBuffer<T> {
    /// An empty buffer with no dimensions and no storage.
    pub fn new() -> Self {
        RingBuffer {
            dims: Dims::new(),
            roi: Dims::new(),
            storage: Storage::new(),
            stream: StreamCore::new(),
        }
    }

    /// Allocates a buffer of the given shape.
    ///
    /// Like [`RingBuffer::create`], allocation failure collapses the shape
    /// to whatever was actually obtained instead of failing construction;
    /// check `len()` when that matters.
    pub fn with_shape<S: AsRef<[usize]>>(sizes: S) -> Self
    where
        T: Default,
    {
        let mut buf = Self::new();
        buf.create(sizes);
        buf
    }

    // ========================================================================
    // Shape accessors
    // ========================================================================

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    /// True when the buffer spans no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.rank()
    }

    /// Extent of dimension `d`.
    #[inline]
    pub fn dim(&self, d: usize) -> usize {
        self.dims.dim(d)
    }

    /// All extents in dimension order.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.dims.dims()
    }

    /// Elements spanned by one unit of dimension `d`.
    #[inline]
    pub fn stride(&self, d: usize) -> usize {
        self.dims.stride(d)
    }

    /// All unit strides in dimension order.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        self.dims.strides()
    }

    /// Extent of dimension 0.
    #[inline]
    pub fn rows(&self) -> usize {
        self.dims.rows()
    }

    /// Extent of dimension 1.
    #[inline]
    pub fn cols(&self) -> usize {
        self.dims.cols()
    }

    /// Extent of dimension 2.
    #[inline]
    pub fn pages(&self) -> usize {
        self.dims.pages()
    }

    /// The full-extent dimensional properties.
    #[inline]
    pub fn dims(&self) -> &Dims {
        &self.dims
    }

    // ========================================================================
    // Allocation and wrapping
    // ========================================================================

    /// (Re)allocates owned storage for the given shape.
    ///
    /// Returns `true` when storage now holds exactly the requested number of
    /// elements. On failure (allocation refusal or a shape whose volume
    /// overflows `usize`) the shape collapses to a 1-D buffer over whatever
    /// the owned storage actually holds, and `false` is returned.
    ///
    /// Either way the data cursor is rebound to owned storage, the ROI is
    /// reset to the full extent, and the streaming cursors restart from
    /// position zero.
    pub fn create<S: AsRef<[usize]>>(&mut self, sizes: S) -> bool
    where
        T: Default,
    {
        let sizes = sizes.as_ref();
        let ok = match checked_volume(sizes) {
            Some(want) if self.storage.try_resize(want) => {
                self.dims.set_sizes(sizes);
                true
            }
            _ => {
                let have = self.storage.owned_len();
                self.dims.set_sizes([have]);
                false
            }
        };
        self.reset_data_ptr();
        self.reset_roi();
        self.stream.reset();
        ok
    }

    /// Rebinds the buffer onto foreign memory of the same element type.
    ///
    /// Never copies. The ROI resets to the new full extent and the streaming
    /// cursors restart.
    ///
    /// # Safety
    ///
    /// `ptr` must point at at least `volume(sizes)` contiguous elements of
    /// `T`, valid for reads and writes for as long as this binding is used.
    /// The allocation is not tracked; the caller keeps it alive.
    pub unsafe fn wrap_raw<S: AsRef<[usize]>>(&mut self, ptr: *mut T, sizes: S) {
        let sizes = sizes.as_ref();
        let total = volume(sizes);
        debug_assert!(!ptr.is_null(), "wrapping a null pointer");
        self.dims.set_sizes(sizes);
        self.storage
            .bind_raw(NonNull::new_unchecked(ptr), total, std::mem::size_of::<T>());
        self.reset_roi();
        self.stream.reset();
    }

    /// Rebinds the buffer onto a slice of another POD element type.
    ///
    /// The shape describes `T` elements; the byte size of one source element
    /// is recorded as the buffer's point size (see
    /// [`RingBuffer::point_bytes`]), keeping later byte-granular streaming
    /// of mismatched-type data accurate.
    ///
    /// # Safety
    ///
    /// `source` must outlive every use of this binding (the borrow is not
    /// tracked past this call), must span at least
    /// `volume(sizes) * size_of::<T>()` bytes, and must be aligned for `T`.
    pub unsafe fn wrap_slice<U, S>(&mut self, source: &mut [U], sizes: S)
    where
        T: Pod,
        U: Pod,
        S: AsRef<[usize]>,
    {
        let sizes = sizes.as_ref();
        let total = volume(sizes);
        debug_assert!(
            total * std::mem::size_of::<T>() <= std::mem::size_of_val(source),
            "shape spans {} bytes but the source holds {}",
            total * std::mem::size_of::<T>(),
            std::mem::size_of_val(source),
        );
        debug_assert_eq!(
            source.as_ptr() as usize % std::mem::align_of::<T>(),
            0,
            "source is not aligned for the view element type"
        );
        self.dims.set_sizes(sizes);
        self.storage.bind_raw(
            NonNull::new_unchecked(source.as_mut_ptr() as *mut T),
            total,
            std::mem::size_of::<U>(),
        );
        self.reset_roi();
        self.stream.reset();
    }

    /// Rebinds the data cursor to owned storage, releasing any wrap.
    ///
    /// If the current shape no longer matches the owned storage (it was
    /// describing wrapped memory), the shape collapses to 1-D over the owned
    /// elements and the ROI resets.
    pub fn reset_data_ptr(&mut self) {
        self.storage.rebind_owned();
        if self.dims.len() != self.storage.len() {
            let have = self.storage.len();
            self.dims.set_sizes([have]);
            self.reset_roi();
        }
    }

    /// True iff the data cursor points at the buffer's own storage.
    #[inline]
    pub fn owns_data(&self) -> bool {
        self.storage.owns_data()
    }

    /// Byte size of one data point of the wrapped source type.
    ///
    /// Equals `size_of::<T>()` unless the buffer currently wraps memory of a
    /// different element type. Observational: streaming byte math always
    /// counts in `T` elements; adapters reinterpreting [`RingBuffer::data_bytes`]
    /// use this to recover the source granularity.
    #[inline]
    pub fn point_bytes(&self) -> usize {
        self.storage.point_bytes()
    }

    // ========================================================================
    // Raw data access
    // ========================================================================

    /// All elements as a contiguous slice.
    ///
    /// A view taken before a streaming write stays valid for the elements
    /// the write did not touch; written slots must be re-read through a
    /// fresh call.
    #[inline]
    pub fn data(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// All elements as a contiguous mutable slice.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    /// All elements as raw bytes.
    #[inline]
    pub fn data_bytes(&self) -> &[u8]
    where
        T: Pod,
    {
        self.storage.as_bytes()
    }

    /// All elements as raw mutable bytes.
    #[inline]
    pub fn data_bytes_mut(&mut self) -> &mut [u8]
    where
        T: Pod,
    {
        self.storage.as_bytes_mut()
    }

    // ========================================================================
    // Flat and multi-index access
    // ========================================================================

    /// Element at a flat index.
    ///
    /// # Panics
    ///
    /// Panics if `flat >= len()`.
    #[inline]
    pub fn at(&self, flat: usize) -> &T {
        assert!(
            flat < self.dims.len(),
            "index {} out of bounds for length {}",
            flat,
            self.dims.len()
        );
        unsafe { &*self.storage.slot(flat) }
    }

    /// Mutable element at a flat index.
    ///
    /// # Panics
    ///
    /// Panics if `flat >= len()`.
    #[inline]
    pub fn at_mut(&mut self, flat: usize) -> &mut T {
        assert!(
            flat < self.dims.len(),
            "index {} out of bounds for length {}",
            flat,
            self.dims.len()
        );
        unsafe { &mut *self.storage.slot(flat) }
    }

    /// Element at a flat index without bounds checking.
    ///
    /// # Safety
    ///
    /// `flat` must be less than `len()`.
    #[inline]
    pub unsafe fn at_unchecked(&self, flat: usize) -> &T {
        &*self.storage.slot(flat)
    }

    /// Mutable element at a flat index without bounds checking.
    ///
    /// # Safety
    ///
    /// `flat` must be less than `len()`.
    #[inline]
    pub unsafe fn at_unchecked_mut(&mut self, flat: usize) -> &mut T {
        &mut *self.storage.slot(flat)
    }

    #[inline]
    fn flat2(&self, row: usize, col: usize) -> usize {
        let rows = self.dims.dim(0);
        assert!(row < rows, "row {} out of bounds ({})", row, rows);
        let cols = self.dims.dim(1);
        assert!(col < cols, "col {} out of bounds ({})", col, cols);
        col * rows + row
    }

    #[inline]
    fn flat3(&self, row: usize, col: usize, page: usize) -> usize {
        let flat = self.flat2(row, col);
        let pages = self.dims.dim(2);
        assert!(page < pages, "page {} out of bounds ({})", page, pages);
        page * self.dims.stride(2) + flat
    }

    /// Element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the rank is below 2 or a coordinate is out of range.
    #[inline]
    pub fn at2(&self, row: usize, col: usize) -> &T {
        self.at(self.flat2(row, col))
    }

    /// Mutable element at `(row, col)`.
    #[inline]
    pub fn at2_mut(&mut self, row: usize, col: usize) -> &mut T {
        let flat = self.flat2(row, col);
        self.at_mut(flat)
    }

    /// Element at `(row, col, page)`.
    ///
    /// # Panics
    ///
    /// Panics if the rank is below 3 or a coordinate is out of range.
    #[inline]
    pub fn at3(&self, row: usize, col: usize, page: usize) -> &T {
        self.at(self.flat3(row, col, page))
    }

    /// Mutable element at `(row, col, page)`.
    #[inline]
    pub fn at3_mut(&mut self, row: usize, col: usize, page: usize) -> &mut T {
        let flat = self.flat3(row, col, page);
        self.at_mut(flat)
    }

    #[inline]
    fn flat_nd(&self, indices: &[usize]) -> usize {
        assert!(
            indices.len() == self.dims.rank(),
            "expected {} indices, got {}",
            self.dims.rank(),
            indices.len()
        );
        let mut flat = 0usize;
        for (d, &i) in indices.iter().enumerate() {
            let size = self.dims.dim(d);
            assert!(
                i < size,
                "index {} out of bounds for dimension {} (size {})",
                i,
                d,
                size
            );
            flat += i * self.dims.stride(d);
        }
        flat
    }

    /// Element at an N-dimensional coordinate tuple.
    ///
    /// # Panics
    ///
    /// Panics if the tuple length differs from the rank or any coordinate is
    /// out of range.
    #[inline]
    pub fn at_nd(&self, indices: &[usize]) -> &T {
        self.at(self.flat_nd(indices))
    }

    /// Mutable element at an N-dimensional coordinate tuple.
    #[inline]
    pub fn at_nd_mut(&mut self, indices: &[usize]) -> &mut T {
        let flat = self.flat_nd(indices);
        self.at_mut(flat)
    }

    /// Element at an N-dimensional coordinate tuple, unchecked.
    ///
    /// # Safety
    ///
    /// The tuple length must equal the rank and every coordinate must be in
    /// range for its dimension.
    #[inline]
    pub unsafe fn at_nd_unchecked(&self, indices: &[usize]) -> &T {
        let mut flat = 0usize;
        for (d, &i) in indices.iter().enumerate() {
            flat += i * *self.dims.strides().get_unchecked(d);
        }
        self.at_unchecked(flat)
    }

    /// Mutable element at an N-dimensional coordinate tuple, unchecked.
    ///
    /// # Safety
    ///
    /// Same contract as [`RingBuffer::at_nd_unchecked`].
    #[inline]
    pub unsafe fn at_nd_unchecked_mut(&mut self, indices: &[usize]) -> &mut T {
        let mut flat = 0usize;
        for (d, &i) in indices.iter().enumerate() {
            flat += i * *self.dims.strides().get_unchecked(d);
        }
        self.at_unchecked_mut(flat)
    }

    // ========================================================================
    // Circular access
    // ========================================================================

    /// Element at a flat position wrapped into the buffer.
    ///
    /// Accepts any signed position; `circ_at(-1)` is the last element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[inline]
    pub fn circ_at(&self, pos: isize) -> &T {
        let flat = circ_index(pos, self.dims.len());
        unsafe { self.at_unchecked(flat) }
    }

    /// Mutable element at a flat position wrapped into the buffer.
    #[inline]
    pub fn circ_at_mut(&mut self, pos: isize) -> &mut T {
        let flat = circ_index(pos, self.dims.len());
        unsafe { self.at_unchecked_mut(flat) }
    }

    /// Element at `(row, col)` with each coordinate wrapped against its own
    /// extent.
    #[inline]
    pub fn circ_at2(&self, row: isize, col: isize) -> &T {
        let r = circ_index(row, self.dims.dim(0));
        let c = circ_index(col, self.dims.dim(1));
        self.at2(r, c)
    }

    /// Mutable variant of [`RingBuffer::circ_at2`].
    #[inline]
    pub fn circ_at2_mut(&mut self, row: isize, col: isize) -> &mut T {
        let r = circ_index(row, self.dims.dim(0));
        let c = circ_index(col, self.dims.dim(1));
        self.at2_mut(r, c)
    }

    /// Element at `(row, col, page)` with each coordinate wrapped against
    /// its own extent.
    #[inline]
    pub fn circ_at3(&self, row: isize, col: isize, page: isize) -> &T {
        let r = circ_index(row, self.dims.dim(0));
        let c = circ_index(col, self.dims.dim(1));
        let p = circ_index(page, self.dims.dim(2));
        self.at3(r, c, p)
    }

    /// Mutable variant of [`RingBuffer::circ_at3`].
    #[inline]
    pub fn circ_at3_mut(&mut self, row: isize, col: isize, page: isize) -> &mut T {
        let r = circ_index(row, self.dims.dim(0));
        let c = circ_index(col, self.dims.dim(1));
        let p = circ_index(page, self.dims.dim(2));
        self.at3_mut(r, c, p)
    }

    #[inline]
    fn circ_flat_nd(&self, indices: &[isize]) -> usize {
        assert!(
            indices.len() == self.dims.rank(),
            "expected {} indices, got {}",
            self.dims.rank(),
            indices.len()
        );
        let mut flat = 0usize;
        for (d, &i) in indices.iter().enumerate() {
            flat += circ_index(i, self.dims.dim(d)) * self.dims.stride(d);
        }
        flat
    }

    /// Element at an N-dimensional tuple with per-dimension wrapping.
    #[inline]
    pub fn circ_at_nd(&self, indices: &[isize]) -> &T {
        let flat = self.circ_flat_nd(indices);
        unsafe { self.at_unchecked(flat) }
    }

    /// Mutable variant of [`RingBuffer::circ_at_nd`].
    #[inline]
    pub fn circ_at_nd_mut(&mut self, indices: &[isize]) -> &mut T {
        let flat = self.circ_flat_nd(indices);
        unsafe { self.at_unchecked_mut(flat) }
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    #[inline]
    fn index(&self, flat: usize) -> &T {
        self.at(flat)
    }
}

impl<T> IndexMut<usize> for RingBuffer<T> {
    #[inline]
    fn index_mut(&mut self, flat: usize) -> &mut T {
        self.at_mut(flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(rows: usize, cols: usize) -> RingBuffer<i64> {
        let mut buf = RingBuffer::with_shape([rows, cols]);
        for i in 0..buf.len() {
            *buf.at_mut(i) = i as i64;
        }
        buf
    }

    #[test]
    fn create_allocates_and_zeroes() {
        let mut buf: RingBuffer<u32> = RingBuffer::new();
        assert!(buf.create([3, 4, 2]));
        assert_eq!(buf.len(), 24);
        assert_eq!(buf.rank(), 3);
        assert_eq!(buf.shape(), &[3, 4, 2]);
        assert_eq!(buf.strides(), &[1, 3, 12]);
        assert!(buf.owns_data());
        assert!(buf.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn create_overflow_collapses_to_1d() {
        let mut buf: RingBuffer<u8> = RingBuffer::new();
        assert!(buf.create([8]));
        assert!(!buf.create([usize::MAX, 4]));
        // The old allocation is still there, now described as 1-D.
        assert_eq!(buf.rank(), 1);
        assert_eq!(buf.len(), 8);
        assert!(buf.owns_data());
    }

    #[test]
    fn recreate_changes_shape() {
        let mut buf: RingBuffer<u16> = RingBuffer::with_shape([4, 4]);
        assert_eq!(buf.len(), 16);
        assert!(buf.create([2, 3]));
        assert_eq!(buf.len(), 6);
        assert_eq!(buf.shape(), &[2, 3]);
    }

    #[test]
    fn column_major_two_dim_convention() {
        let buf = filled(4, 3);
        // at2(row, col) reads data[col * rows + row].
        assert_eq!(*buf.at2(0, 0), 0);
        assert_eq!(*buf.at2(1, 0), 1);
        assert_eq!(*buf.at2(0, 1), 4);
        assert_eq!(*buf.at2(2, 1), 6);
        assert_eq!(*buf.at2(3, 2), 11);
    }

    #[test]
    fn column_major_three_dim_convention() {
        let mut buf: RingBuffer<i64> = RingBuffer::with_shape([3, 4, 2]);
        for i in 0..buf.len() {
            *buf.at_mut(i) = i as i64;
        }
        // at3(row, col, page) reads data[page*cols*rows + col*rows + row].
        assert_eq!(*buf.at3(0, 0, 0), 0);
        assert_eq!(*buf.at3(2, 0, 0), 2);
        assert_eq!(*buf.at3(0, 1, 0), 3);
        assert_eq!(*buf.at3(0, 0, 1), 12);
        assert_eq!(*buf.at3(2, 3, 1), 23);
        assert_eq!(*buf.at_nd(&[2, 3, 1]), 23);
    }

    #[test]
    fn nd_access_matches_stride_formula() {
        let buf = filled(4, 3);
        for c in 0..3 {
            for r in 0..4 {
                assert_eq!(*buf.at_nd(&[r, c]), (c * 4 + r) as i64);
                assert_eq!(*buf.at2(r, c), *buf.at_nd(&[r, c]));
            }
        }
    }

    #[test]
    fn index_operator_is_flat_at() {
        let mut buf = filled(2, 2);
        assert_eq!(buf[3], 3);
        buf[3] = -5;
        assert_eq!(*buf.at(3), -5);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn at_rejects_out_of_range() {
        let buf = filled(2, 2);
        let _ = buf.at(4);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn at2_rejects_out_of_range_col() {
        let buf = filled(2, 2);
        let _ = buf.at2(0, 2);
    }

    #[test]
    #[should_panic(expected = "expected 2 indices")]
    fn at_nd_rejects_rank_mismatch() {
        let buf = filled(2, 2);
        let _ = buf.at_nd(&[1]);
    }

    #[test]
    fn circular_flat_access_wraps() {
        let buf = filled(4, 1);
        assert_eq!(*buf.circ_at(0), 0);
        assert_eq!(*buf.circ_at(5), 1);
        assert_eq!(*buf.circ_at(-1), 3);
        assert_eq!(*buf.circ_at(-6), 2);
    }

    #[test]
    fn circular_multi_access_wraps_per_dimension() {
        let buf = filled(4, 3);
        assert_eq!(*buf.circ_at2(4, 3), *buf.at2(0, 0));
        assert_eq!(*buf.circ_at2(-1, -1), *buf.at2(3, 2));
        assert_eq!(*buf.circ_at2(5, -2), *buf.at2(1, 1));
        assert_eq!(*buf.circ_at_nd(&[-1, 4]), *buf.at2(3, 1));
    }

    #[test]
    fn circular_mut_access_writes_through() {
        let mut buf = filled(4, 1);
        *buf.circ_at_mut(-1) = 99;
        assert_eq!(*buf.at(3), 99);
        *buf.circ_at2_mut(-1, 0) = 77;
        assert_eq!(*buf.at2(3, 0), 77);
    }

    #[test]
    fn wrap_raw_aliases_without_copying() {
        let mut source = vec![5i64, 6, 7, 8, 9, 10];
        let mut buf: RingBuffer<i64> = RingBuffer::new();
        unsafe { buf.wrap_raw(source.as_mut_ptr(), [3, 2]) };
        assert!(!buf.owns_data());
        assert_eq!(buf.len(), 6);
        assert_eq!(*buf.at2(1, 1), 9);

        *buf.at_mut(0) = -1;
        assert_eq!(source[0], -1);
    }

    #[test]
    fn wrap_slice_records_source_point_size() {
        let mut source = vec![0u64; 16];
        let mut buf: RingBuffer<u8> = RingBuffer::new();
        unsafe { buf.wrap_slice(&mut source, [64, 2]) };
        assert_eq!(buf.len(), 128);
        assert_eq!(buf.point_bytes(), 8);
        assert!(!buf.owns_data());
    }

    #[test]
    fn reset_data_ptr_releases_a_wrap() {
        let mut source = vec![1u32, 2, 3, 4];
        let mut buf: RingBuffer<u32> = RingBuffer::with_shape([2]);
        *buf.at_mut(0) = 10;
        *buf.at_mut(1) = 20;
        unsafe { buf.wrap_raw(source.as_mut_ptr(), [4]) };
        assert!(!buf.owns_data());
        assert_eq!(buf.len(), 4);

        buf.reset_data_ptr();
        assert!(buf.owns_data());
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.point_bytes(), 4);
        assert_eq!(buf.data(), &[10, 20]);
    }

    #[test]
    fn data_bytes_spans_every_element() {
        let buf: RingBuffer<u32> = RingBuffer::with_shape([5]);
        assert_eq!(buf.data_bytes().len(), 20);
    }

    #[test]
    fn empty_buffer_reports_itself() {
        let buf: RingBuffer<f32> = RingBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.rank(), 0);
        assert_eq!(buf.data(), &[] as &[f32]);
    }
}
