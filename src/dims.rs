//! Dimensional properties: per-dimension extents, derived total length,
//! column-major unit strides, and ROI start offsets.
//!
//! [`Dims`] is the dynamic-rank workhorse stored inside every buffer (both
//! as the full-extent shape and as the ROI). [`FixedDims`] is the
//! compile-time-rank variant with the pad/truncate input policy: missing
//! trailing sizes default to 1, missing trailing offsets default to 0, and
//! excess input is silently ignored.
//!
//! Sizes are only ever replaced wholesale; every replacement recomputes the
//! total length and the strides. Offsets never affect strides and may be set
//! one at a time.

use crate::index::volume;

// ============================================================================
// Dims: dynamic-rank dimensional properties
// ============================================================================

/// Extents, strides, and ROI offsets for a dynamically-ranked dense layout.
///
/// Invariants, maintained by every mutator:
/// * `sizes.len() == strides.len() == offsets.len() == rank`
/// * `len == product(sizes)` (0 for an empty shape)
/// * `strides[0] == 1`, `strides[i] == strides[i-1] * sizes[i-1]`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dims {
    sizes: Vec<usize>,
    strides: Vec<usize>,
    offsets: Vec<usize>,
    len: usize,
}

impl Dims {
    /// An empty, zero-dimensional value (`rank == 0`, `len == 0`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds properties for `sizes` with all offsets at the origin.
    ///
    /// # Panics
    ///
    /// Panics if the shape volume overflows `usize`.
    pub fn from_sizes<S: AsRef<[usize]>>(sizes: S) -> Self {
        let mut dims = Self::new();
        dims.set_sizes(sizes);
        dims
    }

    /// Replaces the whole size sequence and recomputes `len` and strides.
    ///
    /// Accepts any ordered integer sequence (`[usize; N]`, `&[usize]`,
    /// `Vec<usize>`). If the rank changed, offsets are resized: new slots
    /// default to 0, excess slots are dropped.
    ///
    /// # Panics
    ///
    /// Panics if the shape volume overflows `usize`.
    pub fn set_sizes<S: AsRef<[usize]>>(&mut self, sizes: S) {
        self.sizes.clear();
        self.sizes.extend_from_slice(sizes.as_ref());
        self.recompute();
    }

    /// Replaces the whole offset sequence.
    ///
    /// Input shorter than the rank is padded with 0; longer input is
    /// truncated. Strides and total length are unaffected.
    pub fn set_offsets<S: AsRef<[usize]>>(&mut self, offsets: S) {
        self.offsets.clear();
        self.offsets.extend_from_slice(offsets.as_ref());
        self.offsets.resize(self.sizes.len(), 0);
    }

    /// Sets a single offset without touching the others.
    ///
    /// # Panics
    ///
    /// Panics if `d >= rank`.
    #[inline]
    pub fn set_offset(&mut self, d: usize, offset: usize) {
        assert!(
            d < self.offsets.len(),
            "offset dimension {} out of range for rank {}",
            d,
            self.offsets.len()
        );
        self.offsets[d] = offset;
    }

    /// Total number of elements spanned by the shape.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the shape spans no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.sizes.len()
    }

    /// Extent of dimension `d`.
    ///
    /// # Panics
    ///
    /// Panics if `d >= rank`.
    #[inline]
    pub fn dim(&self, d: usize) -> usize {
        assert!(
            d < self.sizes.len(),
            "dimension {} out of range for rank {}",
            d,
            self.sizes.len()
        );
        self.sizes[d]
    }

    /// All extents in dimension order.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.sizes
    }

    /// Elements spanned by one unit of dimension `d`: `prod(sizes[0..d))`.
    ///
    /// For a rows x cols x pages shape this is 1 for a row step, `rows` for
    /// a column step, and `rows * cols` for a page step.
    ///
    /// # Panics
    ///
    /// Panics if `d >= rank`.
    #[inline]
    pub fn stride(&self, d: usize) -> usize {
        assert!(
            d < self.strides.len(),
            "dimension {} out of range for rank {}",
            d,
            self.strides.len()
        );
        self.strides[d]
    }

    /// All unit strides in dimension order.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// ROI start coordinate of dimension `d`.
    ///
    /// # Panics
    ///
    /// Panics if `d >= rank`.
    #[inline]
    pub fn offset(&self, d: usize) -> usize {
        assert!(
            d < self.offsets.len(),
            "offset dimension {} out of range for rank {}",
            d,
            self.offsets.len()
        );
        self.offsets[d]
    }

    /// All ROI start coordinates in dimension order.
    #[inline]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Extent of dimension 0.
    #[inline]
    pub fn rows(&self) -> usize {
        self.dim(0)
    }

    /// Extent of dimension 1.
    #[inline]
    pub fn cols(&self) -> usize {
        self.dim(1)
    }

    /// Extent of dimension 2.
    #[inline]
    pub fn pages(&self) -> usize {
        self.dim(2)
    }

    /// ROI start coordinate of dimension 0.
    #[inline]
    pub fn row_offset(&self) -> usize {
        self.offset(0)
    }

    /// ROI start coordinate of dimension 1.
    #[inline]
    pub fn col_offset(&self) -> usize {
        self.offset(1)
    }

    /// ROI start coordinate of dimension 2.
    #[inline]
    pub fn page_offset(&self) -> usize {
        self.offset(2)
    }

    fn recompute(&mut self) {
        self.len = volume(&self.sizes);
        self.offsets.resize(self.sizes.len(), 0);
        self.strides.resize(self.sizes.len(), 1);
        let mut unit = 1usize;
        for (stride, &size) in self.strides.iter_mut().zip(self.sizes.iter()) {
            *stride = unit;
            unit = unit.saturating_mul(size);
        }
    }
}

// ============================================================================
// FixedDims: compile-time-rank dimensional properties
// ============================================================================

/// Fixed-rank dimensional properties over `[usize; N]` arrays.
///
/// Same accessor surface as [`Dims`], but the rank is a const parameter and
/// size/offset input follows the fixed-rank policy: `set_sizes` pads missing
/// trailing sizes with 1 (keeping the total length meaningful) while
/// `set_offsets` pads missing trailing offsets with 0 (keeping the ROI at
/// the origin); excess input is truncated silently in both cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedDims<const N: usize> {
    sizes: [usize; N],
    strides: [usize; N],
    offsets: [usize; N],
    len: usize,
}

impl<const N: usize> Default for FixedDims<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FixedDims<N> {
    /// All sizes 1 and all offsets 0 (the empty-input fixed point of the
    /// padding policy), so `len() == 1`.
    pub fn new() -> Self {
        let mut dims = FixedDims {
            sizes: [1; N],
            strides: [1; N],
            offsets: [0; N],
            len: 1,
        };
        dims.recompute();
        dims
    }

    /// Builds fixed-rank properties from at most `N` sizes.
    pub fn from_sizes<S: AsRef<[usize]>>(sizes: S) -> Self {
        let mut dims = Self::new();
        dims.set_sizes(sizes);
        dims
    }

    /// Replaces the sizes, padding missing entries with 1 and ignoring
    /// entries beyond rank `N`.
    ///
    /// # Panics
    ///
    /// Panics if the shape volume overflows `usize`.
    pub fn set_sizes<S: AsRef<[usize]>>(&mut self, sizes: S) {
        let sizes = sizes.as_ref();
        for d in 0..N {
            self.sizes[d] = sizes.get(d).copied().unwrap_or(1);
        }
        self.recompute();
    }

    /// Replaces the offsets, padding missing entries with 0 and ignoring
    /// entries beyond rank `N`.
    pub fn set_offsets<S: AsRef<[usize]>>(&mut self, offsets: S) {
        let offsets = offsets.as_ref();
        for d in 0..N {
            self.offsets[d] = offsets.get(d).copied().unwrap_or(0);
        }
    }

    /// Sets a single offset.
    ///
    /// # Panics
    ///
    /// Panics if `d >= N`.
    #[inline]
    pub fn set_offset(&mut self, d: usize, offset: usize) {
        assert!(d < N, "offset dimension {} out of range for rank {}", d, N);
        self.offsets[d] = offset;
    }

    /// Total number of elements spanned by the shape.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the shape spans no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of dimensions (always `N`).
    #[inline]
    pub fn rank(&self) -> usize {
        N
    }

    /// Extent of dimension `d`.
    ///
    /// # Panics
    ///
    /// Panics if `d >= N`.
    #[inline]
    pub fn dim(&self, d: usize) -> usize {
        assert!(d < N, "dimension {} out of range for rank {}", d, N);
        self.sizes[d]
    }

    /// All extents in dimension order.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.sizes
    }

    /// Elements spanned by one unit of dimension `d`.
    ///
    /// # Panics
    ///
    /// Panics if `d >= N`.
    #[inline]
    pub fn stride(&self, d: usize) -> usize {
        assert!(d < N, "dimension {} out of range for rank {}", d, N);
        self.strides[d]
    }

    /// All unit strides in dimension order.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// ROI start coordinate of dimension `d`.
    ///
    /// # Panics
    ///
    /// Panics if `d >= N`.
    #[inline]
    pub fn offset(&self, d: usize) -> usize {
        assert!(d < N, "offset dimension {} out of range for rank {}", d, N);
        self.offsets[d]
    }

    /// All ROI start coordinates in dimension order.
    #[inline]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    fn recompute(&mut self) {
        self.len = if N == 0 { 0 } else { volume(&self.sizes) };
        let mut unit = 1usize;
        for d in 0..N {
            self.strides[d] = unit;
            unit = unit.saturating_mul(self.sizes[d]);
        }
    }
}

impl<const N: usize> From<FixedDims<N>> for Dims {
    fn from(fixed: FixedDims<N>) -> Self {
        let mut dims = Dims::from_sizes(fixed.dims());
        dims.set_offsets(fixed.offsets());
        dims
    }
}
