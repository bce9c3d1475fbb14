//! Linear element storage: an owned contiguous run of cells plus a
//! rebindable head cursor that may alias externally-owned memory instead.
//!
//! Owned elements live in `UnsafeCell`s and are touched through raw
//! pointers, so the streaming layer writes through `&self` while other
//! raw-pointer copies read elsewhere in the ring. A borrowed view taken
//! before such a write stays valid for the elements the write did not
//! touch; written slots must be re-read through a fresh access.
//!
//! The head cursor is the single source of truth for element access. After
//! allocation it points at the owned cells; after a wrap it points at the
//! foreign allocation and the owned cells are simply ignored until
//! [`Storage::rebind_owned`] re-binds them. Ownership is a pointer identity
//! test, not a flag: the storage owns its data exactly when the head equals
//! the first owned cell.

use std::cell::UnsafeCell;
use std::ptr::NonNull;

use bytemuck::Pod;

/// Owned-or-wrapped contiguous storage for `len` elements of `T`.
///
/// `point_bytes` records the byte size of one data point of the *wrapped
/// source type*, which differs from `size_of::<T>()` after wrapping memory
/// of another element type. It is observational: streaming byte math counts
/// in `T` elements; adapters reinterpreting the byte view use it to recover
/// the source granularity.
#[derive(Debug)]
pub struct Storage<T> {
    owned: Vec<UnsafeCell<T>>,
    head: NonNull<T>,
    len: usize,
    point_bytes: usize,
}

impl<T> Default for Storage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Storage<T> {
    /// Empty owning storage.
    pub fn new() -> Self {
        Storage {
            owned: Vec::new(),
            head: NonNull::dangling(),
            len: 0,
            point_bytes: std::mem::size_of::<T>(),
        }
    }

    /// Number of elements reachable from the head cursor.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no elements are reachable.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of owned cells, regardless of where the head points.
    #[inline]
    pub fn owned_len(&self) -> usize {
        self.owned.len()
    }

    /// True iff the head cursor is bound to the first owned cell.
    #[inline]
    pub fn owns_data(&self) -> bool {
        self.head.as_ptr() as *const T == self.owned.as_ptr() as *const T
    }

    /// Byte size of one data point of the wrapped source type.
    #[inline]
    pub fn point_bytes(&self) -> usize {
        self.point_bytes
    }

    /// Raw head pointer.
    #[inline]
    pub fn head_ptr(&self) -> *mut T {
        self.head.as_ptr()
    }

    /// Resizes the owned cells to exactly `new_len` elements, reporting
    /// whether the allocation succeeded.
    ///
    /// On failure the owned cells are left unchanged. The head cursor is not
    /// touched either way; callers rebind it afterwards.
    pub fn try_resize(&mut self, new_len: usize) -> bool
    where
        T: Default,
    {
        if new_len > self.owned.len() {
            let additional = new_len - self.owned.len();
            if self.owned.try_reserve_exact(additional).is_err() {
                return false;
            }
        }
        self.owned
            .resize_with(new_len, || UnsafeCell::new(T::default()));
        true
    }

    /// Rebinds the head cursor to the owned cells.
    pub fn rebind_owned(&mut self) {
        // Vec::as_ptr is never null, even for an empty vector.
        let head = self.owned.as_ptr() as *mut UnsafeCell<T> as *mut T;
        self.head = unsafe { NonNull::new_unchecked(head) };
        self.len = self.owned.len();
        self.point_bytes = std::mem::size_of::<T>();
    }

    /// Rebinds the head cursor to foreign memory without copying.
    ///
    /// # Safety
    ///
    /// `ptr` must point at `len` contiguous elements of `T`, valid for reads
    /// and writes for the entire time this binding is in use. The allocation
    /// is not tracked; dropping it while the binding is live leaves a
    /// dangling cursor.
    pub unsafe fn bind_raw(&mut self, ptr: NonNull<T>, len: usize, point_bytes: usize) {
        self.head = ptr;
        self.len = len;
        self.point_bytes = point_bytes;
    }

    /// Pointer to element slot `index`.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`.
    #[inline]
    pub(crate) unsafe fn slot(&self, index: usize) -> *mut T {
        debug_assert!(index < self.len, "slot {} out of bounds ({})", index, self.len);
        self.head.as_ptr().add(index)
    }

    /// All reachable elements as a slice.
    ///
    /// A slice taken before a streaming write stays valid for the elements
    /// the write did not touch; written slots must be re-read through a
    /// fresh call.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.head.as_ptr(), self.len) }
    }

    /// All reachable elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.head.as_ptr(), self.len) }
    }

    /// All reachable elements as raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8]
    where
        T: Pod,
    {
        bytemuck::cast_slice(self.as_slice())
    }

    /// All reachable elements as raw mutable bytes.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8]
    where
        T: Pod,
    {
        bytemuck::cast_slice_mut(self.as_mut_slice())
    }
}
