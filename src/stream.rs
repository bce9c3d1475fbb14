//! Single-writer / multi-reader streaming over the ring.
//!
//! The buffer carries one write cursor and any number of registered read
//! cursors. Writers append at the write cursor and wrap forever; readers
//! trail the writer, each advancing independently, and are corrected forward
//! when the writer laps them so they never re-read overwritten data.
//!
//! Admission control is writer-side only: the blocking `write_*` entry
//! points queue on a lock, the `*_no_wait` twins give up immediately and
//! report zero. The write position is published with a release store after
//! the data lands and read with acquire loads, so availability computations
//! observe completed writes. Readers are not synchronized against the writer
//! beyond that: a plain-view access racing a concurrent write can observe a
//! torn value, exactly like the position-tracking protocol this implements.
//!
//! Reader identities are explicit. Register an id before reading with it;
//! reads on unknown ids return [`RingError::UnknownReader`]. Distinct ids
//! never contend with each other on the data path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicIsize, Ordering};

use bytemuck::Pod;
use parking_lot::Mutex;

use crate::buffer::RingBuffer;
use crate::cursor::CircCursor;
use crate::index::circ_index;
use crate::{Result, RingError};

/// Identity of a registered read cursor.
pub type ReaderId = u32;

/// Streaming state carried by every buffer.
#[derive(Debug, Default)]
pub(crate) struct StreamCore {
    /// Writer admission. Held for the duration of one write call.
    gate: Mutex<()>,
    /// Unbounded write position, in elements from the start of the stream.
    write_pos: AtomicIsize,
    /// Registered read cursors.
    readers: Mutex<HashMap<ReaderId, CircCursor>>,
}

impl StreamCore {
    pub(crate) fn new() -> Self {
        StreamCore {
            gate: Mutex::new(()),
            write_pos: AtomicIsize::new(0),
            readers: Mutex::new(HashMap::new()),
        }
    }

    /// Restarts the stream: the writer returns to position zero and every
    /// registered reader is rewound with it. Registrations survive.
    pub(crate) fn reset(&self) {
        self.write_pos.store(0, Ordering::Release);
        let mut readers = self.readers.lock();
        for cursor in readers.values_mut() {
            *cursor = CircCursor::new(0, -1);
        }
    }
}

/// Pulls `cursor` forward when the writer has lapped it.
///
/// A lapped reader first jumps to exactly one lap behind the writer, then
/// moves up to the writer's physical position, so everything it reads next
/// is live data in stream order. Readers on the writer's lap are left alone.
fn correct_cursor(cursor: &mut CircCursor, write_pos: isize, len: usize) {
    if len == 0 {
        return;
    }
    let wlaps = write_pos / len as isize;
    let rlaps = cursor.laps();
    if wlaps > rlaps {
        cursor.advance_laps(wlaps - rlaps - 1, len);
        let delta = circ_index(write_pos, len) as isize - cursor.phys(len) as isize;
        if delta > 0 {
            cursor.advance(delta, len);
        }
    }
}

impl<T> RingBuffer<T> {
    // ========================================================================
    // Writer cursor
    // ========================================================================

    /// The writer's unbounded position, in elements from stream start.
    #[inline]
    pub fn writer_pos(&self) -> isize {
        self.stream.write_pos.load(Ordering::Acquire)
    }

    /// Completed circulations of the writer.
    #[inline]
    pub fn writer_laps(&self) -> isize {
        let len = self.len();
        if len == 0 {
            0
        } else {
            self.writer_pos() / len as isize
        }
    }

    /// True while some thread holds the writer gate.
    #[inline]
    pub fn is_writing(&self) -> bool {
        self.stream.gate.is_locked()
    }

    /// Moves the write position by `n` elements without touching data.
    ///
    /// Cursor control for the writing thread; not serialized against
    /// in-flight writes.
    pub fn advance_writer(&self, n: isize) {
        self.stream.write_pos.fetch_add(n, Ordering::AcqRel);
    }

    /// Places the write position at `pos` without touching data.
    pub fn set_writer_pos(&self, pos: isize) {
        self.stream.write_pos.store(pos, Ordering::Release);
    }

    #[inline]
    fn capacity_bytes(&self) -> usize {
        self.len() * std::mem::size_of::<T>()
    }

    // ========================================================================
    // Writing
    // ========================================================================

    /// Appends `src` at the write cursor, wrapping at the end.
    ///
    /// Copies whole elements only; trailing bytes shorter than one element
    /// are ignored. A source longer than the buffer wraps and overwrites
    /// its own earlier chunks, leaving the final bytes in stream order.
    /// Blocks while another thread is writing. Returns the bytes copied,
    /// which is 0 for an empty buffer.
    pub fn write_bytes(&self, src: &[u8]) -> usize
    where
        T: Pod,
    {
        if self.capacity_bytes() == 0 || src.is_empty() {
            return 0;
        }
        let _gate = self.stream.gate.lock();
        self.copy_in(src)
    }

    /// Like [`RingBuffer::write_bytes`] but returns 0 immediately when
    /// another thread is writing.
    pub fn write_bytes_no_wait(&self, src: &[u8]) -> usize
    where
        T: Pod,
    {
        if self.capacity_bytes() == 0 || src.is_empty() {
            return 0;
        }
        match self.stream.gate.try_lock() {
            Some(_gate) => self.copy_in(src),
            None => 0,
        }
    }

    /// Appends one plain-data value. Returns the bytes copied.
    pub fn write_value<V: Pod>(&self, value: &V) -> usize
    where
        T: Pod,
    {
        self.write_bytes(bytemuck::bytes_of(value))
    }

    /// Non-blocking twin of [`RingBuffer::write_value`].
    pub fn write_value_no_wait<V: Pod>(&self, value: &V) -> usize
    where
        T: Pod,
    {
        self.write_bytes_no_wait(bytemuck::bytes_of(value))
    }

    /// Appends a slice of plain-data values. Returns the bytes copied.
    pub fn write_slice<V: Pod>(&self, values: &[V]) -> usize
    where
        T: Pod,
    {
        self.write_bytes(bytemuck::cast_slice(values))
    }

    /// Non-blocking twin of [`RingBuffer::write_slice`].
    pub fn write_slice_no_wait<V: Pod>(&self, values: &[V]) -> usize
    where
        T: Pod,
    {
        self.write_bytes_no_wait(bytemuck::cast_slice(values))
    }

    /// Appends a value sequence element by element. Returns the number of
    /// elements written. The gate is held until the sequence ends, so an
    /// unbounded iterator never releases it.
    pub fn write_iter<I>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: Copy,
    {
        if self.is_empty() {
            return 0;
        }
        let _gate = self.stream.gate.lock();
        self.copy_in_iter(values)
    }

    /// Non-blocking twin of [`RingBuffer::write_iter`].
    pub fn write_iter_no_wait<I>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: Copy,
    {
        if self.is_empty() {
            return 0;
        }
        match self.stream.gate.try_lock() {
            Some(_gate) => self.copy_in_iter(values),
            None => 0,
        }
    }

    /// Byte copy at the write cursor. Caller holds the gate; the buffer is
    /// known non-empty.
    fn copy_in(&self, src: &[u8]) -> usize
    where
        T: Pod,
    {
        let elem = std::mem::size_of::<T>();
        let len = self.len();
        let usable = src.len() - src.len() % elem;
        let base = self.storage.head_ptr() as *mut u8;
        let mut pos = self.stream.write_pos.load(Ordering::Relaxed);
        let mut written = 0;
        while written < usable {
            let phys = circ_index(pos, len);
            let contig = (len - phys) * elem;
            let take = contig.min(usable - written);
            unsafe {
                std::ptr::copy_nonoverlapping(
                    src.as_ptr().add(written),
                    base.add(phys * elem),
                    take,
                );
            }
            written += take;
            pos = pos.wrapping_add((take / elem) as isize);
        }
        self.stream.write_pos.store(pos, Ordering::Release);
        written
    }

    /// Element-wise copy at the write cursor. Caller holds the gate; the
    /// buffer is known non-empty.
    fn copy_in_iter<I>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: Copy,
    {
        let len = self.len();
        let mut pos = self.stream.write_pos.load(Ordering::Relaxed);
        let mut count = 0;
        for value in values {
            let phys = circ_index(pos, len);
            unsafe { std::ptr::write(self.storage.slot(phys), value) };
            pos = pos.wrapping_add(1);
            count += 1;
        }
        self.stream.write_pos.store(pos, Ordering::Release);
        count
    }

    // ========================================================================
    // Reader registry
    // ========================================================================

    /// Registers a read cursor under `id`. Returns false if the id is taken.
    ///
    /// A fresh reader starts one circulation behind the writer (clamped to
    /// the stream start), so it first consumes the oldest live element.
    pub fn register_reader(&self, id: ReaderId) -> bool {
        let write_pos = self.writer_pos();
        let len = self.len();
        let mut readers = self.stream.readers.lock();
        if readers.contains_key(&id) {
            return false;
        }
        let mut cursor = CircCursor::new(0, -1);
        correct_cursor(&mut cursor, write_pos, len);
        readers.insert(id, cursor);
        true
    }

    /// Removes the read cursor under `id`. Returns false if it was unknown.
    pub fn unregister_reader(&self, id: ReaderId) -> bool {
        self.stream.readers.lock().remove(&id).is_some()
    }

    /// All registered reader ids, ascending.
    pub fn reader_ids(&self) -> Vec<ReaderId> {
        let readers = self.stream.readers.lock();
        let mut ids: Vec<ReaderId> = readers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// The reader's unbounded position, in elements from stream start.
    pub fn reader_pos(&self, id: ReaderId) -> Result<isize> {
        let readers = self.stream.readers.lock();
        readers
            .get(&id)
            .map(CircCursor::pos)
            .ok_or(RingError::UnknownReader(id))
    }

    /// Completed circulations of the reader.
    pub fn reader_laps(&self, id: ReaderId) -> Result<isize> {
        let readers = self.stream.readers.lock();
        readers
            .get(&id)
            .map(CircCursor::laps)
            .ok_or(RingError::UnknownReader(id))
    }

    /// Applies lap correction to the reader without consuming anything.
    pub fn catch_up(&self, id: ReaderId) -> Result<()> {
        self.corrected_cursor(id).map(|_| ())
    }

    /// Elements the reader may consume before reaching the writer.
    ///
    /// Lap correction applies first, so the answer never exceeds `len()`.
    pub fn available(&self, id: ReaderId) -> Result<usize> {
        let (cursor, write_pos) = self.corrected_cursor(id)?;
        Ok((write_pos - cursor.pos()).max(0) as usize)
    }

    /// Corrects the reader in the registry and returns a working copy plus
    /// the write position it was corrected against.
    fn corrected_cursor(&self, id: ReaderId) -> Result<(CircCursor, isize)> {
        let write_pos = self.writer_pos();
        let len = self.len();
        let mut readers = self.stream.readers.lock();
        let cursor = readers
            .get_mut(&id)
            .ok_or(RingError::UnknownReader(id))?;
        correct_cursor(cursor, write_pos, len);
        Ok((*cursor, write_pos))
    }

    /// Publishes an advanced cursor back to the registry. A reader
    /// unregistered mid-read simply loses the position.
    fn store_reader(&self, id: ReaderId, cursor: CircCursor) {
        let mut readers = self.stream.readers.lock();
        if let Some(slot) = readers.get_mut(&id) {
            *slot = cursor;
        }
    }

    /// Validates `id` without touching its cursor.
    fn ensure_reader(&self, id: ReaderId) -> Result<()> {
        if self.stream.readers.lock().contains_key(&id) {
            Ok(())
        } else {
            Err(RingError::UnknownReader(id))
        }
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// Copies up to `out.len()` unconsumed elements to `out`, advancing the
    /// reader. Returns the number of elements copied.
    pub fn read(&self, id: ReaderId, out: &mut [T]) -> Result<usize>
    where
        T: Copy,
    {
        let len = self.len();
        if len == 0 || out.is_empty() {
            self.ensure_reader(id)?;
            return Ok(0);
        }
        let (mut cursor, write_pos) = self.corrected_cursor(id)?;
        let n = ((write_pos - cursor.pos()).max(0) as usize).min(out.len());
        let mut copied = 0;
        while copied < n {
            let phys = cursor.phys(len);
            let contig = (len - phys).min(n - copied);
            unsafe {
                std::ptr::copy_nonoverlapping(
                    self.storage.slot(phys) as *const T,
                    out.as_mut_ptr().add(copied),
                    contig,
                );
            }
            copied += contig;
            cursor.advance(contig as isize, len);
        }
        self.store_reader(id, cursor);
        Ok(n)
    }

    /// Copies unconsumed elements as bytes, whole elements only, advancing
    /// the reader. Returns the bytes copied.
    pub fn read_bytes(&self, id: ReaderId, out: &mut [u8]) -> Result<usize>
    where
        T: Pod,
    {
        let elem = std::mem::size_of::<T>();
        let len = self.len();
        if len == 0 || elem == 0 || out.len() < elem {
            self.ensure_reader(id)?;
            return Ok(0);
        }
        let (mut cursor, write_pos) = self.corrected_cursor(id)?;
        let n = ((write_pos - cursor.pos()).max(0) as usize).min(out.len() / elem);
        let base = self.storage.head_ptr() as *const u8;
        let mut copied = 0;
        while copied < n {
            let phys = cursor.phys(len);
            let contig = (len - phys).min(n - copied);
            unsafe {
                std::ptr::copy_nonoverlapping(
                    base.add(phys * elem),
                    out.as_mut_ptr().add(copied * elem),
                    contig * elem,
                );
            }
            copied += contig;
            cursor.advance(contig as isize, len);
        }
        self.store_reader(id, cursor);
        Ok(n * elem)
    }

    /// Streams every unconsumed element into `dst` through `dst`'s write
    /// cursor, advancing both sides. Returns the elements transferred.
    pub fn read_into(&self, id: ReaderId, dst: &RingBuffer<T>) -> Result<usize>
    where
        T: Copy,
    {
        let len = self.len();
        if len == 0 {
            self.ensure_reader(id)?;
            return Ok(0);
        }
        let (mut cursor, write_pos) = self.corrected_cursor(id)?;
        let avail = (write_pos - cursor.pos()).max(0) as usize;
        if avail == 0 {
            return Ok(0);
        }
        let accepted = dst.write_iter(self.circ_iter(cursor.pos(), -1).take(avail).copied());
        cursor.advance(accepted as isize, len);
        self.store_reader(id, cursor);
        Ok(accepted)
    }
}
