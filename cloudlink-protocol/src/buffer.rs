//! Fixed-capacity byte buffer with a separate read cursor
//!
//! A `Buffer` is filled by the codec's pack methods (or by a received
//! frame) and drained by the unpack methods. Writing appends after the
//! used bytes; reading walks a cursor over them. Capacity is fixed at
//! compile time and the buffer never reallocates.
//!
//! Invariant: `read_position() <= len() <= capacity()`.

use heapless::Vec;

/// Byte store shared between the codec and the link engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer<const N: usize> {
    data: Vec<u8, N>,
    read: usize,
}

impl<const N: usize> Default for Buffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Buffer<N> {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            read: 0,
        }
    }

    /// Create a buffer holding a copy of `bytes`
    ///
    /// Returns `None` if `bytes` does not fit.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let mut buffer = Self::new();
        buffer.data.extend_from_slice(bytes).ok()?;
        Some(buffer)
    }

    /// Total capacity in bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of bytes written
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The written bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Current read cursor
    pub fn read_position(&self) -> usize {
        self.read
    }

    /// True if `n` more bytes can be appended
    pub fn available(&self, n: usize) -> bool {
        N - self.data.len() >= n
    }

    /// Append one byte
    ///
    /// Returns `false` without writing if the buffer is full.
    pub fn append(&mut self, byte: u8) -> bool {
        self.data.push(byte).is_ok()
    }

    /// Next unread byte, without advancing
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.read).copied()
    }

    /// Read one byte and advance
    ///
    /// Past the end this returns 0 and the cursor stays put; check
    /// [`remaining`](Self::remaining) first.
    pub fn read(&mut self) -> u8 {
        match self.data.get(self.read) {
            Some(&byte) => {
                self.read += 1;
                byte
            }
            None => 0,
        }
    }

    /// True if at least `n` unread bytes remain
    pub fn remaining(&self, n: usize) -> bool {
        self.remaining_len() >= n
    }

    /// Number of unread bytes
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.read
    }

    /// Move the read cursor back to the start, keeping the data
    pub fn restart(&mut self) {
        self.read = 0;
    }

    /// Discard all data
    pub fn clear(&mut self) {
        self.data.clear();
        self.read = 0;
    }

    /// Replace the contents with bytes produced by `fill`
    ///
    /// `fill` receives the whole capacity and returns how many bytes it
    /// wrote. On error the buffer is left empty.
    pub fn load<E>(&mut self, fill: impl FnOnce(&mut [u8]) -> Result<usize, E>) -> Result<usize, E> {
        self.clear();
        // Cannot fail: the new length equals the capacity
        let _ = self.data.resize(N, 0);

        match fill(&mut self.data[..]) {
            Ok(written) => {
                self.data.truncate(written.min(N));
                Ok(written)
            }
            Err(e) => {
                self.data.clear();
                Err(e)
            }
        }
    }

    /// Unread bytes, from the cursor to the end of the data
    pub(crate) fn unread(&self) -> &[u8] {
        &self.data[self.read..]
    }

    /// Advance the cursor by `n` bytes, clamped to the data
    pub(crate) fn advance(&mut self, n: usize) {
        self.read = (self.read + n).min(self.data.len());
    }

    /// The written bytes alongside the cursor, for reads that borrow data
    /// and move the cursor in one step
    ///
    /// Callers keep the cursor within `data.len()`.
    pub(crate) fn split_cursor(&mut self) -> (&[u8], &mut usize) {
        (self.data.as_slice(), &mut self.read)
    }

    /// Put the cursor at an earlier saved position
    pub(crate) fn seek(&mut self, position: usize) {
        self.read = position.min(self.data.len());
    }

    /// Append bytes that were already checked with [`available`](Self::available)
    pub(crate) fn put(&mut self, bytes: &[u8]) {
        // Callers reserve space first, so this never truncates
        let _ = self.data.extend_from_slice(bytes);
    }
}
