// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Stream - fixed-capacity buffer state
//!
//! A [`Stream`] owns `N` bytes of storage, a cursor and a `used` count:
//!
//! ```text
//!  0                 cursor            used                 N
//!  +-------------------+-----------------+--------------------+
//!  |  consumed/written |  unread         |  garbage           |
//!  +-------------------+-----------------+--------------------+
//! ```
//!
//! - Encoding writes at `cursor` and never moves it past `N`.
//! - Decoding reads at `cursor` and never moves it past `used`.
//! - `reset` only rewinds the bookkeeping; stale bytes stay in storage and are
//!   garbage until overwritten.
//!
//! The encode side lives in `encode.rs`, the decode side (and the borrowed
//! [`Reader`]) in `decode.rs`.

mod decode;
mod encode;

pub use decode::Reader;

use crate::error::{Error, Result};

/// Saved cursor position, see [`Stream::checkpoint`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    cursor: usize,
}

impl Checkpoint {
    /// Cursor position captured by the checkpoint
    pub const fn position(&self) -> usize {
        self.cursor
    }
}

/// Fixed-capacity stream buffer
///
/// The capacity is a const generic, so a stream is sized at compile time and
/// never allocates. `Stream::new` is `const`, which lets a stream live on the
/// stack, in a `static` behind the caller's own lock, or inside an arena.
///
/// # Example
///
/// ```
/// use poke_stream::Stream;
///
/// // "declare a stream named `command` with capacity 64 bytes"
/// type CommandStream = Stream<64>;
///
/// let mut command = CommandStream::new();
/// command.encode_u16(7)?;
/// command.encode_f32(2.5)?;
/// assert_eq!(command.cursor(), 6);
/// # Ok::<(), poke_stream::Error>(())
/// ```
#[derive(Clone)]
pub struct Stream<const N: usize> {
    storage: [u8; N],
    cursor: usize,
    used: usize,
}

impl<const N: usize> Stream<N> {
    /// Capacity in bytes
    pub const CAPACITY: usize = N;

    /// Create an empty stream (cursor and used count at zero)
    pub const fn new() -> Self {
        Self {
            storage: [0u8; N],
            cursor: 0,
            used: 0,
        }
    }

    /// Capacity in bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Current cursor position
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of bytes holding decodable content
    pub const fn used(&self) -> usize {
        self.used
    }

    /// Bytes left before capacity (encode budget)
    pub const fn remaining(&self) -> usize {
        N - self.cursor
    }

    /// Bytes left before `used` (decode budget)
    pub const fn unread(&self) -> usize {
        self.used.saturating_sub(self.cursor)
    }

    /// Bytes encoded so far (`storage[..cursor]`)
    pub fn written(&self) -> &[u8] {
        &self.storage[..self.cursor]
    }

    /// Decodable message (`storage[..used]`)
    pub fn message(&self) -> &[u8] {
        &self.storage[..self.used]
    }

    /// Rewind cursor and used count to zero
    ///
    /// Storage is not cleared. Calling it twice is the same as calling it once.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.used = 0;
    }

    /// Turn the encoded bytes into the decodable message
    ///
    /// Sets `used = cursor` and rewinds the cursor, so a stream written by
    /// one side can be read back from the start.
    pub fn seal(&mut self) {
        self.used = self.cursor;
        self.cursor = 0;
    }

    /// Copy an incoming message into storage for decoding
    ///
    /// Fails with [`Error::Overflow`] (stream untouched) if the message does
    /// not fit.
    pub fn load(&mut self, message: &[u8]) -> Result<()> {
        if message.len() > N {
            log::trace!(
                "[Stream::load] {} bytes rejected (capacity {})",
                message.len(),
                N
            );
            return Err(Error::Overflow {
                requested: message.len(),
                available: N,
            });
        }
        self.storage[..message.len()].copy_from_slice(message);
        self.used = message.len();
        self.cursor = 0;
        Ok(())
    }

    /// Let a transport write a message straight into storage
    ///
    /// `fill` receives the whole storage and returns how many bytes it wrote.
    /// The reported length is clamped to the capacity. On error the stream
    /// bookkeeping is left untouched (storage may hold partial garbage).
    ///
    /// # Example
    ///
    /// ```
    /// use poke_stream::Stream;
    ///
    /// let mut stream = Stream::<8>::new();
    /// let len = stream.receive(|buf| {
    ///     buf[..2].copy_from_slice(&[0xAB, 0xCD]);
    ///     Ok::<usize, ()>(2)
    /// })?;
    /// assert_eq!(len, 2);
    /// assert_eq!(stream.message(), &[0xAB, 0xCD]);
    /// # Ok::<(), ()>(())
    /// ```
    pub fn receive<E, F>(&mut self, fill: F) -> core::result::Result<usize, E>
    where
        F: FnOnce(&mut [u8]) -> core::result::Result<usize, E>,
    {
        let len = fill(&mut self.storage)?.min(N);
        self.used = len;
        self.cursor = 0;
        Ok(len)
    }

    /// Capture the cursor so a failed multi-step operation can be rolled back
    pub const fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            cursor: self.cursor,
        }
    }

    /// Move the cursor back (or forward) to a captured position
    pub fn restore(&mut self, checkpoint: Checkpoint) -> Result<()> {
        self.seek(checkpoint.cursor)
    }

    /// Move the cursor to an absolute position
    ///
    /// Any position up to the capacity is accepted; decode operations still
    /// refuse to read past `used`.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > N {
            return Err(Error::InvalidPosition {
                position,
                limit: N,
            });
        }
        self.cursor = position;
        Ok(())
    }

    /// Borrowed read view starting at the current cursor
    ///
    /// The reader has its own cursor, so several decoded views (strings,
    /// byte slices) can be held at once. While any of them is alive the
    /// stream cannot be reset or encoded into.
    pub fn reader(&self) -> Reader<'_> {
        Reader::at(&self.storage[..self.used], self.cursor.min(self.used))
    }

    /// Rewind to a checkpoint taken on this stream
    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) {
        self.cursor = checkpoint.cursor.min(N);
    }

    /// Run a decode step on a reader and commit its cursor on success
    ///
    /// The cursor only moves forward. With the cursor past `used` (encoded
    /// but not sealed, or after a `seek`) the reader starts empty, so any
    /// non-empty read underflows and an empty one leaves the cursor alone.
    fn read<'s, T>(&'s mut self, step: impl FnOnce(&mut Reader<'s>) -> Result<T>) -> Result<T> {
        let start = self.cursor.min(self.used);
        let mut reader = Reader::at(&self.storage[..self.used], start);
        let value = step(&mut reader)?;
        let end = reader.position();
        if end > start {
            self.cursor = end;
        }
        Ok(value)
    }
}

impl<const N: usize> Default for Stream<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for Stream<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Stream")
            .field("capacity", &N)
            .field("cursor", &self.cursor)
            .field("used", &self.used)
            .finish()
    }
}
