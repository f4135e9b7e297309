// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Call dispatch keyed by message id
//!
//! A remote call is an input stream starting with a [`MessageId`] tag followed
//! by the encoded arguments. The receiving side looks the id up in a fixed
//! route table and hands both streams to the registered [`Handler`], which
//! decodes its arguments from `input` and encodes its results into `output`.
//!
//! ```
//! use poke_stream::dispatch::begin_call;
//! use poke_stream::{Dispatcher, MessageId, Result, Stream};
//!
//! const DO_MATH: MessageId = MessageId::from_name("do_math");
//!
//! let mut do_math = |input: &mut Stream<32>, output: &mut Stream<32>| -> Result<()> {
//!     let value = input.decode_i32()?;
//!     output.encode_i32(value * 2)
//! };
//!
//! let mut dispatcher = Dispatcher::<'_, 32, 4>::new();
//! dispatcher.register(DO_MATH, &mut do_math)?;
//!
//! let mut input = Stream::<32>::new();
//! begin_call(DO_MATH, &mut input)?;
//! input.encode_i32(21)?;
//! input.seal();
//!
//! let mut output = Stream::<32>::new();
//! dispatcher.dispatch_tagged(&mut input, &mut output)?;
//! output.seal();
//! assert_eq!(output.decode_i32()?, 42);
//! # Ok::<(), poke_stream::Error>(())
//! ```

use core::fmt;

use heapless::Vec;

use crate::codec::{Decode, Encode};
use crate::error::{Error, Result};
use crate::stream::{Reader, Stream};

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Identifier of a remote call, encoded as a native `u32` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u32);

impl MessageId {
    /// Derive an id from a function name (FNV-1a, usable in `const`)
    ///
    /// Both sides of a link derive the same id from the same name, so no
    /// numbering table has to be kept in sync.
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = FNV_OFFSET;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u32;
            hash = hash.wrapping_mul(FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Raw tag value
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl From<u32> for MessageId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Encode for MessageId {
    #[inline]
    fn encode<const N: usize>(&self, stream: &mut Stream<N>) -> Result<()> {
        stream.encode_u32(self.0)
    }
}

impl Decode<'_> for MessageId {
    #[inline]
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.decode_u32().map(Self)
    }
}

/// Server-side implementation of one call
pub trait Handler<const N: usize> {
    /// Decode arguments from `input` and encode results into `output`
    fn handle(&mut self, input: &mut Stream<N>, output: &mut Stream<N>) -> Result<()>;
}

impl<const N: usize, F> Handler<N> for F
where
    F: FnMut(&mut Stream<N>, &mut Stream<N>) -> Result<()>,
{
    #[inline]
    fn handle(&mut self, input: &mut Stream<N>, output: &mut Stream<N>) -> Result<()> {
        self(input, output)
    }
}

/// Route table of at most `H` handlers over streams of capacity `N`
///
/// Handlers are borrowed for `'h`, so the table never allocates and can sit
/// on the stack next to the handlers' state.
pub struct Dispatcher<'h, const N: usize, const H: usize> {
    routes: Vec<(MessageId, &'h mut dyn Handler<N>), H>,
}

impl<'h, const N: usize, const H: usize> Dispatcher<'h, N, H> {
    /// Create an empty dispatcher
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no route is registered
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Whether a handler is registered for `id`
    pub fn contains(&self, id: MessageId) -> bool {
        self.routes.iter().any(|(route, _)| *route == id)
    }

    /// Register a handler for `id`
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateMessage`] if `id` already has a handler
    /// - [`Error::ResourceExhausted`] if the table already holds `H` routes
    pub fn register(&mut self, id: MessageId, handler: &'h mut dyn Handler<N>) -> Result<()> {
        if self.contains(id) {
            log::warn!("[Dispatcher] message {} registered twice", id);
            return Err(Error::DuplicateMessage { id: id.0 });
        }
        self.routes.push((id, handler)).map_err(|_| {
            log::warn!("[Dispatcher] route table full ({} entries)", H);
            Error::ResourceExhausted
        })?;
        log::debug!("[Dispatcher] registered message {}", id);
        Ok(())
    }

    /// Run the handler registered for `id`
    ///
    /// `input` is handed over as is, positioned at the first argument.
    pub fn dispatch(
        &mut self,
        id: MessageId,
        input: &mut Stream<N>,
        output: &mut Stream<N>,
    ) -> Result<()> {
        let Some((_, handler)) = self.routes.iter_mut().find(|(route, _)| *route == id) else {
            log::warn!("[Dispatcher] no handler for message {}", id);
            return Err(Error::UnknownMessage { id: id.0 });
        };
        log::trace!("[Dispatcher] dispatching message {}", id);
        handler.handle(input, output)
    }

    /// Decode the [`MessageId`] tag at the head of `input`, then dispatch
    ///
    /// On an unknown id the tag stays consumed; the caller decides whether to
    /// rewind or drop the message.
    pub fn dispatch_tagged(&mut self, input: &mut Stream<N>, output: &mut Stream<N>) -> Result<()> {
        let id: MessageId = input.decode_value()?;
        self.dispatch(id, input, output)
    }
}

impl<const N: usize, const H: usize> Default for Dispatcher<'_, N, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize, const H: usize> fmt::Debug for Dispatcher<'_, N, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.routes.iter().map(|(id, _)| id))
            .finish()
    }
}

/// Start a call message: reset `stream` and encode the id tag
pub fn begin_call<const N: usize>(id: MessageId, stream: &mut Stream<N>) -> Result<()> {
    stream.reset();
    stream.encode_value(&id)
}
