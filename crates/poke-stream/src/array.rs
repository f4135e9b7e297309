// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic array coder
//!
//! [`code_array`] walks a flat sequence of elements and hands each one to an
//! [`ElementCoder`] together with the stream. The same loop serves both
//! directions: feed it `&T` handles and an encoding coder to build a message,
//! or `&mut T` handles and a decoding coder to fill an array back in.
//!
//! Multi-dimensional arrays are flattened row-major by the caller:
//!
//! ```
//! use poke_stream::array::{code_array, Encoder, StreamDecoder};
//! use poke_stream::Stream;
//!
//! let grid: [[u16; 3]; 2] = [[1, 2, 3], [4, 5, 6]];
//! let mut stream = Stream::<12>::new();
//! code_array(&mut stream, grid.iter().flatten(), Encoder)?;
//!
//! stream.seal();
//! let mut back = [[0u16; 3]; 2];
//! code_array(&mut stream, back.iter_mut().flatten(), StreamDecoder)?;
//! assert_eq!(back, grid);
//! # Ok::<(), poke_stream::ElementFailure<poke_stream::Error>>(())
//! ```
//!
//! The loop stops at the first failing element. It is not atomic: elements
//! coded before the failure stay written to (or consumed from) the stream.
//! Callers that need all-or-nothing take a [`Stream::checkpoint`] first.

use core::slice::{ChunksExact, ChunksExactMut};

use crate::codec::{Decode, Encode};
use crate::error::{ElementFailure, Error, Result};
use crate::stream::{Reader, Stream};

/// Encodes or decodes exactly one element against a stream
///
/// `S` is the stream type ([`Stream<N>`] or [`Reader`]) and `T` the element
/// handle handed out by the iterator (`&U` when encoding, `&mut U` when
/// decoding, `&[u8]`/`&mut [u8]` for raw elements). Closures of shape
/// `FnMut(&mut S, T) -> Result<(), E>` implement it directly; implement it on
/// a struct for coders that carry state.
pub trait ElementCoder<S: ?Sized, T> {
    /// Failure reported for one element
    type Error;

    /// Code one element
    fn code(&mut self, stream: &mut S, element: T) -> core::result::Result<(), Self::Error>;
}

impl<S, T, E, F> ElementCoder<S, T> for F
where
    S: ?Sized,
    F: FnMut(&mut S, T) -> core::result::Result<(), E>,
{
    type Error = E;

    #[inline]
    fn code(&mut self, stream: &mut S, element: T) -> core::result::Result<(), E> {
        self(stream, element)
    }
}

/// Code every element of a flattened array, stopping at the first failure
///
/// Returns the number of elements coded. On failure the coder's error is
/// returned unchanged inside [`ElementFailure`], with the index of the
/// failing element; the stream cursor then reflects exactly the elements
/// before it.
pub fn code_array<S, I, C>(
    stream: &mut S,
    elements: I,
    mut coder: C,
) -> core::result::Result<usize, ElementFailure<C::Error>>
where
    S: ?Sized,
    I: IntoIterator,
    C: ElementCoder<S, I::Item>,
{
    let mut coded = 0;
    for element in elements {
        if let Err(source) = coder.code(stream, element) {
            log::debug!(
                "[code_array] element {} failed, {} elements already coded",
                coded,
                coded
            );
            return Err(ElementFailure {
                index: coded,
                source,
            });
        }
        coded += 1;
    }
    Ok(coded)
}

fn check_geometry(len: usize, count: usize, size: usize) -> Result<()> {
    if size == 0 || count.checked_mul(size) != Some(len) {
        log::trace!(
            "[array] {} bytes cannot hold {} elements of {} bytes",
            len,
            count,
            size
        );
        return Err(Error::InvalidParameter);
    }
    Ok(())
}

/// View an untyped flat region as `count` elements of `size` bytes
///
/// Fails with [`Error::InvalidParameter`] unless `bytes.len() == count * size`
/// and `size > 0`.
pub fn elements(bytes: &[u8], count: usize, size: usize) -> Result<ChunksExact<'_, u8>> {
    check_geometry(bytes.len(), count, size)?;
    Ok(bytes.chunks_exact(size))
}

/// Mutable counterpart of [`elements`], for decoding into a raw region
pub fn elements_mut(bytes: &mut [u8], count: usize, size: usize) -> Result<ChunksExactMut<'_, u8>> {
    check_geometry(bytes.len(), count, size)?;
    Ok(bytes.chunks_exact_mut(size))
}

/// Element coder encoding any [`Encode`] element into a [`Stream`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder;

impl<'v, const N: usize, T> ElementCoder<Stream<N>, &'v T> for Encoder
where
    T: Encode + ?Sized,
{
    type Error = Error;

    #[inline]
    fn code(&mut self, stream: &mut Stream<N>, element: &'v T) -> Result<()> {
        element.encode(stream)
    }
}

/// Element coder decoding owned [`Decode`] elements from a [`Stream`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamDecoder;

impl<'v, const N: usize, T> ElementCoder<Stream<N>, &'v mut T> for StreamDecoder
where
    T: for<'s> Decode<'s>,
{
    type Error = Error;

    #[inline]
    fn code(&mut self, stream: &mut Stream<N>, slot: &'v mut T) -> Result<()> {
        *slot = stream.decode_value()?;
        Ok(())
    }
}

/// Element coder decoding [`Decode`] elements from a [`Reader`]
///
/// Unlike [`StreamDecoder`] the elements may borrow from the reader's
/// buffer (for instance `&str`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder;

impl<'a, 'v, T> ElementCoder<Reader<'a>, &'v mut T> for Decoder
where
    T: Decode<'a>,
{
    type Error = Error;

    #[inline]
    fn code(&mut self, reader: &mut Reader<'a>, slot: &'v mut T) -> Result<()> {
        *slot = T::decode(reader)?;
        Ok(())
    }
}

/// Element coder copying raw element bytes into the stream
#[derive(Debug, Clone, Copy, Default)]
pub struct RawEncoder;

impl<'v, const N: usize> ElementCoder<Stream<N>, &'v [u8]> for RawEncoder {
    type Error = Error;

    #[inline]
    fn code(&mut self, stream: &mut Stream<N>, element: &'v [u8]) -> Result<()> {
        stream.encode_bytes(element)
    }
}

/// Element coder copying raw element bytes out of the stream
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDecoder;

impl<'v, const N: usize> ElementCoder<Stream<N>, &'v mut [u8]> for RawDecoder {
    type Error = Error;

    #[inline]
    fn code(&mut self, stream: &mut Stream<N>, element: &'v mut [u8]) -> Result<()> {
        stream.decode_bytes(element)
    }
}
