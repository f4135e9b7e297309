// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encode/Decode traits for compound messages
//!
//! A message type encodes its fields in declaration order and decodes them in
//! the same order; there are no tags, no lengths and no padding.
//!
//! ```
//! use poke_stream::{Decode, Encode, Reader, Result, Stream};
//!
//! struct Saying {
//!     it_was: u32,
//! }
//!
//! impl Encode for Saying {
//!     fn encode<const N: usize>(&self, stream: &mut Stream<N>) -> Result<()> {
//!         stream.encode_u32(self.it_was)
//!     }
//! }
//!
//! impl Decode<'_> for Saying {
//!     fn decode(reader: &mut Reader<'_>) -> Result<Self> {
//!         Ok(Self { it_was: reader.decode_u32()? })
//!     }
//! }
//!
//! let mut stream = Stream::<4>::new();
//! stream.encode_value(&Saying { it_was: 7 })?;
//! stream.seal();
//! let saying: Saying = stream.decode_value()?;
//! assert_eq!(saying.it_was, 7);
//! # Ok::<(), poke_stream::Error>(())
//! ```

use core::ffi::CStr;

use crate::array::{code_array, Decoder, Encoder};
use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::stream::{Reader, Stream};

/// Type that can be written to a stream
pub trait Encode {
    /// Encode `self` at the stream cursor
    fn encode<const N: usize>(&self, stream: &mut Stream<N>) -> Result<()>;
}

/// Type that can be read back from a stream
///
/// `'a` is the lifetime of the bytes being decoded, so borrowed types such as
/// `&'a str` can point straight into the buffer.
pub trait Decode<'a>: Sized {
    /// Decode a value at the reader position
    fn decode(reader: &mut Reader<'a>) -> Result<Self>;
}

/// Implement Encode/Decode for scalars (native-endian copy)
macro_rules! impl_codec_scalar {
    ($($type:ty),* $(,)?) => {
        $(
            impl Encode for $type {
                #[inline]
                fn encode<const N: usize>(&self, stream: &mut Stream<N>) -> Result<()> {
                    stream.encode_scalar(*self)
                }
            }

            impl Decode<'_> for $type {
                #[inline]
                fn decode(reader: &mut Reader<'_>) -> Result<Self> {
                    reader.decode_scalar::<$type>()
                }
            }
        )*
    };
}

impl_codec_scalar!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, bool);

impl<T: Encode + ?Sized> Encode for &T {
    #[inline]
    fn encode<const N: usize>(&self, stream: &mut Stream<N>) -> Result<()> {
        (**self).encode(stream)
    }
}

// === Strings (bytes + NUL) ===

impl Encode for CStr {
    #[inline]
    fn encode<const N: usize>(&self, stream: &mut Stream<N>) -> Result<()> {
        stream.encode_cstring(self)
    }
}

impl Encode for str {
    #[inline]
    fn encode<const N: usize>(&self, stream: &mut Stream<N>) -> Result<()> {
        stream.encode_str(self)
    }
}

impl<'a> Decode<'a> for &'a CStr {
    #[inline]
    fn decode(reader: &mut Reader<'a>) -> Result<Self> {
        Ok(reader.decode_cstring()?.0)
    }
}

impl<'a> Decode<'a> for &'a str {
    #[inline]
    fn decode(reader: &mut Reader<'a>) -> Result<Self> {
        reader.decode_str()
    }
}

// === Fixed-size arrays (nested arrays flatten row-major) ===

impl<T: Encode> Encode for [T] {
    fn encode<const N: usize>(&self, stream: &mut Stream<N>) -> Result<()> {
        code_array(stream, self, Encoder)?;
        Ok(())
    }
}

impl<T: Encode, const M: usize> Encode for [T; M] {
    #[inline]
    fn encode<const N: usize>(&self, stream: &mut Stream<N>) -> Result<()> {
        self.as_slice().encode(stream)
    }
}

/// Slots are pre-filled with `T::default()` and then decoded in place, so
/// elements must implement `Default`. Nested arrays rely on `[T; K]: Default`,
/// which core provides up to `K = 32`.
impl<'a, T, const M: usize> Decode<'a> for [T; M]
where
    T: Decode<'a> + Default,
{
    fn decode(reader: &mut Reader<'a>) -> Result<Self> {
        let mut array: [T; M] = core::array::from_fn(|_| T::default());
        code_array(reader, &mut array, Decoder)?;
        Ok(array)
    }
}

// === heapless::String (owned copy, bounded) ===

#[cfg(feature = "heapless")]
impl<const M: usize> Encode for heapless::String<M> {
    #[inline]
    fn encode<const N: usize>(&self, stream: &mut Stream<N>) -> Result<()> {
        stream.encode_str(self.as_str())
    }
}

#[cfg(feature = "heapless")]
impl<const M: usize> Decode<'_> for heapless::String<M> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let start = reader.position();
        let s = reader.decode_str()?;
        match heapless::String::try_from(s) {
            Ok(owned) => Ok(owned),
            Err(_) => {
                log::trace!(
                    "[Decode] string of {} bytes exceeds bounded capacity {}",
                    s.len(),
                    M
                );
                reader.seek(start)?;
                Err(Error::InvalidParameter)
            }
        }
    }
}

impl<const N: usize> Stream<N> {
    /// Encode a value, rolling the cursor back if any part of it fails
    ///
    /// Unlike a bare [`code_array`], a failed compound encode leaves the
    /// cursor where it was before the call.
    pub fn encode_atomic<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        let start = self.checkpoint();
        value.encode(self).inspect_err(|_| self.rewind(start))
    }
}

/// Width in bytes of a scalar sequence of `count` elements of `T`
///
/// Handy for sizing a `Stream<N>` from message layouts.
pub const fn scalar_len<T: Scalar>(count: usize) -> usize {
    T::WIDTH * count
}
