// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decode side: [`Reader`] over the used bytes, and the [`Stream`] methods
//! that drive a reader from the stream's own cursor.
//!
//! Decoding never mutates storage. A message can be decoded again by
//! rewinding the cursor (`seek`, `restore`) or by taking a fresh
//! [`Stream::reader`].

use core::ffi::CStr;

use super::Stream;
use crate::codec::Decode;
use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// Generate typed decode methods (shared by [`Reader`] and [`Stream`])
macro_rules! impl_decode_scalar {
    ($($name:ident: $type:ty),* $(,)?) => {
        $(
            #[doc = concat!("Decode a `", stringify!($type), "` in native byte order")]
            #[inline]
            pub fn $name(&mut self) -> Result<$type> {
                self.decode_scalar()
            }
        )*
    };
}

/// Borrowed read cursor over a stream's decodable bytes
///
/// Everything a reader hands out (`&CStr`, `&str`, byte slices) borrows the
/// stream storage for `'a`, so the stream cannot be reset or re-encoded while
/// a decoded view is still in use.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over `buf`, starting at offset 0
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) const fn at(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    /// Current read position
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to decode
    pub const fn unread(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True once every byte has been consumed
    pub const fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Move the read position (`0..=len`)
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.buf.len() {
            return Err(Error::InvalidPosition {
                position,
                limit: self.buf.len(),
            });
        }
        self.pos = position;
        Ok(())
    }

    fn underflow(&self, requested: usize) -> Error {
        log::trace!(
            "[Reader::decode] underflow at {}: {} bytes requested, {} available",
            self.pos,
            requested,
            self.unread()
        );
        Error::Underflow {
            requested,
            available: self.unread(),
        }
    }

    /// Borrow the next `len` bytes and advance past them
    pub fn decode_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.unread() {
            return Err(self.underflow(len));
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Copy the next `out.len()` bytes into `out`
    ///
    /// On [`Error::Underflow`] neither `out` nor the position change.
    pub fn decode_bytes(&mut self, out: &mut [u8]) -> Result<()> {
        let bytes = self.decode_slice(out.len())?;
        out.copy_from_slice(bytes);
        Ok(())
    }

    /// Decode a fixed-width scalar
    #[inline]
    pub fn decode_scalar<T: Scalar>(&mut self) -> Result<T> {
        let mut bytes = T::Bytes::default();
        self.decode_bytes(bytes.as_mut())?;
        Ok(T::from_bytes(bytes))
    }

    impl_decode_scalar!(
        decode_u8: u8,
        decode_i8: i8,
        decode_u16: u16,
        decode_i16: i16,
        decode_u32: u32,
        decode_i32: i32,
        decode_u64: u64,
        decode_i64: i64,
        decode_f32: f32,
        decode_f64: f64,
        decode_bool: bool,
    );

    /// Decode a null-terminated string without copying
    ///
    /// Returns the view into storage and the number of bytes consumed,
    /// terminator included. If no NUL byte exists in the unread bytes the
    /// result is [`Error::Underflow`] and the position is unchanged.
    pub fn decode_cstring(&mut self) -> Result<(&'a CStr, usize)> {
        let rest = &self.buf[self.pos..];
        match CStr::from_bytes_until_nul(rest) {
            Ok(view) => {
                let consumed = view.to_bytes_with_nul().len();
                self.pos += consumed;
                Ok((view, consumed))
            }
            Err(_) => Err(self.underflow(rest.len() + 1)),
        }
    }

    /// Decode a null-terminated UTF-8 string without copying
    ///
    /// Fails with [`Error::InvalidUtf8`] (position unchanged) if the bytes
    /// before the terminator are not UTF-8.
    pub fn decode_str(&mut self) -> Result<&'a str> {
        let start = self.pos;
        let (view, _) = self.decode_cstring()?;
        match view.to_str() {
            Ok(s) => Ok(s),
            Err(_) => {
                self.pos = start;
                Err(Error::InvalidUtf8)
            }
        }
    }

    /// Decode any [`Decode`] value
    #[inline]
    pub fn decode_value<T: Decode<'a>>(&mut self) -> Result<T> {
        T::decode(self)
    }
}

impl<const N: usize> Stream<N> {
    /// Copy the next `out.len()` bytes into `out`
    ///
    /// Fails with [`Error::Underflow`] if fewer than `out.len()` bytes remain
    /// before `used`; `out` and the cursor are then unchanged.
    pub fn decode_bytes(&mut self, out: &mut [u8]) -> Result<()> {
        self.read(|reader| reader.decode_bytes(out))
    }

    /// Decode a fixed-width scalar
    #[inline]
    pub fn decode_scalar<T: Scalar>(&mut self) -> Result<T> {
        self.read(Reader::decode_scalar)
    }

    impl_decode_scalar!(
        decode_u8: u8,
        decode_i8: i8,
        decode_u16: u16,
        decode_i16: i16,
        decode_u32: u32,
        decode_i32: i32,
        decode_u64: u64,
        decode_i64: i64,
        decode_f32: f32,
        decode_f64: f64,
        decode_bool: bool,
    );

    /// Decode a null-terminated string as a borrowed view into storage
    ///
    /// Returns the view and the bytes consumed (terminator included). The
    /// view borrows the stream, so it must be dropped before the next
    /// `reset` or encode. Use [`Stream::reader`] to hold several views.
    pub fn decode_cstring(&mut self) -> Result<(&CStr, usize)> {
        self.read(Reader::decode_cstring)
    }

    /// Decode a null-terminated UTF-8 string as a borrowed view
    pub fn decode_str(&mut self) -> Result<&str> {
        self.read(Reader::decode_str)
    }

    /// Decode any [`Decode`] value at the cursor
    pub fn decode_value<'s, T: Decode<'s>>(&'s mut self) -> Result<T> {
        self.read(T::decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sealed<const N: usize>(fill: impl FnOnce(&mut Stream<N>)) -> Stream<N> {
        let mut stream = Stream::new();
        fill(&mut stream);
        stream.seal();
        stream
    }

    #[test]
    fn test_scalar_roundtrip() {
        let mut stream = sealed::<64>(|s| {
            s.encode_u8(42).unwrap();
            s.encode_i8(-42).unwrap();
            s.encode_u16(1000).unwrap();
            s.encode_i16(-1000).unwrap();
            s.encode_u32(100_000).unwrap();
            s.encode_i32(-100_000).unwrap();
            s.encode_u64(10_000_000_000).unwrap();
            s.encode_i64(-10_000_000_000).unwrap();
            s.encode_f32(2.5).unwrap();
            s.encode_f64(-0.125).unwrap();
            s.encode_bool(true).unwrap();
        });

        assert_eq!(stream.decode_u8().unwrap(), 42);
        assert_eq!(stream.decode_i8().unwrap(), -42);
        assert_eq!(stream.decode_u16().unwrap(), 1000);
        assert_eq!(stream.decode_i16().unwrap(), -1000);
        assert_eq!(stream.decode_u32().unwrap(), 100_000);
        assert_eq!(stream.decode_i32().unwrap(), -100_000);
        assert_eq!(stream.decode_u64().unwrap(), 10_000_000_000);
        assert_eq!(stream.decode_i64().unwrap(), -10_000_000_000);
        assert_eq!(stream.decode_f32().unwrap(), 2.5);
        assert_eq!(stream.decode_f64().unwrap(), -0.125);
        assert!(stream.decode_bool().unwrap());
        assert_eq!(stream.unread(), 0);
    }

    #[test]
    fn test_underflow_boundary() {
        let mut stream = Stream::<8>::new();
        stream.load(&[1, 2, 3, 4, 5]).unwrap();

        let mut out = [0u8; 6];
        assert_eq!(
            stream.decode_bytes(&mut out),
            Err(Error::Underflow {
                requested: 6,
                available: 5
            })
        );
        assert_eq!(out, [0; 6]);
        assert_eq!(stream.cursor(), 0);

        let mut exact = [0u8; 5];
        stream.decode_bytes(&mut exact).unwrap();
        assert_eq!(exact, [1, 2, 3, 4, 5]);
        assert_eq!(stream.cursor(), 5);
    }

    #[test]
    fn test_decode_bounded_by_used_not_capacity() {
        let mut stream = sealed::<16>(|s| s.encode_u16(7).unwrap());
        assert_eq!(stream.decode_u16().unwrap(), 7);
        assert!(matches!(
            stream.decode_u8(),
            Err(Error::Underflow { available: 0, .. })
        ));
    }

    #[test]
    fn test_empty_decode_keeps_unsealed_cursor() {
        let mut stream = Stream::<16>::new();
        stream.encode_u32(0xDEAD_BEEF).unwrap();
        assert_eq!((stream.cursor(), stream.used()), (4, 0));

        stream.decode_bytes(&mut []).unwrap();
        assert_eq!(stream.cursor(), 4);
        let empty: [u32; 0] = stream.decode_value().unwrap();
        assert_eq!(empty, []);
        assert_eq!(stream.cursor(), 4);

        assert_eq!(
            stream.decode_u8(),
            Err(Error::Underflow {
                requested: 1,
                available: 0
            })
        );
        assert_eq!(stream.cursor(), 4);
        assert_eq!(stream.written(), &0xDEAD_BEEFu32.to_ne_bytes());
    }

    #[test]
    fn test_decode_after_seek_past_used() {
        let mut stream = sealed::<8>(|s| s.encode_u16(3).unwrap());
        stream.seek(6).unwrap();
        assert!(stream.decode_bytes(&mut []).is_ok());
        assert!(stream.decode_u8().is_err());
        assert_eq!(stream.cursor(), 6);
    }

    #[test]
    fn test_decode_is_non_destructive() {
        let mut stream = sealed::<8>(|s| s.encode_u32(0xDEAD_BEEF).unwrap());
        let start = stream.checkpoint();
        assert_eq!(stream.decode_u32().unwrap(), 0xDEAD_BEEF);
        stream.restore(start).unwrap();
        assert_eq!(stream.decode_u32().unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn test_cstring_roundtrip() {
        let mut stream = Stream::<8>::new();
        stream.encode_str("poke").unwrap();
        assert_eq!(stream.cursor(), 5);

        stream.seal();
        let (view, consumed) = stream.decode_cstring().unwrap();
        assert_eq!(view.to_bytes(), b"poke");
        assert_eq!(consumed, 5);
        assert_eq!(stream.cursor(), 5);
    }

    #[test]
    fn test_cstring_without_terminator() {
        let mut stream = Stream::<8>::new();
        stream.load(b"abc").unwrap();
        assert_eq!(
            stream.decode_cstring(),
            Err(Error::Underflow {
                requested: 4,
                available: 3
            })
        );
        assert_eq!(stream.cursor(), 0);
    }

    #[test]
    fn test_terminator_beyond_used_is_not_found() {
        let mut stream = Stream::<8>::new();
        stream.encode_str("ab").unwrap();
        // only "ab" is decodable, the NUL sits past `used`
        stream.seek(2).unwrap();
        stream.seal();
        assert!(stream.decode_cstring().is_err());
    }

    #[test]
    fn test_decode_str_invalid_utf8() {
        let mut stream = Stream::<8>::new();
        stream.load(&[0xFF, 0xFE, 0]).unwrap();
        assert_eq!(stream.decode_str(), Err(Error::InvalidUtf8));
        assert_eq!(stream.cursor(), 0);
    }

    #[test]
    fn test_reader_holds_several_views() {
        let stream = sealed::<32>(|s| {
            s.encode_str("hello").unwrap();
            s.encode_str("world").unwrap();
            s.encode_u8(9).unwrap();
        });

        let mut reader = stream.reader();
        let hello = reader.decode_str().unwrap();
        let world = reader.decode_str().unwrap();
        assert_eq!((hello, world), ("hello", "world"));
        assert_eq!(reader.decode_u8().unwrap(), 9);
        assert!(reader.is_empty());

        // the stream cursor is independent of the reader's
        assert_eq!(stream.cursor(), 0);
    }

    #[test]
    fn test_reader_starts_at_stream_cursor() {
        let mut stream = sealed::<8>(|s| {
            s.encode_u8(1).unwrap();
            s.encode_u8(2).unwrap();
        });
        stream.decode_u8().unwrap();
        let mut reader = stream.reader();
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.decode_u8().unwrap(), 2);
    }

    #[test]
    fn test_reader_seek() {
        let data = [1u8, 2, 3];
        let mut reader = Reader::new(&data);
        reader.seek(2).unwrap();
        assert_eq!(reader.decode_u8().unwrap(), 3);
        assert!(reader.seek(4).is_err());
        assert_eq!(reader.decode_slice(0).unwrap(), &[] as &[u8]);
    }
}
