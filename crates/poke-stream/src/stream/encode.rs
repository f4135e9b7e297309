// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encode side of [`Stream`]: bounded appends at the cursor, plus LIFO pop.

use core::ffi::CStr;

use super::Stream;
use crate::codec::Encode;
use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// Generate typed encode methods (one per primitive, same operation)
macro_rules! impl_encode_scalar {
    ($($name:ident: $type:ty),* $(,)?) => {
        $(
            #[doc = concat!("Encode a `", stringify!($type), "` in native byte order")]
            #[inline]
            pub fn $name(&mut self, value: $type) -> Result<()> {
                self.encode_scalar(value)
            }
        )*
    };
}

impl<const N: usize> Stream<N> {
    /// Append raw bytes at the cursor
    ///
    /// Either all of `bytes` is written and the cursor advances by
    /// `bytes.len()`, or [`Error::Overflow`] is returned and nothing changes.
    pub fn encode_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let available = self.remaining();
        if bytes.len() > available {
            log::trace!(
                "[Stream::encode] overflow at {}: {} bytes requested, {} available",
                self.cursor,
                bytes.len(),
                available
            );
            return Err(Error::Overflow {
                requested: bytes.len(),
                available,
            });
        }
        self.storage[self.cursor..self.cursor + bytes.len()].copy_from_slice(bytes);
        self.cursor += bytes.len();
        Ok(())
    }

    /// Append a fixed-width scalar (`size_of::<T>()` bytes, native order)
    #[inline]
    pub fn encode_scalar<T: Scalar>(&mut self, value: T) -> Result<()> {
        self.encode_bytes(value.to_bytes().as_ref())
    }

    impl_encode_scalar!(
        encode_u8: u8,
        encode_i8: i8,
        encode_u16: u16,
        encode_i16: i16,
        encode_u32: u32,
        encode_i32: i32,
        encode_u64: u64,
        encode_i64: i64,
        encode_f32: f32,
        encode_f64: f64,
        encode_bool: bool,
    );

    /// Append a C string including its terminator
    ///
    /// Consumes `len + 1` bytes; no length prefix is written.
    pub fn encode_cstring(&mut self, value: &CStr) -> Result<()> {
        self.encode_bytes(value.to_bytes_with_nul())
    }

    /// Append a Rust string as a C string (bytes + NUL)
    ///
    /// Rejects strings holding a NUL byte with [`Error::InteriorNul`], since
    /// the decoder would stop there. Overflow is checked for the whole string
    /// and terminator before anything is written.
    pub fn encode_str(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();
        if bytes.contains(&0) {
            return Err(Error::InteriorNul);
        }
        let needed = bytes.len() + 1;
        let available = self.remaining();
        if needed > available {
            log::trace!(
                "[Stream::encode_str] overflow at {}: {} bytes requested, {} available",
                self.cursor,
                needed,
                available
            );
            return Err(Error::Overflow {
                requested: needed,
                available,
            });
        }
        self.storage[self.cursor..self.cursor + bytes.len()].copy_from_slice(bytes);
        self.storage[self.cursor + bytes.len()] = 0;
        self.cursor += needed;
        Ok(())
    }

    /// Encode any [`Encode`] value (struct, fixed array, string, scalar)
    #[inline]
    pub fn encode_value<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.encode(self)
    }

    /// Remove the most recently encoded `out.len()` bytes (LIFO)
    ///
    /// Copies `storage[cursor - len..cursor]` into `out` and moves the cursor
    /// back. Fails with [`Error::Underflow`] (nothing changed) if fewer than
    /// `out.len()` bytes were encoded. This is not a decode: it walks the
    /// write side backwards and ignores `used`.
    pub fn pop_bytes(&mut self, out: &mut [u8]) -> Result<()> {
        if out.len() > self.cursor {
            return Err(Error::Underflow {
                requested: out.len(),
                available: self.cursor,
            });
        }
        let start = self.cursor - out.len();
        out.copy_from_slice(&self.storage[start..self.cursor]);
        self.cursor = start;
        Ok(())
    }

    /// Pop the most recently encoded scalar of type `T`
    pub fn pop_scalar<T: Scalar>(&mut self) -> Result<T> {
        let mut bytes = T::Bytes::default();
        self.pop_bytes(bytes.as_mut())?;
        Ok(T::from_bytes(bytes))
    }
}
