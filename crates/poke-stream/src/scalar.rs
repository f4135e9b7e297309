// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-width scalars in native byte order
//!
//! A [`Scalar`] is copied into the stream exactly as it sits in host memory.
//! No byte-order conversion happens here: a buffer produced on a
//! little-endian host must be consumed on a little-endian host. A byte-order
//! normalization step, if ever needed, belongs in `to_bytes`/`from_bytes`.

/// Fixed-width value that can be copied into and out of a stream
pub trait Scalar: Copy {
    /// Byte image of the value (`[u8; WIDTH]`)
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    /// Width in bytes (`size_of::<Self>()`)
    const WIDTH: usize;

    /// Native byte image of the value
    fn to_bytes(self) -> Self::Bytes;

    /// Rebuild the value from its native byte image
    fn from_bytes(bytes: Self::Bytes) -> Self;
}

/// Implement [`Scalar`] for primitive numbers via `to_ne_bytes`/`from_ne_bytes`
macro_rules! impl_scalar_ne {
    ($($type:ty),* $(,)?) => {
        $(
            impl Scalar for $type {
                type Bytes = [u8; core::mem::size_of::<$type>()];

                const WIDTH: usize = core::mem::size_of::<$type>();

                #[inline]
                fn to_bytes(self) -> Self::Bytes {
                    self.to_ne_bytes()
                }

                #[inline]
                fn from_bytes(bytes: Self::Bytes) -> Self {
                    <$type>::from_ne_bytes(bytes)
                }
            }
        )*
    };
}

impl_scalar_ne!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

// One byte, 0 or 1 on encode; any non-zero byte decodes as true.
impl Scalar for bool {
    type Bytes = [u8; 1];

    const WIDTH: usize = 1;

    #[inline]
    fn to_bytes(self) -> Self::Bytes {
        [u8::from(self)]
    }

    #[inline]
    fn from_bytes(bytes: Self::Bytes) -> Self {
        bytes[0] != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths_match_size_of() {
        assert_eq!(<u8 as Scalar>::WIDTH, 1);
        assert_eq!(<i16 as Scalar>::WIDTH, 2);
        assert_eq!(<u32 as Scalar>::WIDTH, 4);
        assert_eq!(<f32 as Scalar>::WIDTH, 4);
        assert_eq!(<i64 as Scalar>::WIDTH, 8);
        assert_eq!(<f64 as Scalar>::WIDTH, 8);
        assert_eq!(<bool as Scalar>::WIDTH, 1);
    }

    #[test]
    fn test_native_layout() {
        let value: u32 = 0x1234_5678;
        let bytes = value.to_bytes();
        assert_eq!(bytes, value.to_ne_bytes());
        assert_eq!(u32::from_bytes(bytes), value);
    }

    #[test]
    fn test_bool_bytes() {
        assert_eq!(true.to_bytes(), [1]);
        assert_eq!(false.to_bytes(), [0]);
        assert!(bool::from_bytes([0x7F]));
        assert!(!bool::from_bytes([0]));
    }

    #[test]
    fn test_float_bits_preserved() {
        let nan = f64::from_bits(0x7FF8_0000_DEAD_BEEF);
        assert_eq!(f64::from_bytes(nan.to_bytes()).to_bits(), nan.to_bits());
    }
}
