// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # poke-stream C FFI Bindings
//!
//! C-compatible bindings over a `Stream<POKE_STREAM_CAPACITY>`, shaped for
//! generated marshalling code: every value is passed by pointer and every
//! call returns a [`PokeStreamError`] code.
//!
//! # Usage
//!
//! ```c
//! #include "poke_stream.h"
//!
//! static bool code_saying(PokeStream* s, void* element) {
//!     saying_t* saying = element;
//!     return poke_stream_encode_uint32(s, &saying->it_was) == POKE_STREAM_ERROR_OK;
//! }
//!
//! PokeStream* s = poke_stream_create();
//! poke_stream_encode_cstring(s, (const char**)&msg->hello);
//! poke_stream_encode_cstring(s, (const char**)&msg->world);
//! poke_stream_code_array(s, msg->array, 10 * 2, sizeof(saying_t), code_saying, NULL);
//!
//! transport_send(poke_stream_data(s), poke_stream_cursor(s));
//! poke_stream_destroy(s);
//! ```

#![allow(clippy::missing_safety_doc)]

use std::ffi::{c_char, c_void, CStr};
use std::ptr;
use std::slice;

use poke_stream::{code_array, Error, Scalar, Stream};

/// Capacity in bytes of every stream created through this API
pub const POKE_STREAM_CAPACITY: usize = 256;

type InnerStream = Stream<POKE_STREAM_CAPACITY>;

// =============================================================================
// ERROR CODES
// =============================================================================

/// Error codes returned by poke-stream functions
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PokeStreamError {
    /// Success (no error)
    Ok = 0,
    /// Encode would pass the capacity
    Overflow = 1,
    /// Decode would pass the received message
    Underflow = 2,
    /// Cursor position out of range
    InvalidPosition = 3,
    /// String holds a NUL byte before its end
    InteriorNul = 4,
    /// String bytes are not valid UTF-8
    InvalidUtf8 = 5,
    /// Invalid parameter
    InvalidParameter = 6,
    /// Resource exhausted
    ResourceExhausted = 7,
    /// Element coder callback reported failure
    ElementFailed = 8,
    /// Null pointer
    NullPointer = 9,
    /// Unknown error
    Unknown = 255,
}

impl From<Error> for PokeStreamError {
    fn from(e: Error) -> Self {
        match e {
            Error::Overflow { .. } => PokeStreamError::Overflow,
            Error::Underflow { .. } => PokeStreamError::Underflow,
            Error::InvalidPosition { .. } => PokeStreamError::InvalidPosition,
            Error::InteriorNul => PokeStreamError::InteriorNul,
            Error::InvalidUtf8 => PokeStreamError::InvalidUtf8,
            Error::InvalidParameter => PokeStreamError::InvalidParameter,
            Error::ResourceExhausted => PokeStreamError::ResourceExhausted,
            // the dispatcher is not exposed over the C ABI
            Error::DuplicateMessage { .. } | Error::UnknownMessage { .. } => {
                PokeStreamError::Unknown
            }
        }
    }
}

fn status(result: poke_stream::Result<()>) -> PokeStreamError {
    match result {
        Ok(()) => PokeStreamError::Ok,
        Err(e) => e.into(),
    }
}

// =============================================================================
// OPAQUE HANDLE
// =============================================================================

/// Opaque handle to a stream
#[repr(C)]
pub struct PokeStream {
    _private: [u8; 0],
}

/// Element coder: codes one element at `element`, returns `false` on failure
pub type PokeElementCoder =
    unsafe extern "C" fn(stream: *mut PokeStream, element: *mut c_void) -> bool;

unsafe fn stream_mut<'a>(stream: *mut PokeStream) -> Option<&'a mut InnerStream> {
    (stream as *mut InnerStream).as_mut()
}

unsafe fn stream_ref<'a>(stream: *const PokeStream) -> Option<&'a InnerStream> {
    (stream as *const InnerStream).as_ref()
}

// =============================================================================
// UTILITIES
// =============================================================================

/// Get error message string
#[no_mangle]
pub extern "C" fn poke_stream_error_str(error: PokeStreamError) -> *const c_char {
    let msg = match error {
        PokeStreamError::Ok => "Success\0",
        PokeStreamError::Overflow => "Stream overflow\0",
        PokeStreamError::Underflow => "Stream underflow\0",
        PokeStreamError::InvalidPosition => "Invalid cursor position\0",
        PokeStreamError::InteriorNul => "String contains a NUL byte\0",
        PokeStreamError::InvalidUtf8 => "String is not valid UTF-8\0",
        PokeStreamError::InvalidParameter => "Invalid parameter\0",
        PokeStreamError::ResourceExhausted => "Resource exhausted\0",
        PokeStreamError::ElementFailed => "Element coder failed\0",
        PokeStreamError::NullPointer => "Null pointer\0",
        PokeStreamError::Unknown => "Unknown error\0",
    };
    msg.as_ptr() as *const c_char
}

/// Get poke-stream version string
#[no_mangle]
pub extern "C" fn poke_stream_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

// =============================================================================
// LIFECYCLE
// =============================================================================

/// Create an empty stream of `POKE_STREAM_CAPACITY` bytes
///
/// Free it with `poke_stream_destroy`.
#[no_mangle]
pub extern "C" fn poke_stream_create() -> *mut PokeStream {
    Box::into_raw(Box::new(InnerStream::new())) as *mut PokeStream
}

/// Destroy a stream; NULL is ignored
#[no_mangle]
pub unsafe extern "C" fn poke_stream_destroy(stream: *mut PokeStream) {
    if !stream.is_null() {
        drop(Box::from_raw(stream as *mut InnerStream));
    }
}

/// Rewind cursor and used count to zero (storage is not cleared)
#[no_mangle]
pub unsafe extern "C" fn poke_stream_reset(stream: *mut PokeStream) -> PokeStreamError {
    let Some(stream) = stream_mut(stream) else {
        return PokeStreamError::NullPointer;
    };
    stream.reset();
    PokeStreamError::Ok
}

/// Turn the encoded bytes into the message to decode (`used = cursor`, `cursor = 0`)
#[no_mangle]
pub unsafe extern "C" fn poke_stream_seal(stream: *mut PokeStream) -> PokeStreamError {
    let Some(stream) = stream_mut(stream) else {
        return PokeStreamError::NullPointer;
    };
    stream.seal();
    PokeStreamError::Ok
}

/// Copy a received message into the stream for decoding
#[no_mangle]
pub unsafe extern "C" fn poke_stream_load(
    stream: *mut PokeStream,
    data: *const u8,
    len: usize,
) -> PokeStreamError {
    let Some(stream) = stream_mut(stream) else {
        return PokeStreamError::NullPointer;
    };
    if data.is_null() && len > 0 {
        return PokeStreamError::NullPointer;
    }
    let message = if len == 0 {
        &[][..]
    } else {
        slice::from_raw_parts(data, len)
    };
    status(stream.load(message))
}

/// Capacity in bytes (0 for NULL)
#[no_mangle]
pub unsafe extern "C" fn poke_stream_capacity(stream: *const PokeStream) -> usize {
    stream_ref(stream).map_or(0, |s| s.capacity())
}

/// Current cursor position (0 for NULL)
#[no_mangle]
pub unsafe extern "C" fn poke_stream_cursor(stream: *const PokeStream) -> usize {
    stream_ref(stream).map_or(0, |s| s.cursor())
}

/// Bytes of decodable content (0 for NULL)
#[no_mangle]
pub unsafe extern "C" fn poke_stream_used(stream: *const PokeStream) -> usize {
    stream_ref(stream).map_or(0, |s| s.used())
}

/// Pointer to the start of storage (NULL for NULL)
///
/// After encoding, the first `poke_stream_cursor` bytes are the message.
#[no_mangle]
pub unsafe extern "C" fn poke_stream_data(stream: *const PokeStream) -> *const u8 {
    stream_ref(stream).map_or(ptr::null(), |s| s.written().as_ptr())
}

// =============================================================================
// RAW BYTES AND STRINGS
// =============================================================================

/// Encode `len` raw bytes
#[no_mangle]
pub unsafe extern "C" fn poke_stream_encode_buf(
    stream: *mut PokeStream,
    buf: *const c_void,
    len: usize,
) -> PokeStreamError {
    let Some(stream) = stream_mut(stream) else {
        return PokeStreamError::NullPointer;
    };
    if len == 0 {
        return PokeStreamError::Ok;
    }
    if buf.is_null() {
        return PokeStreamError::NullPointer;
    }
    status(stream.encode_bytes(slice::from_raw_parts(buf as *const u8, len)))
}

/// Decode `len` raw bytes into `buf`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_decode_buf(
    stream: *mut PokeStream,
    buf: *mut c_void,
    len: usize,
) -> PokeStreamError {
    let Some(stream) = stream_mut(stream) else {
        return PokeStreamError::NullPointer;
    };
    if len == 0 {
        return PokeStreamError::Ok;
    }
    if buf.is_null() {
        return PokeStreamError::NullPointer;
    }
    status(stream.decode_bytes(slice::from_raw_parts_mut(buf as *mut u8, len)))
}

/// Encode the C string `*value` including its terminator
///
/// Takes the address of the `char*` field, as generated struct coders do.
#[no_mangle]
pub unsafe extern "C" fn poke_stream_encode_cstring(
    stream: *mut PokeStream,
    value: *const *const c_char,
) -> PokeStreamError {
    let Some(stream) = stream_mut(stream) else {
        return PokeStreamError::NullPointer;
    };
    if value.is_null() || (*value).is_null() {
        return PokeStreamError::NullPointer;
    }
    status(stream.encode_cstring(CStr::from_ptr(*value)))
}

/// Decode a C string without copying
///
/// `*out` points into the stream storage and stays valid until the stream is
/// reset, encoded into, loaded or destroyed. `consumed` (may be NULL)
/// receives the bytes consumed, terminator included.
#[no_mangle]
pub unsafe extern "C" fn poke_stream_decode_cstring(
    stream: *mut PokeStream,
    out: *mut *const c_char,
    consumed: *mut usize,
) -> PokeStreamError {
    let Some(stream) = stream_mut(stream) else {
        return PokeStreamError::NullPointer;
    };
    if out.is_null() {
        return PokeStreamError::NullPointer;
    }
    match stream.decode_cstring() {
        Ok((view, len)) => {
            *out = view.as_ptr();
            if !consumed.is_null() {
                *consumed = len;
            }
            PokeStreamError::Ok
        }
        Err(e) => e.into(),
    }
}

// =============================================================================
// SCALARS
// =============================================================================

unsafe fn encode_from<T: Scalar>(stream: *mut PokeStream, value: *const c_void) -> PokeStreamError {
    let Some(stream) = stream_mut(stream) else {
        return PokeStreamError::NullPointer;
    };
    if value.is_null() {
        return PokeStreamError::NullPointer;
    }
    status(stream.encode_scalar(ptr::read_unaligned(value as *const T)))
}

unsafe fn decode_into<T: Scalar>(stream: *mut PokeStream, out: *mut c_void) -> PokeStreamError {
    let Some(stream) = stream_mut(stream) else {
        return PokeStreamError::NullPointer;
    };
    if out.is_null() {
        return PokeStreamError::NullPointer;
    }
    match stream.decode_scalar::<T>() {
        Ok(v) => {
            ptr::write_unaligned(out as *mut T, v);
            PokeStreamError::Ok
        }
        Err(e) => e.into(),
    }
}

/// Encode the `int8_t` at `value`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_encode_int8(
    stream: *mut PokeStream,
    value: *const c_void,
) -> PokeStreamError {
    encode_from::<i8>(stream, value)
}

/// Encode the `uint8_t` at `value`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_encode_uint8(
    stream: *mut PokeStream,
    value: *const c_void,
) -> PokeStreamError {
    encode_from::<u8>(stream, value)
}

/// Encode the `int16_t` at `value`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_encode_int16(
    stream: *mut PokeStream,
    value: *const c_void,
) -> PokeStreamError {
    encode_from::<i16>(stream, value)
}

/// Encode the `uint16_t` at `value`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_encode_uint16(
    stream: *mut PokeStream,
    value: *const c_void,
) -> PokeStreamError {
    encode_from::<u16>(stream, value)
}

/// Encode the `int32_t` at `value`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_encode_int32(
    stream: *mut PokeStream,
    value: *const c_void,
) -> PokeStreamError {
    encode_from::<i32>(stream, value)
}

/// Encode the `uint32_t` at `value`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_encode_uint32(
    stream: *mut PokeStream,
    value: *const c_void,
) -> PokeStreamError {
    encode_from::<u32>(stream, value)
}

/// Encode the `int64_t` at `value`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_encode_int64(
    stream: *mut PokeStream,
    value: *const c_void,
) -> PokeStreamError {
    encode_from::<i64>(stream, value)
}

/// Encode the `uint64_t` at `value`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_encode_uint64(
    stream: *mut PokeStream,
    value: *const c_void,
) -> PokeStreamError {
    encode_from::<u64>(stream, value)
}

/// Encode the `float` at `value`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_encode_float(
    stream: *mut PokeStream,
    value: *const c_void,
) -> PokeStreamError {
    encode_from::<f32>(stream, value)
}

/// Encode the `double` at `value`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_encode_double(
    stream: *mut PokeStream,
    value: *const c_void,
) -> PokeStreamError {
    encode_from::<f64>(stream, value)
}

/// Encode the `bool` at `value` (one byte, any non-zero is true)
#[no_mangle]
pub unsafe extern "C" fn poke_stream_encode_bool(
    stream: *mut PokeStream,
    value: *const c_void,
) -> PokeStreamError {
    let Some(stream) = stream_mut(stream) else {
        return PokeStreamError::NullPointer;
    };
    if value.is_null() {
        return PokeStreamError::NullPointer;
    }
    status(stream.encode_bool(ptr::read(value as *const u8) != 0))
}

/// Decode an `int8_t` into `out`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_decode_int8(
    stream: *mut PokeStream,
    out: *mut c_void,
) -> PokeStreamError {
    decode_into::<i8>(stream, out)
}

/// Decode a `uint8_t` into `out`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_decode_uint8(
    stream: *mut PokeStream,
    out: *mut c_void,
) -> PokeStreamError {
    decode_into::<u8>(stream, out)
}

/// Decode an `int16_t` into `out`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_decode_int16(
    stream: *mut PokeStream,
    out: *mut c_void,
) -> PokeStreamError {
    decode_into::<i16>(stream, out)
}

/// Decode a `uint16_t` into `out`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_decode_uint16(
    stream: *mut PokeStream,
    out: *mut c_void,
) -> PokeStreamError {
    decode_into::<u16>(stream, out)
}

/// Decode an `int32_t` into `out`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_decode_int32(
    stream: *mut PokeStream,
    out: *mut c_void,
) -> PokeStreamError {
    decode_into::<i32>(stream, out)
}

/// Decode a `uint32_t` into `out`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_decode_uint32(
    stream: *mut PokeStream,
    out: *mut c_void,
) -> PokeStreamError {
    decode_into::<u32>(stream, out)
}

/// Decode an `int64_t` into `out`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_decode_int64(
    stream: *mut PokeStream,
    out: *mut c_void,
) -> PokeStreamError {
    decode_into::<i64>(stream, out)
}

/// Decode a `uint64_t` into `out`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_decode_uint64(
    stream: *mut PokeStream,
    out: *mut c_void,
) -> PokeStreamError {
    decode_into::<u64>(stream, out)
}

/// Decode a `float` into `out`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_decode_float(
    stream: *mut PokeStream,
    out: *mut c_void,
) -> PokeStreamError {
    decode_into::<f32>(stream, out)
}

/// Decode a `double` into `out`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_decode_double(
    stream: *mut PokeStream,
    out: *mut c_void,
) -> PokeStreamError {
    decode_into::<f64>(stream, out)
}

/// Decode a `bool` into `out`
#[no_mangle]
pub unsafe extern "C" fn poke_stream_decode_bool(
    stream: *mut PokeStream,
    out: *mut c_void,
) -> PokeStreamError {
    decode_into::<bool>(stream, out)
}

// =============================================================================
// ARRAYS
// =============================================================================

/// Run `coder` on each of `count` elements of `size` bytes starting at `elements`
///
/// Multi-dimensional C arrays are passed as their flat row-major storage.
/// Stops at the first element for which `coder` returns `false` and reports
/// `ElementFailed`; `failed_index` (may be NULL) then receives its index.
/// Elements coded before the failure stay coded.
#[no_mangle]
pub unsafe extern "C" fn poke_stream_code_array(
    stream: *mut PokeStream,
    elements: *mut c_void,
    count: usize,
    size: usize,
    coder: Option<PokeElementCoder>,
    failed_index: *mut usize,
) -> PokeStreamError {
    if stream.is_null() {
        return PokeStreamError::NullPointer;
    }
    let Some(coder) = coder else {
        return PokeStreamError::NullPointer;
    };
    if count == 0 {
        return PokeStreamError::Ok;
    }
    if elements.is_null() {
        return PokeStreamError::NullPointer;
    }
    if size == 0 || count.checked_mul(size).is_none() {
        return PokeStreamError::InvalidParameter;
    }

    // The callback re-enters the API with the raw handle, so no Rust
    // reference to the stream is held across the loop.
    let base = elements as *mut u8;
    let mut handle = stream;
    let result = code_array(&mut handle, 0..count, |s: &mut *mut PokeStream, index: usize| {
        if coder(*s, base.add(index * size) as *mut c_void) {
            Ok(())
        } else {
            Err(PokeStreamError::ElementFailed)
        }
    });

    match result {
        Ok(_) => PokeStreamError::Ok,
        Err(failure) => {
            if !failed_index.is_null() {
                *failed_index = failure.index;
            }
            failure.source
        }
    }
}
