// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # poke-stream - Fixed-Capacity Stream Buffer Codec
//!
//! A `no_std` codec that marshals scalars, null-terminated strings and
//! homogeneous arrays into a statically sized byte buffer, for message passing
//! on resource-constrained targets.
//!
//! ## Design Constraints
//!
//! - **No heap allocations** (capacity is a const generic)
//! - **No framing**: values are laid out back-to-back, field order and count
//!   are decided by the caller's protocol
//! - **Native byte order**: the buffer holds the raw in-memory layout of the
//!   host, it is not portable across hosts of different endianness
//! - **`no_std` compatible**
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------+
//! |  Dispatcher (message id -> handler)     |
//! +-----------------------------------------+
//!           v                    ^
//! +-----------------------------------------+
//! |  Encode / Decode (structs, [T; N])      |
//! +-----------------------------------------+
//!           v                    ^
//! +-----------------------------------------+
//! |  Array coder (ElementCoder callbacks)   |
//! +-----------------------------------------+
//!           v                    ^
//! +-----------------------------------------+
//! |  Stream<N> / Reader (scalars, cstrings) |
//! +-----------------------------------------+
//! ```
//!
//! ## Example
//!
//! ```
//! use poke_stream::Stream;
//!
//! let mut stream = Stream::<16>::new();
//! stream.encode_u32(42)?;
//! stream.encode_str("poke")?;
//!
//! stream.seal();
//! assert_eq!(stream.decode_u32()?, 42);
//! assert_eq!(stream.decode_str()?, "poke");
//! # Ok::<(), poke_stream::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `heapless` (default) -- owned bounded strings and the call dispatcher
//! - `std` -- `std::error::Error` impls (for host testing)

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Buffer state plus scalar/string encode and decode
pub mod stream;

/// Fixed-width scalar layout
pub mod scalar;

/// Generic element-coder driven array coding
pub mod array;

/// Encode/Decode traits for compound messages
pub mod codec;

/// Message-id keyed call dispatch (requires `heapless` feature)
#[cfg(feature = "heapless")]
pub mod dispatch;

/// Error types for poke-stream
pub mod error;

// Re-exports for convenience
pub use crate::array::{code_array, ElementCoder};
pub use crate::codec::{Decode, Encode};
pub use crate::error::{ElementFailure, Error, Result};
pub use crate::scalar::Scalar;
pub use crate::stream::{Checkpoint, Reader, Stream};

#[cfg(feature = "heapless")]
pub use crate::dispatch::{begin_call, Dispatcher, Handler, MessageId};

/// Capacity used by callers that have no better estimate of their largest message
pub const DEFAULT_CAPACITY: usize = 256;

/// Version of poke-stream
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
