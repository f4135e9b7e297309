// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for poke-stream

use core::fmt;

/// Result type for stream operations
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for stream operations
///
/// Every variant is reported before any byte of the stream is touched, so a
/// failed scalar or string operation leaves cursor and storage as they were.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Encode would write past the stream capacity
    Overflow {
        /// Bytes the operation needed
        requested: usize,
        /// Bytes left before capacity
        available: usize,
    },

    /// Decode would read past the used bytes (or no terminator was found)
    Underflow {
        /// Bytes the operation needed
        requested: usize,
        /// Bytes left before `used`
        available: usize,
    },

    /// Cursor position outside the stream
    InvalidPosition {
        /// Requested cursor position
        position: usize,
        /// Largest valid position
        limit: usize,
    },

    /// String contains a NUL byte before its end
    InteriorNul,

    /// Decoded string is not valid UTF-8
    InvalidUtf8,

    /// Invalid parameter (element geometry, bounded capacity, ...)
    InvalidParameter,

    /// Fixed-size table is full
    ResourceExhausted,

    /// A handler is already registered for this message id
    DuplicateMessage {
        /// Message id
        id: u32,
    },

    /// No handler registered for this message id
    UnknownMessage {
        /// Message id
        id: u32,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Overflow {
                requested,
                available,
            } => write!(
                f,
                "stream overflow: {} bytes requested, {} available",
                requested, available
            ),
            Error::Underflow {
                requested,
                available,
            } => write!(
                f,
                "stream underflow: {} bytes requested, {} available",
                requested, available
            ),
            Error::InvalidPosition { position, limit } => {
                write!(f, "invalid cursor position {} (limit {})", position, limit)
            }
            Error::InteriorNul => write!(f, "string contains an interior NUL byte"),
            Error::InvalidUtf8 => write!(f, "invalid UTF-8"),
            Error::InvalidParameter => write!(f, "invalid parameter"),
            Error::ResourceExhausted => write!(f, "resource exhausted"),
            Error::DuplicateMessage { id } => {
                write!(f, "handler already registered for message {:#010x}", id)
            }
            Error::UnknownMessage { id } => write!(f, "no handler for message {:#010x}", id),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Failure of one element inside an array operation
///
/// `source` is the element coder's own error, passed through unchanged;
/// `index` is the position of the failing element in the flattened sequence.
/// Elements before `index` have already been coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementFailure<E> {
    /// Index of the failing element
    pub index: usize,
    /// Error reported by the element coder
    pub source: E,
}

impl<E> ElementFailure<E> {
    /// Drop the element index and keep the coder's error
    pub fn into_source(self) -> E {
        self.source
    }
}

impl<E: fmt::Display> fmt::Display for ElementFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element {} failed: {}", self.index, self.source)
    }
}

#[cfg(feature = "std")]
impl<E> std::error::Error for ElementFailure<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl From<ElementFailure<Error>> for Error {
    fn from(failure: ElementFailure<Error>) -> Self {
        failure.source
    }
}
