//! Framing error types

use std::collections::TryReserveError;
use std::fmt;

use thiserror::Error;

/// Framing errors returned by the parser, builder and stream decoder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed call-site contract (empty input, zero capacity)
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Sync pattern absent at the examined position
    #[error("sync pattern 0xAA55 not found")]
    NoSync,

    /// Declared LENGTH outside the valid frame range
    #[error("bad frame length: {length} (valid range {min}..={max})")]
    BadLength {
        /// Declared length
        length: usize,
        /// Minimum accepted
        min: usize,
        /// Maximum accepted
        max: usize,
    },

    /// Declared LENGTH exceeds the bytes supplied
    #[error("truncated frame: declared {needed} bytes, got {got}")]
    Truncated {
        /// Declared frame length
        needed: usize,
        /// Bytes available
        got: usize,
    },

    /// Payload larger than the protocol allows
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Checksum mismatch
    #[error("checksum mismatch: computed {expected:#06x}, frame carries {found:#06x}")]
    BadCrc {
        /// Checksum computed over the frame bytes
        expected: u16,
        /// Checksum stored in the trailer
        found: u16,
    },

    /// VERSION nibble is not the supported protocol version
    #[error("unsupported protocol version: {version}")]
    UnsupportedVersion {
        /// Version found in FLAGS
        version: u8,
    },

    /// Destination buffer too small for the serialized frame
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Allocation for an owned payload failed
    #[error("allocation of {requested} bytes failed")]
    NoMemory {
        /// Bytes requested
        requested: usize,
    },
}

impl Error {
    /// Coarse classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArg,
            Self::NoSync => ErrorKind::NoSync,
            Self::BadLength { .. } | Self::Truncated { .. } | Self::PayloadTooLarge { .. } => {
                ErrorKind::BadLength
            }
            Self::BadCrc { .. } => ErrorKind::BadCrc,
            Self::UnsupportedVersion { .. } => ErrorKind::BadVersion,
            Self::BufferTooSmall { .. } => ErrorKind::BufferFull,
            Self::NoMemory { .. } => ErrorKind::NoMemory,
        }
    }

    pub(crate) fn alloc_failed(requested: usize, _err: TryReserveError) -> Self {
        Self::NoMemory { requested }
    }
}

/// Failure classes a caller can act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Call-site contract violation
    InvalidArg,
    /// Sync pattern absent
    NoSync,
    /// Length out of range or inconsistent with the data
    BadLength,
    /// Checksum mismatch
    BadCrc,
    /// Unsupported VERSION nibble
    BadVersion,
    /// Destination too small
    BufferFull,
    /// Allocation failure
    NoMemory,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidArg => "INVALID_ARG",
            Self::NoSync => "NO_SYNC",
            Self::BadLength => "BAD_LENGTH",
            Self::BadCrc => "BAD_CRC",
            Self::BadVersion => "BAD_VERSION",
            Self::BufferFull => "BUFFER_FULL",
            Self::NoMemory => "NO_MEMORY",
        };
        write!(f, "{name}")
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_family_classified_as_bad_length() {
        let errors = [
            Error::BadLength {
                length: 6,
                min: 9,
                max: 1033,
            },
            Error::Truncated { needed: 20, got: 5 },
            Error::PayloadTooLarge {
                size: 1025,
                max: 1024,
            },
        ];
        for err in errors {
            assert_eq!(err.kind(), ErrorKind::BadLength);
        }
    }

    #[test]
    fn test_display() {
        let err = Error::BadCrc {
            expected: 0x29B1,
            found: 0x0000,
        };
        assert_eq!(
            err.to_string(),
            "checksum mismatch: computed 0x29b1, frame carries 0x0000"
        );
        assert_eq!(ErrorKind::BufferFull.to_string(), "BUFFER_FULL");
    }
}
