//! Frame wire format, checksum and codec
//!
//! This module provides the wire constants, frame model, CRC engine and the
//! flat-buffer parse/build routines.

pub mod crc;
mod codec;
mod error;
mod frame;
pub(crate) mod header;
pub mod metrics;
mod types;

pub use codec::{
    build, build_into, decode, extract_payload, extract_payload_into, parse, parse_owned,
    serialize, serialize_into, validate_frame,
};
pub use error::{Error, ErrorKind, Result};
pub use frame::{Frame, FrameRef};
pub use header::FrameHeader;
pub use types::Flags;

/// Sync pattern marking the start of every frame
pub const SYNC: [u8; 2] = [0xAA, 0x55];

/// Sync pattern size in bytes
pub const SYNC_SIZE: usize = 2;

/// Offset of the big-endian LENGTH field
pub const LENGTH_OFFSET: usize = 3;

/// Bytes needed to read the LENGTH field (sync + flags + length)
pub const LENGTH_PREFIX_SIZE: usize = LENGTH_OFFSET + 2;

/// Header size in bytes: sync(2) + flags(1) + length(2) + seq(1) + type(1)
pub const HEADER_SIZE: usize = 7;

/// Checksum trailer size in bytes
pub const CHECKSUM_SIZE: usize = 2;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 1024;

/// Smallest valid frame (empty payload)
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Largest valid frame (payload at the limit)
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE + CHECKSUM_SIZE;

/// Protocol version carried in the low nibble of FLAGS
pub const PROTOCOL_VERSION: u8 = 1;

/// Total wire size of a frame carrying `payload_len` bytes.
#[must_use]
pub const fn frame_len(payload_len: usize) -> usize {
    HEADER_SIZE + payload_len + CHECKSUM_SIZE
}
