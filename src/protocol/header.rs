//! Frame header
//!
//! The header is 7 bytes; all multi-byte fields are big-endian.

use super::{
    Error, Flags, HEADER_SIZE, LENGTH_OFFSET, LENGTH_PREFIX_SIZE, MAX_FRAME_SIZE,
    MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE, Result, SYNC, SYNC_SIZE, frame_len,
};

/// Frame header
///
/// # Wire Format
///
/// ```text
/// 0       1       2       3       4       5       6       7
/// +-------+-------+-------+-------+-------+-------+-------+---------------+-------+-------+
/// | 0xAA  | 0x55  | FLAGS |  LENGTH (BE)  |  SEQ  | TYPE  | PAYLOAD (N)   |  CRC16 (BE)   |
/// +-------+-------+-------+-------+-------+-------+-------+---------------+-------+-------+
/// ```
///
/// LENGTH counts the whole frame: `7 + N + 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHeader {
    flags: Flags,
    length: u16,
    sequence: u8,
    msg_type: u8,
}

impl FrameHeader {
    /// Create a header for a payload of `payload_len` bytes
    pub fn new(msg_type: u8, sequence: u8, flags: Flags, payload_len: usize) -> Result<Self> {
        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: payload_len,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        Ok(Self {
            flags,
            // MAX_FRAME_SIZE fits in u16
            length: frame_len(payload_len) as u16,
            sequence,
            msg_type,
        })
    }

    /// Get flags
    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// Total frame length in bytes
    #[must_use]
    pub const fn length(&self) -> u16 {
        self.length
    }

    /// Payload length in bytes
    #[must_use]
    pub const fn payload_len(&self) -> usize {
        self.length as usize - MIN_FRAME_SIZE
    }

    /// Get sequence number
    #[must_use]
    pub const fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Get message type tag
    #[must_use]
    pub const fn msg_type(&self) -> u8 {
        self.msg_type
    }

    pub(crate) fn set_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    pub(crate) fn set_sequence(&mut self, sequence: u8) {
        self.sequence = sequence;
    }

    pub(crate) fn set_msg_type(&mut self, msg_type: u8) {
        self.msg_type = msg_type;
    }

    /// Convert to wire bytes, sync pattern included
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];

        bytes[0..SYNC_SIZE].copy_from_slice(&SYNC);
        bytes[2] = self.flags.bits();
        write_u16_be(&mut bytes, LENGTH_OFFSET, self.length);
        bytes[5] = self.sequence;
        bytes[6] = self.msg_type;

        bytes
    }

    /// Parse from wire bytes.
    ///
    /// Checks the sync pattern and LENGTH range only; checksum and version
    /// are validated by the codec.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let length = declared_length(bytes)?;
        if bytes.len() < HEADER_SIZE {
            return Err(Error::Truncated {
                needed: HEADER_SIZE,
                got: bytes.len(),
            });
        }

        Ok(Self {
            flags: Flags::from_bits(bytes[2]),
            length,
            sequence: bytes[5],
            msg_type: bytes[6],
        })
    }
}

/// Check that `bytes` starts with the sync pattern.
pub(crate) fn check_sync(bytes: &[u8]) -> Result<()> {
    if bytes.len() >= SYNC_SIZE && bytes[..SYNC_SIZE] == SYNC {
        Ok(())
    } else {
        Err(Error::NoSync)
    }
}

/// Read and range-check LENGTH from a buffer that starts at a frame.
///
/// Gates run in wire order: sync first, then length.
pub(crate) fn declared_length(bytes: &[u8]) -> Result<u16> {
    check_sync(bytes)?;

    let length = read_u16_be(bytes, LENGTH_OFFSET).ok_or(Error::Truncated {
        needed: LENGTH_PREFIX_SIZE,
        got: bytes.len(),
    })?;

    if !(MIN_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&usize::from(length)) {
        return Err(Error::BadLength {
            length: usize::from(length),
            min: MIN_FRAME_SIZE,
            max: MAX_FRAME_SIZE,
        });
    }

    Ok(length)
}

pub(crate) fn read_u16_be(bytes: &[u8], offset: usize) -> Option<u16> {
    let field = bytes.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_be_bytes([field[0], field[1]]))
}

fn write_u16_be(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}
