//! CRC-16/CCITT-FALSE checksum
//!
//! Polynomial `0x1021`, initial register `0xFFFF`, MSB-first, no final XOR.
//! The lookup table is built at compile time and indexed by
//! `(register >> 8) ^ byte`, so each input byte costs one table lookup.

use super::CHECKSUM_SIZE;

/// Generator polynomial
pub const POLYNOMIAL: u16 = 0x1021;

/// Initial register value, and the checksum of empty input
pub const INITIAL: u16 = 0xFFFF;

static TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Incremental CRC-16 digest.
///
/// ```
/// use bsframe::protocol::crc::{Crc16, crc16};
///
/// let mut digest = Crc16::new();
/// digest.update(b"1234");
/// digest.update(b"56789");
/// assert_eq!(digest.finish(), crc16(b"123456789"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16 {
    register: u16,
}

impl Crc16 {
    /// Start a new digest
    #[must_use]
    pub const fn new() -> Self {
        Self { register: INITIAL }
    }

    /// Feed bytes into the digest
    pub fn update(&mut self, data: &[u8]) {
        let mut crc = self.register;
        for &byte in data {
            let index = usize::from((crc >> 8) as u8 ^ byte);
            crc = (crc << 8) ^ TABLE[index];
        }
        self.register = crc;
    }

    /// Current checksum value
    #[must_use]
    pub const fn finish(&self) -> u16 {
        self.register
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the checksum of `data`.
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    let mut digest = Crc16::new();
    digest.update(data);
    digest.finish()
}

/// Check the big-endian trailer of a complete frame against the checksum of
/// every byte preceding it.
///
/// Inputs shorter than the trailer are reported invalid.
#[must_use]
pub fn verify(frame: &[u8]) -> bool {
    let Some(body_len) = frame.len().checked_sub(CHECKSUM_SIZE) else {
        return false;
    };
    let (body, trailer) = frame.split_at(body_len);
    crc16(body) == u16::from_be_bytes([trailer[0], trailer[1]])
}
