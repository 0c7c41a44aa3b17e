//! Frame flags

use std::fmt;

use super::PROTOCOL_VERSION;

/// FLAGS byte: four marker bits in the high nibble, VERSION in the low nibble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags(u8);

impl Flags {
    /// Receiver should acknowledge this frame
    pub const ACK_REQUIRED: u8 = 1 << 7;
    /// Frame is one part of a larger message; reassembly is up to the caller
    pub const FRAGMENTED: u8 = 1 << 6;
    /// Payload is encrypted (marker only)
    pub const ENCRYPTED: u8 = 1 << 5;
    /// Frame should be handled ahead of normal traffic
    pub const PRIORITY: u8 = 1 << 4;
    /// Mask of the marker bits
    pub const MARKER_MASK: u8 =
        Self::ACK_REQUIRED | Self::FRAGMENTED | Self::ENCRYPTED | Self::PRIORITY;
    /// Mask of the VERSION nibble
    pub const VERSION_MASK: u8 = 0x0F;

    /// Empty marker set stamped with the current protocol version
    #[must_use]
    pub const fn new() -> Self {
        Self(PROTOCOL_VERSION)
    }

    /// Wrap a raw FLAGS byte without validation
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw FLAGS byte
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// VERSION nibble
    #[must_use]
    pub const fn version(self) -> u8 {
        self.0 & Self::VERSION_MASK
    }

    /// Same markers with the VERSION nibble replaced by the current version
    #[must_use]
    pub const fn stamped(self) -> Self {
        Self((self.0 & Self::MARKER_MASK) | PROTOCOL_VERSION)
    }

    /// Set a marker bit
    #[must_use]
    pub const fn with(mut self, flag: u8) -> Self {
        debug_assert!(flag & Self::VERSION_MASK == 0, "not a marker bit");
        self.0 |= flag & Self::MARKER_MASK;
        self
    }

    /// Check if marker is set
    #[must_use]
    pub const fn has(self, flag: u8) -> bool {
        (self.0 & flag & Self::MARKER_MASK) != 0
    }

    /// Check if acknowledgment is required
    #[must_use]
    pub const fn ack_required(self) -> bool {
        self.has(Self::ACK_REQUIRED)
    }

    /// Check if fragmented
    #[must_use]
    pub const fn is_fragmented(self) -> bool {
        self.has(Self::FRAGMENTED)
    }

    /// Check if encrypted
    #[must_use]
    pub const fn is_encrypted(self) -> bool {
        self.has(Self::ENCRYPTED)
    }

    /// Check if priority
    #[must_use]
    pub const fn is_priority(self) -> bool {
        self.has(Self::PRIORITY)
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ack_required() {
            parts.push("ACK_REQUIRED");
        }
        if self.is_fragmented() {
            parts.push("FRAGMENTED");
        }
        if self.is_encrypted() {
            parts.push("ENCRYPTED");
        }
        if self.is_priority() {
            parts.push("PRIORITY");
        }
        if parts.is_empty() {
            write!(f, "NONE v{}", self.version())
        } else {
            write!(f, "{} v{}", parts.join(" | "), self.version())
        }
    }
}
