//! Decoded and synthetic frames
//!
//! [`FrameRef`] borrows its payload from the buffer it was parsed out of.
//! [`Frame`] owns its payload and can outlive the source, which is what the
//! stream parser hands out since ring-buffer contents are overwritten.

use bytes::Bytes;

use super::crc::Crc16;
use super::{Error, Flags, FrameHeader, Result};

/// Frame with an owned payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    header: FrameHeader,
    payload: Bytes,
    checksum: u16,
}

impl Frame {
    /// Create a new frame.
    ///
    /// The VERSION nibble of `flags` is replaced with the current protocol
    /// version.
    pub fn new(
        msg_type: u8,
        sequence: u8,
        flags: Flags,
        payload: impl Into<Bytes>,
    ) -> Result<Self> {
        let payload = payload.into();
        let header = FrameHeader::new(msg_type, sequence, flags.stamped(), payload.len())?;
        let checksum = checksum_of(&header, &payload);

        Ok(Self {
            header,
            payload,
            checksum,
        })
    }

    /// Assemble a decoded frame; the codec has already validated every field.
    pub(crate) fn from_parts(header: FrameHeader, payload: Bytes, checksum: u16) -> Self {
        Self {
            header,
            payload,
            checksum,
        }
    }

    /// Get message type tag
    #[must_use]
    pub const fn msg_type(&self) -> u8 {
        self.header.msg_type()
    }

    /// Get sequence number
    #[must_use]
    pub const fn sequence(&self) -> u8 {
        self.header.sequence()
    }

    /// Get flags
    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.header.flags()
    }

    /// Get payload
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Consume the frame and return the payload
    #[must_use]
    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// Get checksum
    #[must_use]
    pub const fn checksum(&self) -> u16 {
        self.checksum
    }

    /// Get header
    #[must_use]
    pub const fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// Size of this frame on the wire
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        self.header.length() as usize
    }

    /// Set message type tag
    pub fn set_msg_type(&mut self, msg_type: u8) {
        self.header.set_msg_type(msg_type);
        self.refresh_checksum();
    }

    /// Set sequence number
    pub fn set_sequence(&mut self, sequence: u8) {
        self.header.set_sequence(sequence);
        self.refresh_checksum();
    }

    /// Set flags (VERSION nibble is stamped)
    pub fn set_flags(&mut self, flags: Flags) {
        self.header.set_flags(flags.stamped());
        self.refresh_checksum();
    }

    /// Replace the payload; rejected if larger than the protocol allows
    pub fn set_payload(&mut self, payload: impl Into<Bytes>) -> Result<()> {
        let payload = payload.into();
        self.header = FrameHeader::new(
            self.header.msg_type(),
            self.header.sequence(),
            self.header.flags(),
            payload.len(),
        )?;
        self.payload = payload;
        self.refresh_checksum();
        Ok(())
    }

    /// Borrow this frame as a view
    #[must_use]
    pub fn as_view(&self) -> FrameRef<'_> {
        FrameRef {
            header: self.header,
            payload: &self.payload,
            checksum: self.checksum,
        }
    }

    /// Encode frame to bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        super::serialize(self)
    }

    /// Decode frame from bytes, copying the payload
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        super::parse_owned(bytes)
    }

    fn refresh_checksum(&mut self) {
        self.checksum = checksum_of(&self.header, &self.payload);
    }
}

/// Frame whose payload borrows from the parsed buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRef<'a> {
    header: FrameHeader,
    payload: &'a [u8],
    checksum: u16,
}

impl<'a> FrameRef<'a> {
    pub(crate) fn from_parts(header: FrameHeader, payload: &'a [u8], checksum: u16) -> Self {
        Self {
            header,
            payload,
            checksum,
        }
    }

    /// Get message type tag
    #[must_use]
    pub const fn msg_type(&self) -> u8 {
        self.header.msg_type()
    }

    /// Get sequence number
    #[must_use]
    pub const fn sequence(&self) -> u8 {
        self.header.sequence()
    }

    /// Get flags
    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.header.flags()
    }

    /// Get payload
    #[must_use]
    pub const fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Get checksum
    #[must_use]
    pub const fn checksum(&self) -> u16 {
        self.checksum
    }

    /// Get header
    #[must_use]
    pub const fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// Size of this frame on the wire
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        self.header.length() as usize
    }

    /// Copy the payload out so the frame can outlive the source buffer
    pub fn to_owned_frame(&self) -> Result<Frame> {
        let mut payload = Vec::new();
        payload
            .try_reserve_exact(self.payload.len())
            .map_err(|err| Error::alloc_failed(self.payload.len(), err))?;
        payload.extend_from_slice(self.payload);

        Ok(Frame::from_parts(
            self.header,
            Bytes::from(payload),
            self.checksum,
        ))
    }
}

fn checksum_of(header: &FrameHeader, payload: &[u8]) -> u16 {
    let mut digest = Crc16::new();
    digest.update(&header.to_bytes());
    digest.update(payload);
    digest.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::MAX_PAYLOAD_SIZE;

    #[test]
    fn test_frame_creation() {
        let frame = Frame::new(0x10, 3, Flags::new(), &b"test payload"[..]).unwrap();

        assert_eq!(frame.msg_type(), 0x10);
        assert_eq!(frame.sequence(), 3);
        assert_eq!(frame.payload().as_ref(), b"test payload");
        assert_eq!(frame.encoded_len(), 7 + 12 + 2);
    }

    #[test]
    fn test_frame_stamps_version() {
        let frame = Frame::new(0, 0, Flags::from_bits(0x20), Bytes::new()).unwrap();
        assert_eq!(frame.flags().bits(), 0x21);
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let result = Frame::new(0, 0, Flags::new(), vec![0u8; MAX_PAYLOAD_SIZE + 1]);
        assert!(matches!(result, Err(Error::PayloadTooLarge { .. })));
    }

    #[test]
    fn test_setters_keep_checksum_current() {
        let mut frame = Frame::new(1, 1, Flags::new(), Bytes::new()).unwrap();
        frame.set_msg_type(9);
        frame.set_sequence(200);
        frame.set_flags(Flags::new().with(Flags::FRAGMENTED));
        frame.set_payload(&b"abc"[..]).unwrap();

        let expected = Frame::new(
            9,
            200,
            Flags::new().with(Flags::FRAGMENTED),
            &b"abc"[..],
        )
        .unwrap();
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_set_payload_rejects_oversize_and_keeps_frame() {
        let mut frame = Frame::new(1, 1, Flags::new(), &b"keep"[..]).unwrap();
        let before = frame.clone();
        assert!(frame.set_payload(vec![0u8; MAX_PAYLOAD_SIZE + 1]).is_err());
        assert_eq!(frame, before);
    }

    #[test]
    fn test_view_copy_out() {
        let frame = Frame::new(4, 5, Flags::new(), &b"xyz"[..]).unwrap();
        let owned = frame.as_view().to_owned_frame().unwrap();
        assert_eq!(owned, frame);
    }
}
