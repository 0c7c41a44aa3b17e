//! Flat-buffer frame codec (parse/build)
//!
//! `parse` runs its gates in wire order: sync, length, checksum, then field
//! extraction. Each earlier gate is cheaper, and a checksum over a bogus
//! length would be meaningless.

use bytes::Bytes;

use super::crc::crc16;
use super::header::{declared_length, read_u16_be};
use super::metrics::Metrics;
use super::{
    CHECKSUM_SIZE, Error, Flags, Frame, FrameHeader, FrameRef, HEADER_SIZE, PROTOCOL_VERSION,
    Result,
};

/// Parse the frame at the start of `buffer`, borrowing the payload.
///
/// Bytes past the declared LENGTH are ignored.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if `buffer` is empty
/// - [`Error::NoSync`] if `buffer` does not start with `0xAA 0x55`
/// - [`Error::BadLength`] / [`Error::Truncated`] if LENGTH is out of range or
///   exceeds `buffer`
/// - [`Error::BadCrc`] on checksum mismatch
/// - [`Error::UnsupportedVersion`] if the VERSION nibble is not 1
pub fn parse(buffer: &[u8]) -> Result<FrameRef<'_>> {
    let result = parse_frame(buffer);
    match &result {
        Ok(_) => Metrics::record_decoded(),
        Err(err) => Metrics::record_error(err),
    }
    result
}

/// Run the parse gates, recording only failures.
fn inspect(buffer: &[u8]) -> Result<FrameRef<'_>> {
    parse_frame(buffer).inspect_err(Metrics::record_error)
}

fn parse_frame(buffer: &[u8]) -> Result<FrameRef<'_>> {
    if buffer.is_empty() {
        return Err(Error::InvalidArgument("empty buffer"));
    }

    let length = usize::from(declared_length(buffer)?);
    if length > buffer.len() {
        return Err(Error::Truncated {
            needed: length,
            got: buffer.len(),
        });
    }

    let frame = &buffer[..length];
    let body_len = length - CHECKSUM_SIZE;
    let found = read_u16_be(frame, body_len).ok_or(Error::Truncated {
        needed: length,
        got: buffer.len(),
    })?;
    let expected = crc16(&frame[..body_len]);
    if expected != found {
        return Err(Error::BadCrc { expected, found });
    }

    let header = FrameHeader::from_bytes(frame)?;
    let version = header.flags().version();
    if version != PROTOCOL_VERSION {
        return Err(Error::UnsupportedVersion { version });
    }

    Ok(FrameRef::from_parts(
        header,
        &frame[HEADER_SIZE..body_len],
        found,
    ))
}

/// Parse and copy the payload out so the frame outlives `buffer`.
pub fn parse_owned(buffer: &[u8]) -> Result<Frame> {
    parse(buffer)?.to_owned_frame()
}

/// Parse without copying: the payload is a slice of `bytes`.
pub fn decode(bytes: Bytes) -> Result<Frame> {
    let (header, checksum) = {
        let frame = parse(&bytes)?;
        (*frame.header(), frame.checksum())
    };
    let payload = bytes.slice(HEADER_SIZE..HEADER_SIZE + header.payload_len());

    Ok(Frame::from_parts(header, payload, checksum))
}

/// Check sync, length and checksum without materializing a frame.
///
/// Counts failures in the process-wide metrics but not successes, since no
/// frame is handed out.
pub fn validate_frame(buffer: &[u8]) -> Result<()> {
    inspect(buffer).map(|_| ())
}

/// Borrow the payload of the frame at the start of `buffer`.
pub fn extract_payload(buffer: &[u8]) -> Result<&[u8]> {
    inspect(buffer).map(|frame| frame.payload())
}

/// Copy the payload into `out`, returning the number of bytes written.
///
/// # Errors
///
/// Everything [`parse`] reports, plus [`Error::BufferTooSmall`] if `out`
/// cannot hold the payload.
pub fn extract_payload_into(buffer: &[u8], out: &mut [u8]) -> Result<usize> {
    let payload = extract_payload(buffer)?;
    let got = out.len();
    let dest = out.get_mut(..payload.len()).ok_or(Error::BufferTooSmall {
        needed: payload.len(),
        got,
    })?;
    dest.copy_from_slice(payload);
    Ok(payload.len())
}

/// Build a frame into a freshly allocated buffer.
///
/// The VERSION nibble of `flags` is replaced with the current protocol
/// version.
///
/// # Errors
///
/// - [`Error::PayloadTooLarge`] if `payload` exceeds 1024 bytes
/// - [`Error::NoMemory`] if the output buffer cannot be allocated
pub fn build(msg_type: u8, sequence: u8, flags: Flags, payload: &[u8]) -> Result<Vec<u8>> {
    let header = FrameHeader::new(msg_type, sequence, flags.stamped(), payload.len())
        .inspect_err(Metrics::record_error)?;
    write_frame_vec(&header, payload)
}

/// Build a frame into caller-owned storage, returning the bytes written.
///
/// # Errors
///
/// - [`Error::PayloadTooLarge`] if `payload` exceeds 1024 bytes
/// - [`Error::BufferTooSmall`] if `out` cannot hold the frame
pub fn build_into(
    msg_type: u8,
    sequence: u8,
    flags: Flags,
    payload: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    let header = FrameHeader::new(msg_type, sequence, flags.stamped(), payload.len())
        .inspect_err(Metrics::record_error)?;
    write_frame(&header, payload, out)
}

/// Serialize an existing frame into a freshly allocated buffer.
pub fn serialize(frame: &Frame) -> Result<Vec<u8>> {
    write_frame_vec(frame.header(), frame.payload())
}

/// Serialize an existing frame into caller-owned storage.
pub fn serialize_into(frame: &Frame, out: &mut [u8]) -> Result<usize> {
    write_frame(frame.header(), frame.payload(), out)
}

fn write_frame_vec(header: &FrameHeader, payload: &[u8]) -> Result<Vec<u8>> {
    let total = usize::from(header.length());
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(total)
        .map_err(|err| Error::alloc_failed(total, err))
        .inspect_err(Metrics::record_error)?;
    bytes.resize(total, 0);

    write_frame(header, payload, &mut bytes)?;
    Ok(bytes)
}

/// Write header, payload and checksum trailer.
fn write_frame(header: &FrameHeader, payload: &[u8], out: &mut [u8]) -> Result<usize> {
    let total = usize::from(header.length());
    let got = out.len();
    let Some(out) = out.get_mut(..total) else {
        let err = Error::BufferTooSmall { needed: total, got };
        Metrics::record_error(&err);
        return Err(err);
    };

    let body_len = total - CHECKSUM_SIZE;
    out[..HEADER_SIZE].copy_from_slice(&header.to_bytes());
    out[HEADER_SIZE..body_len].copy_from_slice(payload);
    let checksum = crc16(&out[..body_len]);
    out[body_len..].copy_from_slice(&checksum.to_be_bytes());

    Metrics::record_encoded(total);
    Ok(total)
}
