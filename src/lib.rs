//! Self-delimited, CRC-16 protected binary framing
//!
//! This crate encodes payloads into frames that can be recovered from an
//! undelimited, possibly corrupted byte stream. It targets serial- and
//! CAN-like links where bytes trickle in with no out-of-band length.
//!
//! # Quick Start
//!
//! ```rust
//! use bsframe::{Flags, FrameDecoder, DecoderConfig};
//!
//! // Build a frame
//! let bytes = bsframe::build(0x10, 1, Flags::new().with(Flags::ACK_REQUIRED), b"ping")?;
//!
//! // Parse it back from a flat buffer (payload borrowed)
//! let frame = bsframe::parse(&bytes)?;
//! assert_eq!(frame.payload(), b"ping");
//!
//! // Or recover it from a byte stream with leading noise
//! let mut decoder = FrameDecoder::new(DecoderConfig::default())?;
//! decoder.push(&[0x00, 0x13]);
//! decoder.push(&bytes);
//! let frame = decoder.next_frame()?.expect("complete frame");
//! assert!(frame.flags().ack_required());
//! # Ok::<(), bsframe::Error>(())
//! ```
//!
//! # Wire Format
//!
//! ```text
//! [0xAA 0x55] [FLAGS] [LENGTH u16 BE] [SEQ] [TYPE] [PAYLOAD 0..=1024] [CRC16 BE]
//! ```
//!
//! LENGTH is the whole frame size. The CRC is CRC-16/CCITT-FALSE over every
//! byte before it.
//!
//! # Features
//!
//! - **Zero-copy parsing** - [`parse`] borrows, [`decode`] slices a `Bytes`
//! - **Allocation-free building** - [`build_into`] writes into caller storage
//! - **Fixed-capacity ring buffer** - non-destructive back-pressure
//! - **Resynchronization** - corrupt frames cost at most themselves

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]

pub mod protocol;
pub mod stream;

pub use protocol::{
    CHECKSUM_SIZE, Error, ErrorKind, Flags, Frame, FrameHeader, FrameRef, HEADER_SIZE,
    MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE, Result, SYNC, build, build_into, decode,
    extract_payload, extract_payload_into, parse, parse_owned, serialize, serialize_into,
    validate_frame,
};
pub use stream::{
    ByteSource, DecoderConfig, FrameDecoder, ParserStats, RingBuffer, StreamParser,
    parse_streaming,
};
