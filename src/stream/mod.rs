//! Byte-stream side: circular buffer, byte sources and streaming recovery
//!
//! Data flows transport → [`RingBuffer`] → [`StreamParser`] → application.
//! [`FrameDecoder`] bundles the two for callers that do not need to own the
//! buffer themselves.

mod decoder;
mod parser;
mod ring;
mod source;

pub use decoder::{DecoderConfig, FrameDecoder};
pub use parser::{ParserStats, StreamParser, parse_streaming};
pub use ring::RingBuffer;
pub use source::ByteSource;
