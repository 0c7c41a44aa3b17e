//! Ring buffer and stream parser behind one handle for transport glue.

use tracing::{debug, instrument};

use super::{ParserStats, RingBuffer, StreamParser};
use crate::protocol::{Error, ErrorKind, Frame, MAX_FRAME_SIZE, Result};

/// Decoder configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderConfig {
    /// Ring buffer capacity in bytes; must hold at least one maximum-size frame.
    pub buffer_capacity: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 4 * MAX_FRAME_SIZE,
        }
    }
}

impl DecoderConfig {
    /// Config with the given buffer capacity
    #[must_use]
    pub const fn with_capacity(buffer_capacity: usize) -> Self {
        Self { buffer_capacity }
    }

    /// Reject configurations that could stall on a maximum-size frame.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_capacity < MAX_FRAME_SIZE {
            return Err(Error::InvalidArgument(
                "buffer_capacity must hold a maximum-size frame",
            ));
        }
        Ok(())
    }
}

/// Inbound frame decoder.
///
/// Feed raw transport bytes with [`push`](Self::push) and pull frames with
/// [`next_frame`](Self::next_frame). Single-threaded; wrap it in a lock if
/// the producer and consumer run on different threads.
#[derive(Debug)]
pub struct FrameDecoder {
    buffer: RingBuffer,
    parser: StreamParser,
}

impl FrameDecoder {
    /// Create a decoder from a validated config
    pub fn new(config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            buffer: RingBuffer::new(config.buffer_capacity)?,
            parser: StreamParser::new(),
        })
    }

    /// Buffer as much of `data` as fits; returns the number of bytes taken.
    ///
    /// A short count is back-pressure: drain frames, then push the rest.
    #[instrument(level = "trace", skip(self, data), fields(len = data.len()))]
    pub fn push(&mut self, data: &[u8]) -> usize {
        let written = self.buffer.write(data);
        if written < data.len() {
            debug!(
                written,
                dropped = data.len() - written,
                "decoder buffer full"
            );
        }
        written
    }

    /// Pull the next frame, or `Ok(None)` if more bytes are needed.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        self.parser.parse(&mut self.buffer)
    }

    /// Pull every frame and rejection currently decodable.
    #[instrument(level = "trace", skip(self))]
    pub fn drain_frames(&mut self) -> Vec<Result<Frame>> {
        let mut out = Vec::new();
        loop {
            match self.next_frame() {
                Ok(Some(frame)) => out.push(Ok(frame)),
                Ok(None) => break,
                Err(err) => {
                    // NoMemory leaves the frame buffered; retrying now would spin.
                    let stop = err.kind() == ErrorKind::NoMemory;
                    out.push(Err(err));
                    if stop {
                        break;
                    }
                }
            }
        }
        out
    }

    /// Parser counters
    #[must_use]
    pub const fn stats(&self) -> ParserStats {
        self.parser.stats()
    }

    /// Bytes buffered but not yet decoded
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.available()
    }

    /// Bytes that can be pushed before back-pressure
    #[must_use]
    pub fn free_space(&self) -> usize {
        self.buffer.free_space()
    }

    /// Drop buffered bytes, e.g. after the transport reconnects.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Flags, build};

    #[test]
    fn test_config_validation() {
        assert!(DecoderConfig::default().validate().is_ok());
        assert!(DecoderConfig::with_capacity(MAX_FRAME_SIZE).validate().is_ok());
        assert!(matches!(
            FrameDecoder::new(DecoderConfig::with_capacity(MAX_FRAME_SIZE - 1)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_push_and_drain() {
        let mut decoder = FrameDecoder::new(DecoderConfig::default()).unwrap();
        let mut stream = vec![0x00, 0x01];
        for seq in 0..3u8 {
            stream.extend(build(0x01, seq, Flags::new(), &[seq; 4]).unwrap());
        }

        assert_eq!(decoder.push(&stream), stream.len());
        let frames: Vec<Frame> = decoder
            .drain_frames()
            .into_iter()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].payload().as_ref(), &[2; 4]);
        assert_eq!(decoder.buffered(), 0);
        assert_eq!(decoder.stats().bytes_skipped, 2);
    }

    #[test]
    fn test_back_pressure() {
        let mut decoder = FrameDecoder::new(DecoderConfig::with_capacity(MAX_FRAME_SIZE)).unwrap();
        let big = build(0x01, 0, Flags::new(), &[0u8; 1024]).unwrap();

        assert_eq!(decoder.push(&big), MAX_FRAME_SIZE);
        assert_eq!(decoder.push(&big), 0);
        assert_eq!(decoder.free_space(), 0);

        assert!(decoder.next_frame().unwrap().is_some());
        assert_eq!(decoder.free_space(), MAX_FRAME_SIZE);
    }

    #[test]
    fn test_reset() {
        let mut decoder = FrameDecoder::new(DecoderConfig::default()).unwrap();
        decoder.push(&[0xAA, 0x55, 0x01]);
        decoder.reset();
        assert_eq!(decoder.buffered(), 0);
        assert_eq!(decoder.next_frame(), Ok(None));
    }
}
