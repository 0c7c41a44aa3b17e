//! Streaming frame recovery.
//!
//! Each call scans for the sync pattern, waits until the declared LENGTH is
//! fully buffered, then validates the frame with the flat-buffer codec.
//!
//! Noise before a sync pattern is consumed silently (counted, not reported).
//! When a frame fails validation after its sync was found, only the two sync
//! bytes are consumed, never the declared LENGTH, which may itself be the
//! corrupt field. Scanning then resumes inside the rejected frame, so a
//! damaged frame costs at most itself and never the frames behind it.

use tracing::{debug, trace};

use super::ByteSource;
use crate::protocol::header::declared_length;
use crate::protocol::metrics::Metrics;
use crate::protocol::{Error, Frame, LENGTH_PREFIX_SIZE, MAX_FRAME_SIZE, Result, SYNC, SYNC_SIZE};

/// Per-parser counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParserStats {
    /// Frames decoded successfully
    pub frames: u64,
    /// Noise bytes discarded while scanning for sync
    pub bytes_skipped: u64,
    /// Frames rejected after sync was found
    pub frames_dropped: u64,
}

/// Stateful streaming parser.
///
/// The parser holds no buffered bytes; everything lives in the
/// [`ByteSource`], so a parser can be rebuilt at any time without losing
/// data. It only keeps statistics.
#[derive(Debug, Default, Clone)]
pub struct StreamParser {
    stats: ParserStats,
}

impl StreamParser {
    /// Create a parser with zeroed statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters accumulated so far
    #[must_use]
    pub const fn stats(&self) -> ParserStats {
        self.stats
    }

    /// Try to pull the next frame out of `source`.
    ///
    /// Returns `Ok(None)` when more bytes are needed; in that case nothing
    /// past the noise preceding a possible sync pattern has been consumed.
    ///
    /// # Errors
    ///
    /// A rejected frame ([`Error::BadLength`], [`Error::BadCrc`],
    /// [`Error::UnsupportedVersion`], or [`Error::Truncated`] when the
    /// declared LENGTH exceeds the source's capacity) is reported once; the next call resumes
    /// scanning after its sync pattern. [`Error::NoMemory`] leaves the frame
    /// buffered so the call can be retried.
    pub fn parse<B: ByteSource + ?Sized>(&mut self, source: &mut B) -> Result<Option<Frame>> {
        if !self.seek_sync(source) {
            return Ok(None);
        }

        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        if source.peek(&mut prefix) < LENGTH_PREFIX_SIZE {
            return Ok(None);
        }
        let length = match declared_length(&prefix) {
            Ok(length) => usize::from(length),
            Err(err) => {
                Metrics::record_error(&err);
                return Err(self.resync(source, err));
            }
        };

        if let Some(capacity) = source.capacity().filter(|&capacity| capacity < length) {
            let err = Error::Truncated {
                needed: length,
                got: capacity,
            };
            Metrics::record_error(&err);
            return Err(self.resync(source, err));
        }
        if source.available() < length {
            trace!(
                length,
                available = source.available(),
                "waiting for rest of frame"
            );
            return Ok(None);
        }

        let mut scratch = [0u8; MAX_FRAME_SIZE];
        let frame_bytes = &mut scratch[..length];
        source.peek(frame_bytes);

        let frame = match crate::protocol::parse(frame_bytes) {
            Ok(frame) => frame.to_owned_frame()?,
            Err(err) => return Err(self.resync(source, err)),
        };

        source.consume(length);
        self.stats.frames += 1;
        trace!(
            seq = frame.sequence(),
            msg_type = frame.msg_type(),
            length,
            "frame decoded"
        );
        Ok(Some(frame))
    }

    /// Discard bytes until the source starts with the sync pattern.
    ///
    /// A lone trailing `0xAA` is kept since it may be the first half of a
    /// sync pattern still in transit.
    fn seek_sync<B: ByteSource + ?Sized>(&mut self, source: &mut B) -> bool {
        let mut skipped = 0usize;
        let found = loop {
            let mut window = [0u8; SYNC_SIZE];
            match source.peek(&mut window) {
                SYNC_SIZE if window == SYNC => break true,
                1 if window[0] == SYNC[0] => break false,
                0 => break false,
                _ => skipped += source.consume(1),
            }
        };

        if skipped > 0 {
            self.stats.bytes_skipped += skipped as u64;
            Metrics::record_skipped(skipped);
            trace!(skipped, "discarded bytes before sync");
        }
        found
    }

    fn resync<B: ByteSource + ?Sized>(&mut self, source: &mut B, err: Error) -> Error {
        source.consume(SYNC_SIZE);
        self.stats.frames_dropped += 1;
        Metrics::record_dropped();
        debug!(error = %err, "rejected frame after sync; resynchronizing");
        err
    }
}

/// One-shot streaming parse with throwaway statistics.
///
/// See [`StreamParser::parse`].
pub fn parse_streaming<B: ByteSource + ?Sized>(source: &mut B) -> Result<Option<Frame>> {
    StreamParser::new().parse(source)
}
