//! Process-wide framing counters.
//!
//! Counters are relaxed atomics so the flat `parse`/`build` functions stay
//! callable from any thread. Per-stream counts live in
//! [`ParserStats`](crate::stream::ParserStats).

use std::sync::atomic::{AtomicU64, Ordering};

use super::{Error, ErrorKind};

pub(crate) struct Metrics;

static FRAMES_ENCODED: AtomicU64 = AtomicU64::new(0);
static BYTES_ENCODED: AtomicU64 = AtomicU64::new(0);
static FRAMES_DECODED: AtomicU64 = AtomicU64::new(0);
static BYTES_SKIPPED: AtomicU64 = AtomicU64::new(0);
static FRAMES_DROPPED: AtomicU64 = AtomicU64::new(0);

struct ErrorCounters {
    invalid_arg: AtomicU64,
    no_sync: AtomicU64,
    bad_length: AtomicU64,
    bad_crc: AtomicU64,
    bad_version: AtomicU64,
    buffer_full: AtomicU64,
    no_memory: AtomicU64,
}

static ERROR_COUNTERS: ErrorCounters = ErrorCounters::new();

impl ErrorCounters {
    const fn new() -> Self {
        Self {
            invalid_arg: AtomicU64::new(0),
            no_sync: AtomicU64::new(0),
            bad_length: AtomicU64::new(0),
            bad_crc: AtomicU64::new(0),
            bad_version: AtomicU64::new(0),
            buffer_full: AtomicU64::new(0),
            no_memory: AtomicU64::new(0),
        }
    }

    fn increment(&self, kind: ErrorKind) {
        let counter = match kind {
            ErrorKind::InvalidArg => &self.invalid_arg,
            ErrorKind::NoSync => &self.no_sync,
            ErrorKind::BadLength => &self.bad_length,
            ErrorKind::BadCrc => &self.bad_crc,
            ErrorKind::BadVersion => &self.bad_version,
            ErrorKind::BufferFull => &self.buffer_full,
            ErrorKind::NoMemory => &self.no_memory,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl Metrics {
    #[inline]
    pub(crate) fn record_encoded(len: usize) {
        FRAMES_ENCODED.fetch_add(1, Ordering::Relaxed);
        BYTES_ENCODED.fetch_add(len as u64, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_decoded() {
        FRAMES_DECODED.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_error(err: &Error) {
        ERROR_COUNTERS.increment(err.kind());
    }

    #[inline]
    pub(crate) fn record_skipped(bytes: usize) {
        BYTES_SKIPPED.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dropped() {
        FRAMES_DROPPED.fetch_add(1, Ordering::Relaxed);
    }
}

/// Read the current process-wide counters.
#[must_use]
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        frames_encoded: FRAMES_ENCODED.load(Ordering::Relaxed),
        bytes_encoded: BYTES_ENCODED.load(Ordering::Relaxed),
        frames_decoded: FRAMES_DECODED.load(Ordering::Relaxed),
        bytes_skipped: BYTES_SKIPPED.load(Ordering::Relaxed),
        frames_dropped: FRAMES_DROPPED.load(Ordering::Relaxed),
        invalid_arg_errors: ERROR_COUNTERS.invalid_arg.load(Ordering::Relaxed),
        no_sync_errors: ERROR_COUNTERS.no_sync.load(Ordering::Relaxed),
        bad_length_errors: ERROR_COUNTERS.bad_length.load(Ordering::Relaxed),
        bad_crc_errors: ERROR_COUNTERS.bad_crc.load(Ordering::Relaxed),
        bad_version_errors: ERROR_COUNTERS.bad_version.load(Ordering::Relaxed),
        buffer_full_errors: ERROR_COUNTERS.buffer_full.load(Ordering::Relaxed),
        no_memory_errors: ERROR_COUNTERS.no_memory.load(Ordering::Relaxed),
    }
}

/// Lightweight snapshot of the framing counters.
#[allow(missing_docs)]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsSnapshot {
    pub frames_encoded: u64,
    pub bytes_encoded: u64,
    pub frames_decoded: u64,
    pub bytes_skipped: u64,
    pub frames_dropped: u64,
    pub invalid_arg_errors: u64,
    pub no_sync_errors: u64,
    pub bad_length_errors: u64,
    pub bad_crc_errors: u64,
    pub bad_version_errors: u64,
    pub buffer_full_errors: u64,
    pub no_memory_errors: u64,
}

impl MetricsSnapshot {
    /// Sum of all error counters.
    #[must_use]
    pub fn total_errors(&self) -> u64 {
        self.invalid_arg_errors
            + self.no_sync_errors
            + self.bad_length_errors
            + self.bad_crc_errors
            + self.bad_version_errors
            + self.buffer_full_errors
            + self.no_memory_errors
    }

    /// Average encoded frame size in bytes.
    #[must_use]
    pub fn avg_encoded_len(&self) -> Option<u64> {
        self.bytes_encoded.checked_div(self.frames_encoded)
    }
}
