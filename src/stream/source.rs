//! Byte sources the stream parser can pull from.

use bytes::{Buf, BytesMut};

use super::RingBuffer;

/// A FIFO of bytes that can be inspected before it is consumed.
pub trait ByteSource {
    /// Number of buffered bytes.
    fn available(&self) -> usize;

    /// Copy up to `dst.len()` leading bytes without consuming them.
    fn peek(&self, dst: &mut [u8]) -> usize;

    /// Discard up to `count` leading bytes; returns the number discarded.
    fn consume(&mut self, count: usize) -> usize;

    /// Most bytes the source can ever hold at once, or `None` if it can grow.
    fn capacity(&self) -> Option<usize> {
        None
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> ByteSource for RingBuffer<S> {
    fn available(&self) -> usize {
        RingBuffer::available(self)
    }

    fn peek(&self, dst: &mut [u8]) -> usize {
        RingBuffer::peek(self, dst)
    }

    fn consume(&mut self, count: usize) -> usize {
        RingBuffer::consume(self, count)
    }

    fn capacity(&self) -> Option<usize> {
        Some(RingBuffer::capacity(self))
    }
}

impl ByteSource for BytesMut {
    fn available(&self) -> usize {
        self.len()
    }

    fn peek(&self, dst: &mut [u8]) -> usize {
        let count = dst.len().min(self.len());
        dst[..count].copy_from_slice(&self[..count]);
        count
    }

    fn consume(&mut self, count: usize) -> usize {
        let count = count.min(self.len());
        self.advance(count);
        count
    }
}

/// A slice consumes by narrowing itself.
///
/// Callers re-slice to append data, so a slice reports no capacity bound.
impl ByteSource for &[u8] {
    fn available(&self) -> usize {
        self.len()
    }

    fn peek(&self, dst: &mut [u8]) -> usize {
        let count = dst.len().min(self.len());
        dst[..count].copy_from_slice(&self[..count]);
        count
    }

    fn consume(&mut self, count: usize) -> usize {
        let count = count.min(self.len());
        *self = &self[count..];
        count
    }
}
