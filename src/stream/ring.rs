//! Fixed-capacity circular byte buffer.
//!
//! Cursors are bounded indices in `0..capacity` plus an explicit occupied
//! count, so `head == tail` is disambiguated by `len` (0 = empty,
//! `capacity` = full). Wrap-around is a conditional subtraction; since both
//! operands are at most `capacity`, no intermediate value can overflow.
//!
//! Writes never overwrite unread data: a full buffer accepts a short write
//! and reports how many bytes it took.

use crate::protocol::{Error, Result};

/// Circular byte buffer over owned or caller-supplied storage.
///
/// Not synchronized: one producer and one consumer on the same thread, or an
/// external lock around both.
pub struct RingBuffer<S = Box<[u8]>> {
    storage: S,
    head: usize,
    tail: usize,
    len: usize,
}

impl RingBuffer {
    /// Allocate a buffer of `capacity` bytes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for zero capacity, [`Error::NoMemory`] if
    /// the block cannot be allocated.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidArgument("ring buffer capacity must be non-zero"));
        }

        let mut block = Vec::new();
        block
            .try_reserve_exact(capacity)
            .map_err(|err| Error::alloc_failed(capacity, err))?;
        block.resize(capacity, 0);

        Self::with_storage(block.into_boxed_slice())
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> RingBuffer<S> {
    /// Use `storage` as the backing block; its length is the capacity.
    ///
    /// Existing contents are not cleared; only written regions are ever read.
    pub fn with_storage(storage: S) -> Result<Self> {
        if storage.as_ref().is_empty() {
            return Err(Error::InvalidArgument("ring buffer capacity must be non-zero"));
        }

        Ok(Self {
            storage,
            head: 0,
            tail: 0,
            len: 0,
        })
    }

    /// Total capacity in bytes
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.as_ref().len()
    }

    /// Bytes waiting to be read
    #[must_use]
    pub fn available(&self) -> usize {
        self.len
    }

    /// Bytes that can be written before the buffer is full
    #[must_use]
    pub fn free_space(&self) -> usize {
        self.capacity() - self.len
    }

    /// Check whether nothing is buffered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check whether no space is left
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Write as many leading bytes of `data` as fit; returns the count taken.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let count = data.len().min(self.free_space());
        if count == 0 {
            return 0;
        }

        let capacity = self.capacity();
        let head = self.head;
        let first = count.min(capacity - head);
        let storage = self.storage.as_mut();
        storage[head..head + first].copy_from_slice(&data[..first]);
        storage[..count - first].copy_from_slice(&data[first..count]);

        self.head = wrap(head, count, capacity);
        self.len += count;
        count
    }

    /// Copy up to `dst.len()` bytes out without consuming them.
    #[must_use]
    pub fn peek(&self, dst: &mut [u8]) -> usize {
        let count = dst.len().min(self.len);
        if count == 0 {
            return 0;
        }

        let storage = self.storage.as_ref();
        let first = count.min(storage.len() - self.tail);
        dst[..first].copy_from_slice(&storage[self.tail..self.tail + first]);
        dst[first..count].copy_from_slice(&storage[..count - first]);
        count
    }

    /// Copy up to `dst.len()` bytes out and consume them.
    pub fn read(&mut self, dst: &mut [u8]) -> usize {
        let count = self.peek(dst);
        self.consume(count)
    }

    /// Discard up to `count` buffered bytes; returns the number discarded.
    pub fn consume(&mut self, count: usize) -> usize {
        let count = count.min(self.len);
        self.tail = wrap(self.tail, count, self.capacity());
        self.len -= count;
        count
    }

    /// Drop all buffered bytes.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    /// Give the backing storage back.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }
}

impl<S: AsRef<[u8]>> std::fmt::Debug for RingBuffer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.storage.as_ref().len())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

const fn wrap(index: usize, advance: usize, capacity: usize) -> usize {
    let next = index + advance;
    if next >= capacity { next - capacity } else { next }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(RingBuffer::new(0), Err(Error::InvalidArgument(_))));
        let empty: [u8; 0] = [];
        assert!(RingBuffer::with_storage(empty).is_err());
    }

    #[test]
    fn test_write_read() {
        let mut ring = RingBuffer::new(8).unwrap();
        assert_eq!(ring.write(b"abc"), 3);
        assert_eq!(ring.available(), 3);
        assert_eq!(ring.free_space(), 5);

        let mut out = [0u8; 8];
        assert_eq!(ring.read(&mut out), 3);
        assert_eq!(&out[..3], b"abc");
        assert!(ring.is_empty());
        assert_eq!(ring.read(&mut out), 0);
    }

    #[test]
    fn test_short_write_is_back_pressure() {
        let mut ring = RingBuffer::new(4).unwrap();
        assert_eq!(ring.write(b"abcdef"), 4);
        assert!(ring.is_full());
        assert_eq!(ring.write(b"g"), 0);

        let mut out = [0u8; 4];
        assert_eq!(ring.read(&mut out), 4);
        assert_eq!(&out, b"abcd");
    }

    #[test]
    fn test_wrap_around() {
        let mut ring = RingBuffer::new(5).unwrap();
        ring.write(b"abcd");
        let mut out = [0u8; 3];
        ring.read(&mut out);
        assert_eq!(&out, b"abc");

        // head = 4, tail = 3: this write wraps.
        assert_eq!(ring.write(b"efgh"), 4);
        assert!(ring.is_full());

        let mut out = [0u8; 5];
        assert_eq!(ring.peek(&mut out), 5);
        assert_eq!(&out, b"defgh");
        assert_eq!(ring.available(), 5);
        assert_eq!(ring.read(&mut out), 5);
        assert_eq!(&out, b"defgh");
    }

    #[test]
    fn test_full_and_empty_at_same_index() {
        let mut ring = RingBuffer::new(3).unwrap();
        ring.write(b"xyz");
        assert!(ring.is_full());
        assert_eq!(ring.free_space(), 0);

        assert_eq!(ring.consume(3), 3);
        assert!(ring.is_empty());
        assert_eq!(ring.free_space(), 3);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut ring = RingBuffer::new(4).unwrap();
        ring.write(b"hi");
        let mut out = [0u8; 1];
        assert_eq!(ring.peek(&mut out), 1);
        assert_eq!(ring.peek(&mut out), 1);
        assert_eq!(ring.available(), 2);
        assert_eq!(ring.consume(10), 2);
    }

    #[test]
    fn test_caller_storage() {
        let mut backing = [0xEEu8; 6];
        {
            let mut ring = RingBuffer::with_storage(&mut backing[..]).unwrap();
            assert_eq!(ring.capacity(), 6);
            ring.write(b"io");
        }
        assert_eq!(&backing[..2], b"io");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::VecDeque;

        #[derive(Debug, Clone)]
        enum Op {
            Write(Vec<u8>),
            Read(usize),
            Peek(usize),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                prop::collection::vec(any::<u8>(), 0..24).prop_map(Op::Write),
                (0usize..24).prop_map(Op::Read),
                (0usize..24).prop_map(Op::Peek),
            ]
        }

        proptest! {
            /// Property: occupancy is conserved and bytes come out in order
            #[test]
            fn prop_conservation_and_order(
                capacity in 1usize..32,
                ops in prop::collection::vec(op_strategy(), 0..64),
            ) {
                let mut ring = RingBuffer::new(capacity).unwrap();
                let mut model = VecDeque::new();

                for op in ops {
                    match op {
                        Op::Write(data) => {
                            let written = ring.write(&data);
                            let expected = data.len().min(capacity - model.len());
                            prop_assert_eq!(written, expected);
                            model.extend(&data[..written]);
                        }
                        Op::Read(max) => {
                            let mut out = vec![0u8; max];
                            let read = ring.read(&mut out);
                            let expected: Vec<u8> = model.drain(..read).collect();
                            prop_assert_eq!(&out[..read], expected.as_slice());
                        }
                        Op::Peek(max) => {
                            let mut out = vec![0u8; max];
                            let peeked = ring.peek(&mut out);
                            prop_assert_eq!(peeked, max.min(model.len()));
                            let expected: Vec<u8> = model.iter().take(peeked).copied().collect();
                            prop_assert_eq!(&out[..peeked], expected.as_slice());
                        }
                    }
                    prop_assert_eq!(ring.available(), model.len());
                    prop_assert_eq!(ring.available() + ring.free_space(), capacity);
                }
            }
        }
    }
}
