use std::fmt::{self, Write};

use bytes::{BufMut, BytesMut};

use crate::constants::MAX_INTEGER_DIGITS;

/// Append-only output buffer used by the encoder.
///
/// Capacity at least doubles whenever an append does not fit, so a full
/// encode is amortized linear in the output size. The storage is released
/// on drop, which is how an aborted encode gives its memory back.
#[derive(Debug)]
pub(crate) struct EncodeBuffer {
    buf: BytesMut,
}

impl EncodeBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    fn grow_for(&mut self, additional: usize) {
        if self.buf.capacity() - self.buf.len() < additional {
            self.buf.reserve(additional.max(self.buf.capacity()));
        }
    }

    pub(crate) fn put_u8(&mut self, byte: u8) {
        self.grow_for(1);
        self.buf.put_u8(byte);
    }

    pub(crate) fn put_slice(&mut self, data: &[u8]) {
        self.grow_for(data.len());
        self.buf.put_slice(data);
    }

    /// Appends the minimal decimal form of `n`.
    pub(crate) fn put_integer(&mut self, n: i64) -> fmt::Result {
        self.grow_for(MAX_INTEGER_DIGITS);
        write!(self.buf, "{n}")
    }

    /// Appends a byte string length prefix and its `:`.
    pub(crate) fn put_length(&mut self, len: usize) -> fmt::Result {
        self.grow_for(MAX_INTEGER_DIGITS + 1);
        write!(self.buf, "{len}:")
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.buf.into()
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.buf.capacity()
    }
}
