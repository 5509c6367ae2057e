//! Offset-tracking reader over an index stream
//!
//! Entry padding is computed from how many bytes a record consumed, so every
//! read goes through this wrapper and bumps a running offset. Short reads at
//! end-of-file are returned as-is; deciding whether that is an error belongs
//! to the record being decoded.

use crate::artifacts::index::error::FormatError;
use bytes::Bytes;
use std::io::{BufRead, ErrorKind};

#[derive(Debug)]
pub struct IndexReader<R> {
    inner: R,
    offset: u64,
}

impl<R: BufRead> IndexReader<R> {
    pub fn new(inner: R) -> Self {
        IndexReader { inner, offset: 0 }
    }

    /// Bytes consumed since the start of the stream
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read up to `size` bytes, stopping early only at end-of-file
    pub fn read(&mut self, size: usize) -> Result<Bytes, FormatError> {
        let mut buffer = vec![0; size];
        let mut filled = 0;

        while filled < size {
            match self.inner.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }

        buffer.truncate(filled);
        self.offset += filled as u64;

        Ok(Bytes::from(buffer))
    }

    /// Read through the next null byte
    ///
    /// # Returns
    ///
    /// The bytes before the terminator, or `None` if the stream ended first.
    /// The terminator itself is consumed but not returned.
    pub fn read_until_nul(&mut self) -> Result<Option<Bytes>, FormatError> {
        let mut buffer = Vec::new();
        let read = loop {
            match self.inner.read_until(0, &mut buffer) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };
        self.offset += read as u64;

        match buffer.pop() {
            Some(0) => Ok(Some(Bytes::from(buffer))),
            _ => Ok(None),
        }
    }
}

impl<R> IndexReader<R> {
    pub fn into_inner(self) -> R {
        self.inner
    }
}
