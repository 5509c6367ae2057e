use crate::artifacts::index::error::FormatError;
use crate::artifacts::index::reader::IndexReader;
use bytes::Bytes;
use std::io::BufRead;

/// Records that can be written back in their on-disk layout
pub trait Packable {
    fn serialize(&self) -> Result<Bytes, FormatError>;
}

/// Records that can be decoded from the current position of an index stream
pub trait Unpackable {
    fn deserialize<R: BufRead>(reader: &mut IndexReader<R>) -> Result<Self, FormatError>
    where
        Self: Sized;
}
