use crate::artifacts::index::error::FormatError;
use crate::artifacts::index::reader::IndexReader;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

/// Index file prologue
///
/// Decoded once, before any entry, and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub signature: [u8; 4],
    pub version: u32,
    pub entry_count: u32,
}

impl IndexHeader {
    pub fn empty() -> Self {
        IndexHeader {
            signature: *SIGNATURE,
            version: VERSION,
            entry_count: 0,
        }
    }

    pub fn signature_lossy(&self) -> String {
        String::from_utf8_lossy(&self.signature).into_owned()
    }

    fn validate(&self) -> Result<(), FormatError> {
        if &self.signature != SIGNATURE {
            return Err(FormatError::InvalidSignature(self.signature));
        }

        if self.version != VERSION {
            return Err(FormatError::UnsupportedVersion(self.version));
        }

        Ok(())
    }
}

impl Packable for IndexHeader {
    fn serialize(&self) -> Result<Bytes, FormatError> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.write_all(&self.signature)?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.version)?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.entry_count)?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for IndexHeader {
    fn deserialize<R: BufRead>(reader: &mut IndexReader<R>) -> Result<Self, FormatError> {
        let bytes = reader.read(HEADER_SIZE)?;
        if bytes.len() < HEADER_SIZE {
            return Err(FormatError::TruncatedHeader {
                expected: HEADER_SIZE,
                found: bytes.len(),
            });
        }

        let mut signature = [0u8; 4];
        signature.copy_from_slice(&bytes[0..4]);
        let header = IndexHeader {
            signature,
            version: byteorder::NetworkEndian::read_u32(&bytes[4..8]),
            entry_count: byteorder::NetworkEndian::read_u32(&bytes[8..12]),
        };
        header.validate()?;

        debug_log!(
            "index header: version {} with {} entries",
            header.version,
            header.entry_count
        );

        Ok(header)
    }
}
