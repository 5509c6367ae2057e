//! Index entry representation
//!
//! Each entry in the index represents a tracked file with:
//! - File path
//! - Content hash (object ID)
//! - File metadata (mode, size, timestamps)
//!
//! ## Entry Format
//!
//! A 62-byte fixed block, the null-terminated path, then 0-7 null bytes so the
//! whole record is a multiple of 8 bytes long. Decoding an entry stops right
//! after the path terminator; skipping the padding is the entry stream's job
//! because only it knows where the record started.

use crate::artifacts::index::entry_flags::EntryFlags;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::error::FormatError;
use crate::artifacts::index::reader::IndexReader;
use crate::artifacts::index::{ENTRY_FIXED_SIZE, padding_len};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use derive_new::new;
use std::borrow::Cow;
use std::io::{BufRead, Cursor, Write};

/// Index entry representing a tracked file
#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// File path relative to repository root, without its terminator
    pub file_path: Bytes,
    /// SHA-1 hash of file content
    pub sha1: ObjectId,
    /// Stat data and flags
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    pub fn path_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.file_path)
    }

    pub fn mode(&self) -> EntryMode {
        self.metadata.mode.into()
    }

    pub fn flags(&self) -> EntryFlags {
        EntryFlags::from_bits_retain(self.metadata.flags)
    }

    pub fn stage(&self) -> u8 {
        self.flags().stage()
    }

    pub fn ctime(&self) -> Option<DateTime<Utc>> {
        timestamp(self.metadata.ctime_seconds, self.metadata.ctime_nanoseconds)
    }

    pub fn mtime(&self) -> Option<DateTime<Utc>> {
        timestamp(self.metadata.mtime_seconds, self.metadata.mtime_nanoseconds)
    }

    /// Null padding that follows the path on disk
    pub fn padding_len(&self) -> usize {
        padding_len(ENTRY_FIXED_SIZE + self.file_path.len() + 1)
    }

    /// Full on-disk length: fixed block, path, terminator and padding
    pub fn record_len(&self) -> usize {
        ENTRY_FIXED_SIZE + self.file_path.len() + 1 + self.padding_len()
    }
}

// Nanoseconds are a sub-second remainder; anything past a full second is corrupt
fn timestamp(seconds: u32, nanoseconds: u32) -> Option<DateTime<Utc>> {
    if nanoseconds >= 1_000_000_000 {
        return None;
    }

    DateTime::from_timestamp(seconds as i64, nanoseconds)
}

/// Stat data stored in index entries
///
/// Everything is kept exactly as the 32-bit (or 16-bit, for `flags`) values
/// found on disk; no field is widened or reinterpreted.
///
/// ## Timestamps
///
/// - `ctime`: File status change time (inode modification)
/// - `mtime`: File content modification time
///
/// The nanosecond fields are the sub-second part of the matching seconds field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EntryMetadata {
    pub ctime_seconds: u32,
    pub ctime_nanoseconds: u32,
    pub mtime_seconds: u32,
    pub mtime_nanoseconds: u32,
    /// Device ID
    pub dev: u32,
    /// Inode number
    pub ino: u32,
    /// File type and permissions, see [`EntryMode`]
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    /// File size in bytes, truncated to 32 bits
    pub file_size: u32,
    /// Raw flags, see [`EntryFlags`]
    pub flags: u16,
}

impl Packable for IndexEntry {
    fn serialize(&self) -> Result<Bytes, FormatError> {
        if self.file_path.contains(&0) {
            return Err(FormatError::NulInPath {
                path: self.path_lossy().into_owned(),
            });
        }

        let mut entry_bytes = Vec::with_capacity(self.record_len());
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.ctime_seconds)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.ctime_nanoseconds)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.mtime_seconds)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.mtime_nanoseconds)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.dev)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.ino)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.mode)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.uid)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.gid)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.file_size)?;
        self.sha1.write_h40_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<NetworkEndian>(self.metadata.flags)?;
        entry_bytes.write_all(&self.file_path)?;

        // The terminator is always present, padding only when needed
        entry_bytes.push(0);
        entry_bytes.resize(self.record_len(), 0);

        Ok(Bytes::from(entry_bytes))
    }
}

impl Unpackable for IndexEntry {
    fn deserialize<R: BufRead>(reader: &mut IndexReader<R>) -> Result<Self, FormatError> {
        let start = reader.offset();
        let block = reader.read(ENTRY_FIXED_SIZE)?;
        if block.len() < ENTRY_FIXED_SIZE {
            return Err(FormatError::TruncatedEntry {
                offset: start,
                expected: ENTRY_FIXED_SIZE,
                found: block.len(),
            });
        }

        let mut fields = Cursor::new(&block[..]);
        let metadata = EntryMetadata {
            ctime_seconds: fields.read_u32::<NetworkEndian>()?,
            ctime_nanoseconds: fields.read_u32::<NetworkEndian>()?,
            mtime_seconds: fields.read_u32::<NetworkEndian>()?,
            mtime_nanoseconds: fields.read_u32::<NetworkEndian>()?,
            dev: fields.read_u32::<NetworkEndian>()?,
            ino: fields.read_u32::<NetworkEndian>()?,
            mode: fields.read_u32::<NetworkEndian>()?,
            uid: fields.read_u32::<NetworkEndian>()?,
            gid: fields.read_u32::<NetworkEndian>()?,
            file_size: fields.read_u32::<NetworkEndian>()?,
            flags: 0,
        };
        let sha1 = ObjectId::read_h40_from(&mut fields)?;
        let metadata = EntryMetadata {
            flags: fields.read_u16::<NetworkEndian>()?,
            ..metadata
        };

        let path_start = reader.offset();
        let file_path = reader
            .read_until_nul()?
            .ok_or(FormatError::UnterminatedPath { offset: path_start })?;

        Ok(IndexEntry {
            file_path,
            sha1,
            metadata,
        })
    }
}
