//! Git object identifier (SHA-1 hash)
//!
//! Index entries store the hash of the staged blob as 20 raw bytes. This type
//! keeps those bytes untouched and renders them as the usual 40-character
//! lowercase hexadecimal string.
//!
//! ## Format
//!
//! - Full: 40 hex characters (e.g., "abc123...def")
//! - Short: First 7 characters (e.g., "abc123")

use crate::artifacts::objects::{OBJECT_ID_LENGTH, OBJECT_ID_SIZE};
use std::fmt;
use std::io;

/// Git object identifier (SHA-1 hash)
///
/// Holds the raw 20-byte digest exactly as it was read from the index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_SIZE]);

impl ObjectId {
    pub fn from_bytes(bytes: [u8; OBJECT_ID_SIZE]) -> Self {
        ObjectId(bytes)
    }

    /// Parse and validate an object ID from its hexadecimal form
    ///
    /// # Arguments
    ///
    /// * `id` - 40-character hexadecimal string (either case)
    ///
    /// # Returns
    ///
    /// Validated ObjectId or error if invalid length/characters
    pub fn try_parse(id: &str) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object ID characters: {}", id));
        }

        let mut bytes = [0u8; OBJECT_ID_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&id[i * 2..i * 2 + 2], 16)?;
        }

        Ok(Self(bytes))
    }

    /// Write the object ID in binary format (20 bytes)
    pub fn write_h40_to<W: io::Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.0)
    }

    /// Read an object ID from binary format (20 bytes)
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; OBJECT_ID_SIZE];
        reader.read_exact(&mut bytes)?;

        Ok(Self(bytes))
    }

    /// Full 40-character lowercase hexadecimal rendering
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    /// Get abbreviated form of the object ID
    ///
    /// # Returns
    ///
    /// First 7 characters of the hash (standard Git abbreviation)
    pub fn to_short_oid(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(7);
        hex
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({self})")
    }
}
