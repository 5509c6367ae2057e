//! Git index file format
//!
//! The index (also called staging area or cache) stores information about the working tree.
//! Only the base layout of version 2 is understood here.
//!
//! ## File Format (Version 2)
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version: 2 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - 62-byte fixed block (ten 32-bit fields, 20-byte SHA-1, 16-bit flags)
//!   - Null-terminated path
//!   - Null padding so the record length is a multiple of 8
//! ```
//!
//! Extensions and the trailing SHA-1 checksum that follow the entries are
//! left unread.

pub mod entry_flags;
pub mod entry_mode;
pub mod error;
pub mod index_entry;
pub mod index_header;
pub mod reader;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 12; // 4 bytes for signature, 4 for version, 4 for entry_count

/// Magic signature identifying index files
pub const SIGNATURE: &[u8; 4] = b"DIRC";

/// Index file format version
pub const VERSION: u32 = 2;

/// Size of the fixed part of an index entry, before the path
pub const ENTRY_FIXED_SIZE: usize = 62; // 10 * 4 bytes of stat data + 20 bytes SHA-1 + 2 bytes flags

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Number of null bytes needed after `consumed` record bytes to reach the next
/// entry boundary. Always in `0..ENTRY_BLOCK`.
pub fn padding_len(consumed: usize) -> usize {
    (ENTRY_BLOCK - consumed % ENTRY_BLOCK) % ENTRY_BLOCK
}
