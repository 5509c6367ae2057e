//! Git object identifiers as they appear inside index records
//!
//! Every index entry carries the SHA-1 of the blob it stages. The index stores
//! that hash as 20 raw bytes; users read it as 40 lowercase hex characters.

pub mod object;
pub mod object_id;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in raw bytes
pub const OBJECT_ID_SIZE: usize = OBJECT_ID_LENGTH / 2;
