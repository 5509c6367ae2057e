use std::io;
use thiserror::Error;

/// Everything that can make an index file undecodable
///
/// Every variant is fatal: decoding stops at the first one and the stream is
/// left wherever the failing read put it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Truncated index header: expected {expected} bytes, found {found}")]
    TruncatedHeader { expected: usize, found: usize },

    #[error("Invalid index file signature: {:?}", String::from_utf8_lossy(.0))]
    InvalidSignature([u8; 4]),

    #[error("Unsupported index file version: {0}")]
    UnsupportedVersion(u32),

    #[error("Truncated index entry at offset {offset}: expected {expected} bytes, found {found}")]
    TruncatedEntry {
        offset: u64,
        expected: usize,
        found: usize,
    },

    #[error("Missing null terminator in entry path starting at offset {offset}")]
    UnterminatedPath { offset: u64 },

    #[error("Truncated entry padding at offset {offset}: expected {expected} bytes, found {found}")]
    TruncatedPadding {
        offset: u64,
        expected: usize,
        found: usize,
    },

    #[error("Non-zero padding byte {byte:#04x} at offset {offset}")]
    NonZeroPadding { offset: u64, byte: u8 },

    #[error("Entry path contains a null byte: {path:?}")]
    NulInPath { path: String },

    #[error("I/O error while reading index: {message}")]
    Io { kind: io::ErrorKind, message: String },
}

impl From<io::Error> for FormatError {
    fn from(err: io::Error) -> Self {
        FormatError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
