//! Plumbing commands (low-level index inspection)
//!
//! ## Commands
//!
//! - `dump`: Print every decoded entry followed by its SHA-1
//! - `header`: Print the index header fields
//! - `ls-files`: List staged paths, optionally with mode, hash and stat data

pub mod dump;
pub mod ls_files;
pub mod show_header;
