//! `dirc` decodes git's index file (the "directory cache", signature `DIRC`)
//! into a header and an ordered list of staged entries.
//!
//! ```rust,ignore
//! let file = std::fs::File::open(".git/index")?;
//! let index = GitIndex::new(std::io::BufReader::new(file))?;
//! for entry in index.entries()? {
//!     println!("{} {}", entry.oid, entry.path_lossy());
//! }
//! ```

/// Macro for debug logging that is enabled with the debug_index feature flag
///
/// # Usage
/// ```rust,ignore
/// debug_log!("Decoded entry {} at offset {}", position, offset);
/// ```
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_index")]
        {
            eprintln!($($arg)*);
        }
    };
}

pub mod areas;
pub mod artifacts;
pub mod commands;

pub use areas::index::{DecodeOptions, GitIndex};
pub use artifacts::index::error::FormatError;
pub use artifacts::index::index_entry::IndexEntry;
pub use artifacts::index::index_header::IndexHeader;
