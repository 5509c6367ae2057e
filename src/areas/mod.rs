//! Index file areas
//!
//! - `index`: the decoded index aggregate (header plus memoized entries)
//! - `session`: opens an index file on disk and drives the plumbing commands

pub mod index;
pub mod session;
