//! Command implementations
//!
//! Only plumbing commands exist: each one decodes an index file and prints a
//! view of it. Nothing here writes to disk.

pub mod plumbing;
