//! Binary artifacts of the index file
//!
//! - `index`: header, entry records and the reader that walks them
//! - `objects`: object identifiers and the packing traits shared by every record

pub mod index;
pub mod objects;
