//! View over the 16-bit flags field of an index entry
//!
//! ```text
//! bit 15     assume-valid
//! bit 14     extended (must be 0 in version 2)
//! bits 12-13 merge stage
//! bits 0-11  path length, saturated at 0xFFF
//! ```

use bitflags::bitflags;
use std::cmp::min;

/// Largest path length the flags can record
pub const MAX_PATH_SIZE: usize = 0xFFF;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EntryFlags: u16 {
        const ASSUME_VALID = 0x8000;
        const EXTENDED = 0x4000;
        const STAGE = 0x3000;
        const NAME_LENGTH = 0x0FFF;
    }
}

impl EntryFlags {
    /// Flags git writes for a stage-0 entry with a path of `path_len` bytes
    pub fn for_path(path_len: usize) -> Self {
        Self::from_bits_retain(min(path_len, MAX_PATH_SIZE) as u16)
    }

    pub fn stage(&self) -> u8 {
        ((self.bits() & Self::STAGE.bits()) >> 12) as u8
    }

    pub fn name_length(&self) -> u16 {
        self.bits() & Self::NAME_LENGTH.bits()
    }

    pub fn is_assume_valid(&self) -> bool {
        self.contains(Self::ASSUME_VALID)
    }

    pub fn is_extended(&self) -> bool {
        self.contains(Self::EXTENDED)
    }
}
