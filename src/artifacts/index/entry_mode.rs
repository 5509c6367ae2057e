use std::fmt;

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
}

/// Object type and permissions packed in an index entry's `mode` field
#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum EntryMode {
    File(FileMode),
    Symlink,
    Gitlink,
    /// Any other value, kept verbatim
    Unknown(u32),
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::File(FileMode::Regular)
    }
}

impl EntryMode {
    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
            EntryMode::Symlink => 0o120000,
            EntryMode::Gitlink => 0o160000,
            EntryMode::Unknown(mode) => *mode,
        }
    }
}

impl From<u32> for EntryMode {
    fn from(mode: u32) -> Self {
        match mode {
            0o100644 => EntryMode::File(FileMode::Regular),
            0o100755 => EntryMode::File(FileMode::Executable),
            0o120000 => EntryMode::Symlink,
            0o160000 => EntryMode::Gitlink,
            other => EntryMode::Unknown(other),
        }
    }
}

impl From<EntryMode> for u32 {
    fn from(mode: EntryMode) -> Self {
        mode.as_u32()
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06o}", self.as_u32())
    }
}
