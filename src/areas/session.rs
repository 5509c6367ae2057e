use crate::areas::index::{DecodeOptions, GitIndex};
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One command invocation against an index file on disk
pub struct Session {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    options: DecodeOptions,
}

impl Session {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>, options: DecodeOptions) -> Self {
        Session {
            path: Path::new(path).into(),
            writer: RefCell::new(writer),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    /// Decode the index header and run `action` against it
    ///
    /// # Locking
    ///
    /// Holds a shared lock on the index file until `action` returns, so a
    /// concurrent git writer cannot swap the file out mid-decode.
    pub fn with_index<T>(
        &self,
        action: impl FnOnce(&GitIndex<BufReader<&mut File>>) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(self.path())
            .with_context(|| format!("Failed to open index file {}", self.path().display()))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)
            .with_context(|| format!("Failed to lock index file {}", self.path().display()))?;

        let index = GitIndex::with_options(BufReader::new(&mut **lock), self.options)
            .with_context(|| format!("Failed to read index file {}", self.path().display()))?;

        action(&index)
    }
}
