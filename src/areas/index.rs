//! Decoded git index
//!
//! Decoding happens in two phases over a single stream:
//!
//! 1. [`GitIndex::new`] reads and validates the 12-byte header.
//! 2. [`GitIndex::entries`] reads every entry record the first time it is
//!    called and caches the outcome. Later calls return the cached entries (or
//!    the cached error) without touching the stream again.
//!
//! The stream must not be read or repositioned by anyone else in between.
//! Bytes after the last entry (extensions, trailing checksum) are never read.

use crate::artifacts::index::error::FormatError;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::padding_len;
use crate::artifacts::index::reader::IndexReader;
use crate::artifacts::objects::object::Unpackable;
use derive_new::new;
use std::cell::{OnceCell, RefCell};
use std::io::BufRead;

/// Upper bound on entries preallocated from an untrusted header count
const MAX_PREALLOCATED_ENTRIES: usize = 4096;

/// Knobs for the entry stream decoder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, new)]
pub struct DecodeOptions {
    /// Require every padding byte to be present and null
    ///
    /// Off by default: padding is skipped without looking at it, and a stream
    /// that ends inside the last record's padding is accepted.
    pub strict_padding: bool,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        DecodeOptions {
            strict_padding: true,
        }
    }
}

/// Git index (staging area) snapshot decoded from a byte stream
#[derive(Debug)]
pub struct GitIndex<R> {
    reader: RefCell<IndexReader<R>>,
    header: IndexHeader,
    options: DecodeOptions,
    entries: OnceCell<Result<Vec<IndexEntry>, FormatError>>,
}

impl<R: BufRead> GitIndex<R> {
    /// Decode the header with the default (lenient) options
    pub fn new(reader: R) -> Result<Self, FormatError> {
        Self::with_options(reader, DecodeOptions::default())
    }

    /// Decode the header
    ///
    /// # Errors
    ///
    /// [`FormatError`] if the stream holds fewer than 12 bytes, the signature
    /// is not `DIRC` or the version is not 2.
    pub fn with_options(reader: R, options: DecodeOptions) -> Result<Self, FormatError> {
        let mut reader = IndexReader::new(reader);
        let header = IndexHeader::deserialize(&mut reader)?;

        Ok(GitIndex {
            reader: RefCell::new(reader),
            header,
            options,
            entries: OnceCell::new(),
        })
    }

    pub fn header(&self) -> &IndexHeader {
        &self.header
    }

    /// Bytes consumed from the stream so far
    pub fn offset(&self) -> u64 {
        self.reader.borrow().offset()
    }

    /// All entries, in on-disk order
    ///
    /// The first call consumes the entry region of the stream exactly once;
    /// every call after that is served from the cache. A failed decode is
    /// cached as well, so no partial entry list is ever observable.
    pub fn entries(&self) -> Result<&[IndexEntry], FormatError> {
        if self.entries.get().is_some() {
            debug_log!("index entries: served from cache");
        }

        match self.entries.get_or_init(|| self.parse_entries()) {
            Ok(entries) => Ok(entries.as_slice()),
            Err(err) => Err(err.clone()),
        }
    }

    pub fn iter(&self) -> Result<std::slice::Iter<'_, IndexEntry>, FormatError> {
        Ok(self.entries()?.iter())
    }

    /// Take ownership of the decoded entries, decoding them first if needed
    pub fn into_entries(self) -> Result<Vec<IndexEntry>, FormatError> {
        self.entries()?;

        match self.entries.into_inner() {
            Some(entries) => entries,
            None => Ok(Vec::new()),
        }
    }

    /// Parse all entries from the index stream
    ///
    /// Reads each entry, then skips the padding that aligns the record to
    /// 8 bytes counted from where the record started.
    fn parse_entries(&self) -> Result<Vec<IndexEntry>, FormatError> {
        let mut reader = self.reader.borrow_mut();
        let entry_count = self.header.entry_count as usize;
        let mut entries = Vec::with_capacity(entry_count.min(MAX_PREALLOCATED_ENTRIES));

        for _ in 0..entry_count {
            let start = reader.offset();
            let entry = IndexEntry::deserialize(&mut *reader)?;

            let consumed = (reader.offset() - start) as usize;
            let padding = padding_len(consumed);
            self.skip_padding(&mut *reader, padding)?;

            debug_log!(
                "index entry {}: {:?} at offset {}, {} bytes + {} padding",
                entries.len(),
                entry.path_lossy(),
                start,
                consumed,
                padding
            );

            entries.push(entry);
        }

        Ok(entries)
    }

    fn skip_padding(&self, reader: &mut IndexReader<R>, padding: usize) -> Result<(), FormatError> {
        let start = reader.offset();
        let skipped = reader.read(padding)?;

        if !self.options.strict_padding {
            return Ok(());
        }

        if skipped.len() < padding {
            return Err(FormatError::TruncatedPadding {
                offset: start,
                expected: padding,
                found: skipped.len(),
            });
        }

        match skipped.iter().position(|&byte| byte != 0) {
            Some(at) => Err(FormatError::NonZeroPadding {
                offset: start + at as u64,
                byte: skipped[at],
            }),
            None => Ok(()),
        }
    }
}

impl<R> GitIndex<R> {
    /// Give the stream back, positioned after the last byte read
    pub fn into_reader(self) -> R {
        self.reader.into_inner().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::index_entry::EntryMetadata;
    use crate::artifacts::index::{ENTRY_BLOCK, ENTRY_FIXED_SIZE, HEADER_SIZE};
    use crate::artifacts::objects::object::Packable;
    use crate::artifacts::objects::object_id::ObjectId;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    fn entry(path: &str, seed: u8) -> IndexEntry {
        IndexEntry {
            file_path: Bytes::copy_from_slice(path.as_bytes()),
            sha1: ObjectId::from_bytes([seed; 20]),
            metadata: EntryMetadata {
                mtime_seconds: 1_700_000_000 + seed as u32,
                mode: 0o100644,
                file_size: seed as u32 * 10,
                flags: path.len() as u16,
                ..Default::default()
            },
        }
    }

    fn encode(entries: &[IndexEntry]) -> Vec<u8> {
        let mut bytes = IndexHeader::new(*b"DIRC", 2, entries.len() as u32)
            .serialize()
            .unwrap()
            .to_vec();
        for entry in entries {
            bytes.extend_from_slice(&entry.serialize().unwrap());
        }
        bytes
    }

    #[fixture]
    fn entries() -> Vec<IndexEntry> {
        vec![
            entry("Cargo.toml", 1),
            entry("README.md", 2),
            entry("src/lib.rs", 3),
            entry("src/areas/index.rs", 4),
        ]
    }

    #[rstest]
    fn decodes_every_entry_in_order(entries: Vec<IndexEntry>) {
        let index = GitIndex::new(Cursor::new(encode(&entries))).unwrap();

        assert_eq!(index.header().entry_count, 4);
        assert_eq!(index.entries().unwrap(), entries.as_slice());
    }

    #[rstest]
    fn header_decode_leaves_entries_unread(entries: Vec<IndexEntry>) {
        let index = GitIndex::new(Cursor::new(encode(&entries))).unwrap();

        assert_eq!(index.offset(), HEADER_SIZE as u64);
    }

    #[rstest]
    fn second_traversal_does_not_touch_the_stream(entries: Vec<IndexEntry>) {
        let index = GitIndex::new(Cursor::new(encode(&entries))).unwrap();

        let first = index.entries().unwrap();
        let offset = index.offset();
        let second = index.entries().unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(index.offset(), offset);
        assert_eq!(index.iter().unwrap().count(), entries.len());
    }

    #[rstest]
    fn stops_after_the_declared_entry_count(entries: Vec<IndexEntry>) {
        let mut bytes = encode(&entries);
        let entries_end = bytes.len() as u64;
        bytes.extend_from_slice(b"TREE\x00\x00\x00\x00");
        bytes.extend_from_slice(&[0xab; 20]);
        let index = GitIndex::new(Cursor::new(bytes)).unwrap();

        assert_eq!(index.entries().unwrap().len(), entries.len());
        assert_eq!(index.offset(), entries_end);
    }

    #[rstest]
    fn an_empty_index_has_no_entries() {
        let index = GitIndex::new(Cursor::new(encode(&[]))).unwrap();

        assert_eq!(index.header().entry_count, 0);
        assert!(index.entries().unwrap().is_empty());
    }

    #[rstest]
    fn decodes_the_single_entry_example() {
        let mut bytes = vec![0x44, 0x49, 0x52, 0x43, 0, 0, 0, 2, 0, 0, 0, 1];
        bytes.extend_from_slice(&[0u8; ENTRY_FIXED_SIZE]);
        bytes.extend_from_slice(b"a.txt\x00");
        bytes.extend_from_slice(&[0u8; 2]);

        let index = GitIndex::new(Cursor::new(bytes)).unwrap();
        let entries = index.entries().unwrap();

        assert_eq!(index.header(), &IndexHeader::new(*b"DIRC", 2, 1));
        assert_eq!(entries.len(), 1);
        assert_eq!(&entries[0].file_path[..], b"a.txt");
    }

    #[rstest]
    fn rejects_a_bad_signature_before_reading_entries(entries: Vec<IndexEntry>) {
        let mut bytes = encode(&entries);
        bytes[0..4].copy_from_slice(b"XXXX");

        let err = GitIndex::new(Cursor::new(bytes)).unwrap_err();

        assert_eq!(err, FormatError::InvalidSignature(*b"XXXX"));
    }

    #[rstest]
    fn rejects_version_3(entries: Vec<IndexEntry>) {
        let mut bytes = encode(&entries);
        bytes[4..8].copy_from_slice(&3u32.to_be_bytes());

        let err = GitIndex::new(Cursor::new(bytes)).unwrap_err();

        assert_eq!(err, FormatError::UnsupportedVersion(3));
    }

    #[rstest]
    fn fails_whole_decode_on_a_missing_entry(entries: Vec<IndexEntry>) {
        let mut bytes = encode(&entries);
        bytes[8..12].copy_from_slice(&5u32.to_be_bytes());
        let entries_end = bytes.len() as u64;

        let index = GitIndex::new(Cursor::new(bytes)).unwrap();

        assert_eq!(
            index.entries(),
            Err(FormatError::TruncatedEntry {
                offset: entries_end,
                expected: ENTRY_FIXED_SIZE,
                found: 0,
            })
        );
    }

    #[rstest]
    fn a_huge_declared_count_fails_at_the_first_missing_entry(entries: Vec<IndexEntry>) {
        let mut bytes = encode(&entries);
        bytes[8..12].copy_from_slice(&u32::MAX.to_be_bytes());
        let entries_end = bytes.len() as u64;

        let index = GitIndex::new(Cursor::new(bytes)).unwrap();

        assert_eq!(index.header().entry_count, u32::MAX);
        assert_eq!(
            index.entries(),
            Err(FormatError::TruncatedEntry {
                offset: entries_end,
                expected: ENTRY_FIXED_SIZE,
                found: 0,
            })
        );
    }

    #[rstest]
    fn strict_decode_accepts_every_path_length_residue() {
        let paths = ["a", "ab", "abc", "abcd", "abcde", "abcdef", "abcdefg", "abcdefgh"];
        let entries: Vec<IndexEntry> = paths
            .iter()
            .zip(1u8..)
            .map(|(path, seed)| entry(path, seed))
            .collect();
        let bytes = encode(&entries);
        let size = bytes.len() as u64;

        let index = GitIndex::with_options(Cursor::new(bytes), DecodeOptions::strict()).unwrap();

        assert_eq!(index.entries().unwrap(), entries.as_slice());
        assert_eq!(index.offset(), size);
    }

    #[rstest]
    fn fails_on_a_path_cut_by_end_of_stream(entries: Vec<IndexEntry>) {
        let mut bytes = encode(&entries[..1]);
        let path_start = (HEADER_SIZE + ENTRY_FIXED_SIZE) as u64;
        bytes.truncate(path_start as usize + 4);

        let index = GitIndex::new(Cursor::new(bytes)).unwrap();

        assert_eq!(
            index.entries(),
            Err(FormatError::UnterminatedPath { offset: path_start })
        );
    }

    #[rstest]
    fn remembers_a_failed_decode(entries: Vec<IndexEntry>) {
        let mut bytes = encode(&entries);
        bytes.truncate(bytes.len() - ENTRY_BLOCK * 3);
        let index = GitIndex::new(Cursor::new(bytes)).unwrap();

        let first = index.entries().unwrap_err();
        let offset = index.offset();

        assert_eq!(index.entries().unwrap_err(), first);
        assert_eq!(index.offset(), offset);
        assert!(index.into_entries().is_err());
    }

    #[rstest]
    fn lenient_decode_ignores_padding_content() {
        let mut bytes = encode(&[entry("a.txt", 1)]);
        let last = bytes.len() - 1;
        bytes[last] = 0xff;

        let index = GitIndex::new(Cursor::new(bytes)).unwrap();

        assert_eq!(index.entries().unwrap().len(), 1);
    }

    #[rstest]
    fn strict_decode_rejects_non_zero_padding() {
        let mut bytes = encode(&[entry("a.txt", 1)]);
        let last = bytes.len() - 1;
        bytes[last] = 0xff;

        let index = GitIndex::with_options(Cursor::new(bytes), DecodeOptions::strict()).unwrap();

        assert_eq!(
            index.entries(),
            Err(FormatError::NonZeroPadding {
                offset: last as u64,
                byte: 0xff,
            })
        );
    }

    #[rstest]
    #[case::lenient(DecodeOptions::default(), true)]
    #[case::strict(DecodeOptions::strict(), false)]
    fn padding_cut_by_end_of_stream(#[case] options: DecodeOptions, #[case] accepted: bool) {
        let mut bytes = encode(&[entry("a.txt", 1)]);
        bytes.truncate(bytes.len() - 2);

        let index = GitIndex::with_options(Cursor::new(bytes), options).unwrap();

        assert_eq!(index.entries().is_ok(), accepted);
    }

    #[rstest]
    fn hands_back_the_stream_after_the_entries(entries: Vec<IndexEntry>) {
        let mut bytes = encode(&entries);
        let entries_end = bytes.len() as u64;
        bytes.extend_from_slice(&[0xcd; 20]);
        let index = GitIndex::new(Cursor::new(bytes)).unwrap();
        index.entries().unwrap();

        let cursor = index.into_reader();

        assert_eq!(cursor.position(), entries_end);
    }

    proptest! {
        #[test]
        fn round_trips_arbitrary_indexes(
            paths in proptest::collection::vec("[a-z0-9_/.-]{1,80}", 0..20),
            strict in any::<bool>(),
        ) {
            let entries = paths
                .iter()
                .enumerate()
                .map(|(i, path)| entry(path, i as u8))
                .collect::<Vec<_>>();
            let bytes = encode(&entries);
            let total = bytes.len() as u64;

            let index = GitIndex::with_options(Cursor::new(bytes), DecodeOptions::new(strict)).unwrap();
            let decoded = index.entries().unwrap();

            prop_assert_eq!(index.header().entry_count as usize, decoded.len());
            prop_assert_eq!(decoded, entries.as_slice());
            prop_assert_eq!(index.offset(), total);
            for entry in decoded {
                let hex = entry.sha1.to_hex();
                prop_assert_eq!(hex.len(), 40);
                prop_assert!(hex.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
                prop_assert_eq!(
                    (ENTRY_FIXED_SIZE + entry.file_path.len() + 1 + entry.padding_len()) % ENTRY_BLOCK,
                    0
                );
            }
        }
    }
}
