#![allow(dead_code)]

use assert_fs::TempDir;
use assert_fs::fixture::{ChildPath, FileWriteBin, PathChild};
use bytes::Bytes;
use dirc::artifacts::index::entry_flags::EntryFlags;
use dirc::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use dirc::artifacts::index::index_header::IndexHeader;
use dirc::artifacts::objects::object::Packable;
use dirc::artifacts::objects::object_id::ObjectId;
use sha1::Digest;

/// Object id git would give `content` as a blob
pub fn blob_oid(content: &str) -> ObjectId {
    let mut hasher = sha1::Sha1::new();
    hasher.update(format!("blob {}\0", content.len()));
    hasher.update(content);
    ObjectId::from_bytes(hasher.finalize().into())
}

pub fn entry(path: &str, content: &str) -> IndexEntry {
    IndexEntry {
        file_path: Bytes::copy_from_slice(path.as_bytes()),
        sha1: blob_oid(content),
        metadata: EntryMetadata {
            ctime_seconds: 1_700_000_000,
            ctime_nanoseconds: 250,
            mtime_seconds: 1_700_000_000,
            mtime_nanoseconds: 500,
            dev: 2049,
            ino: 4242,
            mode: 0o100644,
            uid: 1000,
            gid: 1000,
            file_size: content.len() as u32,
            flags: EntryFlags::for_path(path.len()).bits(),
        },
    }
}

/// Header, entries and a dummy trailing checksum, laid out like `.git/index`
pub fn encode_index(entries: &[IndexEntry]) -> Vec<u8> {
    let mut bytes = IndexHeader::new(*b"DIRC", 2, entries.len() as u32)
        .serialize()
        .expect("Failed to serialize header")
        .to_vec();
    for entry in entries {
        bytes.extend_from_slice(&entry.serialize().expect("Failed to serialize entry"));
    }
    bytes.extend_from_slice(&[0x5a; 20]);
    bytes
}

pub fn write_index(dir: &TempDir, bytes: &[u8]) -> ChildPath {
    let index = dir.child("index");
    index.write_binary(bytes).expect("Failed to write index file");
    index
}
