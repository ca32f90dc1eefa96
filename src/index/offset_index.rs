//! Offset index implementation
//!
//! Sorted Vec of entries with a linear-scan lookup. Every mutation re-sorts
//! and rewrites the index file so disk order always equals memory order.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::FixedWidthCodec;
use crate::config::SyncStrategy;
use crate::error::{BibipError, Result};

use super::{IndexEntry, IndexKey};

/// Sorted key → slot mapping for one entity, mirrored to its index file
#[derive(Debug)]
pub struct OffsetIndex<K: IndexKey> {
    /// Index file path
    path: PathBuf,
    /// Codec for index lines
    codec: FixedWidthCodec,
    /// fsync policy for rewrites
    sync_strategy: SyncStrategy,
    /// Entries sorted by key (stable, so equal keys keep insertion order)
    entries: Vec<IndexEntry<K>>,
}

impl<K: IndexKey> OffsetIndex<K> {
    /// Load an index file into memory
    ///
    /// A missing file is an empty index.
    pub fn load(path: &Path, codec: FixedWidthCodec, sync_strategy: SyncStrategy) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        if bytes.len() % codec.line_len() != 0 {
            return Err(BibipError::CorruptStore(format!(
                "{}: length {} is not a multiple of {}",
                path.display(),
                bytes.len(),
                codec.line_len()
            )));
        }

        let mut entries = Vec::with_capacity(bytes.len() / codec.line_len());
        for chunk in bytes.chunks(codec.line_len()) {
            let line = std::str::from_utf8(chunk)
                .map_err(|e| BibipError::MalformedRecord(format!("index line: {}", e)))?;
            entries.push(Self::decode_entry(&codec, line)?);
        }

        debug!(path = %path.display(), entries = entries.len(), "loaded index");

        Ok(Self {
            path: path.to_path_buf(),
            codec,
            sync_strategy,
            entries,
        })
    }

    /// Slot of the first entry with this key
    pub fn lookup(&self, key: &K) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| &entry.key == key)
            .map(|entry| entry.slot)
    }

    /// Add an entry, re-sort, and rewrite the file
    ///
    /// Duplicate keys are not rejected; lookups resolve to the older entry.
    pub fn insert(&mut self, key: K, slot: u64) -> Result<()> {
        // Validate before touching memory so a too-wide key leaves no trace
        self.check_entry(&key, slot)?;

        debug!(path = %self.path.display(), key = %key, slot, "index insert");
        self.entries.push(IndexEntry::new(key, slot));
        self.sort_and_persist()
    }

    /// Change the key of the first matching entry, keeping its slot
    ///
    /// Returns false when no entry has `old_key`.
    pub fn rename(&mut self, old_key: &K, new_key: K) -> Result<bool> {
        let Some(pos) = self.position(old_key) else {
            return Ok(false);
        };
        self.check_entry(&new_key, self.entries[pos].slot)?;

        debug!(path = %self.path.display(), old = %old_key, new = %new_key, "index rename");
        self.entries[pos].key = new_key;
        self.sort_and_persist()?;
        Ok(true)
    }

    /// Drop the first matching entry and rewrite the file
    ///
    /// Returns the slot the entry pointed at.
    pub fn remove(&mut self, key: &K) -> Result<Option<u64>> {
        let Some(pos) = self.position(key) else {
            return Ok(None);
        };

        let entry = self.entries.remove(pos);
        debug!(path = %self.path.display(), key = %key, slot = entry.slot, "index remove");
        self.persist()?;
        Ok(Some(entry.slot))
    }

    /// Replace every entry (used after data-file compaction)
    pub fn rebuild(&mut self, entries: Vec<IndexEntry<K>>) -> Result<()> {
        for entry in &entries {
            self.check_entry(&entry.key, entry.slot)?;
        }

        debug!(path = %self.path.display(), entries = entries.len(), "index rebuild");
        self.entries = entries;
        self.sort_and_persist()
    }

    /// Check that an entry would fit in an index line, without storing it
    pub fn check_entry(&self, key: &K, slot: u64) -> Result<()> {
        self.encode_entry(&IndexEntry::new(key.clone(), slot))
            .map(|_| ())
    }

    /// Entries in key order
    pub fn entries(&self) -> &[IndexEntry<K>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn position(&self, key: &K) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.key == key)
    }

    fn sort_and_persist(&mut self) -> Result<()> {
        self.entries.sort_by(|a, b| a.key.cmp(&b.key));
        self.persist()
    }

    /// Rewrite the whole index file from memory
    fn persist(&self) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        for entry in &self.entries {
            writer.write_all(self.encode_entry(entry)?.as_bytes())?;
        }
        writer.flush()?;

        if self.sync_strategy == SyncStrategy::EveryWrite {
            writer.get_ref().sync_all()?;
        }

        Ok(())
    }

    fn encode_entry(&self, entry: &IndexEntry<K>) -> Result<String> {
        self.codec
            .encode_fields(&[entry.key.to_string(), entry.slot.to_string()])
    }

    fn decode_entry(codec: &FixedWidthCodec, line: &str) -> Result<IndexEntry<K>> {
        let fields = codec.decode_fields(line, 2)?;

        let key = K::parse_key(fields[0]).ok_or_else(|| {
            BibipError::MalformedRecord(format!("bad index key {:?}", fields[0]))
        })?;
        let slot = fields[1].parse().map_err(|_| {
            BibipError::MalformedRecord(format!("bad index slot {:?}", fields[1]))
        })?;

        Ok(IndexEntry::new(key, slot))
    }
}
