//! Entity Store
//!
//! One data file plus its offset index, typed by the record it holds.

use std::marker::PhantomData;
use std::path::Path;

use tracing::debug;

use crate::codec::{Compactable, FixedWidthCodec, Record};
use crate::config::Config;
use crate::error::{BibipError, Result};
use crate::index::{IndexEntry, OffsetIndex};

use super::SlotFile;

/// Append/read/update surface over one entity's files
///
/// ## Invariants
/// - every slot has exactly one index entry
/// - every index entry addresses an existing slot
#[derive(Debug)]
pub struct EntityStore<R: Record> {
    /// Fixed-width data file
    data: SlotFile,
    /// Key → slot index
    index: OffsetIndex<R::Key>,
    /// Codec for data lines
    codec: FixedWidthCodec,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> EntityStore<R> {
    /// Open the store for `R` inside `dir`
    ///
    /// Missing files mean an empty store. Files that disagree with each
    /// other are rejected as corrupt.
    pub fn open(dir: &Path, config: &Config) -> Result<Self> {
        let codec = FixedWidthCodec::new(config.data_width);
        let data = SlotFile::open(
            &dir.join(R::DATA_FILE),
            codec.line_len(),
            config.sync_strategy,
        )?;
        let index = OffsetIndex::load(
            &dir.join(R::INDEX_FILE),
            FixedWidthCodec::new(config.index_width),
            config.sync_strategy,
        )?;

        if index.len() as u64 != data.slot_count() {
            return Err(BibipError::CorruptStore(format!(
                "{}: {} index entries for {} records",
                R::ENTITY,
                index.len(),
                data.slot_count()
            )));
        }
        // Slots must be a permutation of 0..slot_count: one entry per record
        let mut seen = vec![false; index.len()];
        for entry in index.entries() {
            if entry.slot >= data.slot_count() {
                return Err(BibipError::CorruptStore(format!(
                    "{}: key {} points at slot {} past end of file",
                    R::ENTITY,
                    entry.key,
                    entry.slot
                )));
            }
            let taken = &mut seen[entry.slot as usize];
            if *taken {
                return Err(BibipError::CorruptStore(format!(
                    "{}: key {} shares slot {} with another entry",
                    R::ENTITY,
                    entry.key,
                    entry.slot
                )));
            }
            *taken = true;
        }

        debug!(entity = R::ENTITY, records = data.slot_count(), "store opened");

        Ok(Self {
            data,
            index,
            codec,
            _record: PhantomData,
        })
    }

    /// Append a record at the end of the data file and index it
    ///
    /// No duplicate-key check is made.
    pub fn append(&mut self, record: R) -> Result<R> {
        let line = self.codec.encode(&record)?;
        let key = record.key();

        // Refuse before writing data so a key too wide for the index
        // cannot leave an unindexed slot behind
        self.index.check_entry(&key, self.data.slot_count())?;

        let slot = self.data.append(&line)?;
        debug!(entity = R::ENTITY, key = %key, slot, "record appended");
        self.index.insert(key, slot)?;

        Ok(record)
    }

    /// Point lookup by business key
    pub fn read_by_key(&self, key: &R::Key) -> Result<Option<R>> {
        match self.index.lookup(key) {
            Some(slot) => self.read_slot(slot).map(Some),
            None => Ok(None),
        }
    }

    /// Decode the record at `slot`
    pub fn read_slot(&self, slot: u64) -> Result<R> {
        if slot >= self.data.slot_count() {
            return Err(BibipError::CorruptStore(format!(
                "{}: slot {} past end of file ({} records)",
                R::ENTITY,
                slot,
                self.data.slot_count()
            )));
        }

        let line = self.data.read_slot(slot)?;
        self.codec.decode(&line)
    }

    /// Read, mutate, and overwrite a record in its own slot
    ///
    /// If `mutate` changes the key, the index entry is renamed and keeps
    /// the same slot.
    pub fn update_at_key<F>(&mut self, key: &R::Key, mutate: F) -> Result<R>
    where
        F: FnOnce(R) -> R,
    {
        let slot = self
            .index
            .lookup(key)
            .ok_or_else(|| BibipError::not_found(R::ENTITY, key))?;

        let updated = mutate(self.read_slot(slot)?);
        let line = self.codec.encode(&updated)?;
        let new_key = updated.key();
        let renamed = &new_key != key;

        if renamed {
            self.index.check_entry(&new_key, slot)?;
        }

        self.data.write_slot(slot, &line)?;
        debug!(entity = R::ENTITY, key = %key, slot, "record updated");

        if renamed {
            self.index.rename(key, new_key)?;
        }

        Ok(updated)
    }

    /// Every record in slot order
    pub fn scan(&self) -> Result<Vec<R>> {
        self.data
            .read_all()?
            .iter()
            .map(|line| self.codec.decode(line))
            .collect()
    }

    /// First record in slot order matching `predicate`
    pub fn find<P>(&self, predicate: P) -> Result<Option<R>>
    where
        P: FnMut(&R) -> bool,
    {
        Ok(self.scan()?.into_iter().find(predicate))
    }

    /// Index entries in key order
    pub fn index_entries(&self) -> &[IndexEntry<R::Key>] {
        self.index.entries()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.data.slot_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Data file path
    pub fn data_path(&self) -> &Path {
        self.data.path()
    }

    /// Index file path
    pub fn index_path(&self) -> &Path {
        self.index.path()
    }
}

impl<R: Compactable> EntityStore<R> {
    /// Physically remove a record and compact the data file
    ///
    /// Every later slot shifts down by one and the index is rebuilt from
    /// the compacted file.
    pub fn delete_by_key(&mut self, key: &R::Key) -> Result<R> {
        let slot = self
            .index
            .lookup(key)
            .ok_or_else(|| BibipError::not_found(R::ENTITY, key))?;

        let mut lines = self.data.read_all()?;
        if slot as usize >= lines.len() {
            return Err(BibipError::CorruptStore(format!(
                "{}: slot {} past end of file ({} records)",
                R::ENTITY,
                slot,
                lines.len()
            )));
        }

        let removed: R = self.codec.decode(&lines.remove(slot as usize))?;

        // Decode the survivors before writing so a bad line aborts cleanly
        let entries = lines
            .iter()
            .enumerate()
            .map(|(slot, line)| {
                self.codec
                    .decode::<R>(line)
                    .map(|record| IndexEntry::new(record.key(), slot as u64))
            })
            .collect::<Result<Vec<_>>>()?;

        self.data.rewrite(&lines)?;
        self.index.rebuild(entries)?;

        debug!(
            entity = R::ENTITY,
            key = %key,
            slot,
            remaining = lines.len(),
            "record deleted, file compacted"
        );

        Ok(removed)
    }
}
