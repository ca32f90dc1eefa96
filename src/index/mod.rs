//! Offset Index Module
//!
//! Maps a business key to the slot number of its record.
//!
//! ## Responsibilities
//! - Keep (key, slot) entries sorted by key, in memory and on disk
//! - Rewrite the whole index file after every mutation
//! - Answer point lookups (first match wins)
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────┬────┐
//! │ key,slot<spaces .........>   │ \n │   (entry 0, smallest key)
//! ├──────────────────────────────┼────┤
//! │ key,slot<spaces .........>   │ \n │   (entry 1)
//! └──────────────────────────────┴────┘
//! ```

mod offset_index;

use std::fmt;

pub use offset_index::OffsetIndex;

/// A key type usable in an offset index.
///
/// `Ord` decides the on-disk order: numeric for integer ids,
/// lexicographic for strings.
pub trait IndexKey: Ord + Clone + fmt::Debug + fmt::Display {
    /// Parse a key from its textual on-disk form
    fn parse_key(text: &str) -> Option<Self>;
}

impl IndexKey for u32 {
    fn parse_key(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl IndexKey for String {
    fn parse_key(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

/// One (key, slot) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry<K> {
    pub key: K,
    pub slot: u64,
}

impl<K> IndexEntry<K> {
    pub fn new(key: K, slot: u64) -> Self {
        Self { key, slot }
    }
}
