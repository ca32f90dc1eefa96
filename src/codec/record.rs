//! Record trait
//!
//! Describes how an entity maps onto a fixed-width line and which files
//! hold it.

use crate::error::Result;
use crate::index::IndexKey;

/// An entity persisted in its own data file with a single-key index
pub trait Record: Clone + Sized {
    /// Business key type used by the offset index
    type Key: IndexKey;

    /// Entity name used in errors and logs
    const ENTITY: &'static str;

    /// Data file name inside the store root
    const DATA_FILE: &'static str;

    /// Index file name inside the store root
    const INDEX_FILE: &'static str;

    /// Number of encoded fields
    const FIELD_COUNT: usize;

    /// Business key of this record
    fn key(&self) -> Self::Key;

    /// Field values in on-disk order
    ///
    /// Fails for values the text format cannot represent exactly.
    fn to_fields(&self) -> Result<Vec<String>>;

    /// Rebuild a record from its field values (length already checked)
    fn from_fields(fields: &[&str]) -> Result<Self>;
}

/// Marker for entities whose records may be physically deleted.
///
/// Deleting compacts the data file and renumbers every later slot.
pub trait Compactable: Record {}
