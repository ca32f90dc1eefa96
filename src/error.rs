//! Error types for BiBip
//!
//! Provides a unified error type for all store and service operations.

use thiserror::Error;

/// Result type alias using BibipError
pub type Result<T> = std::result::Result<T, BibipError>;

/// Unified error type for BiBip operations
#[derive(Debug, Error)]
pub enum BibipError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    /// A key required by an operation is absent
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    /// Encoded payload does not fit in the fixed slot width
    #[error("Record too wide: {len} bytes exceeds slot width {width}")]
    RecordTooWide { width: usize, len: usize },

    /// Slot content does not parse into the expected fields
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    /// Index and data file disagree; fatal, never repaired automatically
    #[error("Corrupt store: {0}")]
    CorruptStore(String),

    // -------------------------------------------------------------------------
    // Business Rule Errors
    // -------------------------------------------------------------------------
    #[error("Car already sold: {0}")]
    CarAlreadySold(String),
}

impl BibipError {
    /// Shorthand for a `NotFound` error
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// True if this is a `NotFound` error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
