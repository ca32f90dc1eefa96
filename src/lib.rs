//! # BiBip
//!
//! A flat-file record store for a car dealership with:
//! - Fixed-width, offset-addressed data files (one record per slot)
//! - Sorted offset indexes mapping business keys to slots
//! - In-place updates for status flips and VIN renames
//! - Compaction when a sale is reverted
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Dealership                              │
//! │     (add / sell / revert / rename / info / top models)       │
//! └──────────┬──────────────────┬──────────────────┬────────────┘
//!            │                  │                  │
//!            ▼                  ▼                  ▼
//!   ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//!   │ EntityStore     │ │ EntityStore     │ │ EntityStore     │
//!   │   <Model>       │ │   <Car>         │ │   <Sale>        │
//!   └───┬─────────┬───┘ └───┬─────────┬───┘ └───┬─────────┬───┘
//!       │         │         │         │         │         │
//!       ▼         ▼         ▼         ▼         ▼         ▼
//!   SlotFile  OffsetIndex  ...                           ...
//!       │         │
//!       └────┬────┘
//!            ▼
//!   ┌─────────────────┐
//!   │ FixedWidthCodec │
//!   └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod domain;
pub mod index;
pub mod storage;
pub mod dealership;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BibipError, Result};
pub use config::Config;
pub use dealership::Dealership;
pub use domain::{Car, CarFullInfo, CarStatus, Model, ModelSaleStats, Sale};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of BiBip
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
