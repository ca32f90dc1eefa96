//! Storage Module
//!
//! Fixed-width data files addressed by slot number.
//!
//! ## Responsibilities
//! - Bounds-checked slot reads and in-place slot overwrites
//! - Append a record and index its business key
//! - Compact a data file when a record is physically deleted
//!
//! ## File Layout (per entity)
//! ```text
//! {entity}.txt  (append order)           {entity}_index.txt  (key order)
//! ┌─────────────────────────┐            ┌──────────────┐
//! │ slot 0: record "b"      │            │ a,2          │
//! ├─────────────────────────┤            ├──────────────┤
//! │ slot 1: record "c"      │            │ b,0          │
//! ├─────────────────────────┤            ├──────────────┤
//! │ slot 2: record "a"      │            │ c,1          │
//! └─────────────────────────┘            └──────────────┘
//! ```

mod entity_store;
mod slot_file;

pub use entity_store::EntityStore;
pub use slot_file::SlotFile;
