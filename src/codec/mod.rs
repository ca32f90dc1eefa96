//! Record Codec Module
//!
//! Fixed-width text encoding shared by every data and index file.
//!
//! ## Line Format
//! ```text
//! ┌──────────────────────────────────────────────┬────┐
//! │ field,field,field<spaces ...................>│ \n │
//! └──────────────────────────────────────────────┴────┘
//!  |<----------------- width W ----------------->|  1
//! ```
//!
//! Every line is exactly `W + 1` bytes, so record `n` starts at byte
//! `n * (W + 1)` and can be read without scanning the file.

mod fixed;
mod record;

pub use fixed::FixedWidthCodec;
pub use record::{Compactable, Record};

/// Separator between encoded fields
pub const FIELD_DELIMITER: char = ',';

/// Filler used to right-pad a line to its width
pub const PADDING: char = ' ';

/// Line terminator
pub const NEWLINE: char = '\n';

/// Textual timestamp format used in every file
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
