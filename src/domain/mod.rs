//! Domain Module
//!
//! Plain values stored by the dealership and the views returned by its
//! read paths. Field validation is left to callers; these types only know
//! how to map themselves onto fixed-width records.

mod car;
mod model;
mod sale;
mod view;

use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;

use crate::codec::TIMESTAMP_FORMAT;
use crate::error::{BibipError, Result};

pub use car::{Car, CarStatus};
pub use model::Model;
pub use sale::Sale;
pub use view::{CarFullInfo, ModelSaleStats};

// =============================================================================
// Field Helpers (shared by the Record impls)
// =============================================================================

/// Render a timestamp in the on-disk format
///
/// The format has whole-second precision; a sub-second part is refused
/// rather than dropped.
pub fn format_timestamp(ts: &NaiveDateTime) -> Result<String> {
    if ts.nanosecond() != 0 {
        return Err(BibipError::MalformedRecord(format!(
            "timestamp {} has sub-second precision",
            ts
        )));
    }
    Ok(ts.format(TIMESTAMP_FORMAT).to_string())
}

/// Parse a timestamp in the on-disk format
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|e| BibipError::MalformedRecord(format!("bad timestamp {:?}: {}", text, e)))
}

pub(crate) fn parse_decimal(text: &str) -> Result<Decimal> {
    Decimal::from_str(text)
        .map_err(|e| BibipError::MalformedRecord(format!("bad decimal {:?}: {}", text, e)))
}

pub(crate) fn parse_id(text: &str) -> Result<u32> {
    text.parse()
        .map_err(|e| BibipError::MalformedRecord(format!("bad integer {:?}: {}", text, e)))
}
