//! Car inventory record

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::codec::Record;
use crate::error::{BibipError, Result};

use super::{format_timestamp, parse_decimal, parse_id, parse_timestamp};

/// Sale state of a car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarStatus {
    Available,
    Reserved,
    Sold,
}

impl CarStatus {
    /// On-disk tag
    pub fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Available => "available",
            CarStatus::Reserved => "reserved",
            CarStatus::Sold => "sold",
        }
    }
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarStatus {
    type Err = BibipError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "available" => Ok(CarStatus::Available),
            "reserved" => Ok(CarStatus::Reserved),
            "sold" => Ok(CarStatus::Sold),
            other => Err(BibipError::MalformedRecord(format!(
                "unknown car status {:?}",
                other
            ))),
        }
    }
}

/// A car in the dealership inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    pub vin: String,
    /// Foreign key to `Model::id`
    pub model_id: u32,
    pub price: Decimal,
    pub date_start: NaiveDateTime,
    pub status: CarStatus,
}

impl Record for Car {
    type Key = String;

    const ENTITY: &'static str = "car";
    const DATA_FILE: &'static str = "cars.txt";
    const INDEX_FILE: &'static str = "cars_index.txt";
    const FIELD_COUNT: usize = 5;

    fn key(&self) -> String {
        self.vin.clone()
    }

    fn to_fields(&self) -> Result<Vec<String>> {
        Ok(vec![
            self.vin.clone(),
            self.model_id.to_string(),
            self.price.to_string(),
            format_timestamp(&self.date_start)?,
            self.status.as_str().to_string(),
        ])
    }

    fn from_fields(fields: &[&str]) -> Result<Self> {
        Ok(Self {
            vin: fields[0].to_string(),
            model_id: parse_id(fields[1])?,
            price: parse_decimal(fields[2])?,
            date_start: parse_timestamp(fields[3])?,
            status: fields[4].parse()?,
        })
    }
}
