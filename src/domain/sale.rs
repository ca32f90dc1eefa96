use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::codec::{Compactable, Record};
use crate::error::Result;

use super::{format_timestamp, parse_decimal, parse_timestamp};

/// A completed sale of one car
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    pub sale_number: String,
    /// Foreign key to `Car::vin` at the time of sale
    pub car_vin: String,
    pub sale_date: NaiveDateTime,
    pub cost: Decimal,
}

impl Record for Sale {
    type Key = String;

    const ENTITY: &'static str = "sale";
    const DATA_FILE: &'static str = "sales.txt";
    const INDEX_FILE: &'static str = "sales_index.txt";
    const FIELD_COUNT: usize = 4;

    fn key(&self) -> String {
        self.sale_number.clone()
    }

    fn to_fields(&self) -> Result<Vec<String>> {
        Ok(vec![
            self.sale_number.clone(),
            self.car_vin.clone(),
            format_timestamp(&self.sale_date)?,
            self.cost.to_string(),
        ])
    }

    fn from_fields(fields: &[&str]) -> Result<Self> {
        Ok(Self {
            sale_number: fields[0].to_string(),
            car_vin: fields[1].to_string(),
            sale_date: parse_timestamp(fields[2])?,
            cost: parse_decimal(fields[3])?,
        })
    }
}

// Reverting a sale removes its record
impl Compactable for Sale {}
