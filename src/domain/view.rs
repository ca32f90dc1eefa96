//! Denormalized read-side views

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::{Car, CarStatus, Model, Sale};

/// A car joined with its model and, when sold, its sale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarFullInfo {
    pub vin: String,
    pub car_model_name: String,
    pub car_model_brand: String,
    pub price: Decimal,
    pub date_start: NaiveDateTime,
    pub status: CarStatus,
    pub sales_date: Option<NaiveDateTime>,
    pub sales_cost: Option<Decimal>,
}

impl CarFullInfo {
    /// Join a car with its model and optional sale
    pub fn new(car: Car, model: Model, sale: Option<Sale>) -> Self {
        let (sales_date, sales_cost) = match sale {
            Some(sale) => (Some(sale.sale_date), Some(sale.cost)),
            None => (None, None),
        };

        Self {
            vin: car.vin,
            car_model_name: model.name,
            car_model_brand: model.brand,
            price: car.price,
            date_start: car.date_start,
            status: car.status,
            sales_date,
            sales_cost,
        }
    }
}

/// Sales count for one model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSaleStats {
    pub car_model_name: String,
    pub brand: String,
    pub sales_number: usize,
}
