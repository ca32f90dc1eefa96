//! Tests for domain records
//!
//! These tests verify:
//! - Typed records survive an encode/decode pass
//! - On-disk field order and textual formats
//! - Rejection of unparseable fields
//! - Rejection of values the text format would alter

use std::str::FromStr;

use bibip::codec::{FixedWidthCodec, Record};
use bibip::domain::{format_timestamp, parse_timestamp};
use bibip::{BibipError, Car, CarStatus, Model, Sale};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

// =============================================================================
// Helper Functions
// =============================================================================

fn codec() -> FixedWidthCodec {
    FixedWidthCodec::new(500)
}

fn ts(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn sample_car() -> Car {
    Car {
        vin: "KNAGM4A77D5316538".to_string(),
        model_id: 7,
        price: Decimal::from_str("2999.99").unwrap(),
        date_start: ts("2024-01-01 08:30:00"),
        status: CarStatus::Available,
    }
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_model_round_trip() {
    let model = Model::new(1, "Optima", "Kia");

    let line = codec().encode(&model).unwrap();
    let decoded: Model = codec().decode(&line).unwrap();

    assert_eq!(decoded, model);
}

#[test]
fn test_car_round_trip() {
    let car = sample_car();

    let line = codec().encode(&car).unwrap();
    let decoded: Car = codec().decode(&line).unwrap();

    assert_eq!(decoded, car);
}

#[test]
fn test_sale_round_trip() {
    let sale = Sale {
        sale_number: "20240903#KNAGM4A77D5316538".to_string(),
        car_vin: "KNAGM4A77D5316538".to_string(),
        sale_date: ts("2024-09-03 12:00:00"),
        cost: Decimal::new(1_999_909, 2),
    };

    let line = codec().encode(&sale).unwrap();
    let decoded: Sale = codec().decode(&line).unwrap();

    assert_eq!(decoded, sale);
}

// =============================================================================
// Format Tests
// =============================================================================

#[test]
fn test_car_field_order() {
    let car = sample_car();

    assert_eq!(
        car.to_fields().unwrap(),
        vec![
            "KNAGM4A77D5316538",
            "7",
            "2999.99",
            "2024-01-01 08:30:00",
            "available"
        ]
    );
}

#[test]
fn test_record_file_names() {
    assert_eq!(Model::DATA_FILE, "models.txt");
    assert_eq!(Model::INDEX_FILE, "models_index.txt");
    assert_eq!(Car::DATA_FILE, "cars.txt");
    assert_eq!(Car::INDEX_FILE, "cars_index.txt");
    assert_eq!(Sale::DATA_FILE, "sales.txt");
    assert_eq!(Sale::INDEX_FILE, "sales_index.txt");
}

#[test]
fn test_status_tags() {
    for status in [CarStatus::Available, CarStatus::Reserved, CarStatus::Sold] {
        assert_eq!(CarStatus::from_str(status.as_str()).unwrap(), status);
        assert_eq!(status.to_string(), status.as_str());
    }

    assert!(CarStatus::from_str("stolen").is_err());
}

#[test]
fn test_timestamp_format() {
    let parsed = parse_timestamp("2024-02-01 00:00:00").unwrap();

    assert_eq!(format_timestamp(&parsed).unwrap(), "2024-02-01 00:00:00");
    assert!(parse_timestamp("2024-02-01").is_err());
}

// =============================================================================
// Malformed Input Tests
// =============================================================================

#[test]
fn test_decode_bad_integer() {
    let line = codec().encode_fields(&["x", "Optima", "Kia"]).unwrap();

    let err = codec().decode::<Model>(&line).unwrap_err();

    assert!(matches!(err, BibipError::MalformedRecord(_)));
}

#[test]
fn test_decode_bad_status() {
    let line = codec()
        .encode_fields(&["VIN", "1", "10", "2024-01-01 00:00:00", "lost"])
        .unwrap();

    let err = codec().decode::<Car>(&line).unwrap_err();

    assert!(matches!(err, BibipError::MalformedRecord(_)));
}

#[test]
fn test_decode_wrong_entity() {
    // A model line has three fields, a car needs five
    let line = codec().encode(&Model::new(1, "Optima", "Kia")).unwrap();

    let err = codec().decode::<Car>(&line).unwrap_err();

    assert!(matches!(err, BibipError::MalformedRecord(_)));
}

// =============================================================================
// Lossy Value Tests
// =============================================================================

#[test]
fn test_encode_rejects_trailing_space_in_last_field() {
    let err = codec().encode(&Model::new(1, "X5", "BMW ")).unwrap_err();

    assert!(matches!(err, BibipError::MalformedRecord(_)));
}

#[test]
fn test_trailing_space_in_inner_field_round_trips() {
    let model = Model::new(1, "X5 ", "BMW");

    let line = codec().encode(&model).unwrap();
    let decoded: Model = codec().decode(&line).unwrap();

    assert_eq!(decoded, model);
}

#[test]
fn test_encode_rejects_sub_second_timestamp() {
    let mut car = sample_car();
    car.date_start =
        NaiveDateTime::parse_from_str("2024-01-01 00:00:00.5", "%Y-%m-%d %H:%M:%S%.f").unwrap();

    let err = codec().encode(&car).unwrap_err();

    assert!(matches!(err, BibipError::MalformedRecord(_)));
    assert!(format_timestamp(&car.date_start).is_err());
}
