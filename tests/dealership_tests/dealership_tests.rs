//! Tests for Dealership
//!
//! These tests verify:
//! - Adding models and cars
//! - Selling and reverting sales (status flips, compaction)
//! - VIN rename semantics
//! - Joined car info and top-model ranking
//! - Shared access from several threads

use std::fs;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use bibip::config::{Config, SyncStrategy};
use bibip::dealership::Dealership;
use bibip::{BibipError, Car, CarStatus, Model, Sale};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_dealership() -> (TempDir, Dealership) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .sync_strategy(SyncStrategy::EveryWrite)
        .build();
    let dealership = Dealership::open(config).unwrap();
    (temp_dir, dealership)
}

fn ts(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn dec(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap()
}

fn car(vin: &str, model_id: u32) -> Car {
    Car {
        vin: vin.to_string(),
        model_id,
        price: dec("30000"),
        date_start: ts("2024-01-01 00:00:00"),
        status: CarStatus::Available,
    }
}

fn sale(number: &str, vin: &str) -> Sale {
    Sale {
        sale_number: number.to_string(),
        car_vin: vin.to_string(),
        sale_date: ts("2024-02-01 00:00:00"),
        cost: dec("29000"),
    }
}

/// Two models and one car per VIN given, all of model 1
fn stocked_dealership(vins: &[&str]) -> (TempDir, Dealership) {
    let (temp, dealership) = setup_temp_dealership();
    dealership.add_model(Model::new(1, "Model3", "Tesla")).unwrap();
    dealership.add_model(Model::new(2, "X5", "BMW")).unwrap();
    for vin in vins {
        dealership.add_car(car(vin, 1)).unwrap();
    }
    (temp, dealership)
}

fn vins(cars: &[Car]) -> Vec<&str> {
    cars.iter().map(|c| c.vin.as_str()).collect()
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("bibip");

    let dealership = Dealership::open_path(&data_dir).unwrap();

    assert!(data_dir.is_dir());
    assert_eq!(dealership.data_dir(), data_dir.as_path());
    assert_eq!(dealership.model_count(), 0);
    assert_eq!(dealership.car_count(), 0);
    assert_eq!(dealership.sale_count(), 0);
}

// =============================================================================
// Add Tests
// =============================================================================

#[test]
fn test_add_model_returns_value() {
    let (_temp, dealership) = setup_temp_dealership();

    let model = dealership.add_model(Model::new(1, "Optima", "Kia")).unwrap();

    assert_eq!(model, Model::new(1, "Optima", "Kia"));
    assert_eq!(dealership.model_count(), 1);
}

#[test]
fn test_add_car_writes_files() {
    let (temp, dealership) = setup_temp_dealership();

    let stored = dealership.add_car(car("VIN1", 1)).unwrap();

    assert_eq!(stored, car("VIN1", 1));
    let data = fs::read_to_string(temp.path().join("cars.txt")).unwrap();
    assert_eq!(data.len(), dealership.config().data_width + 1);
    assert!(data.starts_with("VIN1,1,30000,2024-01-01 00:00:00,available"));

    let index = fs::read_to_string(temp.path().join("cars_index.txt")).unwrap();
    assert_eq!(index.trim_end(), "VIN1,0");
}

// =============================================================================
// Sell Tests
// =============================================================================

#[test]
fn test_sell_car_marks_sold() {
    let (_temp, dealership) = stocked_dealership(&["VIN1", "VIN2"]);

    let sold = dealership.sell_car(sale("S1", "VIN1")).unwrap();

    assert_eq!(sold.status, CarStatus::Sold);
    assert_eq!(vins(&dealership.get_cars(CarStatus::Available).unwrap()), vec!["VIN2"]);
    assert_eq!(vins(&dealership.get_cars(CarStatus::Sold).unwrap()), vec!["VIN1"]);
    assert_eq!(dealership.sale_count(), 1);
}

#[test]
fn test_sell_unknown_car_writes_nothing() {
    let (temp, dealership) = stocked_dealership(&["VIN1"]);

    let err = dealership.sell_car(sale("S1", "NOPE")).unwrap_err();

    match err {
        BibipError::NotFound { entity, key } => {
            assert_eq!(entity, "car");
            assert_eq!(key, "NOPE");
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }
    assert_eq!(dealership.sale_count(), 0);
    assert!(!temp.path().join("sales.txt").exists());
}

#[test]
fn test_sell_already_sold_car_rejected() {
    let (_temp, dealership) = stocked_dealership(&["VIN1"]);
    dealership.sell_car(sale("S1", "VIN1")).unwrap();

    let err = dealership.sell_car(sale("S2", "VIN1")).unwrap_err();

    assert!(matches!(err, BibipError::CarAlreadySold(vin) if vin == "VIN1"));
    assert_eq!(dealership.sale_count(), 1);
}

// =============================================================================
// Get Cars Tests
// =============================================================================

#[test]
fn test_get_cars_file_order() {
    let (_temp, dealership) = stocked_dealership(&["C", "A", "B"]);

    let available = dealership.get_cars(CarStatus::Available).unwrap();

    assert_eq!(vins(&available), vec!["C", "A", "B"]);
    assert!(dealership.get_cars(CarStatus::Reserved).unwrap().is_empty());
}

// =============================================================================
// Car Info Tests
// =============================================================================

#[test]
fn test_car_info_available() {
    let (_temp, dealership) = stocked_dealership(&["VIN1"]);

    let info = dealership.get_car_info("VIN1").unwrap().unwrap();

    assert_eq!(info.vin, "VIN1");
    assert_eq!(info.car_model_name, "Model3");
    assert_eq!(info.car_model_brand, "Tesla");
    assert_eq!(info.price, dec("30000"));
    assert_eq!(info.status, CarStatus::Available);
    assert_eq!(info.sales_date, None);
    assert_eq!(info.sales_cost, None);
}

#[test]
fn test_car_info_sold_includes_sale() {
    let (_temp, dealership) = stocked_dealership(&["VIN1", "VIN2"]);
    dealership.sell_car(sale("S1", "VIN2")).unwrap();

    let info = dealership.get_car_info("VIN2").unwrap().unwrap();

    assert_eq!(info.status, CarStatus::Sold);
    assert_eq!(info.sales_date, Some(ts("2024-02-01 00:00:00")));
    assert_eq!(info.sales_cost, Some(dec("29000")));
}

#[test]
fn test_car_info_unknown_vin() {
    let (_temp, dealership) = stocked_dealership(&["VIN1"]);

    assert_eq!(dealership.get_car_info("VIN9").unwrap(), None);
}

#[test]
fn test_car_info_unknown_model() {
    let (_temp, dealership) = setup_temp_dealership();
    dealership.add_car(car("VIN1", 42)).unwrap();

    assert_eq!(dealership.get_car_info("VIN1").unwrap(), None);
}

// =============================================================================
// Update VIN Tests
// =============================================================================

#[test]
fn test_update_vin_keeps_other_fields() {
    let (_temp, dealership) = stocked_dealership(&["VIN1", "VIN5"]);

    let renamed = dealership.update_vin("VIN1", "VIN9").unwrap();

    assert_eq!(renamed, car("VIN9", 1));
    assert_eq!(dealership.get_car_info("VIN1").unwrap(), None);
    assert_eq!(dealership.get_car_info("VIN9").unwrap().unwrap().vin, "VIN9");
    // Same slot: file order unchanged
    assert_eq!(
        vins(&dealership.get_cars(CarStatus::Available).unwrap()),
        vec!["VIN9", "VIN5"]
    );
}

#[test]
fn test_update_vin_unknown() {
    let (_temp, dealership) = stocked_dealership(&["VIN1"]);

    let err = dealership.update_vin("VIN9", "VIN2").unwrap_err();

    assert!(err.is_not_found());
}

#[test]
fn test_update_vin_of_sold_car_does_not_touch_sales() {
    let (_temp, dealership) = stocked_dealership(&["VIN1"]);
    dealership.sell_car(sale("S1", "VIN1")).unwrap();

    dealership.update_vin("VIN1", "VIN2").unwrap();

    // The sale still names VIN1, so the sold car's sale no longer resolves
    let err = dealership.get_car_info("VIN2").unwrap_err();
    assert!(matches!(err, BibipError::NotFound { entity: "sale", .. }));

    // And the revert cannot find the car
    let err = dealership.revert_sale("S1").unwrap_err();
    assert!(matches!(err, BibipError::NotFound { entity: "car", .. }));
    assert_eq!(dealership.sale_count(), 1);
}

// =============================================================================
// Revert Tests
// =============================================================================

#[test]
fn test_revert_sale_compacts_sales() {
    let (temp, dealership) = stocked_dealership(&["VIN1", "VIN2", "VIN3"]);
    dealership.sell_car(sale("S1", "VIN1")).unwrap();
    dealership.sell_car(sale("S2", "VIN2")).unwrap();
    dealership.sell_car(sale("S3", "VIN3")).unwrap();

    let car = dealership.revert_sale("S2").unwrap();

    assert_eq!(car.vin, "VIN2");
    assert_eq!(car.status, CarStatus::Available);
    assert_eq!(dealership.sale_count(), 2);

    let data = fs::read_to_string(temp.path().join("sales.txt")).unwrap();
    assert!(!data.contains("S2,"));
    assert_eq!(data.len(), 2 * (dealership.config().data_width + 1));

    let index: Vec<String> = fs::read_to_string(temp.path().join("sales_index.txt"))
        .unwrap()
        .lines()
        .map(|l| l.trim_end().to_string())
        .collect();
    assert_eq!(index, vec!["S1,0", "S3,1"]);

    // Remaining sales still resolve through their new slots
    let info = dealership.get_car_info("VIN3").unwrap().unwrap();
    assert_eq!(info.sales_cost, Some(dec("29000")));
}

#[test]
fn test_revert_unknown_sale() {
    let (_temp, dealership) = stocked_dealership(&["VIN1"]);

    let err = dealership.revert_sale("S404").unwrap_err();

    match err {
        BibipError::NotFound { entity, key } => {
            assert_eq!(entity, "sale");
            assert_eq!(key, "S404");
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_car_can_be_resold_after_revert() {
    let (_temp, dealership) = stocked_dealership(&["VIN1"]);
    dealership.sell_car(sale("S1", "VIN1")).unwrap();
    dealership.revert_sale("S1").unwrap();

    let car = dealership.sell_car(sale("S2", "VIN1")).unwrap();

    assert_eq!(car.status, CarStatus::Sold);
    assert_eq!(dealership.sale_count(), 1);
}

// =============================================================================
// Top Models Tests
// =============================================================================

#[test]
fn test_top_models_ranked_by_count() {
    let (_temp, dealership) = setup_temp_dealership();
    dealership.add_model(Model::new(1, "Optima", "Kia")).unwrap();
    dealership.add_model(Model::new(2, "Sorento", "Kia")).unwrap();
    dealership.add_model(Model::new(3, "3", "Mazda")).unwrap();
    dealership.add_model(Model::new(4, "Pathfinder", "Nissan")).unwrap();

    let fleet = [
        ("V1", 1),
        ("V2", 2),
        ("V3", 2),
        ("V4", 3),
        ("V5", 3),
        ("V6", 3),
        ("V7", 4),
    ];
    for (i, (vin, model_id)) in fleet.iter().enumerate() {
        dealership.add_car(car(vin, *model_id)).unwrap();
        dealership
            .sell_car(sale(&format!("S{}", i + 1), vin))
            .unwrap();
    }

    let top = dealership.top_models_by_sales().unwrap();

    assert_eq!(top.len(), 3);
    assert_eq!(top[0].car_model_name, "3");
    assert_eq!(top[0].brand, "Mazda");
    assert_eq!(top[0].sales_number, 3);
    assert_eq!(top[1].car_model_name, "Sorento");
    assert_eq!(top[1].sales_number, 2);
    // Optima and Pathfinder tie on one sale; Optima is met first
    assert_eq!(top[2].car_model_name, "Optima");
    assert_eq!(top[2].sales_number, 1);
}

#[test]
fn test_top_models_n() {
    let (_temp, dealership) = stocked_dealership(&["VIN1", "VIN2"]);
    dealership.sell_car(sale("S1", "VIN1")).unwrap();

    assert!(dealership.top_models(0).unwrap().is_empty());
    let top = dealership.top_models(10).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].sales_number, 1);
}

#[test]
fn test_top_models_skips_renamed_cars() {
    let (_temp, dealership) = stocked_dealership(&["VIN1", "VIN2"]);
    dealership.sell_car(sale("S1", "VIN1")).unwrap();
    dealership.sell_car(sale("S2", "VIN2")).unwrap();
    dealership.update_vin("VIN1", "VIN1-NEW").unwrap();

    let top = dealership.top_models_by_sales().unwrap();

    assert_eq!(top.len(), 1);
    assert_eq!(top[0].sales_number, 1);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_adds_and_reads() {
    let (_temp, dealership) = setup_temp_dealership();
    dealership.add_model(Model::new(1, "Model3", "Tesla")).unwrap();
    let dealership = Arc::new(dealership);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let dealership = Arc::clone(&dealership);
            thread::spawn(move || {
                for i in 0..10 {
                    let vin = format!("T{}-{:02}", t, i);
                    dealership.add_car(car(&vin, 1)).unwrap();
                    assert!(dealership.get_car_info(&vin).unwrap().is_some());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(dealership.car_count(), 40);
    assert_eq!(dealership.get_cars(CarStatus::Available).unwrap().len(), 40);
}

#[test]
fn test_car_info_consistent_during_sell_and_revert() {
    let (_temp, dealership) = stocked_dealership(&["VIN1"]);
    let dealership = Arc::new(dealership);
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let dealership = Arc::clone(&dealership);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for i in 0..20 {
                let number = format!("S{:02}", i);
                dealership.sell_car(sale(&number, "VIN1")).unwrap();
                dealership.revert_sale(&number).unwrap();
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    // A sold car must always come back with its sale attached
    while !done.load(Ordering::SeqCst) {
        let info = dealership.get_car_info("VIN1").unwrap().unwrap();
        assert_eq!(info.status == CarStatus::Sold, info.sales_date.is_some());
    }

    writer.join().unwrap();
    assert_eq!(dealership.sale_count(), 0);
}
