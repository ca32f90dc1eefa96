//! Dealership Module
//!
//! The service that composes the three entity stores.
//!
//! ## Responsibilities
//! - Append models and cars
//! - Record and revert sales, keeping car status in step
//! - Join cars, models, and sales for the read paths
//! - Rank models by number of sales

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{Car, CarFullInfo, CarStatus, Model, ModelSaleStats, Sale};
use crate::error::{BibipError, Result};
use crate::storage::EntityStore;

/// Number of models returned by `top_models_by_sales`
pub const DEFAULT_TOP_MODELS: usize = 3;

/// The dealership record store
///
/// ## Concurrency Model: one lock per store
///
/// - Each `EntityStore` sits behind its own `Mutex`
/// - Operations lock one store at a time where they can
/// - `sell_car` and `revert_sale` hold `cars` then `sales` (always in that
///   order) so the status flip and the sale write cannot interleave with
///   another sale of the same car
/// - `get_car_info` holds `cars` while it reads the model and the sale, so
///   it never sees a sold car whose sale is not yet (or no longer) written
/// - Nothing is atomic across files: a failure between the two writes
///   leaves the first one in place
pub struct Dealership {
    /// Store configuration
    config: Config,

    /// Models keyed by id
    models: Mutex<EntityStore<Model>>,

    /// Cars keyed by VIN
    cars: Mutex<EntityStore<Car>>,

    /// Sales keyed by sale number
    sales: Mutex<EntityStore<Sale>>,
}

impl Dealership {
    /// Open or create a dealership store with the given config
    ///
    /// On startup:
    /// 1. Create the data directory if missing
    /// 2. Load each entity's index and check it against its data file
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let models = EntityStore::open(&config.data_dir, &config)?;
        let cars = EntityStore::open(&config.data_dir, &config)?;
        let sales = EntityStore::open(&config.data_dir, &config)?;

        let dealership = Self {
            config,
            models: Mutex::new(models),
            cars: Mutex::new(cars),
            sales: Mutex::new(sales),
        };

        info!(
            data_dir = %dealership.config.data_dir.display(),
            models = dealership.model_count(),
            cars = dealership.car_count(),
            sales = dealership.sale_count(),
            "dealership opened"
        );

        Ok(dealership)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Store a new model
    pub fn add_model(&self, model: Model) -> Result<Model> {
        info!(model_id = model.id, "add model");
        self.models.lock().append(model)
    }

    /// Store a new car
    pub fn add_car(&self, car: Car) -> Result<Car> {
        info!(vin = %car.vin, "add car");
        self.cars.lock().append(car)
    }

    /// Record a sale and mark its car sold
    ///
    /// Steps:
    /// 1. Check the car exists and is not already sold
    /// 2. Append the sale
    /// 3. Flip the car's status in place
    pub fn sell_car(&self, sale: Sale) -> Result<Car> {
        info!(sale_number = %sale.sale_number, vin = %sale.car_vin, "sell car");

        let mut cars = self.cars.lock();
        let vin = sale.car_vin.clone();

        // Step 1: Validate before any write so no orphan sale is left
        let car = cars
            .read_by_key(&vin)?
            .ok_or_else(|| BibipError::not_found("car", &vin))?;
        if car.status == CarStatus::Sold {
            return Err(BibipError::CarAlreadySold(vin));
        }

        // Step 2: Persist the sale
        self.sales.lock().append(sale)?;

        // Step 3: Mark the car sold
        cars.update_at_key(&vin, |mut car| {
            car.status = CarStatus::Sold;
            car
        })
    }

    /// Rename a car's VIN, keeping its slot and other fields
    ///
    /// Sales recorded under the old VIN are not rewritten.
    pub fn update_vin(&self, vin: &str, new_vin: &str) -> Result<Car> {
        info!(vin, new_vin, "update vin");

        self.cars.lock().update_at_key(&vin.to_string(), |mut car| {
            car.vin = new_vin.to_string();
            car
        })
    }

    /// Cancel a sale: the car becomes available and the sale is deleted
    ///
    /// Steps:
    /// 1. Find the sale and its car
    /// 2. Flip the car back to available
    /// 3. Delete the sale, compacting the sales file
    pub fn revert_sale(&self, sale_number: &str) -> Result<Car> {
        info!(sale_number, "revert sale");

        let mut cars = self.cars.lock();
        let mut sales = self.sales.lock();
        let sale_number = sale_number.to_string();

        // Step 1: Both records must exist before anything is written
        let sale = sales
            .read_by_key(&sale_number)?
            .ok_or_else(|| BibipError::not_found("sale", &sale_number))?;
        if cars.read_by_key(&sale.car_vin)?.is_none() {
            return Err(BibipError::not_found("car", &sale.car_vin));
        }

        // Step 2: Car back on sale
        let car = cars.update_at_key(&sale.car_vin, |mut car| {
            car.status = CarStatus::Available;
            car
        })?;

        // Step 3: Remove the sale
        sales.delete_by_key(&sale_number)?;

        Ok(car)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Cars with the given status, in file order
    pub fn get_cars(&self, status: CarStatus) -> Result<Vec<Car>> {
        let cars = self.cars.lock().scan()?;
        Ok(cars.into_iter().filter(|car| car.status == status).collect())
    }

    /// A car joined with its model and, if sold, its sale
    ///
    /// Returns:
    /// - `Ok(None)`: unknown VIN, or its model id is unknown
    /// - `Err(NotFound)`: the car is sold but no sale has its VIN
    pub fn get_car_info(&self, vin: &str) -> Result<Option<CarFullInfo>> {
        // Held until the sale lookup so a concurrent sell or revert cannot
        // split the status read from the sale read
        let cars = self.cars.lock();
        let Some(car) = cars.read_by_key(&vin.to_string())? else {
            return Ok(None);
        };

        let Some(model) = self.models.lock().read_by_key(&car.model_id)? else {
            return Ok(None);
        };

        let sale = if car.status == CarStatus::Sold {
            let sale = self.sales.lock().find(|sale| sale.car_vin == car.vin)?;
            Some(sale.ok_or_else(|| BibipError::not_found("sale", &car.vin))?)
        } else {
            None
        };

        Ok(Some(CarFullInfo::new(car, model, sale)))
    }

    /// The three best-selling models
    pub fn top_models_by_sales(&self) -> Result<Vec<ModelSaleStats>> {
        self.top_models(DEFAULT_TOP_MODELS)
    }

    /// The `n` best-selling models, most sales first
    ///
    /// Ties keep the order in which models are first met while walking the
    /// sale index.
    pub fn top_models(&self, n: usize) -> Result<Vec<ModelSaleStats>> {
        // Step 1: Sold VINs in sale-index order
        let sold_vins: Vec<String> = {
            let sales = self.sales.lock();
            sales
                .index_entries()
                .iter()
                .map(|entry| sales.read_slot(entry.slot).map(|sale| sale.car_vin))
                .collect::<Result<_>>()?
        };

        // Step 2: Count sales per model, remembering first-seen order
        let mut counts: Vec<(u32, usize)> = Vec::new();
        let mut positions: HashMap<u32, usize> = HashMap::new();
        {
            let cars = self.cars.lock();
            for vin in &sold_vins {
                let Some(car) = cars.read_by_key(vin)? else {
                    warn!(vin = %vin, "sale references an unknown car, skipped");
                    continue;
                };

                match positions.get(&car.model_id) {
                    Some(&pos) => counts[pos].1 += 1,
                    None => {
                        positions.insert(car.model_id, counts.len());
                        counts.push((car.model_id, 1));
                    }
                }
            }
        }

        // Step 3: Stable sort keeps first-seen order among equal counts
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(n);

        // Step 4: Join to models
        let models = self.models.lock();
        counts
            .into_iter()
            .map(|(model_id, sales_number)| -> Result<ModelSaleStats> {
                let model = models
                    .read_by_key(&model_id)?
                    .ok_or_else(|| BibipError::not_found("model", model_id))?;
                Ok(ModelSaleStats {
                    car_model_name: model.name,
                    brand: model.brand,
                    sales_number,
                })
            })
            .collect()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn model_count(&self) -> usize {
        self.models.lock().len()
    }

    pub fn car_count(&self) -> usize {
        self.cars.lock().len()
    }

    pub fn sale_count(&self) -> usize {
        self.sales.lock().len()
    }
}
