//! BiBip CLI
//!
//! Command-line front end for a dealership store directory.

use std::process;
use std::str::FromStr;

use bibip::codec::TIMESTAMP_FORMAT;
use bibip::config::SyncStrategy;
use bibip::{Car, CarFullInfo, CarStatus, Config, Dealership, Model, Sale};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, EnvFilter};

/// BiBip CLI
#[derive(Parser, Debug)]
#[command(name = "bibip-cli")]
#[command(about = "Flat-file record store for a car dealership")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./bibip_data")]
    data_dir: String,

    /// Payload width of data-file records
    #[arg(long, default_value_t = bibip::config::DEFAULT_DATA_WIDTH)]
    data_width: usize,

    /// Payload width of index-file entries
    #[arg(long, default_value_t = bibip::config::DEFAULT_INDEX_WIDTH)]
    index_width: usize,

    /// fsync after every file write
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a car model
    AddModel {
        #[arg(long)]
        id: u32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        brand: String,
    },

    /// Add a car to the inventory
    AddCar {
        #[arg(long)]
        vin: String,
        #[arg(long)]
        model_id: u32,
        #[arg(long, value_parser = parse_decimal)]
        price: Decimal,
        /// "YYYY-MM-DD HH:MM:SS"
        #[arg(long, value_parser = parse_timestamp)]
        date_start: NaiveDateTime,
        #[arg(long, default_value = "available", value_parser = parse_status)]
        status: CarStatus,
    },

    /// Record a sale
    Sell {
        #[arg(long)]
        sale_number: String,
        #[arg(long)]
        vin: String,
        /// "YYYY-MM-DD HH:MM:SS"
        #[arg(long, value_parser = parse_timestamp)]
        date: NaiveDateTime,
        #[arg(long, value_parser = parse_decimal)]
        cost: Decimal,
    },

    /// List cars with a status
    Cars {
        #[arg(long, default_value = "available", value_parser = parse_status)]
        status: CarStatus,
    },

    /// Show a car with its model and sale
    Info {
        vin: String,
    },

    /// Change a car's VIN
    UpdateVin {
        vin: String,
        new_vin: String,
    },

    /// Cancel a sale
    Revert {
        sale_number: String,
    },

    /// Best-selling models
    Top {
        #[arg(short, long, default_value_t = bibip::dealership::DEFAULT_TOP_MODELS)]
        n: usize,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bibip=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("BiBip CLI v{}", bibip::VERSION);

    let sync_strategy = if args.sync {
        SyncStrategy::EveryWrite
    } else {
        SyncStrategy::OsBuffered
    };

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .data_width(args.data_width)
        .index_width(args.index_width)
        .sync_strategy(sync_strategy)
        .build();

    let dealership = match Dealership::open(config) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&dealership, args.command) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn run(dealership: &Dealership, command: Commands) -> bibip::Result<()> {
    match command {
        Commands::AddModel { id, name, brand } => {
            let model = dealership.add_model(Model::new(id, name, brand))?;
            println!("added model {} {} {}", model.id, model.brand, model.name);
        }
        Commands::AddCar {
            vin,
            model_id,
            price,
            date_start,
            status,
        } => {
            let car = dealership.add_car(Car {
                vin,
                model_id,
                price,
                date_start,
                status,
            })?;
            print_car(&car);
        }
        Commands::Sell {
            sale_number,
            vin,
            date,
            cost,
        } => {
            let car = dealership.sell_car(Sale {
                sale_number,
                car_vin: vin,
                sale_date: date,
                cost,
            })?;
            print_car(&car);
        }
        Commands::Cars { status } => {
            for car in dealership.get_cars(status)? {
                print_car(&car);
            }
        }
        Commands::Info { vin } => match dealership.get_car_info(&vin)? {
            Some(info) => print_info(&info),
            None => println!("no car with VIN {}", vin),
        },
        Commands::UpdateVin { vin, new_vin } => {
            let car = dealership.update_vin(&vin, &new_vin)?;
            print_car(&car);
        }
        Commands::Revert { sale_number } => {
            let car = dealership.revert_sale(&sale_number)?;
            print_car(&car);
        }
        Commands::Top { n } => {
            for (rank, stats) in dealership.top_models(n)?.iter().enumerate() {
                println!(
                    "{}. {} {}: {}",
                    rank + 1,
                    stats.brand,
                    stats.car_model_name,
                    stats.sales_number
                );
            }
        }
    }

    Ok(())
}

fn print_car(car: &Car) {
    println!(
        "{}  model={}  price={}  since={}  {}",
        car.vin,
        car.model_id,
        car.price,
        car.date_start.format(TIMESTAMP_FORMAT),
        car.status
    );
}

fn print_info(info: &CarFullInfo) {
    println!("VIN:     {}", info.vin);
    println!("Model:   {} {}", info.car_model_brand, info.car_model_name);
    println!("Price:   {}", info.price);
    println!("Since:   {}", info.date_start.format(TIMESTAMP_FORMAT));
    println!("Status:  {}", info.status);
    if let (Some(date), Some(cost)) = (info.sales_date, info.sales_cost) {
        println!("Sold:    {} for {}", date.format(TIMESTAMP_FORMAT), cost);
    }
}

// =============================================================================
// Argument Parsers
// =============================================================================

fn parse_decimal(s: &str) -> Result<Decimal, String> {
    Decimal::from_str(s).map_err(|e| format!("invalid decimal {:?}: {}", s, e))
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM:SS\", got {:?}: {}", s, e))
}

fn parse_status(s: &str) -> Result<CarStatus, String> {
    s.parse().map_err(|e: bibip::BibipError| e.to_string())
}
