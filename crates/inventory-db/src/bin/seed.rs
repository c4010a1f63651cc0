//! # Seed Data Generator
//!
//! Populates the database with sample fruit for development.
//!
//! ## Usage
//! ```bash
//! # Generate 40 products (default)
//! cargo run -p inventory-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p inventory-db --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p inventory-db --bin seed -- --db ./data/inventory.db
//!
//! # Print the catalog as JSON afterwards
//! cargo run -p inventory-db --bin seed -- --dump
//! ```
//!
//! Each product is `{Variety} {Fruit}` with a deterministic price of
//! 1-12 per kg, stock of 0-60 kg, and one of a handful of suppliers.

use std::env;
use std::time::Instant;

use inventory_core::ProductFields;
use inventory_db::{DbConfig, InventoryStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Fruit names for realistic test data
const FRUITS: &[&str] = &[
    "Apple",
    "Pear",
    "Plum",
    "Cherry",
    "Apricot",
    "Peach",
    "Nectarine",
    "Grape",
    "Orange",
    "Mandarin",
    "Lemon",
    "Lime",
    "Grapefruit",
    "Banana",
    "Mango",
    "Pineapple",
    "Papaya",
    "Kiwi",
    "Fig",
    "Pomegranate",
];

/// Varieties, combined with each fruit name
const VARIETIES: &[&str] = &["Red", "Golden", "Organic", "Baby", "Wild"];

/// Suppliers and their phone numbers
const SUPPLIERS: &[(&str, &str)] = &[
    ("Acme Orchards", "555-0100"),
    ("Sunny Farms", "555-0142"),
    ("Valley Fresh", "555-0177"),
    ("Hillside Growers", "555-0193"),
];

const DEFAULT_COUNT: usize = 40;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count = DEFAULT_COUNT;
    let mut db_path: Option<String> = None;
    let mut dump = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = parse_count(&args[i + 1]);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--dump" => dump = true,
            "--help" | "-h" => {
                println!("Fruit Inventory Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: {DEFAULT_COUNT})");
                println!("  -d, --db <PATH>    Database file path (default: $INVENTORY_DB_PATH or ./inventory.db)");
                println!("      --dump         Print all products as JSON when done");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let config = match db_path {
        Some(path) => DbConfig::new(path),
        None => DbConfig::from_env()?,
    };
    info!(path = %config.database_path.display(), count, "Seeding database");

    let store = InventoryStore::open(config).await?;

    // Check existing products
    let existing = store.count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
    } else {
        let start = Instant::now();
        let mut generated = 0usize;

        for seed in 0..count {
            let fields = generate_product(seed);
            match store.insert(&fields).await {
                Ok(_) => generated += 1,
                Err(e) => warn!(name = ?fields.name, error = %e, "Failed to insert product"),
            }
        }

        let elapsed = start.elapsed();
        info!(generated, elapsed_ms = elapsed.as_millis() as u64, "Seed complete");
    }

    if dump {
        let products = store.list().await?;
        println!("{}", serde_json::to_string_pretty(&products)?);
    }

    store.database().close().await;
    Ok(())
}

/// Parses `--count`, falling back to the default on bad input.
fn parse_count(raw: &str) -> usize {
    raw.parse().unwrap_or_else(|_| {
        warn!(value = raw, default = DEFAULT_COUNT, "Invalid --count, using default");
        DEFAULT_COUNT
    })
}

/// Builds one product from its index.
fn generate_product(seed: usize) -> ProductFields {
    let fruit = FRUITS[seed % FRUITS.len()];
    let variety = VARIETIES[(seed / FRUITS.len()) % VARIETIES.len()];
    let (supplier, phone) = SUPPLIERS[(seed * 7) % SUPPLIERS.len()];

    // Price 1-12 per kg, stock 0-60 kg
    let price = 1 + ((seed * 17) % 12) as i64;
    let quantity = ((seed * 13) % 61) as i64;

    ProductFields::new()
        .name(format!("{variety} {fruit}"))
        .price_per_kg(price)
        .quantity_kg(quantity)
        .supplier_name(supplier)
        .supplier_phone(phone)
}

/// Initializes the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise shows info and inventory debug logs.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inventory=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}
