//! # Database Provisioning Tool
//!
//! Creates a Pricewise database, applies migrations, and installs the stock
//! logistics tiers and default pricing parameters.
//!
//! ## Usage
//! ```bash
//! # Provision the default database file
//! cargo run -p pricewise-db --bin seed
//!
//! # Specify a database path
//! cargo run -p pricewise-db --bin seed -- --db ./data/pricewise.db
//! ```

use std::env;

use pricewise_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./pricewise.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Pricewise Database Provisioning Tool");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./pricewise.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Pricewise Database Provisioning");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.tiers().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} logistics tiers", existing);
        println!("  Existing configuration is left untouched.");
    }

    db.bootstrap_defaults().await?;

    let tiers = db.tiers().list().await?;
    println!("✓ {} logistics tiers installed:", tiers.len());
    for tier in &tiers {
        println!(
            "    [{}] {:<20} max_weight={:>7}g  max_price={:>6}  fee={}+{}/g",
            tier.priority,
            tier.name,
            tier.max_weight_g,
            tier.max_price,
            tier.fixed_fee,
            tier.per_gram_fee
        );
    }

    let params = db.config().load_parameters().await;
    println!(
        "✓ Parameters: exchange_rate={} commission={}% label_fee={} multiplier={}",
        params.exchange_rate, params.commission_rate_pct, params.label_fee,
        params.profit_multiplier
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
