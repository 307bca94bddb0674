//! # Seed Data Generator
//!
//! Populates the database with sample stationery products for development.
//!
//! ## Usage
//! ```bash
//! # Generate the full sample catalogue
//! cargo run -p papeleria-db --bin seed
//!
//! # Generate fewer products
//! cargo run -p papeleria-db --bin seed -- --count 50
//!
//! # Specify database path
//! cargo run -p papeleria-db --bin seed -- --db ./data/papeleria.db
//! ```
//!
//! Each product gets a unique internal barcode `{CATEGORY}-{NNNN}`, a price
//! between $5.00 and $80.00, a cost around 60% of it and a stock level that
//! leaves some products at or below their threshold.

use std::env;

use papeleria_core::NewProduct;
use papeleria_db::{Database, DbConfig};

/// Sample catalogue: (category reference, product names)
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "ESC",
        &[
            "Lapiz HB",
            "Lapiz 2B",
            "Pluma azul",
            "Pluma negra",
            "Pluma roja",
            "Marcador permanente",
            "Marcatextos amarillo",
            "Portaminas 0.5",
            "Minas 0.5",
            "Colores 12 piezas",
        ],
    ),
    (
        "CUA",
        &[
            "Cuaderno profesional raya",
            "Cuaderno profesional cuadro",
            "Cuaderno forma italiana",
            "Libreta de notas",
            "Block de dibujo",
            "Hojas blancas carta",
            "Papel bond oficio",
            "Cartulina blanca",
        ],
    ),
    (
        "OFI",
        &[
            "Engrapadora",
            "Grapas 5000",
            "Clips jumbo",
            "Folder carta",
            "Sobre manila",
            "Cinta adhesiva",
            "Pegamento en barra",
            "Tijeras escolares",
            "Regla 30 cm",
            "Borrador blanco",
            "Sacapuntas metalico",
            "Corrector liquido",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = usize::MAX;
    let mut db_path = String::from("./papeleria_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(count);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Papeleria POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: all)");
                println!("  -d, --db <PATH>    Database file path (default: ./papeleria_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Papeleria POS Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicate barcodes.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut generated = 0;
    let mut seed = 0;

    'outer: for (category, names) in CATEGORIES {
        for name in names.iter() {
            if generated >= count {
                break 'outer;
            }

            let product = sample_product(category, name, seed);
            seed += 1;

            if let Err(e) = db.products().create(&product).await {
                eprintln!("Failed to insert {}: {}", product.barcode, e);
                continue;
            }

            generated += 1;
        }
    }

    let low = db.products().list_low_stock().await?;

    println!();
    println!("✓ Generated {} products", generated);
    println!("  {} at or below their minimum stock", low.len());
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one deterministic sample product.
fn sample_product(category: &str, name: &str, seed: usize) -> NewProduct {
    // $5.00 - $80.00 in 50-cent steps
    let sale_price_cents = 500 + ((seed * 37) % 151) as i64 * 50;
    let cost_price_cents = sale_price_cents * 60 / 100;

    NewProduct {
        barcode: format!("{}-{:04}", category, seed),
        name: name.to_string(),
        category_id: category.to_string(),
        cost_price_cents,
        sale_price_cents,
        stock: ((seed * 13) % 40) as i64,
        min_stock_threshold: papeleria_core::DEFAULT_MIN_STOCK_THRESHOLD,
    }
}
