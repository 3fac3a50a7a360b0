//! # Seed Data Generator
//!
//! Populates the database with categories, suppliers and medications for
//! development.
//!
//! ## Usage
//! ```bash
//! # Generate 500 medications (default)
//! cargo run -p medstock-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p medstock-db --bin seed -- --count 2000
//!
//! # Specify database path
//! cargo run -p medstock-db --bin seed -- --db ./data/medstock.db
//! ```
//!
//! Each medication has:
//! - SKU: `{CATEGORY}-{NAME}-{INDEX}`
//! - Name with strength, e.g. "Ibuprofen 400mg"
//! - Price: 0.99 - 49.99
//! - Quantity: 0 - 500

use std::env;

use medstock_core::MedicationDraft;
use medstock_db::{Database, DbConfig, MedicationStore};

/// Categories with the medications filed under them.
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "ANL",
        "Analgesic",
        &["Paracetamol", "Ibuprofen", "Aspirin", "Naproxen", "Diclofenac"],
    ),
    (
        "ABX",
        "Antibiotic",
        &["Amoxicillin", "Azithromycin", "Ciprofloxacin", "Doxycycline", "Cefalexin"],
    ),
    (
        "AHS",
        "Antihistamine",
        &["Cetirizine", "Loratadine", "Fexofenadine", "Diphenhydramine"],
    ),
    (
        "CVS",
        "Cardiovascular",
        &["Atorvastatin", "Amlodipine", "Lisinopril", "Metoprolol", "Losartan"],
    ),
    (
        "GIT",
        "Gastrointestinal",
        &["Omeprazole", "Ranitidine", "Loperamide", "Metoclopramide"],
    ),
];

/// Suppliers as (name, email, phone).
const SUPPLIERS: &[(&str, &str, &str)] = &[
    ("Acme Pharma", "orders@acme-pharma.test", "555-0100"),
    ("Northwind Medical", "sales@northwind-med.test", "555-0142"),
    ("Globex Health", "supply@globex-health.test", "555-0187"),
];

const STRENGTHS: &[&str] = &["50mg", "100mg", "200mg", "250mg", "400mg", "500mg"];

/// Rows per insert transaction.
const BATCH_SIZE: usize = 100;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut db_path = String::from("./medstock.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
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
                println!("MedStock Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of medications to generate (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: ./medstock.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 MedStock Seed Data Generator");
    println!("==============================");
    println!("Database:    {}", db_path);
    println!("Medications: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let store = db.medications();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = store.count(&Default::default()).await?;
    if existing > 0 {
        println!("⚠ Database already has {} medications", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Reference rows
    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (_, name, _) in CATEGORIES {
        category_ids.push(db.categories().insert(name).await?.id);
    }
    let mut supplier_ids = Vec::with_capacity(SUPPLIERS.len());
    for (name, email, phone) in SUPPLIERS {
        supplier_ids.push(db.suppliers().insert(name, Some(*email), Some(*phone)).await?.id);
    }
    println!(
        "✓ Created {} categories, {} suppliers",
        category_ids.len(),
        supplier_ids.len()
    );

    println!();
    println!("Generating medications...");

    let start = std::time::Instant::now();
    let drafts: Vec<MedicationDraft> = catalogue()
        .take(count)
        .enumerate()
        .map(|(seed, (category_idx, code, name, strength))| {
            generate_medication(
                code,
                name,
                strength,
                category_ids[category_idx],
                supplier_ids[seed % supplier_ids.len()],
                seed,
            )
        })
        .collect();

    let mut generated = 0;
    for batch in drafts.chunks(BATCH_SIZE) {
        generated += store.insert(batch).await?.len();
        println!("  Generated {} medications...", generated);
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} medications in {:?}", generated, elapsed);

    println!();
    println!("Verifying search...");
    let filter = medstock_core::query::MedicationFilter {
        name_contains: Some("profen".to_string()),
    };
    println!("  Search 'profen': {} results", store.count(&filter).await?);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Endless walk over (category, name, strength) combinations.
fn catalogue() -> impl Iterator<Item = (usize, &'static str, &'static str, &'static str)> {
    let combos: Vec<_> = CATEGORIES
        .iter()
        .enumerate()
        .flat_map(|(idx, (code, _, names))| {
            names.iter().flat_map(move |name| {
                STRENGTHS
                    .iter()
                    .map(move |strength| (idx, *code, *name, *strength))
            })
        })
        .collect();

    combos.into_iter().cycle()
}

/// Generates a single medication with realistic data.
fn generate_medication(
    category_code: &str,
    name: &str,
    strength: &str,
    category_id: i64,
    supplier_id: i64,
    seed: usize,
) -> MedicationDraft {
    let sku = format!(
        "{}-{}-{:04}",
        category_code,
        name[..3].to_uppercase(),
        seed
    );

    // 0.99 - 49.99
    let price = (99 + (seed * 37) % 4900) as f64 / 100.0;
    let quantity = ((seed * 13) % 501) as f64;

    MedicationDraft {
        sku: Some(sku),
        name: Some(format!("{} {}", name, strength)),
        description: Some(format!("{} tablets, {}", name, strength)),
        price: Some(price),
        quantity: Some(quantity),
        category_id: Some(category_id),
        supplier_id: Some(supplier_id),
    }
}
