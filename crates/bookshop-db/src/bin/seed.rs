//! # Seed Data Generator
//!
//! Populates the database with a small catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./bookshop.db (or $BOOKSHOP_DB_PATH)
//! cargo run -p bookshop-db --bin seed
//!
//! # Specify database path
//! cargo run -p bookshop-db --bin seed -- --db ./data/bookshop.db
//! ```
//!
//! ## Generated Data
//! - A handful of Shakespeare titles, each with paperback and/or hardcover
//!   variants and a cover image
//! - Demo account `doej` (password `password123`)
//! - One pending order for that account

use std::env;

use bookshop_core::{Binding, Condition, Money, NewBook, NewBookImage, NewBookType, NewOrder, NewOrderItem};
use bookshop_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// (title, description, cover, [(binding, price_mu, ean, qty, weight_gm)])
type SeedBook = (
    &'static str,
    &'static str,
    &'static str,
    &'static [(Binding, i64, &'static str, i64, i64)],
);

const AUTHOR: &str = "William Shakespeare";

const CATALOG: &[SeedBook] = &[
    (
        "The Merchant of Venice",
        "An early work of Shakespeare.",
        "merchant_of_venice.jpg",
        &[
            (Binding::Paperback, 860, "978-9380816296", 25, 154),
            (Binding::Hardcover, 860, "978-9380812458", 15, 310),
        ],
    ),
    (
        "Julius Caesar",
        "Another early work of Shakespeare.",
        "julius_caesar.jpg",
        &[(Binding::Paperback, 132, "978-8129101914", 12, 75)],
    ),
    (
        "Hamlet",
        "The tragedy of the Prince of Denmark.",
        "hamlet.jpg",
        &[
            (Binding::Paperback, 499, "978-0743477123", 30, 140),
            (Binding::Hardcover, 1599, "978-1853260094", 5, 420),
        ],
    ),
    (
        "Macbeth",
        "The Scottish play.",
        "macbeth.jpg",
        &[(Binding::Paperback, 450, "978-0743477109", 18, 120)],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut config = DbConfig::from_env();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config = DbConfig::new(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bookshop Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $BOOKSHOP_DB_PATH or ./bookshop.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Bookshop Seed Data Generator");
    println!("===============================");
    println!("Database: {}", config.database_path.display());
    println!();

    let db = Database::new(config).await?;
    println!("✓ Connected to database");
    println!("✓ Schema ready");

    // Check existing books
    let existing = db.books().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} books", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Adding books...");

    let mut added = Vec::with_capacity(CATALOG.len());
    for book in CATALOG {
        let book = seed_book(book);
        match db.books().add(&book).await {
            Ok(details) => {
                println!("  {} ({} variants)", details.book.name, details.types.len());
                added.push(details);
            }
            Err(e) => eprintln!("Failed to add {}: {}", book.name, e),
        }
    }

    println!();
    println!("Registering demo account...");
    let account = db
        .accounts()
        .register("doej", "password123", "doej@example.com")
        .await?;
    println!("  {} (id {})", account.username, account.id);

    // Two copies of the first variant of each of the first two titles.
    let picks: Vec<_> = added
        .iter()
        .take(2)
        .filter_map(|details| details.types.first())
        .collect();
    if !picks.is_empty() {
        let qty = 2;
        let amount: Money = picks.iter().map(|variant| variant.price() * qty).sum();
        let order = NewOrder {
            user_id: account.id,
            amount_mu: amount.minor(),
            items: picks
                .iter()
                .map(|variant| NewOrderItem {
                    book_type_id: variant.id,
                    qty,
                })
                .collect(),
            ..Default::default()
        };

        let placed = db.orders().add(&order).await?;
        println!();
        println!(
            "✓ Placed order {} for {} ({} items)",
            placed.order.id,
            placed.order.amount(),
            placed.items.len()
        );
    }

    info!(books = added.len(), "Seed complete");
    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` overrides the default `info,bookshop=debug,sqlx=warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bookshop=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn seed_book(&(name, description, cover, variants): &SeedBook) -> NewBook {
    NewBook {
        name: name.to_string(),
        author: Some(AUTHOR.to_string()),
        description: Some(description.to_string()),
        image: Some(cover.to_string()),
        types: variants
            .iter()
            .map(|&(binding, price_mu, ean, qty, weight_gm)| NewBookType {
                price_mu,
                ean: Some(ean.to_string()),
                binding,
                condition: Condition::New,
                qty,
                weight_gm: Some(weight_gm),
            })
            .collect(),
        images: vec![NewBookImage {
            thumbnail: Some(format!("thumb_{cover}")),
            fullsize: Some(cover.to_string()),
        }],
    }
}
