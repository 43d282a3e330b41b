//! # Schema Setup
//!
//! Idempotent table creation, run when a [`Database`](crate::Database) is
//! opened.
//!
//! ## Tables
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Books                                                                  │
//! │  ├── books        (id, name, author, description, image)               │
//! │  ├── bookType     (id, book_id → books, price_mu, ean, type, ...)      │
//! │  └── bookImages   (id, book_id → books, thumbnail, fullsize)           │
//! │                                                                         │
//! │  Orders                                                                 │
//! │  ├── orders       (id, user_id → users, amount_mu, status)             │
//! │  └── orderItems   (id, order_id → orders, book_type_id → bookType, qty)│
//! │                                                                         │
//! │  Accounts                                                               │
//! │  └── users        (id, user, pass, email, created_at)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Foreign keys are declared for documentation and optional enforcement.
//! Integrity is checked by the repositories; see `DbConfig::enforce_foreign_keys`.
//!
//! There is no versioning: every statement uses `IF NOT EXISTS`, so opening
//! an existing database file is a no-op.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

/// Tables owned by the Books repository.
pub const BOOKS_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        author TEXT,
        description TEXT,
        image TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bookType (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        book_id INTEGER NOT NULL,
        price_mu INTEGER,
        ean TEXT,
        type TEXT,
        condition TEXT,
        qty INTEGER,
        weight_gm INTEGER,
        FOREIGN KEY (book_id) REFERENCES books (id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bookImages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        book_id INTEGER NOT NULL,
        image_thumbnail_name TEXT,
        image_fullsize_name TEXT,
        FOREIGN KEY (book_id) REFERENCES books (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_books_name_author ON books (name, author)",
    "CREATE INDEX IF NOT EXISTS idx_book_type_book ON bookType (book_id)",
    "CREATE INDEX IF NOT EXISTS idx_book_images_book ON bookImages (book_id)",
];

/// Tables owned by the Orders repository.
pub const ORDERS_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        amount_mu INTEGER,
        status TEXT,
        FOREIGN KEY (user_id) REFERENCES users (id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orderItems (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL,
        book_type_id INTEGER NOT NULL,
        qty INTEGER NOT NULL,
        FOREIGN KEY (book_type_id) REFERENCES bookType (id),
        FOREIGN KEY (order_id) REFERENCES orders (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_order_items_order ON orderItems (order_id)",
];

/// Tables owned by the Accounts repository.
pub const ACCOUNTS_SCHEMA: &[&str] = &[r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user TEXT NOT NULL UNIQUE,
        pass TEXT NOT NULL,
        email TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#];

/// Every table, in dependency order (referenced tables first).
const ALL_SCHEMAS: &[(&str, &[&str])] = &[
    ("accounts", ACCOUNTS_SCHEMA),
    ("books", BOOKS_SCHEMA),
    ("orders", ORDERS_SCHEMA),
];

/// Creates every table and index that does not exist yet.
///
/// Runs in a single transaction so a half-created schema is never left
/// behind.
pub async fn create_schema(pool: &SqlitePool) -> DbResult<()> {
    info!("Creating schema if missing");

    let mut tx = pool.begin().await?;
    for (module, statements) in ALL_SCHEMAS {
        debug!(module = %module, statements = statements.len(), "Applying schema");
        for sql in statements.iter() {
            sqlx::query(*sql).execute(&mut *tx).await?;
        }
    }
    tx.commit().await?;

    info!("Schema ready");
    Ok(())
}

/// Lists user tables present in the database (for diagnostics and tests).
pub async fn table_names(pool: &SqlitePool) -> DbResult<Vec<String>> {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(names)
}
