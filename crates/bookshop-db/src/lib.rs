//! # bookshop-db: Database Layer for the Bookshop
//!
//! Data access for the catalog, orders and accounts over an embedded SQLite
//! database, using sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookshop Data Flow                               │
//! │                                                                         │
//! │  Host application (web handler, CLI, test)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   bookshop-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │    Schema    │  │   │
//! │  │   │   (pool.rs)   │    │  (book.rs)    │    │ (schema.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ BookRepo      │    │ CREATE TABLE │  │   │
//! │  │   │ (1 conn)      │◄───│ OrderRepo     │    │ IF NOT EXISTS│  │   │
//! │  │   │ open / close  │    │ AccountRepo   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │           ./bookshop.db  (or $BOOKSHOP_DB_PATH, or :memory:)    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Database handle and configuration
//! - [`schema`] - Idempotent table creation
//! - [`error`] - Database error types
//! - [`repository`] - Books, Orders and Accounts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bookshop_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("bookshop.db")).await?;
//!
//! let book = db.books().add(&new_book).await?;
//! let lines = db.orders().get(order_id).await?;
//!
//! db.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pool;
pub mod repository;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::account::AccountRepository;
pub use repository::book::BookRepository;
pub use repository::order::OrderRepository;
