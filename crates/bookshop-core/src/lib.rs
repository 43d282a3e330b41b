//! # bookshop-core: Domain Types for the Bookshop
//!
//! Pure types and rules for the catalog (books, variants, images), orders
//! and accounts. No I/O lives here; the SQLite layer is `bookshop-db`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookshop Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host application / test suite                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ bookshop-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │ validation│                  │   │
//! │  │   │  Book     │  │   Money   │  │   rules   │                  │   │
//! │  │   │  Order    │  │           │  │   checks  │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 bookshop-db (Database Layer)                    │   │
//! │  │           SQLite schema, Books / Orders / Accounts              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, BookType, Order, Account, ...)
//! - [`money`] - Integer money in minor currency units
//! - [`error`] - Validation error type
//! - [`validation`] - Boundary validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use bookshop_core::{validation, Binding, NewBook, NewBookType};
//!
//! let book = NewBook {
//!     name: "Julius Caesar".to_string(),
//!     author: Some("William Shakespeare".to_string()),
//!     types: vec![NewBookType {
//!         price_mu: 132,
//!         binding: Binding::Paperback,
//!         qty: 12,
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//!
//! assert!(validation::validate_new_book(&book).is_ok());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Status given to orders placed without an explicit one.
pub const DEFAULT_ORDER_STATUS: &str = "pending";
