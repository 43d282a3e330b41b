//! # Repository Module
//!
//! Database repository implementations for the bookshop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Host application / tests                                              │
//! │       │                                                                 │
//! │       │  db.books().add(&new_book)                                     │
//! │       ▼                                                                 │
//! │  BookRepository                                                        │
//! │  ├── validate input            (bookshop-core::validation)             │
//! │  ├── BEGIN                                                              │
//! │  ├── existence / duplicate checks (SELECT COUNT(*))                    │
//! │  ├── INSERT / UPDATE / DELETE  (bound parameters only)                 │
//! │  └── COMMIT  (dropped transaction = ROLLBACK)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories never call one another. Sequencing across modules (register
//! an account, add a book, then place an order) is the caller's job.
//!
//! ## Available Repositories
//!
//! - [`BookRepository`](book::BookRepository) - Books, variants and images
//! - [`OrderRepository`](order::OrderRepository) - Orders and order items
//! - [`AccountRepository`](account::AccountRepository) - Registered users

pub mod account;
pub mod book;
pub mod order;
