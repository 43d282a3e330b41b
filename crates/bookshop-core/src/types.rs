//! # Domain Types
//!
//! Core domain types shared by the repositories and host applications.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │    BookType     │   │   BookImage     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  book_id (FK)   │   │  book_id (FK)   │──►    │
//! │  │  name, author   │   │  price_mu, ean  │   │  thumbnail      │       │
//! │  │  image (cover)  │   │  type, qty      │   │  fullsize       │       │
//! │  └─────────────────┘   └────────▲────────┘   └─────────────────┘       │
//! │                                 │                                       │
//! │  ┌─────────────────┐   ┌────────┴────────┐   ┌─────────────────┐       │
//! │  │     Order       │◄──│   OrderItem     │   │    Account      │       │
//! │  │  user_id ───────┼───┼─────────────────┼──►│  id, username   │       │
//! │  │  amount_mu      │   │  book_type_id   │   │  email          │       │
//! │  │  status         │   │  qty            │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored vs. New
//! Stored records (`Book`, `BookType`, ...) carry the database id.
//! Insert payloads (`NewBook`, `NewBookType`, ...) do not; every field
//! defaults when absent from JSON so a missing name surfaces as a
//! validation error rather than a parse failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::DEFAULT_ORDER_STATUS;

// =============================================================================
// Binding & Condition
// =============================================================================

/// Physical binding of a book variant (stored in the `type` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Binding {
    #[default]
    Paperback,
    #[serde(alias = "hardback")]
    Hardcover,
}

/// Condition of a book variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    New,
    Used,
}

// =============================================================================
// Book
// =============================================================================

/// A catalog entry. `(name, author)` is unique across the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(default)]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub author: Option<String>,
    pub description: Option<String>,
    /// Cover image file name.
    pub image: Option<String>,
}

/// A purchasable variant of a book: binding, condition, price and stock.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(default)]
pub struct BookType {
    pub id: i64,
    pub book_id: i64,
    /// Price in minor currency units.
    pub price_mu: i64,
    /// Barcode (EAN-13 / ISBN).
    pub ean: Option<String>,
    #[serde(rename = "type")]
    pub binding: Binding,
    pub condition: Condition,
    /// Units in stock.
    pub qty: i64,
    pub weight_gm: Option<i64>,
}

impl BookType {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price_mu)
    }
}

impl From<&BookType> for NewBookType {
    fn from(book_type: &BookType) -> Self {
        NewBookType {
            price_mu: book_type.price_mu,
            ean: book_type.ean.clone(),
            binding: book_type.binding,
            condition: book_type.condition,
            qty: book_type.qty,
            weight_gm: book_type.weight_gm,
        }
    }
}

/// Gallery image of a book.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(default)]
pub struct BookImage {
    pub id: i64,
    pub book_id: i64,
    pub thumbnail: Option<String>,
    pub fullsize: Option<String>,
}

impl From<&BookImage> for NewBookImage {
    fn from(image: &BookImage) -> Self {
        NewBookImage {
            thumbnail: image.thumbnail.clone(),
            fullsize: image.fullsize.clone(),
        }
    }
}

/// A book together with all of its variants and gallery images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub types: Vec<BookType>,
    pub images: Vec<BookImage>,
}

/// One row per book variant, joined with its book.
///
/// This is the flat shape a storefront listing wants: every purchasable
/// variant with the title it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CatalogEntry {
    pub book_id: i64,
    pub name: String,
    pub author: Option<String>,
    pub image: Option<String>,
    pub book_type_id: i64,
    pub price_mu: i64,
    #[serde(rename = "type")]
    pub binding: Binding,
    pub condition: Condition,
    pub qty: i64,
}

impl CatalogEntry {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price_mu)
    }

    /// Whether at least one unit is in stock.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.qty > 0
    }
}

// =============================================================================
// Book insert payloads
// =============================================================================

/// Payload for adding a book with its variants and images in one call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct NewBook {
    pub name: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub types: Vec<NewBookType>,
    pub images: Vec<NewBookImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct NewBookType {
    pub price_mu: i64,
    pub ean: Option<String>,
    #[serde(rename = "type")]
    pub binding: Binding,
    pub condition: Condition,
    pub qty: i64,
    pub weight_gm: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct NewBookImage {
    pub thumbnail: Option<String>,
    pub fullsize: Option<String>,
}

impl NewBookImage {
    /// True when neither file name is given (or both are blank).
    pub fn is_empty(&self) -> bool {
        let blank = |name: &Option<String>| name.as_deref().map_or(true, |s| s.trim().is_empty());
        blank(&self.thumbnail) && blank(&self.fullsize)
    }
}

// =============================================================================
// Orders
// =============================================================================

/// A purchase placed by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    /// Total in minor currency units, as supplied by the caller.
    pub amount_mu: i64,
    /// Free-text lifecycle label such as `pending`.
    pub status: String,
}

impl Order {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_minor(self.amount_mu)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub book_type_id: i64,
    pub qty: i64,
}

/// An order with the items that were inserted alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Flattened read of an order: one row per order item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderLine {
    pub id: i64,
    pub user_id: i64,
    pub amount_mu: i64,
    pub status: String,
    pub order_item_id: i64,
    pub book_type_id: i64,
    pub qty: i64,
}

/// Payload for placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct NewOrder {
    pub user_id: i64,
    pub amount_mu: i64,
    pub status: String,
    pub items: Vec<NewOrderItem>,
}

impl Default for NewOrder {
    fn default() -> Self {
        NewOrder {
            user_id: 0,
            amount_mu: 0,
            status: DEFAULT_ORDER_STATUS.to_string(),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct NewOrderItem {
    pub book_type_id: i64,
    pub qty: i64,
}

// =============================================================================
// Accounts
// =============================================================================

/// A registered customer. The password hash never leaves the database layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book_from_partial_json() {
        let book: NewBook = serde_json::from_str(r#"{"author": "John Doe"}"#).unwrap();
        assert_eq!(book.name, "");
        assert_eq!(book.author.as_deref(), Some("John Doe"));
        assert!(book.types.is_empty());
    }

    #[test]
    fn test_book_type_json_uses_type_key() {
        let json = r#"{
            "price_mu": 860,
            "ean": "978-9380812458",
            "type": "hardcover",
            "condition": "new",
            "qty": 15,
            "weight_gm": 310
        }"#;
        let bt: NewBookType = serde_json::from_str(json).unwrap();
        assert_eq!(bt.binding, Binding::Hardcover);
        assert_eq!(bt.condition, Condition::New);
        assert_eq!(bt.weight_gm, Some(310));

        let hardback: NewBookType = serde_json::from_str(r#"{"type": "hardback"}"#).unwrap();
        assert_eq!(hardback.binding, Binding::Hardcover);
    }

    #[test]
    fn test_unknown_binding_is_rejected() {
        let result: Result<NewBookType, _> = serde_json::from_str(r#"{"type": "scroll"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_book_details_flattens_book() {
        let details = BookDetails {
            book: Book {
                id: 1,
                name: "Julius Caesar".to_string(),
                ..Default::default()
            },
            types: vec![],
            images: vec![],
        };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["name"], "Julius Caesar");
        assert!(value["types"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_new_order_defaults_to_pending() {
        let order: NewOrder = serde_json::from_str(r#"{"user_id": 1}"#).unwrap();
        assert_eq!(order.status, "pending");
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_image_is_empty() {
        assert!(NewBookImage::default().is_empty());
        assert!(NewBookImage {
            thumbnail: Some("  ".to_string()),
            fullsize: None,
        }
        .is_empty());
        assert!(!NewBookImage {
            thumbnail: None,
            fullsize: Some("jc_full.jpg".to_string()),
        }
        .is_empty());
    }
}
