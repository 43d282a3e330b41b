//! # Validation Module
//!
//! Boundary checks run by the repositories before any SQL is executed.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  └── Types and enums (binding, condition) are checked on parse         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Required fields (book name, ids)                                  │
//! │  └── Ranges and formats (qty, price, EAN, email)                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Repository existence checks (bookshop-db)                    │
//! │  └── Not found / already added                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{NewBook, NewBookImage, NewBookType, NewOrder, NewOrderItem};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Scalar Validators
// =============================================================================

/// Validates a book name: must not be blank.
///
/// ## Example
/// ```rust
/// use bookshop_core::validation::validate_book_name;
///
/// assert!(validate_book_name("Julius Caesar").is_ok());
/// assert_eq!(validate_book_name("  ").unwrap_err().to_string(), "missing book name");
/// ```
pub fn validate_book_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::required("book name"));
    }
    Ok(())
}

/// Validates a database id supplied by the caller.
///
/// Ids are generated by SQLite starting at 1, so anything below is treated
/// as absent.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Validates an amount in minor units (prices, order totals).
pub fn validate_amount_mu(field: &str, amount: i64) -> ValidationResult<()> {
    if amount < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level. Zero means sold out.
pub fn validate_stock_qty(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "qty".to_string(),
        });
    }
    Ok(())
}

/// Validates an ordered quantity.
pub fn validate_order_qty(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "qty".to_string(),
        });
    }
    Ok(())
}

/// Validates an EAN/ISBN barcode.
///
/// ## Rules
/// - Hyphens and spaces are ignored
/// - 8, 12 or 13 digits (EAN-8, UPC-A, EAN-13) with a valid check digit
/// - or 10 characters as ISBN-10 (mod 11), where the last one may be `X`
///
/// ## Example
/// ```rust
/// use bookshop_core::validation::validate_ean;
///
/// assert!(validate_ean("978-9380816296").is_ok());
/// assert!(validate_ean("0-8044-2957-X").is_ok());
/// assert!(validate_ean("978-93808").is_err());
/// assert!(validate_ean("978-9380816297").is_err());
/// ```
pub fn validate_ean(ean: &str) -> ValidationResult<()> {
    let compact: Vec<char> = ean.chars().filter(|c| *c != '-' && *c != ' ').collect();

    let well_formed = match compact.len() {
        8 | 12 | 13 => compact.iter().all(char::is_ascii_digit),
        10 => {
            compact[..9].iter().all(char::is_ascii_digit)
                && (compact[9].is_ascii_digit() || compact[9] == 'X' || compact[9] == 'x')
        }
        _ => false,
    };
    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "ean".to_string(),
            reason: "must contain 8, 10, 12 or 13 digits".to_string(),
        });
    }

    let check_ok = if compact.len() == 10 {
        isbn10_check(&compact)
    } else {
        gtin_check(&compact)
    };
    if !check_ok {
        return Err(ValidationError::InvalidFormat {
            field: "ean".to_string(),
            reason: "check digit does not match".to_string(),
        });
    }
    Ok(())
}

/// GTIN check digit (EAN-8, UPC-A, EAN-13): weights 3,1,3,... from the
/// rightmost payload digit.
fn gtin_check(digits: &[char]) -> bool {
    let values: Vec<u32> = digits.iter().filter_map(|c| c.to_digit(10)).collect();
    let Some((&check, payload)) = values.split_last() else {
        return false;
    };
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    (10 - sum % 10) % 10 == check
}

/// ISBN-10: weighted sum 10..1 must be divisible by 11; `X` stands for 10.
fn isbn10_check(chars: &[char]) -> bool {
    let sum: u32 = chars
        .iter()
        .zip((1..=10u32).rev())
        .map(|(c, weight)| {
            let value = match c {
                'X' | 'x' => 10,
                c => c.to_digit(10).unwrap_or(0),
            };
            value * weight
        })
        .sum();
    sum % 11 == 0
}

/// Validates an order status label: free text, but not blank.
pub fn validate_status(status: &str) -> ValidationResult<()> {
    if status.trim().is_empty() {
        return Err(ValidationError::required("order status"));
    }
    Ok(())
}

// =============================================================================
// Account Validators
// =============================================================================

pub fn validate_username(username: &str) -> ValidationResult<()> {
    if username.trim().is_empty() {
        return Err(ValidationError::required("username"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }
    Ok(())
}

/// Validates an email address (presence and a single `@` with text on
/// both sides; deliverability is not checked).
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        }),
    }
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a variant before insert or update.
pub fn validate_book_type(book_type: &NewBookType) -> ValidationResult<()> {
    validate_amount_mu("price_mu", book_type.price_mu)?;
    validate_stock_qty(book_type.qty)?;
    if let Some(ean) = book_type.ean.as_deref() {
        validate_ean(ean)?;
    }
    if let Some(weight) = book_type.weight_gm {
        if weight < 0 {
            return Err(ValidationError::Negative {
                field: "weight_gm".to_string(),
            });
        }
    }
    Ok(())
}

/// Validates a gallery image: at least one file name must be present.
pub fn validate_book_image(image: &NewBookImage) -> ValidationResult<()> {
    if image.is_empty() {
        return Err(ValidationError::empty("book image"));
    }
    Ok(())
}

/// Validates a full book payload, children included.
pub fn validate_new_book(book: &NewBook) -> ValidationResult<()> {
    validate_book_name(&book.name)?;
    book.types.iter().try_for_each(validate_book_type)?;
    book.images.iter().try_for_each(validate_book_image)?;
    Ok(())
}

pub fn validate_order_item(item: &NewOrderItem) -> ValidationResult<()> {
    validate_id("book type id", item.book_type_id)?;
    validate_order_qty(item.qty)
}

/// Validates an order payload.
///
/// `amount_mu` is only checked for sign; it is not reconciled against the
/// referenced variants' prices.
pub fn validate_new_order(order: &NewOrder) -> ValidationResult<()> {
    validate_id("user id", order.user_id)?;
    validate_amount_mu("amount_mu", order.amount_mu)?;
    validate_status(&order.status)?;
    if order.items.is_empty() {
        return Err(ValidationError::required("order items"));
    }
    order.items.iter().try_for_each(validate_order_item)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Binding;

    #[test]
    fn test_validate_book_name() {
        assert!(validate_book_name("The Merchant of Venice").is_ok());
        assert_eq!(
            validate_book_name(""),
            Err(ValidationError::required("book name"))
        );
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("book id", 1).is_ok());
        assert_eq!(
            validate_id("book id", 0).unwrap_err().to_string(),
            "missing book id"
        );
        assert!(validate_id("book id", -3).is_err());
    }

    #[test]
    fn test_validate_ean() {
        assert!(validate_ean("978-8129101914").is_ok());
        assert!(validate_ean("9788129101914").is_ok());
        assert!(validate_ean("96385074").is_ok());
        assert!(validate_ean("036000291452").is_ok());
        assert!(validate_ean("0306406152").is_ok());

        assert!(validate_ean("").is_err());
        assert!(validate_ean("978-81291019AB").is_err());
        assert!(validate_ean("12345").is_err());
    }

    #[test]
    fn test_validate_ean_check_digit() {
        assert!(validate_ean("0-8044-2957-X").is_ok());
        assert!(validate_ean("0-8044-2957-x").is_ok());

        // Truncated ISBN-13 that happens to have 8 digits.
        let err = validate_ean("978-93808").unwrap_err();
        assert_eq!(
            err.to_string(),
            "ean has invalid format: check digit does not match"
        );

        assert!(validate_ean("978-8129101915").is_err());
        assert!(validate_ean("96385075").is_err());
        assert!(validate_ean("036000291453").is_err());
        assert!(validate_ean("0306406153").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("doej@gmail.com").is_ok());
        assert_eq!(
            validate_email("").unwrap_err().to_string(),
            "missing email"
        );
        assert!(validate_email("doej").is_err());
        assert!(validate_email("@gmail.com").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn test_validate_book_type() {
        let ok = NewBookType {
            price_mu: 132,
            ean: Some("978-8129101914".to_string()),
            binding: Binding::Paperback,
            qty: 12,
            weight_gm: Some(75),
            ..Default::default()
        };
        assert!(validate_book_type(&ok).is_ok());

        let negative_stock = NewBookType { qty: -1, ..ok.clone() };
        assert!(validate_book_type(&negative_stock).is_err());

        let negative_price = NewBookType { price_mu: -5, ..ok };
        assert_eq!(
            validate_book_type(&negative_price).unwrap_err().to_string(),
            "price_mu must not be negative"
        );
    }

    #[test]
    fn test_validate_new_book_checks_children() {
        let book = NewBook {
            name: "Julius Caesar".to_string(),
            images: vec![NewBookImage::default()],
            ..Default::default()
        };
        assert_eq!(
            validate_new_book(&book).unwrap_err().to_string(),
            "book image object is empty"
        );
    }

    #[test]
    fn test_validate_new_order() {
        let mut order = NewOrder {
            user_id: 1,
            amount_mu: 1024,
            items: vec![NewOrderItem {
                book_type_id: 1,
                qty: 1,
            }],
            ..Default::default()
        };
        assert!(validate_new_order(&order).is_ok());

        order.items[0].qty = 0;
        assert_eq!(
            validate_new_order(&order).unwrap_err().to_string(),
            "qty must be positive"
        );

        order.items.clear();
        assert_eq!(
            validate_new_order(&order).unwrap_err().to_string(),
            "missing order items"
        );

        order.user_id = 0;
        assert_eq!(
            validate_new_order(&order).unwrap_err().to_string(),
            "missing user id"
        );
    }
}
