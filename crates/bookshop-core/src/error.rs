//! # Error Types
//!
//! Validation error type for bookshop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bookshop-core errors (this file)                                      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bookshop-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → host application                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Messages are human readable and stable: callers and tests compare them
//! verbatim (e.g. `missing book name`).

use thiserror::Error;

/// Input validation errors.
///
/// Raised before any SQL runs, so a failed validation never touches the
/// database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("missing {field}")]
    Required { field: String },

    /// A record was supplied with every field blank.
    #[error("{entity} object is empty")]
    Empty { entity: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed EAN or email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates a `Required` error for the given field label.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an `Empty` error for the given record label.
    pub fn empty(entity: impl Into<String>) -> Self {
        ValidationError::Empty {
            entity: entity.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_message() {
        let err = ValidationError::required("book name");
        assert_eq!(err.to_string(), "missing book name");
    }

    #[test]
    fn test_empty_message() {
        let err = ValidationError::empty("book image");
        assert_eq!(err.to_string(), "book image object is empty");
    }

    #[test]
    fn test_format_message() {
        let err = ValidationError::InvalidFormat {
            field: "ean".to_string(),
            reason: "must contain 8, 10, 12 or 13 digits".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ean has invalid format: must contain 8, 10, 12 or 13 digits"
        );
    }
}
