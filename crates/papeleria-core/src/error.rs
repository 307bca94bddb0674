//! # Error Types
//!
//! Domain-specific error types for papeleria-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  papeleria-core errors (this file)                                     │
//! │  ├── CoreError        - Sale rejections                                │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  papeleria-db errors (separate crate)                                  │
//! │  └── DbError          - Storage failures, commit conflicts             │
//! │                                                                         │
//! │  register errors (app)                                                 │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Frontend     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rejection carries enough context (product name, available versus
//! requested, total versus tendered) for the seller to fix the cart and
//! resubmit. None of them is retried automatically.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Reasons a sale is rejected by the Sale Processor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A requested product id does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Requested quantity exceeds what is on the shelf.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: 2 × "Pegamento"
    ///      │
    ///      ▼
    /// Check stock: available=1
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Pegamento", available: 1, requested: 2 }
    ///      │
    ///      ▼
    /// UI shows: "Insufficient stock for Pegamento: available 1, requested 2"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Cash tendered does not cover the total.
    #[error("Insufficient payment: total {required}, received {tendered}")]
    InsufficientPayment { required: Money, tendered: Money },

    /// The cart has no lines.
    #[error("Sale must contain at least one product")]
    EmptySale,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any stock is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, stray characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
