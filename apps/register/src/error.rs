//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Papeleria POS                          │
//! │                                                                         │
//! │  {"command":"createSale", ...}                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function: Result<T, ApiError>                           │  │
//! │  │         │                                                        │  │
//! │  │  DbError::Conflict ─────────────────────────► CONFLICT          │  │
//! │  │  DbError::Rejected(CoreError::InsufficientStock) ─► INSUFFICIENT_STOCK │
//! │  │  DbError::QueryFailed("...") ── logged ─────► DATABASE_ERROR    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  {"success":false,"code":"INSUFFICIENT_STOCK","message":"..."}         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal database details go to the log, never into `message`.

use papeleria_core::CoreError;
use papeleria_db::DbError;
use serde::Serialize;

/// API error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 5b1c..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Not enough units on the shelf
    InsufficientStock,

    /// Cash tendered below the total
    InsufficientPayment,

    /// Sale lost a race for stock; resubmit
    Conflict,

    /// Database operation failed
    DatabaseError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, .. } if field.ends_with("barcode") => {
                ApiError::validation("Product already exists with this barcode")
            }
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::Conflict(detail) => {
                tracing::warn!("Commit conflict: {}", detail);
                ApiError::new(
                    ErrorCode::Conflict,
                    "Stock changed while the sale was being recorded, please resubmit",
                )
            }
            DbError::Rejected(core) => core.into(),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database is busy, please retry")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            e @ CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, e.to_string())
            }
            e @ CoreError::InsufficientPayment { .. } => {
                ApiError::new(ErrorCode::InsufficientPayment, e.to_string())
            }
            e @ CoreError::EmptySale => ApiError::validation(e.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use papeleria_core::{Money, ValidationError};

    #[test]
    fn test_codes_serialize_screaming_snake() {
        let json = serde_json::to_string(&ApiError::new(ErrorCode::InsufficientPayment, "x")).unwrap();
        assert_eq!(json, r#"{"code":"INSUFFICIENT_PAYMENT","message":"x"}"#);
    }

    #[test]
    fn test_rejections_keep_their_details() {
        let err: ApiError = DbError::Rejected(CoreError::InsufficientStock {
            product: "Pegamento".to_string(),
            available: 1,
            requested: 2,
        })
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(
            err.message,
            "Insufficient stock for Pegamento: available 1, requested 2"
        );

        let err: ApiError = CoreError::InsufficientPayment {
            required: Money::from_cents(4500),
            tendered: Money::from_cents(4000),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientPayment);
    }

    #[test]
    fn test_validation_and_not_found() {
        let err: ApiError = CoreError::Validation(ValidationError::Required {
            field: "seller".to_string(),
        })
        .into();
        assert_eq!(err, ApiError::validation("seller is required"));

        let err: ApiError = CoreError::ProductNotFound("p-1".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: p-1");
    }

    #[test]
    fn test_conflict_and_duplicate_barcode() {
        let err: ApiError = DbError::Conflict("database is locked".to_string()).into();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert!(!err.message.contains("locked"));

        let err: ApiError = DbError::duplicate("barcode", "111").into();
        assert_eq!(err.message, "Product already exists with this barcode");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err: ApiError = DbError::QueryFailed("no such table: products".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("products"));
    }
}
