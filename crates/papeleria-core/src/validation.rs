//! # Validation Module
//!
//! Input validation utilities for Papeleria POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (React)                                             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Register command (Rust)                                      │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE (barcode)                                                  │
//! │  └── CHECK (stock >= 0)                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{NewProduct, PaymentMethod, ProductPatch, SaleRequest};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_BARCODE_LEN: usize = 64;
const MAX_NAME_LEN: usize = 200;
const MAX_ID_LEN: usize = 64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a barcode.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Letters, digits and hyphens only
///
/// ## Example
/// ```rust
/// use papeleria_core::validation::validate_barcode;
///
/// assert!(validate_barcode("7501031311309").is_ok());
/// assert!(validate_barcode("").is_err());
/// assert!(validate_barcode("75 01").is_err());
/// ```
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if barcode.len() > MAX_BARCODE_LEN {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: MAX_BARCODE_LEN,
        });
    }

    if !barcode.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only letters, digits and hyphens".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name (1-200 characters after trimming).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an opaque identifier such as a seller or category reference.
pub fn validate_reference(field: &str, id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LEN,
        });
    }

    Ok(())
}

/// Validates a product id on a sale line.
///
/// Only emptiness is checked here; any other id is looked up, so an unknown
/// one surfaces as `ProductNotFound`.
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity (at least one unit).
///
/// There is no upper bound; stock decides how many units can be sold and
/// pricing overflow is caught when the line is priced.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a non-negative amount in cents (prices, tendered cash).
///
/// ## Example
/// ```rust
/// use papeleria_core::validation::validate_amount_cents;
///
/// assert!(validate_amount_cents("price", 1099).is_ok());
/// assert!(validate_amount_cents("price", 0).is_ok());
/// assert!(validate_amount_cents("price", -100).is_err());
/// ```
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock count or threshold (non-negative).
pub fn validate_stock_level(field: &str, units: i64) -> ValidationResult<()> {
    if units < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Aggregate Validators
// =============================================================================

/// Validates every field of a new product.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_barcode(&product.barcode)?;
    validate_product_name(&product.name)?;
    validate_reference("category", &product.category_id)?;
    validate_amount_cents("cost_price", product.cost_price_cents)?;
    validate_amount_cents("sale_price", product.sale_price_cents)?;
    validate_stock_level("stock", product.stock)?;
    validate_stock_level("min_stock_threshold", product.min_stock_threshold)?;
    Ok(())
}

/// Validates the fields present in a product patch.
pub fn validate_product_patch(patch: &ProductPatch) -> ValidationResult<()> {
    if let Some(barcode) = &patch.barcode {
        validate_barcode(barcode)?;
    }
    if let Some(name) = &patch.name {
        validate_product_name(name)?;
    }
    if let Some(category_id) = &patch.category_id {
        validate_reference("category", category_id)?;
    }
    if let Some(cost) = patch.cost_price_cents {
        validate_amount_cents("cost_price", cost)?;
    }
    if let Some(price) = patch.sale_price_cents {
        validate_amount_cents("sale_price", price)?;
    }
    if let Some(stock) = patch.stock {
        validate_stock_level("stock", stock)?;
    }
    if let Some(threshold) = patch.min_stock_threshold {
        validate_stock_level("min_stock_threshold", threshold)?;
    }
    Ok(())
}

/// Validates the shape of a sale request before any stock is read.
///
/// ## Rules
/// - Seller reference present
/// - At least one line, each with a product id and a positive quantity
/// - Cash sales carry a non-negative `cash_received_cents`
pub fn validate_sale_request(request: &SaleRequest) -> CoreResult<()> {
    validate_reference("seller", &request.seller_id)?;

    if request.lines.is_empty() {
        return Err(CoreError::EmptySale);
    }

    for line in &request.lines {
        validate_product_id(&line.product_id)?;
        validate_quantity(line.quantity)?;
    }

    if request.payment_method == PaymentMethod::Cash {
        match request.cash_received_cents {
            Some(cents) => validate_amount_cents("cash_received", cents)?,
            None => {
                return Err(ValidationError::Required {
                    field: "cash_received".to_string(),
                }
                .into())
            }
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleLineRequest;

    fn request(method: PaymentMethod, cash: Option<i64>) -> SaleRequest {
        SaleRequest {
            seller_id: "seller-1".to_string(),
            lines: vec![SaleLineRequest {
                product_id: "p-1".to_string(),
                quantity: 2,
            }],
            payment_method: method,
            cash_received_cents: cash,
        }
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("7501031311309").is_ok());
        assert!(validate_barcode("INT-0042").is_ok());

        assert!(validate_barcode("").is_err());
        assert!(validate_barcode("   ").is_err());
        assert!(validate_barcode("has space").is_err());
        assert!(validate_barcode(&"9".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Cuaderno profesional raya").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1000).is_ok());
        assert!(validate_quantity(i64::MAX).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_product_id_only_requires_presence() {
        assert!(validate_product_id(&"x".repeat(80)).is_ok());
        assert_eq!(
            validate_product_id("  "),
            Err(ValidationError::Required {
                field: "product".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_new_product_rejects_negative_stock() {
        let product = NewProduct {
            barcode: "123".to_string(),
            name: "Regla 30cm".to_string(),
            category_id: "cat".to_string(),
            cost_price_cents: 800,
            sale_price_cents: 1500,
            stock: -1,
            min_stock_threshold: 5,
        };
        assert_eq!(
            validate_new_product(&product),
            Err(ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
                max: i64::MAX,
            })
        );
    }

    #[test]
    fn test_validate_patch_checks_only_present_fields() {
        assert!(validate_product_patch(&ProductPatch::default()).is_ok());
        let bad = ProductPatch {
            sale_price_cents: Some(-5),
            ..Default::default()
        };
        assert!(validate_product_patch(&bad).is_err());
    }

    #[test]
    fn test_sale_request_cash_requires_tendered_amount() {
        assert!(validate_sale_request(&request(PaymentMethod::Cash, Some(0))).is_ok());
        assert!(matches!(
            validate_sale_request(&request(PaymentMethod::Cash, None)),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert!(validate_sale_request(&request(PaymentMethod::Cash, Some(-1))).is_err());
    }

    #[test]
    fn test_sale_request_transfer_ignores_cash() {
        assert!(validate_sale_request(&request(PaymentMethod::Transfer, None)).is_ok());
        assert!(validate_sale_request(&request(PaymentMethod::Transfer, Some(-1))).is_ok());
    }

    #[test]
    fn test_sale_request_empty_and_large() {
        let mut empty = request(PaymentMethod::Transfer, None);
        empty.lines.clear();
        assert_eq!(validate_sale_request(&empty), Err(CoreError::EmptySale));

        let mut large = request(PaymentMethod::Transfer, None);
        large.lines = (0..500)
            .map(|i| SaleLineRequest {
                product_id: format!("p-{i}"),
                quantity: 1000,
            })
            .collect();
        assert!(validate_sale_request(&large).is_ok());
    }

    #[test]
    fn test_sale_request_missing_seller() {
        let mut r = request(PaymentMethod::Transfer, None);
        r.seller_id = " ".to_string();
        assert!(matches!(
            validate_sale_request(&r),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }
}
