//! # Checkout (Sale Processor)
//!
//! Turns a [`SaleRequest`] into a [`Sale`] while staging stock decrements
//! through an [`InventoryStore`].
//!
//! ## Processing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       process_sale()                                    │
//! │                                                                         │
//! │  validate_sale_request()          ← shape only, no stock read          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each line (submission order):                                     │
//! │     fetch_for_update(id) ──► None? ──► ProductNotFound                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │     stock < qty? ──────────────────► InsufficientStock                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │     stock -= qty; persist()       ← staged in the store's transaction  │
//! │     line = {price_at_sale, subtotal}                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  settle_payment(total) ──► cash < total? ──► InsufficientPayment       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Sale { lines, total, change }    ← caller commits or drops the tx     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The processor never commits or rolls back. Atomicity belongs to the store:
//! the caller opens one transaction, hands it in as the store, and commits
//! only when `process_sale` returns `Ok` and the sale row is written.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{PaymentMethod, Product, Sale, SaleLine, SaleRequest};
use crate::validation::validate_sale_request;

// =============================================================================
// Storage Seam
// =============================================================================

/// Stock access scoped to one atomic unit of work.
///
/// Implementations must give read-then-conditionally-write isolation:
/// a product returned by `fetch_for_update` and later passed to `persist`
/// must not have been changed by anyone else in between, or `persist`
/// (or the final commit) fails.
///
/// A later `fetch_for_update` of the same id inside the same unit must see
/// earlier staged writes.
#[allow(async_fn_in_trait)]
pub trait InventoryStore {
    /// Storage error. Domain rejections are carried through it.
    type Error: From<CoreError>;

    /// Loads a product for a read-modify-write.
    async fn fetch_for_update(&mut self, product_id: &str) -> Result<Option<Product>, Self::Error>;

    /// Stages the product's new state.
    async fn persist(&mut self, product: &Product) -> Result<(), Self::Error>;
}

// =============================================================================
// Sale Processor
// =============================================================================

/// Processes a sale against the store.
///
/// Lines are handled strictly in submission order and the first failing line
/// stops processing. On `Err` the caller must discard everything the store
/// staged; on `Ok` the returned sale is ready to be written and committed
/// together with the staged stock.
pub async fn process_sale<S: InventoryStore>(
    store: &mut S,
    request: &SaleRequest,
    now: DateTime<Utc>,
) -> Result<Sale, S::Error> {
    validate_sale_request(request)?;

    let mut lines = Vec::with_capacity(request.lines.len());
    let mut total = Money::zero();

    for requested in &request.lines {
        let mut product = store
            .fetch_for_update(&requested.product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(requested.product_id.clone()))?;

        let line = take_from_stock(&mut product, requested.quantity)?;
        store.persist(&product).await?;

        total = total.checked_add(line.subtotal()).ok_or_else(total_overflow)?;
        lines.push(line);
    }

    let settlement = settle_payment(total, request.payment_method, request.cash_received_cents)?;

    Ok(Sale {
        id: Uuid::new_v4().to_string(),
        seller_id: request.seller_id.clone(),
        lines,
        total_cents: total.cents(),
        payment_method: request.payment_method,
        cash_received_cents: settlement.cash_received_cents,
        change_given_cents: settlement.change_given_cents,
        created_at: now,
    })
}

/// Deducts `quantity` from the product and prices the line.
///
/// The product is left untouched when stock is insufficient.
pub fn take_from_stock(product: &mut Product, quantity: i64) -> CoreResult<SaleLine> {
    if !product.can_sell(quantity) {
        return Err(CoreError::InsufficientStock {
            product: product.name.clone(),
            available: product.stock,
            requested: quantity,
        });
    }

    let price = product.sale_price();
    let subtotal = price
        .checked_mul_quantity(quantity)
        .ok_or_else(total_overflow)?;

    product.stock -= quantity;

    Ok(SaleLine {
        product_id: product.id.clone(),
        quantity,
        price_at_sale_cents: price.cents(),
        subtotal_cents: subtotal.cents(),
    })
}

// =============================================================================
// Payment Settlement
// =============================================================================

/// Cash figures recorded on a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub cash_received_cents: Option<i64>,
    pub change_given_cents: Option<i64>,
}

/// Checks the payment against the total and computes change.
///
/// ## Rules
/// - Cash: `cash_received >= total`, change = `cash_received - total`
/// - Transfer: no cash figures at all, whatever was supplied
///
/// ## Example
/// ```rust
/// use papeleria_core::checkout::settle_payment;
/// use papeleria_core::{Money, PaymentMethod};
///
/// let s = settle_payment(Money::from_cents(3000), PaymentMethod::Transfer, Some(5000)).unwrap();
/// assert_eq!(s.cash_received_cents, None);
/// assert_eq!(s.change_given_cents, None);
/// ```
pub fn settle_payment(
    total: Money,
    method: PaymentMethod,
    cash_received_cents: Option<i64>,
) -> CoreResult<Settlement> {
    match method {
        PaymentMethod::Transfer => Ok(Settlement {
            cash_received_cents: None,
            change_given_cents: None,
        }),
        PaymentMethod::Cash => {
            let tendered = cash_received_cents
                .map(Money::from_cents)
                .ok_or_else(|| ValidationError::Required {
                    field: "cash_received".to_string(),
                })?;

            if tendered < total {
                return Err(CoreError::InsufficientPayment {
                    required: total,
                    tendered,
                });
            }

            Ok(Settlement {
                cash_received_cents: Some(tendered.cents()),
                change_given_cents: Some((tendered - total).cents()),
            })
        }
    }
}

fn total_overflow() -> CoreError {
    ValidationError::OutOfRange {
        field: "total".to_string(),
        min: 0,
        max: i64::MAX,
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================
