//! # Domain Types
//!
//! Core domain types used throughout Papeleria POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SaleLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  product_id     │       │
//! │  │  barcode        │◄──│  seller_id      │──►│  quantity       │       │
//! │  │  sale_price     │   │  total_cents    │   │  price_at_sale  │       │
//! │  │  stock          │   │  payment_method │   │  subtotal       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  SaleRequest    │   │ PaymentMethod   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  seller_id      │   │  Cash           │                             │
//! │  │  lines          │   │  Transfer       │                             │
//! │  │  cash_received  │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A sale line copies the product's sale price at the moment of sale. Later
//! price edits or even product deletion never rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::DEFAULT_MIN_STOCK_THRESHOLD;

// =============================================================================
// Product
// =============================================================================

/// A product on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Barcode (EAN-13, UPC-A, internal code). Unique across products.
    pub barcode: String,

    /// Display name shown to the seller.
    pub name: String,

    /// Opaque category reference. Categories are managed elsewhere.
    pub category_id: String,

    /// Purchase cost in cents.
    pub cost_price_cents: i64,

    /// Shelf price in cents.
    pub sale_price_cents: i64,

    /// Units available. Never negative.
    pub stock: i64,

    /// Stock level at or below which the product counts as low.
    pub min_stock_threshold: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Bumped on every write; guards concurrent stock updates.
    pub version: i64,
}

impl Product {
    /// Returns the sale price as Money.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    /// Returns the cost price as Money.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Checks whether `quantity` units can be taken from stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }

    /// Checks whether stock has reached the minimum threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock_threshold
    }
}

/// Fields needed to register a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub barcode: String,
    pub name: String,
    pub category_id: String,
    pub cost_price_cents: i64,
    pub sale_price_cents: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_min_stock_threshold")]
    pub min_stock_threshold: i64,
}

fn default_min_stock_threshold() -> i64 {
    DEFAULT_MIN_STOCK_THRESHOLD
}

/// Partial product update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductPatch {
    pub barcode: Option<String>,
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub cost_price_cents: Option<i64>,
    pub sale_price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub min_stock_threshold: Option<i64>,
}

impl ProductPatch {
    /// Applies the patch onto a product, leaving identity and timestamps alone.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(barcode) = &self.barcode {
            product.barcode = barcode.clone();
        }
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(category_id) = &self.category_id {
            product.category_id = category_id.clone();
        }
        if let Some(cost) = self.cost_price_cents {
            product.cost_price_cents = cost;
        }
        if let Some(price) = self.sale_price_cents {
            product.sale_price_cents = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(threshold) = self.min_stock_threshold {
            product.min_stock_threshold = threshold;
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash; change is computed at the counter.
    Cash,
    /// Bank transfer; no cash changes hands.
    Transfer,
}

impl PaymentMethod {
    /// Wire/storage name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

// =============================================================================
// Sale Request
// =============================================================================

/// One requested line of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLineRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// A proposed sale, as submitted from the counter.
///
/// The seller is an explicit field; there is no ambient "current user".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRequest {
    pub seller_id: String,
    pub lines: Vec<SaleLineRequest>,
    pub payment_method: PaymentMethod,
    /// Cash handed over by the customer. Required for cash, ignored otherwise.
    pub cash_received_cents: Option<i64>,
}

// =============================================================================
// Sale
// =============================================================================

/// A line item of a sale, priced at the moment of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub price_at_sale_cents: i64,
    /// `price_at_sale_cents × quantity`.
    pub subtotal_cents: i64,
}

impl SaleLine {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn price_at_sale(&self) -> Money {
        Money::from_cents(self.price_at_sale_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

/// A completed sale. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub seller_id: String,
    pub lines: Vec<SaleLine>,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    /// Present only for cash sales.
    pub cash_received_cents: Option<i64>,
    /// Present only for cash sales.
    pub change_given_cents: Option<i64>,
    /// The sale date.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Total number of units across all lines.
    pub fn unit_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// Filter for the sales history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleFilter {
    /// Restrict to one seller. `None` lists every seller's sales.
    pub seller_id: Option<String>,
    /// Maximum number of sales returned, newest first.
    pub limit: Option<u32>,
}

impl SaleFilter {
    /// Only sales recorded by `seller_id`.
    pub fn for_seller(seller_id: impl Into<String>) -> Self {
        SaleFilter {
            seller_id: Some(seller_id.into()),
            limit: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
