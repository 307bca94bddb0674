//! # papeleria-core: Pure Business Logic for Papeleria POS
//!
//! This crate holds the sale rules of the shop as plain Rust with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Papeleria POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Web frontend (React SPA)                       │   │
//! │  │    Inventory ──► Cart ──► Payment modal ──► Sales history       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON commands                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  apps/register (commands)                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ papeleria-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ checkout  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ process_  │  │   rules   │  │   │
//! │  │   │   Sale    │  │  change   │  │   sale    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ InventoryStore trait                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                papeleria-db (Database Layer)                    │   │
//! │  │        SQLite transaction, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SaleLine, PaymentMethod)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`checkout`] - The Sale Processor and its storage seam
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use papeleria_core::money::Money;
//! use papeleria_core::checkout::settle_payment;
//! use papeleria_core::PaymentMethod;
//!
//! let total = Money::from_cents(3000);
//! let settlement = settle_payment(total, PaymentMethod::Cash, Some(5000)).unwrap();
//! assert_eq!(settlement.change_given_cents, Some(2000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{process_sale, InventoryStore};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum-stock threshold given to products created without one.
pub const DEFAULT_MIN_STOCK_THRESHOLD: i64 = 5;
