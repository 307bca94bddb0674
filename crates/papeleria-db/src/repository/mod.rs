//! # Repository Module
//!
//! Database repository implementations for Papeleria POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Register command                                                      │
//! │       │                                                                 │
//! │       │  db.sales().record_sale(&request)                              │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── record_sale(&self, request)   ← one transaction                   │
//! │  ├── get_by_id(&self, id)                                              │
//! │  └── list(&self, filter)                                               │
//! │                                                                         │
//! │  ProductRepository                                                     │
//! │  ├── create / update / delete                                          │
//! │  ├── get_by_id / get_by_barcode                                        │
//! │  └── list / list_low_stock                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product catalogue
//! - [`sale::SaleRepository`] - Sale transactions and history

pub mod product;
pub mod sale;
