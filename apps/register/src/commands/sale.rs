//! # Sale Commands
//!
//! ## Wire Format
//! ```json
//! {"command":"createSale","sellerId":"u-1",
//!  "products":[{"productId":"p-1","quantity":3}],
//!  "paymentMethod":"cash","cashReceived":5000}
//! ```
//! Amounts are integer cents. `cashReceived` and `changeGiven` are omitted
//! from the response for transfer sales.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use papeleria_core::{PaymentMethod, Sale, SaleFilter, SaleLine, SaleLineRequest, SaleRequest};
use papeleria_db::Database;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleInput {
    pub seller_id: String,
    pub products: Vec<SaleItemInput>,
    pub payment_method: PaymentMethod,
    pub cash_received: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemInput {
    pub product_id: String,
    pub quantity: i64,
}

impl From<CreateSaleInput> for SaleRequest {
    fn from(input: CreateSaleInput) -> Self {
        SaleRequest {
            seller_id: input.seller_id,
            lines: input
                .products
                .into_iter()
                .map(|item| SaleLineRequest {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
            payment_method: input.payment_method,
            cash_received_cents: input.cash_received,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSalesInput {
    pub seller_id: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: String,
    pub seller_id: String,
    pub products: Vec<SaleLineDto>,
    pub total_amount: i64,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_received: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_given: Option<i64>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineDto {
    pub product_id: String,
    pub quantity: i64,
    pub price_at_sale: i64,
    pub subtotal: i64,
}

impl From<SaleLine> for SaleLineDto {
    fn from(line: SaleLine) -> Self {
        SaleLineDto {
            product_id: line.product_id,
            quantity: line.quantity,
            price_at_sale: line.price_at_sale_cents,
            subtotal: line.subtotal_cents,
        }
    }
}

impl From<Sale> for SaleDto {
    fn from(sale: Sale) -> Self {
        SaleDto {
            id: sale.id,
            seller_id: sale.seller_id,
            products: sale.lines.into_iter().map(SaleLineDto::from).collect(),
            total_amount: sale.total_cents,
            payment_method: sale.payment_method,
            cash_received: sale.cash_received_cents,
            change_given: sale.change_given_cents,
            date: sale.created_at,
        }
    }
}

pub async fn create_sale(db: &Database, input: CreateSaleInput) -> Result<SaleDto, ApiError> {
    debug!(seller_id = %input.seller_id, items = input.products.len(), "create_sale command");

    let sale = db.sales().record_sale(&input.into()).await?;
    Ok(sale.into())
}

/// Sales newest first; every seller's unless `sellerId` is given.
pub async fn list_sales(db: &Database, input: ListSalesInput) -> Result<Vec<SaleDto>, ApiError> {
    let filter = SaleFilter {
        seller_id: input.seller_id,
        limit: input.limit,
    };

    let sales = db.sales().list(&filter).await?;
    Ok(sales.into_iter().map(SaleDto::from).collect())
}

pub async fn get_sale(db: &Database, id: &str) -> Result<SaleDto, ApiError> {
    db.sales()
        .get_by_id(id)
        .await?
        .map(SaleDto::from)
        .ok_or_else(|| ApiError::not_found("Sale", id))
}
