//! # Product Commands
//!
//! Catalogue operations for the inventory screen and the barcode scanner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use papeleria_core::{NewProduct, Product, ProductPatch, DEFAULT_MIN_STOCK_THRESHOLD};
use papeleria_db::Database;

/// Product as the frontend sees it. Amounts are in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub barcode: String,
    pub name: String,
    pub category_id: String,
    pub cost_price: i64,
    pub sale_price: i64,
    pub stock: i64,
    pub min_stock_threshold: i64,
    pub low_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            low_stock: p.is_low_stock(),
            id: p.id,
            barcode: p.barcode,
            name: p.name,
            category_id: p.category_id,
            cost_price: p.cost_price_cents,
            sale_price: p.sale_price_cents,
            stock: p.stock,
            min_stock_threshold: p.min_stock_threshold,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    pub barcode: String,
    pub name: String,
    pub category_id: String,
    pub cost_price: i64,
    pub sale_price: i64,
    pub stock: Option<i64>,
    pub min_stock_threshold: Option<i64>,
}

impl From<CreateProductInput> for NewProduct {
    fn from(input: CreateProductInput) -> Self {
        NewProduct {
            barcode: input.barcode,
            name: input.name,
            category_id: input.category_id,
            cost_price_cents: input.cost_price,
            sale_price_cents: input.sale_price,
            stock: input.stock.unwrap_or(0),
            min_stock_threshold: input
                .min_stock_threshold
                .unwrap_or(DEFAULT_MIN_STOCK_THRESHOLD),
        }
    }
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    pub id: String,
    pub barcode: Option<String>,
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub cost_price: Option<i64>,
    pub sale_price: Option<i64>,
    pub stock: Option<i64>,
    pub min_stock_threshold: Option<i64>,
}

impl UpdateProductInput {
    fn into_patch(self) -> (String, ProductPatch) {
        let patch = ProductPatch {
            barcode: self.barcode,
            name: self.name,
            category_id: self.category_id,
            cost_price_cents: self.cost_price,
            sale_price_cents: self.sale_price,
            stock: self.stock,
            min_stock_threshold: self.min_stock_threshold,
        };
        (self.id, patch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedDto {
    pub id: String,
}

pub async fn create_product(db: &Database, input: CreateProductInput) -> Result<ProductDto, ApiError> {
    debug!(barcode = %input.barcode, "create_product command");

    let product = db.products().create(&input.into()).await?;

    info!(id = %product.id, barcode = %product.barcode, "Product created");
    Ok(product.into())
}

pub async fn get_product(db: &Database, id: &str) -> Result<ProductDto, ApiError> {
    db.products()
        .get_by_id(id)
        .await?
        .map(ProductDto::from)
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// Scanner lookup.
pub async fn get_product_by_barcode(db: &Database, barcode: &str) -> Result<ProductDto, ApiError> {
    debug!(barcode = %barcode, "get_product_by_barcode command");

    db.products()
        .get_by_barcode(barcode)
        .await?
        .map(ProductDto::from)
        .ok_or_else(|| ApiError::not_found("Product", barcode))
}

pub async fn list_products(db: &Database) -> Result<Vec<ProductDto>, ApiError> {
    let products = db.products().list().await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}

pub async fn update_product(db: &Database, input: UpdateProductInput) -> Result<ProductDto, ApiError> {
    let (id, patch) = input.into_patch();
    debug!(id = %id, "update_product command");

    let product = db.products().update(&id, &patch).await?;

    info!(id = %product.id, version = product.version, "Product updated");
    Ok(product.into())
}

pub async fn delete_product(db: &Database, id: &str) -> Result<DeletedDto, ApiError> {
    db.products().delete(id).await?;

    info!(id = %id, "Product deleted");
    Ok(DeletedDto { id: id.to_string() })
}

pub async fn list_low_stock(db: &Database) -> Result<Vec<ProductDto>, ApiError> {
    let products = db.products().list_low_stock().await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}
