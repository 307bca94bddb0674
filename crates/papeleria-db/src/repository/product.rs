//! # Product Repository
//!
//! Database operations for the shelf catalogue.
//!
//! ## Key Operations
//! - Barcode lookup (what the scanner calls)
//! - CRUD operations with partial updates
//! - Low-stock listing
//!
//! Stock changes made by sales do not go through here; they run inside the
//! sale transaction (see [`super::sale`]). Manual edits from this repository
//! use the same `version` guard, so an edit racing a sale fails instead of
//! silently overwriting the decrement.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use papeleria_core::validation::{validate_new_product, validate_product_patch};
use papeleria_core::{CoreError, NewProduct, Product, ProductPatch};

/// Column list shared by every product SELECT.
pub(crate) const PRODUCT_COLUMNS: &str = r#"
    id,
    barcode,
    name,
    category_id,
    cost_price_cents,
    sale_price_cents,
    stock,
    min_stock_threshold,
    created_at,
    updated_at,
    version
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.get_by_barcode("7501031311309").await?;
/// let low = repo.list_low_stock().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Registers a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Stored product with generated id and timestamps
    /// * `Err(DbError::Rejected)` - Field validation failed
    /// * `Err(DbError::UniqueViolation)` - Barcode already registered
    pub async fn create(&self, new: &NewProduct) -> DbResult<Product> {
        validate_new_product(new).map_err(CoreError::from)?;

        if self.get_by_barcode(&new.barcode).await?.is_some() {
            return Err(DbError::duplicate("barcode", &new.barcode));
        }

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            barcode: new.barcode.trim().to_string(),
            name: new.name.trim().to_string(),
            category_id: new.category_id.clone(),
            cost_price_cents: new.cost_price_cents,
            sale_price_cents: new.sale_price_cents,
            stock: new.stock,
            min_stock_threshold: new.min_stock_threshold,
            created_at: now,
            updated_at: now,
            version: 0,
        };

        self.insert(&product).await
    }

    /// Inserts a fully built product as-is.
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(barcode = %product.barcode, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, barcode, name, category_id,
                cost_price_cents, sale_price_cents,
                stock, min_stock_threshold,
                created_at, updated_at, version
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(&product.category_id)
        .bind(product.cost_price_cents)
        .bind(product.sale_price_cents)
        .bind(product.stock)
        .bind(product.min_stock_threshold)
        .bind(product.created_at)
        .bind(product.updated_at)
        .bind(product.version)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.ends_with("barcode") => {
                DbError::duplicate("barcode", &product.barcode)
            }
            other => other,
        })?;

        Ok(product.clone())
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its barcode.
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        debug!(barcode = %barcode, "Looking up barcode");

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(barcode.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists every product, sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name, id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Lists products whose stock is at or below their minimum threshold.
    ///
    /// Emptiest shelves first.
    pub async fn list_low_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE stock <= min_stock_threshold \
             ORDER BY stock, name"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Low-stock products");
        Ok(products)
    }

    /// Applies a partial update.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The product after the update
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    /// * `Err(DbError::UniqueViolation)` - New barcode belongs to another product
    /// * `Err(DbError::Conflict)` - The product changed while being edited
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        validate_product_patch(patch).map_err(CoreError::from)?;

        let mut product = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        if let Some(barcode) = &patch.barcode {
            if let Some(other) = self.get_by_barcode(barcode).await? {
                if other.id != product.id {
                    return Err(DbError::duplicate("barcode", barcode));
                }
            }
        }

        let read_version = product.version;
        patch.apply_to(&mut product);
        product.barcode = product.barcode.trim().to_string();
        product.name = product.name.trim().to_string();
        product.updated_at = Utc::now();
        product.version = read_version + 1;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                barcode = ?3,
                name = ?4,
                category_id = ?5,
                cost_price_cents = ?6,
                sale_price_cents = ?7,
                stock = ?8,
                min_stock_threshold = ?9,
                updated_at = ?10,
                version = version + 1
            WHERE id = ?1 AND version = ?2
            "#,
        )
        .bind(&product.id)
        .bind(read_version)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(&product.category_id)
        .bind(product.cost_price_cents)
        .bind(product.sale_price_cents)
        .bind(product.stock)
        .bind(product.min_stock_threshold)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::Conflict(format!(
                "product {} changed during update",
                product.id
            )));
        }

        Ok(product)
    }

    /// Deletes a product.
    ///
    /// Past sales keep their lines; they reference the product by id only.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use papeleria_core::ValidationError;

    async fn repo() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    fn new_product(barcode: &str, name: &str, stock: i64) -> NewProduct {
        NewProduct {
            barcode: barcode.to_string(),
            name: name.to_string(),
            category_id: "escritura".to_string(),
            cost_price_cents: 600,
            sale_price_cents: 1000,
            stock,
            min_stock_threshold: 5,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = repo().await;

        let created = repo
            .create(&new_product("7501031311309", "Cuaderno rayado", 12))
            .await
            .unwrap();
        assert_eq!(created.version, 0);

        let by_id = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.name, "Cuaderno rayado");
        assert_eq!(by_id.stock, 12);

        let by_barcode = repo.get_by_barcode("7501031311309").await.unwrap().unwrap();
        assert_eq!(by_barcode.id, created.id);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_barcode_rejected() {
        let repo = repo().await;
        repo.create(&new_product("111", "Lapiz HB", 10)).await.unwrap();

        let err = repo
            .create(&new_product("111", "Lapiz 2B", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "barcode"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_validates_fields() {
        let repo = repo().await;

        let err = repo.create(&new_product("", "Lapiz", 1)).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let err = repo.create(&new_product("222", "Lapiz", -1)).await.unwrap_err();
        assert!(matches!(err, DbError::Rejected(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let repo = repo().await;
        repo.create(&new_product("1", "Tijeras", 3)).await.unwrap();
        repo.create(&new_product("2", "Borrador", 3)).await.unwrap();
        repo.create(&new_product("3", "Regla", 3)).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Borrador", "Regla", "Tijeras"]);
    }

    #[tokio::test]
    async fn test_partial_update_bumps_version() {
        let repo = repo().await;
        let created = repo.create(&new_product("333", "Folder", 8)).await.unwrap();

        let patch = ProductPatch {
            sale_price_cents: Some(1250),
            ..Default::default()
        };
        let updated = repo.update(&created.id, &patch).await.unwrap();
        assert_eq!(updated.sale_price_cents, 1250);
        assert_eq!(updated.name, "Folder");
        assert_eq!(updated.stock, 8);
        assert_eq!(updated.version, 1);

        let stored = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_update_onto_taken_barcode() {
        let repo = repo().await;
        repo.create(&new_product("A-1", "Pluma azul", 8)).await.unwrap();
        let red = repo.create(&new_product("A-2", "Pluma roja", 8)).await.unwrap();

        let patch = ProductPatch {
            barcode: Some("A-1".to_string()),
            ..Default::default()
        };
        let err = repo.update(&red.id, &patch).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Re-saving its own barcode is fine
        let patch = ProductPatch {
            barcode: Some("A-2".to_string()),
            ..Default::default()
        };
        assert!(repo.update(&red.id, &patch).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let repo = repo().await;

        let err = repo.update("nope", &ProductPatch::default()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = repo.delete("nope").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        let p = repo.create(&new_product("444", "Compas", 2)).await.unwrap();

        repo.delete(&p.id).await.unwrap();
        assert!(repo.get_by_id(&p.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_low_stock_includes_threshold() {
        let repo = repo().await;
        repo.create(&new_product("1", "Engrapadora", 5)).await.unwrap();
        repo.create(&new_product("2", "Grapas", 0)).await.unwrap();
        repo.create(&new_product("3", "Clips", 6)).await.unwrap();

        let low: Vec<String> = repo
            .list_low_stock()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(low, vec!["Grapas", "Engrapadora"]);
    }
}
