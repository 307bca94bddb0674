//! # Sale Repository
//!
//! Records sales atomically and reads back the sales history.
//!
//! ## Sale Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       record_sale()                                     │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  process_sale(TxInventory)                                             │
//! │    ├── SELECT product            (fetch_for_update)                    │
//! │    └── UPDATE products SET stock, version = version + 1                │
//! │          WHERE id = ? AND version = ?        (persist)                 │
//! │    │                                                                    │
//! │    ├── Err ──► drop tx ──► ROLLBACK (nothing persisted)                │
//! │    ▼                                                                    │
//! │  INSERT sales, INSERT sale_lines (position = submission order)         │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  COMMIT ──► failure here is a commit conflict                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales are never updated or deleted once committed.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::product::PRODUCT_COLUMNS;
use papeleria_core::{
    process_sale, InventoryStore, PaymentMethod, Product, Sale, SaleFilter, SaleLine, SaleRequest,
};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Processes and records a sale as one transaction.
    ///
    /// ## Returns
    /// * `Ok(Sale)` - Stock decremented and sale stored
    /// * `Err(DbError::Rejected)` - Checkout rules refused the sale
    /// * `Err(DbError::Conflict)` - Another sale touched the same stock first
    ///
    /// On any `Err` no stock change and no sale row is visible afterwards.
    pub async fn record_sale(&self, request: &SaleRequest) -> DbResult<Sale> {
        debug!(
            seller_id = %request.seller_id,
            lines = request.lines.len(),
            payment_method = request.payment_method.as_str(),
            "Recording sale"
        );

        let mut tx = self.pool.begin().await?;

        let processed = {
            let mut store = TxInventory { conn: &mut *tx };
            process_sale(&mut store, request, Utc::now()).await
        };

        let sale = match processed {
            Ok(sale) => sale,
            Err(e) => {
                warn!(seller_id = %request.seller_id, error = %e, "Sale rejected");
                return Err(e);
            }
        };

        insert_sale(&mut *tx, &sale).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::Conflict(DbError::from(e).to_string()))?;

        info!(
            sale_id = %sale.id,
            seller_id = %sale.seller_id,
            total = %sale.total(),
            units = sale.unit_count(),
            "Sale committed"
        );

        Ok(sale)
    }

    /// Gets a sale with its lines in submission order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT
                id,
                seller_id,
                total_cents,
                payment_method,
                cash_received_cents,
                change_given_cents,
                created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let lines = self.get_lines(&row.id).await?;
                Ok(Some(row.into_sale(lines)))
            }
            None => Ok(None),
        }
    }

    /// Lists sales newest first.
    ///
    /// An empty filter returns every seller's sales.
    pub async fn list(&self, filter: &SaleFilter) -> DbResult<Vec<Sale>> {
        debug!(seller_id = ?filter.seller_id, limit = ?filter.limit, "Listing sales");

        // LIMIT -1 is unbounded in SQLite
        let limit = filter.limit.map(i64::from).unwrap_or(-1);

        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT
                id,
                seller_id,
                total_cents,
                payment_method,
                cash_received_cents,
                change_given_cents,
                created_at
            FROM sales
            WHERE (?1 IS NULL OR seller_id = ?1)
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2
            "#,
        )
        .bind(filter.seller_id.as_deref())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut sales = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = self.get_lines(&row.id).await?;
            sales.push(row.into_sale(lines));
        }

        Ok(sales)
    }

    /// Counts stored sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn get_lines(&self, sale_id: &str) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT product_id, quantity, price_at_sale_cents, subtotal_cents
            FROM sale_lines
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }
}

// =============================================================================
// Transaction-scoped inventory
// =============================================================================

/// [`InventoryStore`] over an open SQLite transaction.
struct TxInventory<'c> {
    conn: &'c mut SqliteConnection,
}

impl InventoryStore for TxInventory<'_> {
    type Error = DbError;

    async fn fetch_for_update(&mut self, product_id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(product_id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(product)
    }

    async fn persist(&mut self, product: &Product) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products SET
                stock = ?3,
                updated_at = ?4,
                version = version + 1
            WHERE id = ?1 AND version = ?2
            "#,
        )
        .bind(&product.id)
        .bind(product.version)
        .bind(product.stock)
        .bind(Utc::now())
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::Conflict(format!(
                "stock of product {} changed during sale",
                product.id
            )));
        }

        Ok(())
    }
}

async fn insert_sale(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sales (
            id, seller_id, total_cents, payment_method,
            cash_received_cents, change_given_cents, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.seller_id)
    .bind(sale.total_cents)
    .bind(sale.payment_method)
    .bind(sale.cash_received_cents)
    .bind(sale.change_given_cents)
    .bind(sale.created_at)
    .execute(&mut *conn)
    .await?;

    for (position, line) in sale.lines.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO sale_lines (
                sale_id, position, product_id,
                quantity, price_at_sale_cents, subtotal_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&sale.id)
        .bind(position as i64)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.price_at_sale_cents)
        .bind(line.subtotal_cents)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Sale header as stored; lines are loaded separately.
#[derive(sqlx::FromRow)]
struct SaleRow {
    id: String,
    seller_id: String,
    total_cents: i64,
    payment_method: PaymentMethod,
    cash_received_cents: Option<i64>,
    change_given_cents: Option<i64>,
    created_at: DateTime<Utc>,
}

impl SaleRow {
    fn into_sale(self, lines: Vec<SaleLine>) -> Sale {
        Sale {
            id: self.id,
            seller_id: self.seller_id,
            lines,
            total_cents: self.total_cents,
            payment_method: self.payment_method,
            cash_received_cents: self.cash_received_cents,
            change_given_cents: self.change_given_cents,
            created_at: self.created_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use papeleria_core::{CoreError, Money, NewProduct, SaleLineRequest};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn stocked(db: &Database, barcode: &str, name: &str, price: i64, stock: i64) -> Product {
        db.products()
            .create(&NewProduct {
                barcode: barcode.to_string(),
                name: name.to_string(),
                category_id: "papeleria".to_string(),
                cost_price_cents: price / 2,
                sale_price_cents: price,
                stock,
                min_stock_threshold: 1,
            })
            .await
            .unwrap()
    }

    async fn stock_of(db: &Database, id: &str) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().stock
    }

    fn request(
        seller: &str,
        lines: &[(&str, i64)],
        payment_method: PaymentMethod,
        cash: Option<i64>,
    ) -> SaleRequest {
        SaleRequest {
            seller_id: seller.to_string(),
            lines: lines
                .iter()
                .map(|(id, qty)| SaleLineRequest {
                    product_id: id.to_string(),
                    quantity: *qty,
                })
                .collect(),
            payment_method,
            cash_received_cents: cash,
        }
    }

    #[tokio::test]
    async fn test_cash_sale_commits_stock_and_record() {
        let db = db().await;
        let a = stocked(&db, "A", "Cuaderno", 1000, 5).await;

        let sale = db
            .sales()
            .record_sale(&request("s-1", &[(&a.id, 3)], PaymentMethod::Cash, Some(5000)))
            .await
            .unwrap();

        assert_eq!(sale.total_cents, 3000);
        assert_eq!(sale.change_given_cents, Some(2000));
        assert_eq!(stock_of(&db, &a.id).await, 2);

        let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.lines, sale.lines);
        assert_eq!(stored.total_cents, 3000);
        assert_eq!(stored.cash_received_cents, Some(5000));
        assert_eq!(stored.change_given_cents, Some(2000));
        assert_eq!(stored.payment_method, PaymentMethod::Cash);
    }

    #[tokio::test]
    async fn test_insufficient_stock_persists_nothing() {
        let db = db().await;
        let b = stocked(&db, "B", "Pegamento", 1500, 1).await;

        let err = db
            .sales()
            .record_sale(&request("s-1", &[(&b.id, 2)], PaymentMethod::Transfer, None))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Rejected(CoreError::InsufficientStock {
                available: 1,
                requested: 2,
                ..
            })
        ));
        assert_eq!(stock_of(&db, &b.id).await, 1);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insufficient_payment_rolls_back_every_line() {
        let db = db().await;
        let a = stocked(&db, "A", "Cuaderno", 1500, 10).await;
        let b = stocked(&db, "B", "Lapiz", 1500, 10).await;

        let err = db
            .sales()
            .record_sale(&request(
                "s-1",
                &[(&a.id, 2), (&b.id, 1)],
                PaymentMethod::Cash,
                Some(4000),
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Rejected(CoreError::InsufficientPayment { required, tendered })
                if required == Money::from_cents(4500) && tendered == Money::from_cents(4000)
        ));
        assert_eq!(stock_of(&db, &a.id).await, 10);
        assert_eq!(stock_of(&db, &b.id).await, 10);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_product_rolls_back_earlier_lines() {
        let db = db().await;
        let a = stocked(&db, "A", "Cuaderno", 1000, 5).await;

        let err = db
            .sales()
            .record_sale(&request(
                "s-1",
                &[(&a.id, 2), ("ghost", 1)],
                PaymentMethod::Transfer,
                None,
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Rejected(CoreError::ProductNotFound(ref id)) if id == "ghost"));
        assert_eq!(stock_of(&db, &a.id).await, 5);
    }

    #[tokio::test]
    async fn test_transfer_sale_stores_no_cash() {
        let db = db().await;
        let t = stocked(&db, "T", "Tijeras", 3000, 2).await;

        let sale = db
            .sales()
            .record_sale(&request("s-1", &[(&t.id, 1)], PaymentMethod::Transfer, Some(9999)))
            .await
            .unwrap();

        let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, 3000);
        assert_eq!(stored.cash_received_cents, None);
        assert_eq!(stored.change_given_cents, None);
    }

    #[tokio::test]
    async fn test_repeated_product_sees_own_decrement() {
        let db = db().await;
        let a = stocked(&db, "A", "Borrador", 500, 3).await;

        let err = db
            .sales()
            .record_sale(&request("s-1", &[(&a.id, 2), (&a.id, 2)], PaymentMethod::Transfer, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rejected(CoreError::InsufficientStock { .. })));
        assert_eq!(stock_of(&db, &a.id).await, 3);

        let sale = db
            .sales()
            .record_sale(&request("s-1", &[(&a.id, 2), (&a.id, 1)], PaymentMethod::Transfer, None))
            .await
            .unwrap();
        assert_eq!(sale.lines.len(), 2);
        assert_eq!(stock_of(&db, &a.id).await, 0);

        let product = db.products().get_by_id(&a.id).await.unwrap().unwrap();
        assert_eq!(product.version, 2);
    }

    #[tokio::test]
    async fn test_price_is_frozen_and_product_deletion_keeps_history() {
        let db = db().await;
        let a = stocked(&db, "A", "Regla", 800, 10).await;

        let sale = db
            .sales()
            .record_sale(&request("s-1", &[(&a.id, 2)], PaymentMethod::Transfer, None))
            .await
            .unwrap();

        db.products()
            .update(
                &a.id,
                &papeleria_core::ProductPatch {
                    sale_price_cents: Some(900),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        db.products().delete(&a.id).await.unwrap();

        let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.lines[0].price_at_sale_cents, 800);
        assert_eq!(stored.lines[0].subtotal_cents, 1600);
        assert_eq!(stored.lines[0].product_id, a.id);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_seller_filter() {
        let db = db().await;
        let a = stocked(&db, "A", "Clip", 100, 100).await;

        let first = db
            .sales()
            .record_sale(&request("ana", &[(&a.id, 1)], PaymentMethod::Transfer, None))
            .await
            .unwrap();
        let second = db
            .sales()
            .record_sale(&request("luis", &[(&a.id, 2)], PaymentMethod::Transfer, None))
            .await
            .unwrap();
        let third = db
            .sales()
            .record_sale(&request("ana", &[(&a.id, 3)], PaymentMethod::Transfer, None))
            .await
            .unwrap();

        let all: Vec<String> = db
            .sales()
            .list(&SaleFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(all, vec![third.id.clone(), second.id.clone(), first.id.clone()]);

        let ana: Vec<String> = db
            .sales()
            .list(&SaleFilter::for_seller("ana"))
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ana, vec![third.id.clone(), first.id.clone()]);

        let latest = db
            .sales()
            .list(&SaleFilter {
                seller_id: None,
                limit: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].id, third.id);
        assert_eq!(latest[0].lines[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_bulk_quantity_and_long_unknown_id() {
        let db = db().await;
        let h = stocked(&db, "H", "Hojas blancas", 10, 5000).await;

        let sale = db
            .sales()
            .record_sale(&request("s-1", &[(&h.id, 1000)], PaymentMethod::Cash, Some(10_000)))
            .await
            .unwrap();
        assert_eq!(sale.total_cents, 10_000);
        assert_eq!(sale.change_given_cents, Some(0));
        assert_eq!(stock_of(&db, &h.id).await, 4000);

        let long_id = "z".repeat(80);
        let err = db
            .sales()
            .record_sale(&request("s-1", &[(&long_id, 1)], PaymentMethod::Transfer, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rejected(CoreError::ProductNotFound(ref id)) if *id == long_id));
    }

    #[tokio::test]
    async fn test_get_missing_sale() {
        let db = db().await;
        assert!(db.sales().get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_sales_on_single_connection() {
        let db = db().await;
        let p = stocked(&db, "P", "Marcador", 2000, 10).await;

        let sale = request("s-1", &[(&p.id, 6)], PaymentMethod::Transfer, None);
        let sales = db.sales();
        let (left, right) = tokio::join!(sales.record_sale(&sale), sales.record_sale(&sale));

        let outcomes = [left, right];
        let committed = outcomes.iter().filter(|r| r.is_ok()).count();
        assert_eq!(committed, 1);
        assert!(outcomes.iter().any(|r| matches!(
            r,
            Err(DbError::Rejected(CoreError::InsufficientStock { available: 4, .. }))
        )));
        assert_eq!(stock_of(&db, &p.id).await, 4);
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }
}
