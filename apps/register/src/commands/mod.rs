//! # Register Commands
//!
//! Every command the register answers, one JSON object per line.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (Command enum, dispatch, envelope)
//! ├── product.rs  ◄─── Catalogue CRUD, barcode lookup, low stock
//! └── sale.rs     ◄─── Recording and listing sales
//! ```
//!
//! ## Envelope
//! ```text
//! request:  {"command":"getProductByBarcode","barcode":"7501031311309"}
//! success:  {"success":true,"data":{...}}
//! failure:  {"success":false,"code":"INSUFFICIENT_STOCK","message":"..."}
//! ```

pub mod product;
pub mod sale;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::error::ApiError;
use papeleria_db::Database;
use product::{CreateProductInput, UpdateProductInput};
use sale::{CreateSaleInput, ListSalesInput};

/// A request line, tagged by its `command` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    CreateSale(CreateSaleInput),
    ListSales(ListSalesInput),
    GetSale { id: String },
    CreateProduct(CreateProductInput),
    GetProduct { id: String },
    GetProductByBarcode { barcode: String },
    ListProducts,
    UpdateProduct(UpdateProductInput),
    DeleteProduct { id: String },
    ListLowStock,
}

/// Emitted only if a reply cannot be serialized at all.
const SERIALIZE_FAILURE: &str =
    r#"{"success":false,"code":"INTERNAL","message":"Could not serialize response"}"#;

/// Runs one command against the database.
pub async fn dispatch(db: &Database, command: Command) -> Result<Value, ApiError> {
    match command {
        Command::CreateSale(input) => to_data(sale::create_sale(db, input).await?),
        Command::ListSales(input) => to_data(sale::list_sales(db, input).await?),
        Command::GetSale { id } => to_data(sale::get_sale(db, &id).await?),
        Command::CreateProduct(input) => to_data(product::create_product(db, input).await?),
        Command::GetProduct { id } => to_data(product::get_product(db, &id).await?),
        Command::GetProductByBarcode { barcode } => {
            to_data(product::get_product_by_barcode(db, &barcode).await?)
        }
        Command::ListProducts => to_data(product::list_products(db).await?),
        Command::UpdateProduct(input) => to_data(product::update_product(db, input).await?),
        Command::DeleteProduct { id } => to_data(product::delete_product(db, &id).await?),
        Command::ListLowStock => to_data(product::list_low_stock(db).await?),
    }
}

fn to_data<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

/// Parses a request line, runs it, and renders the reply line.
pub async fn handle_line(db: &Database, line: &str) -> String {
    let outcome = match serde_json::from_str::<Command>(line) {
        Ok(command) => dispatch(db, command).await,
        Err(e) => {
            warn!(error = %e, "Malformed command");
            Err(ApiError::validation(format!("Invalid command: {}", e)))
        }
    };

    render(outcome)
}

/// Renders a validation failure for a line that never became a command.
pub fn reject_line(message: &str) -> String {
    render(Err(ApiError::validation(message)))
}

fn render(outcome: Result<Value, ApiError>) -> String {
    let reply = match outcome {
        Ok(data) => json!({ "success": true, "data": data }),
        Err(err) => json!({ "success": false, "code": err.code, "message": err.message }),
    };

    serde_json::to_string(&reply).unwrap_or_else(|_| SERIALIZE_FAILURE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use papeleria_db::DbConfig;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn call(db: &Database, line: &str) -> Value {
        serde_json::from_str(&handle_line(db, line).await).unwrap()
    }

    #[test]
    fn test_command_tags() {
        let cmd: Command = serde_json::from_str(r#"{"command":"listLowStock"}"#).unwrap();
        assert!(matches!(cmd, Command::ListLowStock));

        let cmd: Command =
            serde_json::from_str(r#"{"command":"getProductByBarcode","barcode":"750"}"#).unwrap();
        assert!(matches!(cmd, Command::GetProductByBarcode { ref barcode } if barcode == "750"));

        let cmd: Command = serde_json::from_str(r#"{"command":"listSales"}"#).unwrap();
        assert!(matches!(cmd, Command::ListSales(ListSalesInput { seller_id: None, limit: None })));
    }

    #[tokio::test]
    async fn test_sale_through_the_envelope() {
        let db = db().await;

        let created = call(
            &db,
            r#"{"command":"createProduct","barcode":"750","name":"Lapiz","categoryId":"ESC",
                "costPrice":500,"salePrice":1000,"stock":5}"#,
        )
        .await;
        assert_eq!(created["success"], true);
        let product_id = created["data"]["id"].as_str().unwrap().to_string();

        let sale = call(
            &db,
            &format!(
                r#"{{"command":"createSale","sellerId":"u-1",
                    "products":[{{"productId":"{product_id}","quantity":3}}],
                    "paymentMethod":"cash","cashReceived":5000}}"#
            ),
        )
        .await;
        assert_eq!(sale["success"], true);
        assert_eq!(sale["data"]["totalAmount"], 3000);
        assert_eq!(sale["data"]["changeGiven"], 2000);

        let product = call(&db, r#"{"command":"getProductByBarcode","barcode":"750"}"#).await;
        assert_eq!(product["data"]["stock"], 2);
        assert_eq!(product["data"]["lowStock"], true);

        let sales = call(&db, r#"{"command":"listSales","sellerId":"u-1"}"#).await;
        assert_eq!(sales["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failures_carry_codes() {
        let db = db().await;

        let reply = call(
            &db,
            r#"{"command":"createSale","sellerId":"u-1",
                "products":[{"productId":"ghost","quantity":1}],"paymentMethod":"transfer"}"#,
        )
        .await;
        assert_eq!(reply["success"], false);
        assert_eq!(reply["code"], "NOT_FOUND");

        let reply = call(&db, r#"{"command":"refund","id":"s-1"}"#).await;
        assert_eq!(reply["code"], "VALIDATION_ERROR");

        let reply = call(&db, "not json").await;
        assert_eq!(reply["success"], false);
        assert_eq!(reply["code"], "VALIDATION_ERROR");
    }
}
