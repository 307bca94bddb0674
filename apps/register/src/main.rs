//! Papeleria POS register entry point.
//!
//! ```bash
//! PAPELERIA_DB_PATH=./papeleria.db papeleria-register < commands.jsonl
//! ```

use tokio::io::BufReader;
use tracing::info;

use papeleria_db::Database;
use papeleria_register::config::RegisterConfig;
use papeleria_register::{init_tracing, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Papeleria POS register");

    let config = RegisterConfig::load()?;
    config.ensure_data_dir()?;
    info!(db_path = ?config.database_path, "Database path determined");

    let db = Database::new(config.db_config()).await?;
    anyhow::ensure!(db.health_check().await, "database is not answering queries");
    info!("Database connected and migrations applied");

    serve(&db, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    db.close().await;
    info!("Register stopped");
    Ok(())
}
