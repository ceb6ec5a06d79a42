use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let database = &config::config().database;
    let pool = DatabaseManager::connect(database).await?;
    DatabaseManager::migrate(&pool).await?;
    DatabaseManager::health_check(&pool).await?;

    output_success(
        &output_format,
        "Migrations applied",
        Some(json!({ "max_connections": database.max_connections })),
    )
}
