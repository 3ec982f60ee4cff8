use sea_orm::DatabaseConnection;

use crate::config::{init_database, migrate_database, AccountSettings};
use crate::errors::InternalError;

/// Connect to the accounts database and bring its schema up to date
///
/// Every command runs this first, so `migrate` on its own only reports.
pub async fn connect_and_migrate(settings: &AccountSettings) -> Result<DatabaseConnection, InternalError> {
    tracing::info!("Connecting to accounts database...");
    let db = init_database(settings).await?;

    tracing::info!("Migrating accounts database...");
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");

    Ok(db)
}
