use sea_orm::{Database, DatabaseConnection};
use migration::{AccountMigrator, MigratorTrait};

use crate::config::AccountSettings;
use crate::errors::InternalError;

/// Connect to the accounts database
///
/// Does NOT run migrations - call migrate_database() separately.
pub async fn init_database(settings: &AccountSettings) -> Result<DatabaseConnection, InternalError> {
    let db = Database::connect(&settings.database_url)
        .await
        .map_err(|e| InternalError::database("connect_database", e))?;

    tracing::debug!("Connected to accounts database: {}", settings.database_url);

    Ok(db)
}

/// Run all pending migrations on the accounts database
pub async fn migrate_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    AccountMigrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_migrations", e))?;

    tracing::debug!("Accounts database migrations completed");

    Ok(())
}
