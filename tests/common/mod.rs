// Common test utilities for integration tests

use std::sync::Arc;

use aasc_accounts::app_data::AppData;
use aasc_accounts::config::{AccountSettings, SecretManager};
use aasc_accounts::services::{AccountService, MemoryMailer};
use migration::{AccountMigrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;

pub const TEST_PEPPER: &str = "integration-test-pepper";

/// Creates a test accounts database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    AccountMigrator::up(&db, None)
        .await
        .expect("Failed to run account migrations");

    db
}

/// Creates an AccountService over a SQLite file with several pooled connections
///
/// Transactions on separate connections overlap, as they would for concurrent
/// requests against the default file database. Keep the TempDir alive.
pub async fn setup_file_account_service(
    max_connections: u32,
) -> (TempDir, Arc<MemoryMailer>, Arc<AccountService>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("accounts.db").display());

    let mut options = ConnectOptions::new(url);
    options.max_connections(max_connections).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to create file test database");
    AccountMigrator::up(&db, None)
        .await
        .expect("Failed to run account migrations");

    let (mailer, service) = service_over(db, settings());
    (dir, mailer, service)
}

/// Creates an AccountService over a fresh database
///
/// Returns (db, mailer, account_service)
pub async fn setup_account_service(
    settings: AccountSettings,
) -> (DatabaseConnection, Arc<MemoryMailer>, Arc<AccountService>) {
    let db = setup_test_db().await;
    let (mailer, service) = service_over(db.clone(), settings);

    (db, mailer, service)
}

fn service_over(db: DatabaseConnection, settings: AccountSettings) -> (Arc<MemoryMailer>, Arc<AccountService>) {
    let mailer = Arc::new(MemoryMailer::new());
    let secret_manager = SecretManager::with_pepper(TEST_PEPPER).expect("Failed to create SecretManager");

    let app_data = Arc::new(AppData::init(db, settings, &secret_manager, mailer.clone()));

    (mailer, Arc::new(AccountService::new(app_data)))
}

pub fn settings() -> AccountSettings {
    AccountSettings::new("accounts@aasc.example")
}
