// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{AccountMigrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;

use crate::app_data::AppData;
use crate::config::{AccountSettings, SecretManager};
use crate::services::{AccountService, MemoryMailer};
use crate::types::internal::{ExtraFields, UserAccount};

pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";
pub const TEST_FROM_ADDRESS: &str = "noreply@aasc.example";

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    AccountMigrator::up(&db, None)
        .await
        .expect("Failed to run account migrations");

    db
}

/// Creates a migrated SQLite file database behind a pool of several connections
///
/// Unlike `sqlite::memory:`, transactions on different connections really
/// overlap here. The database lives as long as the returned directory.
pub async fn setup_file_test_db(max_connections: u32) -> (TempDir, DatabaseConnection) {
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

    (dir, db)
}

pub fn test_settings() -> AccountSettings {
    AccountSettings::new(TEST_FROM_ADDRESS).database_url("sqlite::memory:")
}

/// Unsaved account with default flags and no credential
pub fn unsaved_account(email: &str, username: &str) -> UserAccount {
    UserAccount::new(email.to_string(), username.to_string(), username.to_string(), ExtraFields::new())
}

/// Creates an AccountService backed by a fresh database and a MemoryMailer
///
/// Returns (db, mailer, account_service)
pub async fn setup_test_service() -> (DatabaseConnection, Arc<MemoryMailer>, AccountService) {
    setup_test_service_with(test_settings()).await
}

pub async fn setup_test_service_with(
    settings: AccountSettings,
) -> (DatabaseConnection, Arc<MemoryMailer>, AccountService) {
    let db = setup_test_db().await;
    let (mailer, account_service) = service_over(db.clone(), settings);

    (db, mailer, account_service)
}

/// Creates an AccountService over a file database with `max_connections` pooled connections
///
/// Returns (dir, mailer, account_service); keep `dir` alive for the whole test.
pub async fn setup_file_test_service(max_connections: u32) -> (TempDir, Arc<MemoryMailer>, AccountService) {
    let (dir, db) = setup_file_test_db(max_connections).await;
    let (mailer, account_service) = service_over(db, test_settings());

    (dir, mailer, account_service)
}

fn service_over(db: DatabaseConnection, settings: AccountSettings) -> (Arc<MemoryMailer>, AccountService) {
    let mailer = Arc::new(MemoryMailer::new());
    let secret_manager = SecretManager::with_pepper(TEST_PEPPER).expect("Failed to create test SecretManager");

    let app_data = Arc::new(AppData::init(db, settings, &secret_manager, mailer.clone()));

    (mailer, AccountService::new(app_data))
}
