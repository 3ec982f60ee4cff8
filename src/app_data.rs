use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{AccountSettings, SecretManager};
use crate::services::{AccountNotifier, Mailer, PasswordHasherService};
use crate::stores::UserStore;

/// Centralized application data following the main-owned stores pattern
///
/// Everything is created once at startup and shared with services.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db, settings, secrets, mailer)
///   ├─ user_store (Arc<UserStore>)
///   ├─ password_hasher (Arc<PasswordHasherService>)
///   └─ notifier (Arc<AccountNotifier>)
///   ↓ wrapped in Arc<AppData>
///   └─ AccountService::new(app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: AccountSettings,
    pub user_store: Arc<UserStore>,
    pub password_hasher: Arc<PasswordHasherService>,
    pub notifier: Arc<AccountNotifier>,
}

impl AppData {
    /// Wire stores and services together
    ///
    /// The database connection should already be migrated.
    pub fn init(
        db: DatabaseConnection,
        settings: AccountSettings,
        secret_manager: &SecretManager,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        tracing::debug!("Initializing AppData...");

        let user_store = Arc::new(UserStore::new());
        let password_hasher = Arc::new(PasswordHasherService::new(secret_manager.password_pepper().to_string()));
        let notifier = Arc::new(AccountNotifier::new(mailer, &settings));

        tracing::debug!("AppData initialization complete");

        Self {
            db,
            settings,
            user_store,
            password_hasher,
            notifier,
        }
    }
}
