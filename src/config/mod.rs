mod account_settings;
mod env_provider;
mod errors;
mod logging;
mod secret_config;
mod secret_manager;
pub mod database;

pub use account_settings::AccountSettings;
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use errors::ConfigError;
pub use logging::{init_logging, LoggingConfig, LoggingError};
pub use secret_config::{SecretConfig, SecretType};
pub use secret_manager::SecretManager;
pub use database::{init_database, migrate_database};
