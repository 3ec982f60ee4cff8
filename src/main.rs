use std::sync::Arc;

use clap::Parser;

use aasc_accounts::app_data::AppData;
use aasc_accounts::cli::{self, migrate, Cli, Commands};
use aasc_accounts::config::{init_logging, AccountSettings, LoggingConfig, SecretManager, SystemEnvironment};
use aasc_accounts::services::{AccountService, TracingMailer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let env = SystemEnvironment;
    init_logging(&LoggingConfig::from_env(&env))?;

    let cli = Cli::parse();

    let settings = AccountSettings::from_env(&env)?;
    let db = migrate::connect_and_migrate(&settings).await?;

    if matches!(cli.command, Commands::Migrate) {
        return Ok(());
    }

    let secret_manager = SecretManager::init(&env)?;
    let app_data = Arc::new(AppData::init(db, settings, &secret_manager, Arc::new(TracingMailer)));
    let account_service = Arc::new(AccountService::new(app_data));

    cli::execute_command(cli, account_service).await
}
