// CLI module for account administration

pub mod accounts;
pub mod migrate;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::services::AccountService;

/// AASC accounts CLI
#[derive(Parser)]
#[command(name = "aasc-accounts")]
#[command(about = "User account administration", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run pending database migrations
    Migrate,

    /// Create a regular account
    CreateUser(CreateAccountArgs),

    /// Create an account with staff and superuser privileges
    CreateSuperuser(CreateAccountArgs),

    /// Display an account
    Show {
        #[arg(long)]
        username: String,
    },

    /// Replace an account's password
    SetPassword {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CreateAccountArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub name: String,

    /// Leave empty to create an account that cannot log in
    #[arg(long)]
    pub password: Option<String>,

    /// Grant staff access (regular accounts only)
    #[arg(long)]
    pub staff: bool,

    /// Create the account disabled
    #[arg(long)]
    pub inactive: bool,
}

/// Execute CLI command
///
/// `Migrate` is handled before services exist and is a no-op here.
///
/// # Returns
/// * `Ok(())` - Command executed successfully
/// * `Err(...)` - Command execution failed
pub async fn execute_command(
    cli: Cli,
    account_service: Arc<AccountService>,
) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => {}
        Commands::CreateUser(args) => {
            accounts::create_user(&account_service, &args).await?;
        }
        Commands::CreateSuperuser(args) => {
            accounts::create_superuser(&account_service, &args).await?;
        }
        Commands::Show { username } => {
            accounts::show_account(&account_service, &username).await?;
        }
        Commands::SetPassword { username, password } => {
            accounts::set_password(&account_service, &username, &password).await?;
        }
    }

    Ok(())
}
