// Account management CLI commands

use crate::services::AccountService;
use crate::types::dto::AccountSummary;
use crate::types::internal::{ExtraFields, UserAccount};

use super::CreateAccountArgs;

fn print_account(account: &UserAccount) -> Result<(), Box<dyn std::error::Error>> {
    let summary = AccountSummary::from(account);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn extra_fields(args: &CreateAccountArgs) -> ExtraFields {
    let mut extra = ExtraFields::new();
    if args.inactive {
        extra = extra.active(false);
    }
    if args.staff {
        extra = extra.staff(true);
    }
    extra
}

pub async fn create_user(
    account_service: &AccountService,
    args: &CreateAccountArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let account = account_service
        .create_user(&args.email, &args.username, &args.name, args.password.as_deref(), extra_fields(args))
        .await?;

    tracing::info!("Created account {}", account);
    print_account(&account)
}

pub async fn create_superuser(
    account_service: &AccountService,
    args: &CreateAccountArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let account = account_service
        .create_superuser(&args.email, &args.username, &args.name, args.password.as_deref(), extra_fields(args))
        .await?;

    tracing::info!("Created superuser {}", account);
    print_account(&account)
}

pub async fn show_account(
    account_service: &AccountService,
    username: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match account_service.find_by_username(username).await? {
        Some(account) => print_account(&account),
        None => {
            println!("No account named '{}'", username);
            Ok(())
        }
    }
}

pub async fn set_password(
    account_service: &AccountService,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut account = account_service.get_by_username(username).await?;

    account_service.set_password(&mut account, password)?;
    let account = account_service.save(account).await?;

    tracing::info!("Password updated for {}", account);
    Ok(())
}
