use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::{AccountError, CredentialError, DatabaseError, ValidationError};
use crate::services::{AccountNotifier, PasswordHasherService};
use crate::stores::UserStore;
use crate::types::internal::{AccountId, ExtraFields, UserAccount};

/// Account service that orchestrates account creation and updates
///
/// Each save runs in its own transaction. The event it produces is handed to
/// the notifier only after the transaction commits, so a failed notification
/// never rolls back a stored account.
pub struct AccountService {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    password_hasher: Arc<PasswordHasherService>,
    notifier: Arc<AccountNotifier>,
}

impl AccountService {
    /// Create AccountService from AppData
    ///
    /// Extracts only the dependencies it needs from the centralized AppData.
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            password_hasher: app_data.password_hasher.clone(),
            notifier: app_data.notifier.clone(),
        }
    }

    /// Create and persist a regular account
    ///
    /// # Arguments
    /// * `email` - Contact address, normalized before storage
    /// * `username` - Login identifier
    /// * `name` - Display name
    /// * `password` - Plaintext password; `None` creates an account that cannot log in
    /// * `extra` - Optional flag overrides
    ///
    /// # Returns
    /// * `Ok(UserAccount)` - The persisted account including its assigned id
    /// * `Err(InternalError)` - Validation, uniqueness, database, or notification failure
    pub async fn create_user(
        &self,
        email: &str,
        username: &str,
        name: &str,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> Result<UserAccount, InternalError> {
        validate_email(email)?;

        let email = UserStore::normalize_email(email);
        let mut account = UserAccount::new(email, username.to_string(), name.to_string(), extra);
        self.password_hasher.set_password(&mut account, password)?;

        self.save(account).await
    }

    /// Create and persist an account with staff and superuser flags set
    ///
    /// Flags left unset default to true; flags explicitly set to false are
    /// rejected.
    pub async fn create_superuser(
        &self,
        email: &str,
        username: &str,
        name: &str,
        password: Option<&str>,
        mut extra: ExtraFields,
    ) -> Result<UserAccount, InternalError> {
        if !*extra.is_staff.get_or_insert(true) {
            return Err(ValidationError::SuperuserFlagsContradicted { flag: "is_staff" }.into());
        }
        if !*extra.is_superuser.get_or_insert(true) {
            return Err(ValidationError::SuperuserFlagsContradicted { flag: "is_superuser" }.into());
        }

        self.create_user(email, username, name, password, extra).await
    }

    /// Persist an account and notify its owner
    ///
    /// New accounts get an identifier; existing ones keep theirs.
    ///
    /// # Returns
    /// * `Ok(UserAccount)` - The stored account
    /// * `Err(InternalError::Notification)` - Stored, but the notification failed
    /// * `Err(InternalError)` - Nothing stored
    pub async fn save(&self, account: UserAccount) -> Result<UserAccount, InternalError> {
        validate_email(&account.email)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|source| DatabaseError::TransactionBegin { source })?;

        let outcome = self.user_store.save(&txn, account).await?;

        txn.commit()
            .await
            .map_err(|source| DatabaseError::TransactionCommit { source })?;

        self.notifier.dispatch(&outcome.event).await?;

        Ok(outcome.value)
    }

    /// Replace the account's password in memory; call `save` to persist it
    pub fn set_password(&self, account: &mut UserAccount, plaintext: &str) -> Result<(), InternalError> {
        self.password_hasher.set_password(account, Some(plaintext))
    }

    /// Check a username and password pair
    ///
    /// Unknown users, wrong passwords, unusable passwords and inactive
    /// accounts all fail the same way.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<UserAccount, InternalError> {
        let account = self
            .user_store
            .find_by_username(&self.db, username)
            .await?
            .ok_or(CredentialError::InvalidCredentials)?;

        if !account.is_active || !self.password_hasher.check_password(&account, password) {
            tracing::debug!("Credential check failed for {}", username);
            return Err(CredentialError::InvalidCredentials.into());
        }

        Ok(account)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, InternalError> {
        self.user_store.find_by_username(&self.db, username).await
    }

    /// Like `find_by_username`, but a missing account is an error
    pub async fn get_by_username(&self, username: &str) -> Result<UserAccount, InternalError> {
        self.find_by_username(username)
            .await?
            .ok_or_else(|| AccountError::UsernameNotFound { username: username.to_string() }.into())
    }

    pub async fn get_by_id(&self, account_id: &AccountId) -> Result<UserAccount, InternalError> {
        self.user_store.get_by_id(&self.db, account_id).await
    }
}

/// Reject addresses that are empty or could never receive the notification
fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !email.contains('@') {
        return Err(ValidationError::InvalidEmail { value: email.to_string() });
    }
    Ok(())
}
