use thiserror::Error;

pub mod account;
pub mod credential;
pub mod database;
pub mod notification;
pub mod validation;

pub use account::AccountError;
pub use credential::CredentialError;
pub use database::DatabaseError;
pub use notification::NotificationError;
pub use validation::ValidationError;

/// Internal error type for store and service operations
///
/// Infrastructure errors (database) sit next to domain errors (validation,
/// account, credential). A failed notification carries the id of the account
/// that was already committed.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("Account {account_id} was saved but its notification failed: {source}")]
    Notification {
        account_id: String,
        #[source]
        source: NotificationError,
    },
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation { operation: operation.to_string(), source })
    }

    pub fn notification(account_id: impl ToString, source: NotificationError) -> InternalError {
        InternalError::Notification { account_id: account_id.to_string(), source }
    }
}
