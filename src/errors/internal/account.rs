use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AccountError {
    /// Another account already holds this email or username
    #[error("Uniqueness violation: {field} '{value}' is already taken")]
    UniquenessViolation { field: &'static str, value: String },

    #[error("Account not found: {account_id}")]
    AccountNotFound { account_id: String },

    #[error("No account with username '{username}'")]
    UsernameNotFound { username: String },

    /// The 7-digit identifier space is used up
    #[error("Identifier space exhausted: {number} does not fit in 7 digits")]
    IdentifierExhausted { number: i64 },

    #[error("Malformed account identifier: {value}")]
    MalformedIdentifier { value: String },

    #[error("Identifier sequence missing: {name}")]
    SequenceMissing { name: String },
}

impl AccountError {
    pub fn duplicate_email(value: impl Into<String>) -> Self {
        Self::UniquenessViolation { field: "email", value: value.into() }
    }

    pub fn duplicate_username(value: impl Into<String>) -> Self {
        Self::UniquenessViolation { field: "username", value: value.into() }
    }
}
