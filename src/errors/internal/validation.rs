use thiserror::Error;

/// Input rejected before anything touches the database
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email required")]
    EmailRequired,

    #[error("invalid email: '{value}' has no domain part")]
    InvalidEmail { value: String },

    #[error("superuser flags contradicted: {flag} must be true")]
    SuperuserFlagsContradicted { flag: &'static str },
}
