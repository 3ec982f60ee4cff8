use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Mail delivery failed: {message}")]
    DeliveryFailed { message: String },

    #[error("Mail delivery timed out after {seconds}s")]
    TimedOut { seconds: u64 },

    #[error("Invalid recipient address: {address}")]
    InvalidRecipient { address: String },
}

impl NotificationError {
    pub fn delivery_failed(message: impl Into<String>) -> Self {
        Self::DeliveryFailed { message: message.into() }
    }
}
