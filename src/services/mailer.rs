use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::internal::NotificationError;

/// A rendered message ready for a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    pub from_address: String,
    pub to: Vec<String>,
}

/// Mail transport used by the account notifier
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), NotificationError>;
}

/// Writes the envelope to the log instead of delivering it
///
/// Used by the CLI, which has no SMTP transport.
#[derive(Debug, Default)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), NotificationError> {
        tracing::info!(
            subject = %mail.subject,
            from = %mail.from_address,
            to = ?mail.to,
            "Account notification"
        );
        Ok(())
    }
}

/// Keeps every sent message in memory
///
/// Can be told to fail or to stall, which makes it the test double for
/// notification behaviour.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    failure: Mutex<Option<String>>,
    delay: Option<Duration>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mailer that sleeps before each send
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Make every following send fail with the given message
    pub fn fail_with(&self, message: &str) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(message.to_string());
        }
    }

    pub fn recover(&self) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = None;
        }
    }

    /// Messages delivered so far, oldest first
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), NotificationError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self
            .failure
            .lock()
            .map_err(|_| NotificationError::delivery_failed("mailer state poisoned"))?
            .clone();
        if let Some(message) = failure {
            return Err(NotificationError::delivery_failed(message));
        }

        self.sent
            .lock()
            .map_err(|_| NotificationError::delivery_failed("mailer state poisoned"))?
            .push(mail.clone());
        Ok(())
    }
}
