use std::sync::Arc;
use std::time::Duration;

use crate::config::AccountSettings;
use crate::errors::InternalError;
use crate::errors::internal::NotificationError;
use crate::services::mailer::{Mailer, OutgoingMail};
use crate::types::internal::{AccountEvent, AccountEventKind};

pub const REGISTRATION_SUBJECT: &str = "User Registration";
pub const UPDATE_SUBJECT: &str = "Account Updated";

/// Turns account events into mail and hands them to the transport
///
/// Runs after the save transaction has committed. Messages never contain
/// credential material.
pub struct AccountNotifier {
    mailer: Arc<dyn Mailer>,
    from_address: String,
    timeout: Duration,
    fail_silently: bool,
}

impl AccountNotifier {
    pub fn new(mailer: Arc<dyn Mailer>, settings: &AccountSettings) -> Self {
        Self {
            mailer,
            from_address: settings.from_address.clone(),
            timeout: settings.notification_timeout,
            fail_silently: settings.fail_silently,
        }
    }

    /// Build the message for an event
    pub fn render(&self, event: &AccountEvent) -> OutgoingMail {
        let (subject, summary) = match event.kind {
            AccountEventKind::Registered => (REGISTRATION_SUBJECT, "Your account has been created successfully."),
            AccountEventKind::Updated => (UPDATE_SUBJECT, "Your account details have been updated."),
        };

        let body = format!(
            "Hello {},\n\n{}\n\nUsername: {}\n\nThank you!",
            event.name, summary, event.username
        );

        OutgoingMail {
            subject: subject.to_string(),
            body,
            from_address: self.from_address.clone(),
            to: vec![event.email.clone()],
        }
    }

    /// Send the notification for an event
    ///
    /// # Returns
    /// * `Ok(())` - Delivered, or failed while `fail_silently` is set
    /// * `Err(InternalError::Notification)` - Delivery failed or timed out
    pub async fn dispatch(&self, event: &AccountEvent) -> Result<(), InternalError> {
        match self.deliver(event).await {
            Ok(()) => {
                tracing::debug!("Notification for account {} delivered", event.account_id);
                Ok(())
            }
            Err(e) if self.fail_silently => {
                tracing::warn!("Notification for account {} failed: {}", event.account_id, e);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Notification for account {} failed: {}", event.account_id, e);
                Err(InternalError::notification(event.account_id, e))
            }
        }
    }

    async fn deliver(&self, event: &AccountEvent) -> Result<(), NotificationError> {
        if !event.email.contains('@') {
            return Err(NotificationError::InvalidRecipient { address: event.email.clone() });
        }

        let mail = self.render(event);

        tokio::time::timeout(self.timeout, self.mailer.send(&mail))
            .await
            .map_err(|_| NotificationError::TimedOut { seconds: self.timeout.as_secs() })?
    }
}
