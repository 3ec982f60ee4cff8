use std::time::Duration;

use crate::config::{ConfigError, EnvironmentProvider};

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const FROM_ADDRESS_VAR: &str = "EMAIL_HOST_USER";
pub const NOTIFICATION_TIMEOUT_VAR: &str = "NOTIFICATION_TIMEOUT_SECS";
pub const NOTIFICATION_FAIL_SILENTLY_VAR: &str = "NOTIFICATION_FAIL_SILENTLY";

pub const DEFAULT_DATABASE_URL: &str = "sqlite://accounts.db?mode=rwc";
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings handed to the account service at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSettings {
    pub database_url: String,
    /// Sender address on account notifications
    pub from_address: String,
    /// Upper bound on a single notification send
    pub notification_timeout: Duration,
    /// Log notification failures instead of returning them
    pub fail_silently: bool,
}

impl AccountSettings {
    /// Settings with defaults for everything except the sender address
    pub fn new(from_address: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            from_address: from_address.into(),
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
            fail_silently: false,
        }
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    pub fn notification_timeout(mut self, timeout: Duration) -> Self {
        self.notification_timeout = timeout;
        self
    }

    pub fn fail_silently(mut self, fail_silently: bool) -> Self {
        self.fail_silently = fail_silently;
        self
    }

    /// Load settings from environment variables
    ///
    /// # Errors
    /// Returns `ConfigError` when the sender address is missing or a value does not parse
    pub fn from_env(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let from_address = env
            .get_var(FROM_ADDRESS_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::missing(FROM_ADDRESS_VAR))?;
        if !from_address.contains('@') {
            return Err(ConfigError::invalid(FROM_ADDRESS_VAR, "expected an email address"));
        }

        let mut settings = Self::new(from_address);

        if let Some(url) = env.get_var(DATABASE_URL_VAR) {
            settings = settings.database_url(url);
        }

        if let Some(raw) = env.get_var(NOTIFICATION_TIMEOUT_VAR) {
            let seconds: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(NOTIFICATION_TIMEOUT_VAR, format!("'{}' is not a number of seconds", raw)))?;
            if seconds == 0 {
                return Err(ConfigError::invalid(NOTIFICATION_TIMEOUT_VAR, "must be greater than zero"));
            }
            settings = settings.notification_timeout(Duration::from_secs(seconds));
        }

        if let Some(raw) = env.get_var(NOTIFICATION_FAIL_SILENTLY_VAR) {
            settings = settings.fail_silently(parse_bool(NOTIFICATION_FAIL_SILENTLY_VAR, &raw)?);
        }

        Ok(settings)
    }
}

fn parse_bool(setting_name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::invalid(setting_name, format!("'{}' is not a boolean", other))),
    }
}
