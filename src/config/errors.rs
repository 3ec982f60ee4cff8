use std::fmt;

/// Failure while loading settings or secrets
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing { setting_name: String },
    InvalidLength { setting_name: String, expected: usize, actual: usize },
    Invalid { setting_name: String, reason: String },
}

impl ConfigError {
    pub fn missing(setting_name: &str) -> Self {
        Self::Missing { setting_name: setting_name.to_string() }
    }

    pub fn invalid_length(setting_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength { setting_name: setting_name.to_string(), expected, actual }
    }

    pub fn invalid(setting_name: &str, reason: impl Into<String>) -> Self {
        Self::Invalid { setting_name: setting_name.to_string(), reason: reason.into() }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { setting_name } => {
                write!(f, "Required setting '{}' is missing", setting_name)
            }
            Self::InvalidLength { setting_name, expected, actual } => {
                write!(
                    f,
                    "Setting '{}' must be at least {} characters, got {}",
                    setting_name, expected, actual
                )
            }
            Self::Invalid { setting_name, reason } => {
                write!(f, "Invalid setting '{}': {}", setting_name, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
