use std::fmt;

use crate::config::{ConfigError, EnvironmentProvider, SecretConfig, SecretType};

pub const PASSWORD_PEPPER_VAR: &str = "PASSWORD_PEPPER";
const PASSWORD_PEPPER_MIN_LENGTH: usize = 16;

/// Holds secrets needed by the account subsystem
pub struct SecretManager {
    password_pepper: String,
}

impl SecretManager {
    /// Load and validate all secrets from the given environment
    ///
    /// # Errors
    /// Returns `ConfigError` if a required secret is missing or too short
    pub fn init(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let password_pepper = Self::load_secret(env, &Self::pepper_config())?;
        Ok(Self { password_pepper })
    }

    /// Build from an already known pepper, applying the same validation
    pub fn with_pepper(password_pepper: impl Into<String>) -> Result<Self, ConfigError> {
        let password_pepper = password_pepper.into();
        if password_pepper.len() < PASSWORD_PEPPER_MIN_LENGTH {
            return Err(ConfigError::invalid_length(
                PASSWORD_PEPPER_VAR,
                PASSWORD_PEPPER_MIN_LENGTH,
                password_pepper.len(),
            ));
        }
        Ok(Self { password_pepper })
    }

    fn pepper_config() -> SecretConfig {
        SecretConfig::new(SecretType::EnvVar {
            name: PASSWORD_PEPPER_VAR.to_string(),
        })
        .required(true)
        .min_length(PASSWORD_PEPPER_MIN_LENGTH)
    }

    /// Secret key mixed into password hashes
    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub(crate) fn load_secret(env: &dyn EnvironmentProvider, config: &SecretConfig) -> Result<String, ConfigError> {
        let name = config.secret_type.name();
        let value = match env.get_var(name) {
            Some(v) => v,
            None if !config.required => return Ok(String::new()),
            None => return Err(ConfigError::missing(name)),
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(ConfigError::invalid_length(name, min_len, value.len()));
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
