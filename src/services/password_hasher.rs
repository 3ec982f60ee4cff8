use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier,
    Version,
};
use rand::{distr::Alphanumeric, Rng};

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::internal::UserAccount;

/// Marks a hash that can never verify
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';
const UNUSABLE_PASSWORD_SUFFIX_LENGTH: usize = 40;

/// Hashes account passwords with Argon2id keyed by the password pepper
pub struct PasswordHasherService {
    password_pepper: String,
}

impl PasswordHasherService {
    /// # Arguments
    /// * `password_pepper` - Secret key mixed into every hash (from SecretManager)
    pub fn new(password_pepper: String) -> Self {
        Self { password_pepper }
    }

    fn argon2(&self) -> Result<Argon2<'_>, CredentialError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| CredentialError::PasswordHashingFailed(format!("Failed to initialize Argon2 with secret: {}", e)))
    }

    /// Hash a plaintext password into a PHC string
    pub fn hash_password(&self, plaintext: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);

        let password_hash = self
            .argon2()?
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()))?
            .to_string();

        Ok(password_hash)
    }

    /// Replace the account's credential
    ///
    /// `None` leaves the account without a usable password.
    pub fn set_password(&self, account: &mut UserAccount, plaintext: Option<&str>) -> Result<(), InternalError> {
        match plaintext {
            Some(plaintext) => account.password_hash = self.hash_password(plaintext)?,
            None => self.set_unusable_password(account),
        }
        Ok(())
    }

    /// Store a random marker that no password verifies against
    pub fn set_unusable_password(&self, account: &mut UserAccount) {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(UNUSABLE_PASSWORD_SUFFIX_LENGTH)
            .map(char::from)
            .collect();
        account.password_hash = format!("{}{}", UNUSABLE_PASSWORD_PREFIX, suffix);
    }

    pub fn has_usable_password(account: &UserAccount) -> bool {
        !account.password_hash.is_empty() && !account.password_hash.starts_with(UNUSABLE_PASSWORD_PREFIX)
    }

    /// Check a plaintext password against the account's stored hash
    pub fn check_password(&self, account: &UserAccount, plaintext: &str) -> bool {
        if !Self::has_usable_password(account) {
            return false;
        }

        let Ok(parsed_hash) = PasswordHash::new(&account.password_hash) else {
            return false;
        };
        let Ok(argon2) = self.argon2() else {
            return false;
        };

        argon2.verify_password(plaintext.as_bytes(), &parsed_hash).is_ok()
    }
}

impl std::fmt::Debug for PasswordHasherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasherService")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
