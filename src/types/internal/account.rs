use std::fmt;

use crate::errors::internal::AccountError;
use crate::types::db::user;
use crate::types::internal::AccountId;

/// Optional flag overrides passed at account creation
///
/// `None` means the caller did not pass the flag, so the default applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtraFields {
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl ExtraFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(mut self, value: bool) -> Self {
        self.is_active = Some(value);
        self
    }

    pub fn staff(mut self, value: bool) -> Self {
        self.is_staff = Some(value);
        self
    }

    pub fn superuser(mut self, value: bool) -> Self {
        self.is_superuser = Some(value);
        self
    }
}

/// A user account, persisted or not
///
/// `id` stays `None` until the first save assigns one.
#[derive(Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: Option<AccountId>,
    pub name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl UserAccount {
    /// Build an unsaved account with an empty credential
    pub fn new(email: String, username: String, name: String, extra: ExtraFields) -> Self {
        Self {
            id: None,
            name,
            email,
            username,
            password_hash: String::new(),
            is_active: extra.is_active.unwrap_or(true),
            is_staff: extra.is_staff.unwrap_or(false),
            is_superuser: extra.is_superuser.unwrap_or(false),
            created_at: None,
            updated_at: None,
        }
    }
}

impl TryFrom<user::Model> for UserAccount {
    type Error = AccountError;

    fn try_from(model: user::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Some(model.id.parse()?),
            name: model.name,
            email: model.email,
            username: model.username,
            password_hash: model.password_hash,
            is_active: model.is_active,
            is_staff: model.is_staff,
            is_superuser: model.is_superuser,
            created_at: Some(model.created_at),
            updated_at: Some(model.updated_at),
        })
    }
}

impl fmt::Display for UserAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

impl fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("is_active", &self.is_active)
            .field("is_staff", &self.is_staff)
            .field("is_superuser", &self.is_superuser)
            .finish()
    }
}
