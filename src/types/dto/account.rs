use serde::Serialize;

use crate::types::internal::{AccountId, UserAccount};

/// Public view of an account, printed by the CLI
///
/// Never carries credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub id: Option<AccountId>,
    pub name: String,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl From<&UserAccount> for AccountSummary {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            username: account.username.clone(),
            is_active: account.is_active,
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}
