use crate::types::internal::{AccountId, UserAccount};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountEventKind {
    Registered,
    Updated,
}

/// Emitted by a successful save, consumed by the notifier after commit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountEvent {
    pub kind: AccountEventKind,
    pub account_id: AccountId,
    pub name: String,
    pub username: String,
    pub email: String,
}

impl AccountEvent {
    pub fn new(kind: AccountEventKind, account_id: AccountId, account: &UserAccount) -> Self {
        Self {
            kind,
            account_id,
            name: account.name.clone(),
            username: account.username.clone(),
            email: account.email.clone(),
        }
    }
}
