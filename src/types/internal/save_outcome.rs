use super::account_event::AccountEvent;

/// Result of a persistence call together with the event it produced
pub struct SaveOutcome<T> {
    pub value: T,
    pub event: AccountEvent,
}

impl<T> SaveOutcome<T> {
    pub fn new(value: T, event: AccountEvent) -> Self {
        Self { value, event }
    }
}
