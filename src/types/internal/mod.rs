pub mod account;
pub mod account_event;
pub mod account_id;
pub mod save_outcome;

pub use account::{ExtraFields, UserAccount};
pub use account_event::{AccountEvent, AccountEventKind};
pub use account_id::AccountId;
pub use save_outcome::SaveOutcome;
