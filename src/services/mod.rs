// Services layer - Business logic and orchestration
pub mod account_service;
pub mod mailer;
pub mod notifier;
pub mod password_hasher;

pub use account_service::AccountService;
pub use mailer::{Mailer, MemoryMailer, OutgoingMail, TracingMailer};
pub use notifier::AccountNotifier;
pub use password_hasher::PasswordHasherService;
