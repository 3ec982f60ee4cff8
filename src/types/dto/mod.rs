// Data transfer objects - shapes printed or returned to callers
pub mod account;

pub use account::AccountSummary;
