// Stores layer - Data access for accounts and id sequences
pub mod sequence_store;
pub mod user_store;

pub use sequence_store::SequenceStore;
pub use user_store::UserStore;
