// Database entities - SeaORM models
pub mod id_sequence;
pub mod user;
