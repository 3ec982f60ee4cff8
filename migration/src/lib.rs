pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_accounts_schema;

pub use m20250301_000001_create_accounts_schema::ACCOUNT_SEQUENCE;

pub struct AccountMigrator;

#[async_trait::async_trait]
impl MigratorTrait for AccountMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_accounts_schema::Migration),
        ]
    }
}
