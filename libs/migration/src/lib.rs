pub use sea_orm_migration::prelude::*;

mod m20250105_000001_create_catalog;
mod m20250105_000002_create_identity;
mod m20250105_000003_seed_roles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250105_000001_create_catalog::Migration),
            Box::new(m20250105_000002_create_identity::Migration),
            Box::new(m20250105_000003_seed_roles::Migration),
        ]
    }
}
