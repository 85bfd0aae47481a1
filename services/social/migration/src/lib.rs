use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_relationships;
mod m20250301_000003_create_microposts;
mod m20250301_000004_add_feed_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_relationships::Migration),
            Box::new(m20250301_000003_create_microposts::Migration),
            Box::new(m20250301_000004_add_feed_indexes::Migration),
        ]
    }
}
