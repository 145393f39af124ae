pub use sea_orm_migration::prelude::*;

mod m20260701_090000_users;
mod m20260701_091000_transactions;
mod m20260701_092000_budgets;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260701_090000_users::Migration),
            Box::new(m20260701_091000_transactions::Migration),
            Box::new(m20260701_092000_budgets::Migration),
        ]
    }
}
