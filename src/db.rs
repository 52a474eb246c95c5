pub mod user_repo;
pub use user_repo::UserRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod order_repo;
pub mod billing_repo;
pub mod delivery_repo;
pub use delivery_repo::DeliveryRepository;

pub use billing_repo::BillingRepository;

pub use order_repo::OrderRepository;

/// Aplica las migraciones embebidas (carpeta `migrations/`).
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!().run(pool).await?;
    Ok(())
}
