// src/config.rs

use std::{env, str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    SqlitePool,
};

use crate::{
    db::{
        BillingRepository, DeliveryRepository, InventoryRepository, OrderRepository,
        ProductRepository, UserRepository,
    },
    services::{
        AuthService, BillingService, DeliveryService, InventoryService, OrderService,
        ProductService, UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub product_service: ProductService,
    pub inventory_service: InventoryService,
    pub order_service: OrderService,
    pub billing_service: BillingService,
    pub delivery_service: DeliveryService,
}

impl AppState {
    // La firma devuelve Result: un arranque sin base de datos se
    // reporta, no se esconde.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL debe estar definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET debe estar definido");

        // SQLite en modo WAL, con claves foráneas activas en cada
        // conexión (SQLite las trae apagadas por defecto).
        let options = SqliteConnectOptions::from_str(&database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        let db_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        tracing::info!("✅ Conexión con la base de datos establecida correctamente!");

        Ok(Self::with_pool(db_pool, jwt_secret))
    }

    // El armado del grafo de dependencias va aparte para que los tests
    // puedan inyectar su propio pool en memoria.
    pub fn with_pool(db_pool: SqlitePool, jwt_secret: String) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let billing_repo = BillingRepository::new(db_pool.clone());
        let delivery_repo = DeliveryRepository::new(db_pool.clone());

        let auth_service =
            AuthService::new(user_repo.clone(), jwt_secret.clone(), db_pool.clone());
        let user_service = UserService::new(user_repo.clone());
        let product_service =
            ProductService::new(product_repo.clone(), inventory_repo.clone(), db_pool.clone());
        let inventory_service =
            InventoryService::new(inventory_repo, product_repo, db_pool.clone());
        let order_service = OrderService::new(
            order_repo.clone(),
            user_repo,
            delivery_repo.clone(),
            db_pool.clone(),
        );
        let billing_service = BillingService::new(billing_repo, order_repo, db_pool.clone());
        let delivery_service = DeliveryService::new(delivery_repo);

        Self {
            db_pool,
            jwt_secret,
            auth_service,
            user_service,
            product_service,
            inventory_service,
            order_service,
            billing_service,
            delivery_service,
        }
    }
}
