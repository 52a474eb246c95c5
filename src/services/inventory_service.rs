// src/services/inventory_service.rs

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InventoryRepository, ProductRepository},
    models::auth::User,
    models::inventory::{
        AddStockPayload, InventoryLevel, MovementDetail, MovementType, TransferStockPayload,
        UpdateStockPayload, Warehouse,
    },
};

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
    product_repo: ProductRepository,
    pool: SqlitePool,
}

impl InventoryService {
    pub fn new(
        inventory_repo: InventoryRepository,
        product_repo: ProductRepository,
        pool: SqlitePool,
    ) -> Self {
        Self { inventory_repo, product_repo, pool }
    }

    pub async fn list_warehouses(&self) -> Result<Vec<Warehouse>, AppError> {
        self.inventory_repo.list_warehouses().await
    }

    pub async fn list_movements(
        &self,
        product_id: Option<&str>,
    ) -> Result<Vec<MovementDetail>, AppError> {
        self.inventory_repo.list_movements(product_id).await
    }

    // Entrada de mercancía: suma al saldo de la bodega y deja el
    // movimiento 'add' en el histórico, las dos cosas en una transacción.
    pub async fn add_stock(
        &self,
        payload: &AddStockPayload,
        performed_by: &User,
    ) -> Result<InventoryLevel, AppError> {
        // 1. El producto tiene que existir
        self.product_repo
            .find_by_id(&payload.product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let now = Utc::now();

        // --- INICIO DE LA TRANSACCIÓN ---
        let mut tx = self.pool.begin().await?;

        // 2. Sumar al saldo
        self.inventory_repo
            .upsert_add(
                &mut *tx,
                &Uuid::new_v4().to_string(),
                &payload.product_id,
                &payload.warehouse_id,
                payload.quantity,
                now,
            )
            .await?;

        // 3. Dejar el rastro
        self.inventory_repo
            .insert_movement(
                &mut *tx,
                &Uuid::new_v4().to_string(),
                &payload.product_id,
                MovementType::Add,
                payload.quantity,
                None,
                Some(payload.warehouse_id.as_str()),
                payload.notes.as_deref(),
                Some(performed_by.id.as_str()),
                now,
            )
            .await?;

        // 4. Leer el saldo resultante antes de cerrar
        let level = self.inventory_repo
            .find_level(&mut *tx, &payload.product_id, &payload.warehouse_id)
            .await?
            .ok_or_else(|| {
                AppError::InternalServerError(anyhow::anyhow!("El saldo recién escrito no apareció"))
            })?;

        tx.commit().await?;
        // --- FIN DE LA TRANSACCIÓN ---

        Ok(level)
    }

    // Ajuste manual. La cantidad del payload es el valor final que queda
    // en la bodega, y el movimiento registra ese valor absoluto, no la
    // diferencia contra lo que había.
    pub async fn update_stock(
        &self,
        payload: &UpdateStockPayload,
        performed_by: &User,
    ) -> Result<InventoryLevel, AppError> {
        // 1. El producto tiene que existir
        self.product_repo
            .find_by_id(&payload.product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // 2. Dejar el saldo en el valor pedido
        self.inventory_repo
            .upsert_absolute(
                &mut *tx,
                &Uuid::new_v4().to_string(),
                &payload.product_id,
                &payload.warehouse_id,
                payload.quantity,
                now,
            )
            .await?;

        // 3. Movimiento 'update' con el valor final
        self.inventory_repo
            .insert_movement(
                &mut *tx,
                &Uuid::new_v4().to_string(),
                &payload.product_id,
                MovementType::Update,
                payload.quantity,
                None,
                Some(payload.warehouse_id.as_str()),
                payload.notes.as_deref(),
                Some(performed_by.id.as_str()),
                now,
            )
            .await?;

        let level = self.inventory_repo
            .find_level(&mut *tx, &payload.product_id, &payload.warehouse_id)
            .await?
            .ok_or_else(|| {
                AppError::InternalServerError(anyhow::anyhow!("El saldo recién escrito no apareció"))
            })?;

        tx.commit().await?;

        Ok(level)
    }

    // Traslado entre bodegas. El descuento condicionado y la suma van en
    // la misma transacción: o pasan las dos cosas o no pasa ninguna,
    // incluso con llamadas concurrentes sobre el mismo saldo.
    pub async fn transfer_stock(
        &self,
        payload: &TransferStockPayload,
        performed_by: &User,
    ) -> Result<(), AppError> {
        // 1. Origen y destino tienen que ser bodegas distintas
        if payload.source_warehouse_id == payload.destination_warehouse_id {
            return Err(AppError::SameWarehouseTransfer);
        }

        // 2. Producto y bodegas tienen que existir
        self.product_repo
            .find_by_id(&payload.product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;
        self.inventory_repo
            .find_warehouse(&payload.source_warehouse_id)
            .await?
            .ok_or(AppError::WarehouseNotFound)?;
        self.inventory_repo
            .find_warehouse(&payload.destination_warehouse_id)
            .await?
            .ok_or(AppError::WarehouseNotFound)?;

        let now = Utc::now();

        // --- INICIO DE LA TRANSACCIÓN ---
        let mut tx = self.pool.begin().await?;

        // 3. Descontar del origen solo si el saldo alcanza
        let decremented = self.inventory_repo
            .try_decrement(
                &mut *tx,
                &payload.product_id,
                &payload.source_warehouse_id,
                payload.quantity,
                now,
            )
            .await?;

        if !decremented {
            // Averiguar cuánto había para poder reportarlo. El rollback
            // es automático al soltar la transacción.
            let available = self.inventory_repo
                .current_quantity(&mut *tx, &payload.product_id, &payload.source_warehouse_id)
                .await?;
            return Err(AppError::InsufficientStock {
                available,
                requested: payload.quantity,
            });
        }

        // 4. Sumar en el destino
        self.inventory_repo
            .upsert_add(
                &mut *tx,
                &Uuid::new_v4().to_string(),
                &payload.product_id,
                &payload.destination_warehouse_id,
                payload.quantity,
                now,
            )
            .await?;

        // 5. Un solo movimiento 'transfer' con origen y destino
        self.inventory_repo
            .insert_movement(
                &mut *tx,
                &Uuid::new_v4().to_string(),
                &payload.product_id,
                MovementType::Transfer,
                payload.quantity,
                Some(payload.source_warehouse_id.as_str()),
                Some(payload.destination_warehouse_id.as_str()),
                payload.notes.as_deref(),
                Some(performed_by.id.as_str()),
                now,
            )
            .await?;

        tx.commit().await?;
        // --- FIN DE LA TRANSACCIÓN ---

        tracing::info!(
            "📦 Traslado de {} unidades del producto {} completado",
            payload.quantity,
            payload.product_id
        );
        Ok(())
    }
}
