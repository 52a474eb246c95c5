// src/db/inventory_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::common::error::AppError;
use crate::models::inventory::{InventoryLevel, MovementDetail, MovementType, Warehouse};

// Repositorio de bodegas, saldos y movimientos.
// Las operaciones de escritura reciben el executor para poder correr
// dentro de la transacción que arma el servicio.
#[derive(Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Bodegas
    // ---

    pub async fn list_warehouses(&self) -> Result<Vec<Warehouse>, AppError> {
        let warehouses =
            sqlx::query_as::<_, Warehouse>("SELECT * FROM warehouses ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(warehouses)
    }

    pub async fn find_warehouse(&self, id: &str) -> Result<Option<Warehouse>, AppError> {
        let maybe_warehouse =
            sqlx::query_as::<_, Warehouse>("SELECT * FROM warehouses WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_warehouse)
    }

    // ---
    // Saldos por bodega
    // ---

    // Todos los saldos registrados. El servicio de productos los agrupa
    // por producto para armar el mapa bodega -> cantidad.
    pub async fn list_levels(&self) -> Result<Vec<InventoryLevel>, AppError> {
        let levels = sqlx::query_as::<_, InventoryLevel>("SELECT * FROM inventory_levels")
            .fetch_all(&self.pool)
            .await?;
        Ok(levels)
    }

    // Saldo puntual de un producto en una bodega. Acepta executor para
    // poder leer el resultado dentro de la misma transacción que lo
    // escribió.
    pub async fn find_level<'e, E>(
        &self,
        executor: E,
        product_id: &str,
        warehouse_id: &str,
    ) -> Result<Option<InventoryLevel>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe_level = sqlx::query_as::<_, InventoryLevel>(
            "SELECT * FROM inventory_levels WHERE product_id = $1 AND warehouse_id = $2",
        )
        .bind(product_id)
        .bind(warehouse_id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe_level)
    }

    pub async fn levels_for_product(
        &self,
        product_id: &str,
    ) -> Result<Vec<InventoryLevel>, AppError> {
        let levels = sqlx::query_as::<_, InventoryLevel>(
            "SELECT * FROM inventory_levels WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(levels)
    }

    // Suma `delta` al saldo de la bodega, creando la fila si no existe
    pub async fn upsert_add<'e, E>(
        &self,
        executor: E,
        id: &str,
        product_id: &str,
        warehouse_id: &str,
        delta: i64,
        now: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO inventory_levels (id, product_id, warehouse_id, quantity, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (product_id, warehouse_id)
            DO UPDATE SET quantity = quantity + excluded.quantity, updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(product_id)
        .bind(warehouse_id)
        .bind(delta)
        .bind(now)
        .execute(executor)
        .await
        .map_err(map_warehouse_fk)?;
        Ok(())
    }

    // Deja el saldo de la bodega en el valor absoluto `quantity`
    pub async fn upsert_absolute<'e, E>(
        &self,
        executor: E,
        id: &str,
        product_id: &str,
        warehouse_id: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO inventory_levels (id, product_id, warehouse_id, quantity, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (product_id, warehouse_id)
            DO UPDATE SET quantity = excluded.quantity, updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(product_id)
        .bind(warehouse_id)
        .bind(quantity)
        .bind(now)
        .execute(executor)
        .await
        .map_err(map_warehouse_fk)?;
        Ok(())
    }

    // Descuenta `quantity` del saldo SOLO si alcanza. Devuelve false si
    // no se cumplió la condición (saldo corto o sin fila) para que el
    // servicio averigüe cuánto había y arme el error.
    pub async fn try_decrement<'e, E>(
        &self,
        executor: E,
        product_id: &str,
        warehouse_id: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE inventory_levels
            SET quantity = quantity - $3, updated_at = $4
            WHERE product_id = $1 AND warehouse_id = $2 AND quantity >= $3
            "#,
        )
        .bind(product_id)
        .bind(warehouse_id)
        .bind(quantity)
        .bind(now)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // Saldo actual de un producto en una bodega (0 si no hay fila)
    pub async fn current_quantity<'e, E>(
        &self,
        executor: E,
        product_id: &str,
        warehouse_id: &str,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let quantity = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(
                (SELECT quantity FROM inventory_levels WHERE product_id = $1 AND warehouse_id = $2),
                0
            )
            "#,
        )
        .bind(product_id)
        .bind(warehouse_id)
        .fetch_one(executor)
        .await?;

        Ok(quantity)
    }

    // ---
    // Movimientos (histórico)
    // ---

    pub async fn insert_movement<'e, E>(
        &self,
        executor: E,
        id: &str,
        product_id: &str,
        movement_type: MovementType,
        quantity: i64,
        source_warehouse_id: Option<&str>,
        destination_warehouse_id: Option<&str>,
        notes: Option<&str>,
        created_by: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO inventory_movements (
                id, product_id, movement_type, quantity,
                source_warehouse_id, destination_warehouse_id,
                notes, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(id)
        .bind(product_id)
        .bind(movement_type)
        .bind(quantity)
        .bind(source_warehouse_id)
        .bind(destination_warehouse_id)
        .bind(notes)
        .bind(created_by)
        .bind(now)
        .execute(executor)
        .await
        .map_err(map_warehouse_fk)?;
        Ok(())
    }

    // Historial de movimientos, opcionalmente filtrado por producto, con
    // los nombres de producto y bodegas resueltos en el mismo query.
    pub async fn list_movements(
        &self,
        product_id: Option<&str>,
    ) -> Result<Vec<MovementDetail>, AppError> {
        let movements = sqlx::query_as::<_, MovementDetail>(
            r#"
            SELECT
                im.id, im.product_id, p.name AS product_name,
                im.movement_type, im.quantity,
                im.source_warehouse_id, sw.name AS source_warehouse_name,
                im.destination_warehouse_id, dw.name AS destination_warehouse_name,
                im.notes, im.created_by, im.created_at
            FROM inventory_movements im
            JOIN products p ON p.id = im.product_id
            LEFT JOIN warehouses sw ON sw.id = im.source_warehouse_id
            LEFT JOIN warehouses dw ON dw.id = im.destination_warehouse_id
            WHERE ($1 IS NULL OR im.product_id = $1)
            ORDER BY im.created_at DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }
}

// En estas tablas los productos se validan antes de escribir, así que una
// violación de clave foránea solo puede venir de una bodega inexistente.
fn map_warehouse_fk(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return AppError::WarehouseNotFound;
        }
    }
    AppError::from(e)
}
