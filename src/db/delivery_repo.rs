// src/db/delivery_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::common::error::AppError;
use crate::models::deliveries::DeliveryDetail;
use crate::models::orders::OrderStatus;

// Repositorio de entregas. Hay a lo sumo una entrega por pedido
// (UNIQUE sobre order_id) y la fila nace cuando se asigna domiciliario.
#[derive(Clone)]
pub struct DeliveryRepository {
    pool: SqlitePool,
}

impl DeliveryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Crea o reasigna la entrega del pedido. Si ya existía se conserva
    // assigned_at original solo cuando el domiciliario no cambió; una
    // reasignación vuelve a marcar la hora.
    pub async fn upsert_for_order<'e, E>(
        &self,
        executor: E,
        id: &str,
        order_id: &str,
        delivery_person_id: &str,
        status: OrderStatus,
        estimated_delivery: Option<DateTime<Utc>>,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO deliveries (
                id, order_id, delivery_person_id, status,
                assigned_at, estimated_delivery, notes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (order_id) DO UPDATE SET
                delivery_person_id = excluded.delivery_person_id,
                status = excluded.status,
                assigned_at = CASE
                    WHEN deliveries.delivery_person_id = excluded.delivery_person_id
                    THEN deliveries.assigned_at
                    ELSE excluded.assigned_at
                END,
                estimated_delivery = COALESCE(excluded.estimated_delivery, deliveries.estimated_delivery),
                notes = COALESCE(excluded.notes, deliveries.notes)
            "#,
        )
        .bind(id)
        .bind(order_id)
        .bind(delivery_person_id)
        .bind(status)
        .bind(now)
        .bind(estimated_delivery)
        .bind(notes)
        .bind(now)
        .execute(executor)
        .await?;
        Ok(())
    }

    // Refleja en la entrega el estado nuevo del pedido. Si el pedido no
    // tiene entrega asignada no pasa nada. Al llegar a 'entregado' se
    // estampa la hora real de entrega (y no se vuelve a tocar después).
    pub async fn sync_status<'e, E>(
        &self,
        executor: E,
        order_id: &str,
        status: OrderStatus,
        delivered_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            UPDATE deliveries
            SET status = $2,
                actual_delivery = COALESCE(actual_delivery, $3)
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .bind(status)
        .bind(delivered_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    // Todas las entregas con lo que necesita la pantalla de reparto:
    // quién la lleva, de quién es el pedido y a dónde va.
    pub async fn list_details(&self) -> Result<Vec<DeliveryDetail>, AppError> {
        let deliveries = sqlx::query_as::<_, DeliveryDetail>(
            r#"
            SELECT
                d.id, d.order_id, d.delivery_person_id,
                r.name AS delivery_person_name,
                c.name AS customer_name, o.shipping_address,
                d.status, d.assigned_at, d.estimated_delivery,
                d.actual_delivery, d.notes, d.created_at
            FROM deliveries d
            JOIN orders o ON o.id = d.order_id
            JOIN users c ON c.id = o.customer_id
            JOIN users r ON r.id = d.delivery_person_id
            ORDER BY d.assigned_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(deliveries)
    }
}
