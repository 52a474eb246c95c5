// src/db/order_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::common::error::AppError;
use crate::models::orders::{Order, OrderItemDetail, OrderStatus, OrderWithCustomer};

// Repositorio de pedidos y sus líneas
#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Order>, AppError> {
        let maybe_order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_order)
    }

    // Inserta la cabecera del pedido. Siempre nace 'pendiente' y sin
    // domiciliario asignado.
    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        id: &str,
        customer_id: &str,
        shipping_address: &str,
        total_cents: i64,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (id, customer_id, status, shipping_address, total_cents, notes, created_at, updated_at)
            VALUES ($1, $2, 'pendiente', $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .bind(shipping_address)
        .bind(total_cents)
        .bind(notes)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        id: &str,
        order_id: &str,
        product_id: &str,
        quantity: i64,
        unit_price_cents: i64,
        subtotal_cents: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO order_items (id, order_id, product_id, quantity, unit_price_cents, subtotal_cents)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price_cents)
        .bind(subtotal_cents)
        .execute(executor)
        .await
        .map_err(|e| {
            // La cabecera ya se insertó en esta misma transacción, así
            // que la única clave foránea que puede fallar es la del
            // producto.
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return AppError::ProductNotFound;
                }
            }
            AppError::from(e)
        })?;
        Ok(())
    }

    // Líneas de un pedido puntual, con el nombre del producto
    pub async fn items_for_order(&self, order_id: &str) -> Result<Vec<OrderItemDetail>, AppError> {
        let items = sqlx::query_as::<_, OrderItemDetail>(
            r#"
            SELECT
                oi.id, oi.order_id, oi.product_id, p.name AS product_name,
                oi.quantity, oi.unit_price_cents, oi.subtotal_cents
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    // Cabeceras con nombres de cliente y domiciliario resueltos. Si se
    // pasa `customer_id` devuelve solo los pedidos de ese cliente.
    pub async fn list_with_customer(
        &self,
        customer_id: Option<&str>,
    ) -> Result<Vec<OrderWithCustomer>, AppError> {
        let orders = sqlx::query_as::<_, OrderWithCustomer>(
            r#"
            SELECT
                o.id, o.customer_id, c.name AS customer_name,
                o.status, o.shipping_address, o.total_cents, o.notes,
                o.delivery_person_id, d.name AS delivery_person_name,
                o.created_at, o.updated_at
            FROM orders o
            JOIN users c ON c.id = o.customer_id
            LEFT JOIN users d ON d.id = o.delivery_person_id
            WHERE ($1 IS NULL OR o.customer_id = $1)
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    // Todas las líneas que acompañan a `list_with_customer`, en un solo
    // query; el servicio las agrupa por pedido.
    pub async fn list_items_with_product(
        &self,
        customer_id: Option<&str>,
    ) -> Result<Vec<OrderItemDetail>, AppError> {
        let items = sqlx::query_as::<_, OrderItemDetail>(
            r#"
            SELECT
                oi.id, oi.order_id, oi.product_id, p.name AS product_name,
                oi.quantity, oi.unit_price_cents, oi.subtotal_cents
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            JOIN orders o ON o.id = oi.order_id
            WHERE ($1 IS NULL OR o.customer_id = $1)
            ORDER BY oi.order_id
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    // Cambia el estado y, si viene, asigna el domiciliario. Mantiene la
    // asignación anterior cuando `delivery_person_id` llega como None.
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: &str,
        status: OrderStatus,
        delivery_person_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe_order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET status = $2,
                delivery_person_id = COALESCE($3, delivery_person_id),
                updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(delivery_person_id)
        .bind(now)
        .fetch_optional(executor)
        .await?;
        Ok(maybe_order)
    }
}
