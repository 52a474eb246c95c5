// src/db/billing_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::common::error::AppError;
use crate::models::billing::{Invoice, InvoiceDetail};

// Repositorio de facturas
#[derive(Clone)]
pub struct BillingRepository {
    pool: SqlitePool,
}

impl BillingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>, AppError> {
        let maybe_invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_invoice)
    }

    // Emite la factura de un pedido. La tabla tiene UNIQUE sobre
    // order_id, así que el segundo intento para el mismo pedido se
    // reporta como conflicto.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        id: &str,
        order_id: &str,
        customer_id: &str,
        invoice_number: &str,
        issue_date: NaiveDate,
        due_date: NaiveDate,
        tax_cents: i64,
        total_cents: i64,
        now: DateTime<Utc>,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                id, order_id, customer_id, invoice_number, status,
                issue_date, due_date, tax_cents, total_cents,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, 'pendiente', $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(order_id)
        .bind(customer_id)
        .bind(invoice_number)
        .bind(issue_date)
        .bind(due_date)
        .bind(tax_cents)
        .bind(total_cents)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::InvoiceAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(invoice)
    }

    // Facturas con el nombre del cliente, las más recientes primero
    pub async fn list_with_customer(
        &self,
        customer_id: Option<&str>,
    ) -> Result<Vec<InvoiceDetail>, AppError> {
        let invoices = sqlx::query_as::<_, InvoiceDetail>(
            r#"
            SELECT
                i.id, i.order_id, i.customer_id, u.name AS customer_name,
                i.invoice_number, i.status, i.issue_date, i.due_date,
                o.total_cents AS order_total_cents,
                i.tax_cents, i.total_cents, i.created_at, i.updated_at
            FROM invoices i
            JOIN users u ON u.id = i.customer_id
            JOIN orders o ON o.id = i.order_id
            WHERE ($1 IS NULL OR i.customer_id = $1)
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(invoices)
    }

    // Marca la factura como pagada SOLO si está en un estado pagable
    // (pendiente o vencida). Devuelve None si la condición no aplicó;
    // el servicio averigua entonces en qué estado quedó.
    pub async fn try_mark_paid<'e, E>(
        &self,
        executor: E,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe_invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET status = 'pagada', updated_at = $2
            WHERE id = $1 AND status IN ('pendiente', 'vencida')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(now)
        .fetch_optional(executor)
        .await?;
        Ok(maybe_invoice)
    }

    pub async fn find_by_id_in<'e, E>(
        &self,
        executor: E,
        id: &str,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe_invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(maybe_invoice)
    }
}
