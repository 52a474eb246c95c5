// src/services/billing_service.rs

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BillingRepository, OrderRepository},
    models::billing::{CreateInvoicePayload, Invoice, InvoiceDetail, InvoiceStatus},
};

// IVA colombiano sobre licores de consumo
const TAX_RATE_PERCENT: i64 = 19;

#[derive(Clone)]
pub struct BillingService {
    billing_repo: BillingRepository,
    order_repo: OrderRepository,
    pool: SqlitePool,
}

impl BillingService {
    pub fn new(
        billing_repo: BillingRepository,
        order_repo: OrderRepository,
        pool: SqlitePool,
    ) -> Self {
        Self { billing_repo, order_repo, pool }
    }

    pub async fn list_invoices(
        &self,
        customer_id: Option<&str>,
    ) -> Result<Vec<InvoiceDetail>, AppError> {
        self.billing_repo.list_with_customer(customer_id).await
    }

    // Emite la factura de un pedido. El número sale del id del pedido,
    // vence a 30 días y el impuesto se calcula sobre el total del pedido
    // con división entera (se trunca el residuo).
    pub async fn create_invoice(
        &self,
        payload: &CreateInvoicePayload,
    ) -> Result<Invoice, AppError> {
        // 1. El pedido tiene que existir
        let order = self.order_repo
            .find_by_id(&payload.order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        // 2. Derivar número, fechas y montos
        let invoice_number = format!("INV-{}", &order.id[..8]);
        let issue_date = Utc::now().date_naive();
        let due_date = issue_date + chrono::Duration::days(30);
        let tax_cents = order.total_cents * TAX_RATE_PERCENT / 100;
        let total_cents = order.total_cents + tax_cents;

        // 3. Insertar; el UNIQUE de order_id frena la doble facturación
        let invoice = self.billing_repo
            .insert(
                &self.pool,
                &Uuid::new_v4().to_string(),
                &order.id,
                &order.customer_id,
                &invoice_number,
                issue_date,
                due_date,
                tax_cents,
                total_cents,
                Utc::now(),
            )
            .await?;

        tracing::info!("🧾 Factura {} emitida para el pedido {}", invoice.invoice_number, order.id);
        Ok(invoice)
    }

    // Registra el pago. Solo se pagan facturas pendientes o vencidas; el
    // cambio queda persistido, no es un estado de pantalla.
    pub async fn pay_invoice(&self, id: &str) -> Result<Invoice, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // 1. Intento directo sobre los estados pagables
        if let Some(paid) = self.billing_repo.try_mark_paid(&mut *tx, id, now).await? {
            tx.commit().await?;
            return Ok(paid);
        }

        // 2. No aplicó: averiguar si no existe o en qué estado está
        let invoice = self.billing_repo
            .find_by_id_in(&mut *tx, id)
            .await?
            .ok_or(AppError::InvoiceNotFound)?;

        match invoice.status {
            InvoiceStatus::Pagada => Err(AppError::InvoiceAlreadyPaid),
            _ => Err(AppError::InvoiceNotPayable),
        }
    }
}
