// src/models/billing.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pendiente,
    Pagada,
    Vencida,
    Cancelada,
}

// Factura emitida sobre un pedido. `total_cents` ya incluye el IVA;
// `tax_cents` guarda solo el impuesto.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub order_id: String,
    pub customer_id: String,
    pub invoice_number: String,
    pub status: InvoiceStatus,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Datos para emitir la factura de un pedido. Los montos, el número y
// las fechas se calculan en el servidor.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    #[validate(length(min = 1, message = "El pedido es obligatorio."))]
    pub order_id: String,
}

// Factura con el nombre del cliente y el total del pedido de origen
// (sin impuesto) ya resueltos
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    pub id: String,
    pub order_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub invoice_number: String,
    pub status: InvoiceStatus,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub order_total_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
