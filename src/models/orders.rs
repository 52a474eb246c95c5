// src/models/orders.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Estados del ciclo de vida de un pedido. Se comparten con las entregas:
// una entrega refleja el estado del pedido que la originó.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pendiente,
    #[sqlx(rename = "en proceso")]
    #[serde(rename = "en proceso")]
    EnProceso,
    Enviado,
    Entregado,
    Cancelado,
}

// Cabecera de un pedido. El total lo manda el caller y se guarda tal
// cual, sin recalcularlo a partir de las líneas.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub total_cents: i64,
    pub notes: Option<String>,
    pub delivery_person_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Una línea del pedido
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

// Línea con el nombre del producto resuelto
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetail {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

// Cabecera con el nombre del cliente, tal como sale del JOIN
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithCustomer {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub total_cents: i64,
    pub notes: Option<String>,
    pub delivery_person_id: Option<String>,
    pub delivery_person_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// El pedido completo que consume el front: cabecera + líneas
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: OrderWithCustomer,
    pub items: Vec<OrderItemDetail>,
}

// --- Payloads ---

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemPayload {
    pub product_id: String,
    #[validate(range(min = 1, message = "La cantidad debe ser mayor a cero."))]
    #[schema(example = 3)]
    pub quantity: i64,
    #[validate(range(min = 0, message = "El precio no puede ser negativo."))]
    pub unit_price_cents: i64,
}

// Datos para crear un pedido. El total viene calculado por el caller y
// se guarda tal cual llega.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub customer_id: String,
    #[validate(length(min = 1, message = "La dirección de envío es obligatoria."))]
    pub shipping_address: String,
    #[validate(range(min = 0, message = "El total no puede ser negativo."))]
    pub total_cents: i64,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "El pedido debe tener al menos un producto."), nested)]
    pub items: Vec<CreateOrderItemPayload>,
}

// Cambio de estado. Si viene `delivery_person_id` se asigna (o reasigna)
// el domiciliario y se crea la entrega correspondiente.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusPayload {
    pub status: OrderStatus,
    pub delivery_person_id: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}
