// src/models/deliveries.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::orders::OrderStatus;

// Una entrega asignada a un domiciliario. Se crea al momento de asignar
// el domiciliario al pedido y su estado sigue al del pedido.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: String,
    pub order_id: String,
    pub delivery_person_id: String,
    pub status: OrderStatus,
    pub assigned_at: DateTime<Utc>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub actual_delivery: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Entrega con los datos que necesita la pantalla de reparto: quién la
// lleva, para quién es y a dónde va.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetail {
    pub id: String,
    pub order_id: String,
    pub delivery_person_id: String,
    pub delivery_person_name: String,
    pub customer_name: String,
    pub shipping_address: String,
    pub status: OrderStatus,
    pub assigned_at: DateTime<Utc>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub actual_delivery: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
