// src/models/inventory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// --- 1. Bodegas ---
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WarehouseType {
    Main,
    Secondary,
}

// Una bodega física. Las cuatro sedes se cargan por migración y no hay
// endpoints para crearlas ni borrarlas.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: String,
    pub name: String,
    pub location: String,
    pub capacity: i64,
    pub warehouse_type: WarehouseType,
    pub status: String,
}

// --- 2. Nivel de Existencia ---
// Esta struct liga un producto a una bodega con su cantidad actual.
// Representa la tabla 'inventory_levels'.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLevel {
    pub id: String,
    pub product_id: String,
    pub warehouse_id: String,
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

// --- 3. Movimientos de Inventario ---

// Tipo de movimiento:
// - add: entrada de mercancía a una bodega
// - update: ajuste manual (la cantidad registrada es el valor final)
// - transfer: traslado entre bodegas
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(rename_all = "lowercase")] // Banco
#[serde(rename_all = "lowercase")] // JSON
pub enum MovementType {
    Add,
    Update,
    Transfer,
}

// --- MOVIMIENTO (Histórico) ---
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMovement {
    pub id: String,
    pub product_id: String,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub source_warehouse_id: Option<String>,
    pub destination_warehouse_id: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- Payloads de las operaciones de stock ---

// Entrada de mercancía: suma `quantity` al saldo de la bodega.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStockPayload {
    pub product_id: String,
    pub warehouse_id: String,
    #[validate(range(min = 1, message = "La cantidad debe ser mayor a cero."))]
    pub quantity: i64,
    pub notes: Option<String>,
}

// Ajuste manual: `quantity` es el valor final que queda en la bodega,
// no un delta.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockPayload {
    pub product_id: String,
    pub warehouse_id: String,
    #[validate(range(min = 0, message = "La cantidad no puede ser negativa."))]
    pub quantity: i64,
    pub notes: Option<String>,
}

// Traslado entre bodegas. Falla si el origen no alcanza a cubrir la
// cantidad pedida.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferStockPayload {
    pub product_id: String,
    pub source_warehouse_id: String,
    pub destination_warehouse_id: String,
    #[validate(range(min = 1, message = "La cantidad debe ser mayor a cero."))]
    pub quantity: i64,
    pub notes: Option<String>,
}

// Movimiento con los nombres ya resueltos, listo para mostrar en el
// historial sin consultas adicionales.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementDetail {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub source_warehouse_id: Option<String>,
    pub source_warehouse_name: Option<String>,
    pub destination_warehouse_id: Option<String>,
    pub destination_warehouse_name: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}
