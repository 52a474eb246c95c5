// src/models/products.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Activo,
    Inactivo,
}

// Un producto del catálogo. Los precios se manejan en centavos (enteros)
// para no arrastrar errores de redondeo.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub category: String,
    pub brand: String,
    pub price_cents: i64,
    pub cost_cents: i64,
    pub min_stock: i64,
    pub box_qty: i64,
    pub unit: String,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Producto con su existencia por bodega (id de bodega -> cantidad).
// Solo aparecen las bodegas donde el producto tiene registro.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithStock {
    #[serde(flatten)]
    pub product: Product,
    pub stock: HashMap<String, i64>,
}

// Datos para dar de alta un producto. `min_stock`, `box_qty` y `status`
// son opcionales; si no vienen se asume 0, 1 y 'activo'. El mapa `stock`
// permite cargar existencias iniciales por bodega en la misma operación.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    #[schema(example = "Aguardiente Antioqueño 750ml")]
    pub name: String,
    #[validate(length(min = 1, message = "El SKU es obligatorio."))]
    #[schema(example = "AGU-750")]
    pub sku: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "La categoría es obligatoria."))]
    #[schema(example = "Aguardiente")]
    pub category: String,
    #[validate(length(min = 1, message = "La marca es obligatoria."))]
    pub brand: String,
    #[validate(range(min = 0, message = "El precio no puede ser negativo."))]
    pub price_cents: i64,
    #[validate(range(min = 0, message = "El costo no puede ser negativo."))]
    pub cost_cents: i64,
    #[validate(range(min = 0, message = "El stock mínimo no puede ser negativo."))]
    pub min_stock: Option<i64>,
    #[validate(range(min = 1, message = "Las unidades por caja deben ser al menos 1."))]
    pub box_qty: Option<i64>,
    #[validate(length(min = 1, message = "La unidad es obligatoria."))]
    #[schema(example = "botella")]
    pub unit: String,
    pub status: Option<ProductStatus>,
    pub stock: Option<HashMap<String, i64>>,
}

// Validación de consistencia que el derive no cubre: las cantidades del
// mapa de stock inicial no pueden ser negativas.
impl CreateProductPayload {
    pub fn validate_stock(&self) -> Result<(), validator::ValidationError> {
        if let Some(stock) = &self.stock {
            if stock.values().any(|quantity| *quantity < 0) {
                return Err(validator::ValidationError::new("NegativeInitialStock")
                    .with_message("Las cantidades iniciales no pueden ser negativas.".into()));
            }
        }
        Ok(())
    }
}

// Datos para editar un producto. Es un reemplazo completo de la ficha.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub name: String,
    #[validate(length(min = 1, message = "El SKU es obligatorio."))]
    pub sku: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "La categoría es obligatoria."))]
    pub category: String,
    #[validate(length(min = 1, message = "La marca es obligatoria."))]
    pub brand: String,
    #[validate(range(min = 0, message = "El precio no puede ser negativo."))]
    pub price_cents: i64,
    #[validate(range(min = 0, message = "El costo no puede ser negativo."))]
    pub cost_cents: i64,
    pub min_stock: i64,
    pub box_qty: i64,
    #[validate(length(min = 1, message = "La unidad es obligatoria."))]
    pub unit: String,
    pub status: ProductStatus,
}
