// src/db/product_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::common::error::AppError;
use crate::models::products::{CreateProductPayload, Product, ProductStatus, UpdateProductPayload};

// Repositorio del catálogo de productos
#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Product>, AppError> {
        let maybe_product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_product)
    }

    // Alta de producto. El único índice UNIQUE de la tabla es el del SKU.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        id: &str,
        payload: &CreateProductPayload,
        now: DateTime<Utc>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        // Valores por defecto cuando el caller no los manda
        let min_stock = payload.min_stock.unwrap_or(0);
        let box_qty = payload.box_qty.unwrap_or(1);
        let status = payload.status.clone().unwrap_or(ProductStatus::Activo);

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                id, name, sku, description, category, brand,
                price_cents, cost_cents, min_stock, box_qty, unit, status,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.sku)
        .bind(&payload.description)
        .bind(&payload.category)
        .bind(&payload.brand)
        .bind(payload.price_cents)
        .bind(payload.cost_cents)
        .bind(min_stock)
        .bind(box_qty)
        .bind(&payload.unit)
        .bind(status)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SkuAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(product)
    }

    // Reemplazo completo de la ficha del producto
    pub async fn update(
        &self,
        id: &str,
        payload: &UpdateProductPayload,
        now: DateTime<Utc>,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = $2, sku = $3, description = $4, category = $5, brand = $6,
                price_cents = $7, cost_cents = $8, min_stock = $9, box_qty = $10,
                unit = $11, status = $12, updated_at = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.sku)
        .bind(&payload.description)
        .bind(&payload.category)
        .bind(&payload.brand)
        .bind(payload.price_cents)
        .bind(payload.cost_cents)
        .bind(payload.min_stock)
        .bind(payload.box_qty)
        .bind(&payload.unit)
        .bind(payload.status.clone())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SkuAlreadyExists;
                }
            }
            AppError::from(e)
        })?
        .ok_or(AppError::ProductNotFound)?;

        Ok(product)
    }

    // Elimina un producto. Los saldos y movimientos de inventario caen en
    // cascada; si el producto aparece en algún pedido la clave foránea de
    // order_items lo impide y lo reportamos como conflicto.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ProductInUse;
                    }
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }
}
