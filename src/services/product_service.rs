// src/services/product_service.rs

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InventoryRepository, ProductRepository},
    models::products::{CreateProductPayload, ProductWithStock, UpdateProductPayload},
};

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    inventory_repo: InventoryRepository,
    pool: SqlitePool,
}

impl ProductService {
    pub fn new(
        product_repo: ProductRepository,
        inventory_repo: InventoryRepository,
        pool: SqlitePool,
    ) -> Self {
        Self { product_repo, inventory_repo, pool }
    }

    // Catálogo completo con el saldo por bodega de cada producto.
    // Dos queries: productos y saldos; el mapa se arma en memoria.
    pub async fn list_products(&self) -> Result<Vec<ProductWithStock>, AppError> {
        let products = self.product_repo.list_all().await?;
        let levels = self.inventory_repo.list_levels().await?;

        let mut stock_by_product: HashMap<String, HashMap<String, i64>> = HashMap::new();
        for level in levels {
            stock_by_product
                .entry(level.product_id)
                .or_default()
                .insert(level.warehouse_id, level.quantity);
        }

        let result = products
            .into_iter()
            .map(|product| {
                let stock = stock_by_product.remove(&product.id).unwrap_or_default();
                ProductWithStock { product, stock }
            })
            .collect();

        Ok(result)
    }

    pub async fn get_product(&self, id: &str) -> Result<ProductWithStock, AppError> {
        let product = self.product_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let stock = self.inventory_repo
            .levels_for_product(&product.id)
            .await?
            .into_iter()
            .map(|level| (level.warehouse_id, level.quantity))
            .collect();

        Ok(ProductWithStock { product, stock })
    }

    // Alta de producto. Si el payload trae existencias iniciales, las
    // filas de saldo se crean en la misma transacción que el producto:
    // una bodega inexistente en el mapa revierte el alta completa.
    pub async fn create_product(
        &self,
        payload: &CreateProductPayload,
    ) -> Result<ProductWithStock, AppError> {
        let product_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let product = self.product_repo
            .create(&mut *tx, &product_id, payload, now)
            .await?;

        let mut stock = HashMap::new();
        if let Some(initial) = &payload.stock {
            for (warehouse_id, quantity) in initial {
                if *quantity == 0 {
                    continue;
                }
                self.inventory_repo
                    .upsert_add(
                        &mut *tx,
                        &Uuid::new_v4().to_string(),
                        &product_id,
                        warehouse_id,
                        *quantity,
                        now,
                    )
                    .await?;
                stock.insert(warehouse_id.clone(), *quantity);
            }
        }

        tx.commit().await?;

        Ok(ProductWithStock { product, stock })
    }

    pub async fn update_product(
        &self,
        id: &str,
        payload: &UpdateProductPayload,
    ) -> Result<ProductWithStock, AppError> {
        let product = self.product_repo.update(id, payload, Utc::now()).await?;

        let stock = self.inventory_repo
            .levels_for_product(&product.id)
            .await?
            .into_iter()
            .map(|level| (level.warehouse_id, level.quantity))
            .collect();

        Ok(ProductWithStock { product, stock })
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), AppError> {
        self.product_repo.delete(id).await
    }
}
