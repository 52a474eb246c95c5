// src/handlers/inventory.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    middleware::rbac::{RequireRole, WarehouseStaff},
    models::inventory::{
        AddStockPayload, InventoryLevel, MovementDetail, TransferStockPayload, UpdateStockPayload,
        Warehouse,
    },
};

#[derive(Debug, Deserialize)]
pub struct MovementsQuery {
    #[serde(rename = "productId")]
    pub product_id: Option<String>,
}

// Las cuatro sedes, para cualquier pantalla que muestre stock por bodega
#[utoipa::path(
    get,
    path = "/api/warehouses",
    tag = "Inventory",
    responses((status = 200, description = "Bodegas registradas", body = [Warehouse])),
    security(("api_jwt" = []))
)]
pub async fn get_warehouses(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Warehouse>>, AppError> {
    let warehouses = app_state.inventory_service.list_warehouses().await?;
    Ok(Json(warehouses))
}

#[utoipa::path(
    post,
    path = "/api/inventory/add",
    tag = "Inventory",
    request_body = AddStockPayload,
    responses(
        (status = 200, description = "Saldo resultante en la bodega", body = InventoryLevel),
        (status = 404, description = "Producto o bodega inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_inventory(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<WarehouseStaff>,
    Json(payload): Json<AddStockPayload>,
) -> Result<Json<InventoryLevel>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let level = app_state.inventory_service.add_stock(&payload, &user).await?;

    Ok(Json(level))
}

#[utoipa::path(
    post,
    path = "/api/inventory/update",
    tag = "Inventory",
    request_body = UpdateStockPayload,
    responses(
        (status = 200, description = "Saldo resultante en la bodega", body = InventoryLevel),
        (status = 404, description = "Producto o bodega inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_inventory(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<WarehouseStaff>,
    Json(payload): Json<UpdateStockPayload>,
) -> Result<Json<InventoryLevel>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let level = app_state.inventory_service.update_stock(&payload, &user).await?;

    Ok(Json(level))
}

#[utoipa::path(
    post,
    path = "/api/inventory/transfer",
    tag = "Inventory",
    request_body = TransferStockPayload,
    responses(
        (status = 200, description = "Traslado aplicado"),
        (status = 409, description = "Stock insuficiente en la bodega de origen")
    ),
    security(("api_jwt" = []))
)]
pub async fn transfer_inventory(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<WarehouseStaff>,
    Json(payload): Json<TransferStockPayload>,
) -> Result<Json<serde_json::Value>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.inventory_service.transfer_stock(&payload, &user).await?;

    Ok(Json(json!({ "message": "Traslado realizado correctamente." })))
}

#[utoipa::path(
    get,
    path = "/api/inventory/movements",
    tag = "Inventory",
    params(("productId" = Option<String>, Query, description = "Filtrar por producto")),
    responses((status = 200, description = "Movimientos, los más recientes primero", body = [MovementDetail])),
    security(("api_jwt" = []))
)]
pub async fn get_movements(
    State(app_state): State<AppState>,
    _guard: RequireRole<WarehouseStaff>,
    Query(query): Query<MovementsQuery>,
) -> Result<Json<Vec<MovementDetail>>, AppError> {
    let movements = app_state
        .inventory_service
        .list_movements(query.product_id.as_deref())
        .await?;
    Ok(Json(movements))
}
