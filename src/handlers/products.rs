// src/handlers/products.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    middleware::rbac::{RequireRole, WarehouseStaff},
    models::products::{CreateProductPayload, ProductWithStock, UpdateProductPayload},
};

// El catálogo lo puede consultar cualquier usuario autenticado; las
// escrituras son del personal de bodega.
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses((status = 200, description = "Catálogo con stock por bodega", body = [ProductWithStock])),
    security(("api_jwt" = []))
)]
pub async fn get_all_products(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<ProductWithStock>>, AppError> {
    let products = app_state.product_service.list_products().await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "ID del producto")),
    responses(
        (status = 200, description = "Producto con su stock", body = ProductWithStock),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product_by_id(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<ProductWithStock>, AppError> {
    let product = app_state.product_service.get_product(&id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Producto creado", body = ProductWithStock),
        (status = 409, description = "SKU duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    _guard: RequireRole<WarehouseStaff>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<(StatusCode, Json<ProductWithStock>), AppError> {
    // Validación estándar del Validator
    payload.validate().map_err(AppError::ValidationError)?;

    // Consistencia manual del mapa de stock inicial
    payload.validate_stock().map_err(|e| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("stock", e);
        AppError::ValidationError(errors)
    })?;

    let product = app_state.product_service.create_product(&payload).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    request_body = UpdateProductPayload,
    params(("id" = String, Path, description = "ID del producto")),
    responses(
        (status = 200, description = "Producto actualizado", body = ProductWithStock),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    _guard: RequireRole<WarehouseStaff>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<ProductWithStock>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state.product_service.update_product(&id, &payload).await?;

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "ID del producto")),
    responses(
        (status = 204, description = "Producto eliminado"),
        (status = 404, description = "Producto no encontrado"),
        (status = 409, description = "El producto tiene pedidos asociados")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    _guard: RequireRole<WarehouseStaff>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    app_state.product_service.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
