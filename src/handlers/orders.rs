// src/handlers/orders.rs

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
    middleware::rbac::{DeliveryOps, OfficeStaff, RequireRole},
    models::orders::{CreateOrderPayload, Order, OrderDetail, UpdateOrderStatusPayload},
};

// Todos los pedidos, para las pantallas de la oficina
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    responses((status = 200, description = "Pedidos con cliente y líneas", body = [OrderDetail])),
    security(("api_jwt" = []))
)]
pub async fn get_all_orders(
    State(app_state): State<AppState>,
    _guard: RequireRole<OfficeStaff>,
) -> Result<Json<Vec<OrderDetail>>, AppError> {
    let orders = app_state.order_service.list_orders(None).await?;
    Ok(Json(orders))
}

// Los pedidos del usuario autenticado, sea cual sea su rol
#[utoipa::path(
    get,
    path = "/api/orders/mine",
    tag = "Orders",
    responses((status = 200, description = "Pedidos propios", body = [OrderDetail])),
    security(("api_jwt" = []))
)]
pub async fn get_my_orders(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<OrderDetail>>, AppError> {
    let orders = app_state.order_service.list_orders(Some(&user.id)).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido creado en estado 'pendiente'", body = OrderDetail),
        (status = 404, description = "Cliente o producto inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    _guard: RequireRole<OfficeStaff>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<(StatusCode, Json<OrderDetail>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state.order_service.create_order(&payload).await?;

    Ok((StatusCode::CREATED, Json(order)))
}

// El cambio de estado lo usa la oficina para asignar domiciliario y el
// domiciliario para marcar la entrega.
#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    tag = "Orders",
    request_body = UpdateOrderStatusPayload,
    params(("id" = String, Path, description = "ID del pedido")),
    responses(
        (status = 200, description = "Pedido actualizado", body = Order),
        (status = 400, description = "El usuario asignado no es domiciliario"),
        (status = 404, description = "Pedido no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order_status(
    State(app_state): State<AppState>,
    _guard: RequireRole<DeliveryOps>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrderStatusPayload>,
) -> Result<Json<Order>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state.order_service.update_status(&id, &payload).await?;

    Ok(Json(order))
}
