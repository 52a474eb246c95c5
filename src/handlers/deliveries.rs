// src/handlers/deliveries.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{DeliveryStaff, RequireRole},
    models::deliveries::DeliveryDetail,
};

// La pantalla de reparto: cada entrega con su domiciliario, el cliente
// del pedido y la dirección de destino.
#[utoipa::path(
    get,
    path = "/api/deliveries",
    tag = "Deliveries",
    responses((status = 200, description = "Entregas, las más recientes primero", body = [DeliveryDetail])),
    security(("api_jwt" = []))
)]
pub async fn get_all_deliveries(
    State(app_state): State<AppState>,
    _guard: RequireRole<DeliveryStaff>,
) -> Result<Json<Vec<DeliveryDetail>>, AppError> {
    let deliveries = app_state.delivery_service.list_deliveries().await?;
    Ok(Json(deliveries))
}
