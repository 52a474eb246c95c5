// src/handlers/billing.rs

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
    middleware::rbac::{OfficeStaff, RequireRole},
    models::billing::{CreateInvoicePayload, Invoice, InvoiceDetail},
};

#[utoipa::path(
    get,
    path = "/api/billing/invoices",
    tag = "Billing",
    responses((status = 200, description = "Facturas con cliente y total del pedido", body = [InvoiceDetail])),
    security(("api_jwt" = []))
)]
pub async fn get_all_invoices(
    State(app_state): State<AppState>,
    _guard: RequireRole<OfficeStaff>,
) -> Result<Json<Vec<InvoiceDetail>>, AppError> {
    let invoices = app_state.billing_service.list_invoices(None).await?;
    Ok(Json(invoices))
}

// Las facturas del usuario autenticado
#[utoipa::path(
    get,
    path = "/api/billing/invoices/mine",
    tag = "Billing",
    responses((status = 200, description = "Facturas propias", body = [InvoiceDetail])),
    security(("api_jwt" = []))
)]
pub async fn get_my_invoices(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<InvoiceDetail>>, AppError> {
    let invoices = app_state.billing_service.list_invoices(Some(&user.id)).await?;
    Ok(Json(invoices))
}

#[utoipa::path(
    post,
    path = "/api/billing/invoices",
    tag = "Billing",
    request_body = CreateInvoicePayload,
    responses(
        (status = 201, description = "Factura emitida", body = Invoice),
        (status = 404, description = "Pedido no encontrado"),
        (status = 409, description = "El pedido ya tiene factura")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_invoice(
    State(app_state): State<AppState>,
    _guard: RequireRole<OfficeStaff>,
    Json(payload): Json<CreateInvoicePayload>,
) -> Result<(StatusCode, Json<Invoice>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let invoice = app_state.billing_service.create_invoice(&payload).await?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

// El pago queda persistido: si se consulta la factura después, sigue
// 'pagada'.
#[utoipa::path(
    post,
    path = "/api/billing/invoices/{id}/pay",
    tag = "Billing",
    params(("id" = String, Path, description = "ID de la factura")),
    responses(
        (status = 200, description = "Factura pagada", body = Invoice),
        (status = 404, description = "Factura no encontrada"),
        (status = 409, description = "La factura ya fue pagada o no admite pago")
    ),
    security(("api_jwt" = []))
)]
pub async fn pay_invoice(
    State(app_state): State<AppState>,
    _guard: RequireRole<OfficeStaff>,
    Path(id): Path<String>,
) -> Result<Json<Invoice>, AppError> {
    let invoice = app_state.billing_service.pay_invoice(&id).await?;
    Ok(Json(invoice))
}
