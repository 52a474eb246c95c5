// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    middleware::rbac::{AdminOnly, OfficeStaff, RequireRole},
    models::auth::{UpdateUserRolePayload, User},
};

// Lista completa de usuarios. No lleva guard de rol a propósito: para
// cualquiera que no sea admin el servicio responde una lista vacía, que
// es lo que las pantallas esperan.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses((status = 200, description = "Usuarios (vacío si no eres admin)", body = [User])),
    security(("api_jwt" = []))
)]
pub async fn get_all_users(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<User>>, AppError> {
    let users = app_state.user_service.list_users(&user).await?;
    Ok(Json(users))
}

// Solo los usuarios con rol 'cliente', para las pantallas de ventas
#[utoipa::path(
    get,
    path = "/api/users/customers",
    tag = "Users",
    responses((status = 200, description = "Clientes registrados", body = [User])),
    security(("api_jwt" = []))
)]
pub async fn get_customers(
    State(app_state): State<AppState>,
    _guard: RequireRole<OfficeStaff>,
) -> Result<Json<Vec<User>>, AppError> {
    let customers = app_state.user_service.list_customers().await?;
    Ok(Json(customers))
}

// Solo los domiciliarios, para asignar entregas
#[utoipa::path(
    get,
    path = "/api/users/delivery-persons",
    tag = "Users",
    responses((status = 200, description = "Domiciliarios activos", body = [User])),
    security(("api_jwt" = []))
)]
pub async fn get_delivery_persons(
    State(app_state): State<AppState>,
    _guard: RequireRole<OfficeStaff>,
) -> Result<Json<Vec<User>>, AppError> {
    let delivery_persons = app_state.user_service.list_delivery_persons().await?;
    Ok(Json(delivery_persons))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "ID del usuario")),
    responses(
        (status = 200, description = "Perfil del usuario", body = User),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user_by_id(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = app_state.user_service.get_user(&id).await?;
    Ok(Json(user))
}

// Promover o degradar usuarios es exclusivo del admin
#[utoipa::path(
    patch,
    path = "/api/users/{id}/role",
    tag = "Users",
    request_body = UpdateUserRolePayload,
    params(("id" = String, Path, description = "ID del usuario")),
    responses(
        (status = 200, description = "Rol actualizado", body = User),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user_role(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRolePayload>,
) -> Result<Json<User>, AppError> {
    let user = app_state.user_service.change_role(&id, payload.role).await?;
    Ok(Json(user))
}
