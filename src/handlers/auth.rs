use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginUserPayload, RegisterUserPayload, User},
};

// Handler de registro. Esta ruta es pública y SIEMPRE crea clientes; las
// cuentas del personal se promueven después desde el panel de admin.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Cuenta de cliente creada", body = AuthResponse),
        (status = 409, description = "El email ya está registrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state.auth_service.register_client(&payload).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Sesión iniciada", body = AuthResponse),
        (status = 401, description = "Credenciales inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state.auth_service.login_user(&payload).await?;

    Ok(Json(response))
}

// El API es stateless: cerrar sesión no invalida nada del lado del
// servidor (el token expira solo). La ruta existe para que el front
// tenga a quién avisarle y para dejar el evento en el log.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Sesión cerrada")),
    security(("api_jwt" = []))
)]
pub async fn logout(AuthenticatedUser(user): AuthenticatedUser) -> Json<serde_json::Value> {
    tracing::info!("👋 Sesión cerrada para {}", user.email);
    Json(json!({ "message": "Sesión cerrada correctamente." }))
}

// Handler de la ruta protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuario de la sesión actual", body = User),
        (status = 401, description = "Token inválido o ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
