// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Los cinco roles del negocio. Se guardan en minúscula, igual que en la
// tabla `users`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Oficinista,
    Bodeguero,
    Domiciliario,
    Cliente,
}

// Representa un usuario que viene de la base de datos
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para seguridad
    pub password_hash: String,

    pub name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Datos para registrar un nuevo cliente. El rol NO viene del caller:
// el registro siempre crea usuarios con rol 'cliente'.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[validate(email(message = "El email proporcionado es inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub name: String,
    #[validate(length(min = 1, message = "La dirección es obligatoria."))]
    pub address: String,
}

// Datos para iniciar sesión
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "El email proporcionado es inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,
}

// Respuesta de autenticación: el token y el perfil que le corresponde
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Cambio de rol de un usuario (solo administradores)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRolePayload {
    pub role: UserRole,
}

// Estructura de datos ("claims") dentro del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (ID del usuario)
    pub exp: usize,  // Expiration time (cuándo expira el token)
    pub iat: usize,  // Issued At (cuándo se emitió el token)
}
