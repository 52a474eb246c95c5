use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nuestro tipo de error, con `thiserror` para mejor ergonomía.
// Las variantes son tipadas; el texto en español que ve el usuario
// se decide recién en `into_response`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("El email ya está registrado")]
    EmailAlreadyExists,

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acceso denegado")]
    AccessDenied,

    #[error("Usuario no encontrado")]
    UserNotFound,

    #[error("Producto no encontrado")]
    ProductNotFound,

    #[error("Bodega no encontrada")]
    WarehouseNotFound,

    #[error("Pedido no encontrado")]
    OrderNotFound,

    #[error("Factura no encontrada")]
    InvoiceNotFound,

    #[error("SKU duplicado")]
    SkuAlreadyExists,

    #[error("El producto tiene pedidos asociados")]
    ProductInUse,

    #[error("Stock insuficiente")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("Traslado entre la misma bodega")]
    SameWarehouseTransfer,

    #[error("El pedido ya tiene factura")]
    InvoiceAlreadyExists,

    #[error("La factura ya fue pagada")]
    InvoiceAlreadyPaid,

    #[error("La factura no admite pago")]
    InvoiceNotPayable,

    #[error("El usuario asignado no es domiciliario")]
    DeliveryPersonInvalid,

    // Variante para errores de base de datos (sqlx)
    #[error("Error de base de datos")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para cualquier otro error inesperado.
    // `anyhow::Error` es ideal para capturar el contexto del error.
    #[error("Error interno del servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Error de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Error de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Devolver todos los detalles de la validación, campo por campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            // El faltante de stock lleva las cantidades para que el front
            // pueda mostrarlas.
            AppError::InsufficientStock { available, requested } => {
                let body = Json(json!({
                    "error": "Stock insuficiente en la bodega de origen.",
                    "details": { "available": available, "requested": requested },
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este email ya está registrado."),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Credenciales inválidas. Verifica tu email y contraseña.")
            }
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticación inválido o ausente."),
            AppError::AccessDenied => (StatusCode::FORBIDDEN, "No tienes permisos para realizar esta acción."),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuario no encontrado."),
            AppError::ProductNotFound => (StatusCode::NOT_FOUND, "Producto no encontrado."),
            AppError::WarehouseNotFound => (StatusCode::NOT_FOUND, "Bodega no encontrada."),
            AppError::OrderNotFound => (StatusCode::NOT_FOUND, "Pedido no encontrado."),
            AppError::InvoiceNotFound => (StatusCode::NOT_FOUND, "Factura no encontrada."),
            AppError::SameWarehouseTransfer => {
                (StatusCode::BAD_REQUEST, "La bodega de origen y la de destino no pueden ser la misma.")
            }
            AppError::SkuAlreadyExists => (StatusCode::CONFLICT, "Ya existe un producto con este SKU."),
            AppError::ProductInUse => {
                (StatusCode::CONFLICT, "No se puede eliminar el producto porque tiene pedidos asociados.")
            }
            AppError::InvoiceAlreadyExists => {
                (StatusCode::CONFLICT, "Este pedido ya tiene una factura emitida.")
            }
            AppError::InvoiceAlreadyPaid => (StatusCode::CONFLICT, "Esta factura ya fue pagada."),
            AppError::InvoiceNotPayable => (StatusCode::CONFLICT, "No se puede pagar una factura cancelada."),
            AppError::DeliveryPersonInvalid => {
                (StatusCode::BAD_REQUEST, "El usuario asignado no es un domiciliario.")
            }

            // Todos los demás errores (DatabaseError, InternalServerError) se
            // vuelven 500. El `#[from]` ya hizo la conversión; `tracing` deja
            // registrado el detalle que `thiserror` nos dio.
            ref e => {
                tracing::error!("Error Interno del Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocurrió un error inesperado.")
            }
        };

        // Respuesta estándar para errores simples que solo llevan un mensaje.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
