// tests/common/mod.rs
//
// Utilidades compartidas por los tests de integración. Cada test
// levanta la aplicación completa (rutas, middleware y servicios) sobre
// una base SQLite en memoria recién migrada.
#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use licorhub_backend::{app, config::AppState, db, models::auth::UserRole};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> TestApp {
        let options = SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true);

        // Una sola conexión sin reciclaje: la base en memoria vive
        // atada a la conexión que la abrió.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .expect("No se pudo abrir la base de datos en memoria");

        db::run_migrations(&pool)
            .await
            .expect("No se pudieron ejecutar las migraciones");

        let state = AppState::with_pool(pool, "secreto-de-prueba".to_string());
        let router = app(state.clone());

        TestApp { router, state }
    }

    /// Envía una petición JSON y devuelve el status junto con el cuerpo
    /// ya deserializado (Value::Null si la respuesta viene vacía).
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = builder
            .body(match body {
                Some(json) => Body::from(json.to_string()),
                None => Body::empty(),
            })
            .expect("Petición mal construida");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("La aplicación no respondió");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("No se pudo leer el cuerpo de la respuesta");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("La respuesta no es JSON válido")
        };

        (status, body)
    }
}

/// Registra un usuario por la API y devuelve (token, id). El registro
/// siempre crea clientes; para otros roles se asigna el rol directo en
/// el servicio, como lo haría un administrador. El token sigue siendo
/// válido porque el rol se relee de la base en cada petición.
pub async fn seed_user(app: &TestApp, email: &str, role: UserRole) -> (String, String) {
    let (status, body) = app
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "email": email,
                "password": "clave-segura",
                "name": "Usuario de Prueba",
                "address": "Calle 10 # 5-21, Medellín",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "registro fallido: {body}");

    let token = body["token"].as_str().expect("registro sin token").to_string();
    let user_id = body["user"]["id"].as_str().expect("registro sin id").to_string();

    if role != UserRole::Cliente {
        app.state
            .user_service
            .change_role(&user_id, role)
            .await
            .expect("No se pudo asignar el rol");
    }

    (token, user_id)
}

/// Crea un producto por la API (requiere token de admin o bodeguero) y
/// devuelve su id.
pub async fn seed_product(app: &TestApp, token: &str, sku: &str) -> String {
    let (status, body) = app
        .request(
            "POST",
            "/api/products",
            Some(token),
            Some(json!({
                "name": format!("Aguardiente Antioqueño {}", sku),
                "sku": sku,
                "category": "aguardiente",
                "brand": "Antioqueño",
                "priceCents": 45_000,
                "costCents": 30_000,
                "unit": "botella 750ml",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "producto no creado: {body}");

    body["id"].as_str().expect("producto sin id").to_string()
}

/// Busca por nombre una de las bodegas sembradas por las migraciones y
/// devuelve su id.
pub async fn warehouse_id_by_name(app: &TestApp, token: &str, name: &str) -> String {
    let (status, body) = app.request("GET", "/api/warehouses", Some(token), None).await;
    assert_eq!(status, StatusCode::OK, "no se pudieron listar las bodegas: {body}");

    body.as_array()
        .expect("la lista de bodegas no es un array")
        .iter()
        .find(|w| w["name"] == name)
        .unwrap_or_else(|| panic!("no existe la bodega {name}"))["id"]
        .as_str()
        .expect("bodega sin id")
        .to_string()
}
