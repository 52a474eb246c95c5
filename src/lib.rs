// src/lib.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

/// Arma el router completo sobre un `AppState` ya construido.
/// Separado de `main` para que los tests de integración levanten
/// exactamente las mismas rutas que el binario.
pub fn app(app_state: AppState) -> Router {
    // Rutas de autenticación (públicas)
    let auth_public_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rutas de sesión (protegidas por el middleware)
    let auth_session_routes = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let user_routes = Router::new()
        .route("/", get(handlers::users::get_all_users))
        .route("/customers", get(handlers::users::get_customers))
        .route(
            "/delivery-persons",
            get(handlers::users::get_delivery_persons),
        )
        .route("/{id}", get(handlers::users::get_user_by_id))
        .route("/{id}/role", patch(handlers::users::update_user_role))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::products::get_all_products).post(handlers::products::create_product),
        )
        .route(
            "/{id}",
            get(handlers::products::get_product_by_id)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let warehouse_routes = Router::new()
        .route("/", get(handlers::inventory::get_warehouses))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let inventory_routes = Router::new()
        .route("/add", post(handlers::inventory::add_inventory))
        .route("/update", post(handlers::inventory::update_inventory))
        .route("/transfer", post(handlers::inventory::transfer_inventory))
        .route("/movements", get(handlers::inventory::get_movements))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let order_routes = Router::new()
        .route(
            "/",
            get(handlers::orders::get_all_orders).post(handlers::orders::create_order),
        )
        .route("/mine", get(handlers::orders::get_my_orders))
        .route("/{id}/status", patch(handlers::orders::update_order_status))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let billing_routes = Router::new()
        .route(
            "/invoices",
            get(handlers::billing::get_all_invoices).post(handlers::billing::create_invoice),
        )
        .route("/invoices/mine", get(handlers::billing::get_my_invoices))
        .route("/invoices/{id}/pay", post(handlers::billing::pay_invoice))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let delivery_routes = Router::new()
        .route("/", get(handlers::deliveries::get_all_deliveries))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina todo en el router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_public_routes.merge(auth_session_routes))
        .nest("/api/users", user_routes)
        .nest("/api/products", product_routes)
        .nest("/api/warehouses", warehouse_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/orders", order_routes)
        .nest("/api/billing", billing_routes)
        .nest("/api/deliveries", delivery_routes)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state)
}
