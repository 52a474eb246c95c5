// src/main.rs

use tokio::net::TcpListener;

use licorhub_backend::{app, config::AppState, db};

#[tokio::main]
async fn main() {
    // Inicializa el logger antes que cualquier otra cosa.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() está bien aquí: si la configuración falla, la
    // aplicación no debe arrancar.
    let app_state = AppState::new()
        .await
        .expect("Fallo al inicializar el estado de la aplicación.");

    // Ejecuta las migraciones de SQLx en el arranque.
    db::run_migrations(&app_state.db_pool)
        .await
        .expect("Fallo al ejecutar las migraciones de la base de datos.");

    tracing::info!("✅ Migraciones de la base de datos ejecutadas con éxito!");

    let app = app(app_state);

    // Inicia el servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Fallo al iniciar el listener TCP");
    tracing::info!("🚀 Servidor escuchando en {}", listener.local_addr().unwrap());
    tracing::info!("📚 Documentación interactiva en http://localhost:3000/swagger-ui");
    axum::serve(listener, app)
        .await
        .expect("Error en el servidor Axum");
}
