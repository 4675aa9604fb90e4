//! Axum application setup.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let session_routes = Router::new()
        .route("/file", post(handlers::load_file))
        .route("/columns/toggle", post(handlers::toggle_column))
        .route("/submit", post(handlers::submit))
        .route("/decisions/toggle", post(handlers::toggle_decision))
        .route("/decisions/select", post(handlers::select_decision))
        .route("/apply", post(handlers::apply))
        .route("/download", get(handlers::download))
        .route("/back", post(handlers::back))
        .route("/reset", post(handlers::reset));

    let api_routes = Router::new()
        .route("/normalize", post(handlers::normalize))
        .route("/session", get(handlers::get_session))
        .nest("/session", session_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Start the web server, stopping on Ctrl+C.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!(%addr, "server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
