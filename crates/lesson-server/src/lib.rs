pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            routes::generate::HEADER_MODEL_USED,
            routes::generate::HEADER_REQUESTED_HOURS,
            routes::generate::HEADER_TARGET_HOURS,
            routes::generate::HEADER_REPAIR_STATUS,
            routes::generate::HEADER_FALLBACK_USED,
        ]);

    Router::new()
        .route("/api/health", get(routes::config::health))
        .route("/api/config", get(routes::config::get_config))
        .route(
            "/api/lesson-plans/generate",
            post(routes::generate::generate_lesson_plan),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the lesson-plan API server.
pub async fn serve(app_state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener).await
}

/// Start the server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(app_state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let local = listener.local_addr()?;
    let app = build_router(app_state);

    tracing::info!("lesson-plan API listening on http://{local}");

    axum::serve(listener, app).await?;
    Ok(())
}
