use super::{handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/images",
            post(handlers::analyze_images_handler).layer(DefaultBodyLimit::max(32 * 1024 * 1024)),
        )
        .route("/export/db", get(handlers::export_db_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
