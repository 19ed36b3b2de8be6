use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.body_limit();

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Upload or recording in, transcript out
        .route("/transcriptions", post(handlers::transcribe))
        .layer(DefaultBodyLimit::max(body_limit))
        // The presentation layer is served from another origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
