use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Job submission and queries
        .route("/api/translation/upload", post(handlers::submit_job))
        .route("/api/translation/status/:job_id", get(handlers::job_status))
        .route("/api/translation/jobs/:job_id", delete(handlers::delete_job))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
