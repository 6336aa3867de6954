use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Provider webhook endpoint
        .route(
            "/webhook",
            get(handlers::webhook_challenge).post(handlers::webhook_event),
        )
        // Meeting relay
        .route("/meetings", post(handlers::create_meeting))
        .route("/meetings/:meeting_id", get(handlers::get_meeting))
        // Editorial workflow
        .route("/documents", post(handlers::create_document))
        .route("/documents/:document_id", get(handlers::get_document))
        .route(
            "/documents/:document_id/transition",
            post(handlers::transition_document),
        )
        // Browser frontend calls cross-origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
