use super::handlers;
use super::state::AppState;
use crate::config::RelayVariant;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the HTTP router for the configured relay variant
pub fn create_router(state: AppState) -> Router {
    let api = match state.config.variant {
        RelayVariant::Photo => {
            Router::new().route("/send-email", post(handlers::send_photo_email))
        }
        RelayVariant::Video => {
            Router::new().route("/send-video", post(handlers::send_video_email))
        }
        RelayVariant::Gateway => Router::new()
            .route("/api/send-email", post(handlers::send_gateway_email))
            // The static photo page calls this endpoint cross-origin
            .layer(CorsLayer::permissive()),
    };

    let mut router = api
        // Health check
        .route("/health", get(handlers::health_check));

    // express.static counterpart: serve capture pages next to the API
    if let Some(dir) = &state.config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(DefaultBodyLimit::max(state.config.max_upload_size))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
