//! Axum router configuration

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

use super::handlers::{download_video, health_check, index_page, version_check, video_summary};

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::ORIGIN])
        .max_age(Duration::from_secs(3600));

    // Build router
    let router = Router::new()
        // Front-end page
        .route("/", get(index_page))
        // Video API: POST resolves a summary, GET proxies the download
        .route("/api/yt", get(download_video).post(video_summary))
        // Health and version endpoints
        .route("/health", get(health_check))
        .route("/version", get(version_check))
        // Middleware
        .layer(TraceLayer::new_for_http());

    let router = if state.config.cors_enabled {
        router.layer(cors)
    } else {
        router
    };

    // State
    router.with_state(state)
}
