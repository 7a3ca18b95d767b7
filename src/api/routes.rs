//! API Routes
//!
//! Configures the Axum router with all video service endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    advanced_download_handler, cache_status_handler, delete_cache_handler,
    download_by_hash_handler, download_handler, extract_handler, health_handler, info_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/extract?url=` - Extract and cache video metadata
/// - `GET /api/info/:hash` - Cached metadata by video hash
/// - `GET /api/download?url=` - Download a video with default options
/// - `GET /api/download/:hash` - Download a previously extracted video
/// - `POST /api/download/advanced` - Download with explicit options
/// - `GET /api/cache` - List cached videos
/// - `DELETE /api/cache/:hash` - Evict a cached video
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/extract", get(extract_handler))
        .route("/api/info/:hash", get(info_handler))
        .route("/api/download", get(download_handler))
        .route("/api/download/advanced", post(advanced_download_handler))
        .route("/api/download/:hash", get(download_by_hash_handler))
        .route("/api/cache", get(cache_status_handler))
        .route("/api/cache/:hash", axum::routing::delete(delete_cache_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
