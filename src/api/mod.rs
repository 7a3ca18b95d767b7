//! API Module
//!
//! HTTP handlers and routing for the video service REST API.
//!
//! # Endpoints
//! - `GET /api/extract?url=` - Extract and cache video metadata
//! - `GET /api/info/:hash` - Cached metadata by video hash
//! - `GET /api/download?url=` / `GET /api/download/:hash` - Download a video
//! - `POST /api/download/advanced` - Download with explicit options
//! - `GET /api/cache` / `DELETE /api/cache/:hash` - Inspect or evict cache entries
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
