//! Response DTOs for the video API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// One live entry in the cache status listing
#[derive(Debug, Clone, Serialize)]
pub struct CachedVideoSummary {
    pub video_hash: String,
    pub title: Option<String>,
    pub platform: Option<String>,
    pub video_id: Option<String>,
    pub url: String,
    /// Whether a downloaded file is recorded for this entry
    pub downloaded: bool,
    pub age_seconds: f64,
    /// None when the entry never expires
    pub expires_in_seconds: Option<u64>,
}

/// Response body for `GET /api/cache`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatusResponse {
    pub cached_videos: Vec<CachedVideoSummary>,
    pub count: usize,
    pub stats: CacheStats,
    pub hit_rate: f64,
}

impl CacheStatusResponse {
    pub fn new(cached_videos: Vec<CachedVideoSummary>, stats: CacheStats) -> Self {
        Self {
            count: cached_videos.len(),
            hit_rate: stats.hit_rate(),
            cached_videos,
            stats,
        }
    }
}

/// Plain acknowledgement, e.g. for `DELETE /api/cache/:hash`
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn cache_cleared(video_hash: &str) -> Self {
        Self {
            message: format!("Cache cleared for hash: {}", video_hash),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
