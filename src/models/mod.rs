//! Data models for the video cache service
//!
//! The cached video record plus the DTOs used for serializing and
//! deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;
pub mod video;

// Re-export commonly used types
pub use requests::{validate_url, UrlQuery};
pub use responses::{CacheStatusResponse, CachedVideoSummary, HealthResponse, MessageResponse};
pub use video::{video_hash, DownloadOptions, VideoInfo, VideoRecord};
