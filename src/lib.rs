//! Video Cache - metadata extraction and download service
//!
//! Caches extracted video metadata and downloaded files in a named,
//! TTL-based in-memory cache registry.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod video;

pub use api::AppState;
pub use cache::{CacheManager, Registry};
pub use config::Config;
