//! Error types for the cache subsystem and the HTTP layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::video::ExtractorError;

// == Cache Error Enum ==
/// Errors raised by cache managers and the cache registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Unknown strategy identifier passed at manager construction
    #[error("Invalid cache strategy: {0}")]
    Configuration(String),

    /// A cache with this name is already registered
    #[error("Cache '{0}' already exists. Use get() or delete() first.")]
    DuplicateName(String),

    /// No cache registered under this name
    #[error("Cache '{name}' not found. Available caches: {}", format_available(.available))]
    NotFound {
        name: String,
        available: Vec<String>,
    },
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}

// == API Error Enum ==
/// Error type returned by HTTP handlers and the video service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Video hash not present in the cache
    #[error("{0}")]
    NotFound(String),

    /// Invalid request data
    #[error("{0}")]
    InvalidRequest(String),

    /// Metadata extraction failed for the given URL
    #[error("Failed to extract info: {0}")]
    Extraction(String),

    /// Download failed after metadata was extracted
    #[error("Failed to download video: {0}")]
    Download(String),

    /// Registry lookup failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ExtractorError> for ApiError {
    fn from(err: ExtractorError) -> Self {
        ApiError::Extraction(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) | ApiError::Extraction(_) => StatusCode::BAD_REQUEST,
            ApiError::Download(_) | ApiError::Cache(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache subsystem.
pub type Result<T> = std::result::Result<T, CacheError>;
