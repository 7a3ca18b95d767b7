//! Request DTOs for the video API
//!
//! Defines the structure of incoming query strings and bodies.

use serde::Deserialize;

/// Query string for `GET /api/extract` and `GET /api/download`
#[derive(Debug, Clone, Deserialize)]
pub struct UrlQuery {
    /// Video URL on any platform the extractor supports
    pub url: String,
}

impl UrlQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_url(&self.url)
    }
}

/// Accepts absolute http(s) URLs with a host.
pub fn validate_url(raw: &str) -> Option<String> {
    match url::Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => None,
        Ok(_) => Some("URL is not valid or not supported".to_string()),
        Err(err) => Some(format!("URL is not valid: {}", err)),
    }
}
