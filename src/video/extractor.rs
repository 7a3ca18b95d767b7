//! Extraction engine boundary
//!
//! The cache never talks to a media provider directly; it stores what a
//! [`VideoExtractor`] produces.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::{video_hash, DownloadOptions, VideoInfo};

// == Extractor Error ==
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The extractor process could not be run or its files not written
    #[error("extractor I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The extractor ran and reported failure
    #[error("extractor exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    /// The extractor's metadata output was not valid JSON
    #[error("invalid extractor output: {0}")]
    Parse(#[from] serde_json::Error),

    /// A download finished but no output file was found
    #[error("final output not found: {0}")]
    MissingOutput(String),
}

// == Extracted Video ==
/// Metadata for one URL: normalized fields plus the raw provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedVideo {
    pub info: VideoInfo,
    pub raw: Value,
}

impl ExtractedVideo {
    /// Normalizes a provider metadata document for `url`.
    ///
    /// The platform comes from `extractor` (default `"unknown"`) and the id
    /// from `id`; together they give the cache key.
    pub fn from_raw(url: &str, raw: Value) -> Self {
        let text = |field: &str| raw.get(field).and_then(Value::as_str).map(str::to_string);
        let count = |field: &str| {
            raw.get(field).and_then(|v| {
                v.as_u64()
                    .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            })
        };

        let platform = text("extractor").unwrap_or_else(|| "unknown".to_string());
        let video_id = text("id");
        let hash = video_hash(&platform, video_id.as_deref());

        let info = VideoInfo {
            video_hash: hash,
            url: url.to_string(),
            title: text("title"),
            duration: count("duration"),
            uploader: text("uploader"),
            thumbnail: text("thumbnail"),
            description: text("description"),
            view_count: count("view_count"),
            like_count: count("like_count"),
            upload_date: text("upload_date"),
            platform: Some(platform),
            video_id,
        };

        Self { info, raw }
    }
}

// == Extractor Contract ==
#[async_trait]
pub trait VideoExtractor: Send + Sync {
    /// Fetches metadata for `url` without downloading media.
    async fn extract(&self, url: &str) -> Result<ExtractedVideo, ExtractorError>;

    /// Downloads `options.url` to `output_stem` plus an extension chosen by
    /// the extractor, returning the final file path.
    async fn download(
        &self,
        options: &DownloadOptions,
        output_stem: &Path,
    ) -> Result<PathBuf, ExtractorError>;
}
