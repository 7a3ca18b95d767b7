//! Video record types
//!
//! The value the video cache stores, and the metadata it is built from.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// == Cache Key ==
/// Derives the stable cache key for a video from its platform and id.
///
/// First 16 hex characters of SHA-256 over `"{platform}_{video_id}"`, with
/// `"unknown"` standing in for a missing id.
pub fn video_hash(platform: &str, video_id: Option<&str>) -> String {
    let combined = format!("{}_{}", platform, video_id.unwrap_or("unknown"));
    let digest = Sha256::digest(combined.as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(16);
    hash
}

// == Video Info ==
/// Normalized metadata for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub video_hash: String,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub like_count: Option<u64>,
    /// Upload date as reported by the provider (YYYYMMDD)
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
}

impl VideoInfo {
    /// Creates an info record with only its key and source URL set.
    pub fn new(video_hash: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            video_hash: video_hash.into(),
            url: url.into(),
            title: None,
            duration: None,
            uploader: None,
            thumbnail: None,
            description: None,
            view_count: None,
            like_count: None,
            upload_date: None,
            platform: None,
            video_id: None,
        }
    }
}

// == Download Options ==
pub const SUPPORTED_FORMATS: &[&str] = &["mp4", "mkv", "webm", "m4a", "wav", "mp3"];
pub const SUPPORTED_QUALITIES: &[&str] = &["best", "worst", "high", "medium", "low"];

/// Parameters used to produce a downloaded artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOptions {
    pub url: String,
    /// Explicit provider format selector; overrides every other choice
    #[serde(default)]
    pub format_code: Option<String>,
    #[serde(default = "default_quality")]
    pub quality: String,
    #[serde(default = "default_file_format")]
    pub file_format: String,
    #[serde(default)]
    pub audio_only: bool,
    #[serde(default)]
    pub video_only: bool,
    #[serde(default)]
    pub fps: Option<u32>,
    /// Target resolution as `WIDTHxHEIGHT`, e.g. `1920x1080`
    #[serde(default)]
    pub resolution: Option<String>,
    /// Audio bitrate in kbps
    #[serde(default = "default_audio_quality")]
    pub audio_quality: String,
}

fn default_quality() -> String {
    "best".to_string()
}

fn default_file_format() -> String {
    "mp4".to_string()
}

fn default_audio_quality() -> String {
    "192".to_string()
}

impl DownloadOptions {
    /// Default options for `url`: best quality, mp4.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format_code: None,
            quality: default_quality(),
            file_format: default_file_format(),
            audio_only: false,
            video_only: false,
            fps: None,
            resolution: None,
            audio_quality: default_audio_quality(),
        }
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if !SUPPORTED_FORMATS.contains(&self.file_format.as_str()) {
            return Some(format!(
                "Unsupported file format '{}'; expected one of {}",
                self.file_format,
                SUPPORTED_FORMATS.join(", ")
            ));
        }
        if !SUPPORTED_QUALITIES.contains(&self.quality.as_str()) {
            return Some(format!(
                "Unsupported quality '{}'; expected one of {}",
                self.quality,
                SUPPORTED_QUALITIES.join(", ")
            ));
        }
        if self.audio_only && self.video_only {
            return Some("audio_only and video_only are mutually exclusive".to_string());
        }
        if let Some(resolution) = &self.resolution {
            if self.resolution_height().is_none() {
                return Some(format!(
                    "Invalid resolution '{}'; expected WIDTHxHEIGHT",
                    resolution
                ));
            }
        }
        if self.audio_quality.parse::<u32>().is_err() {
            return Some(format!("Invalid audio quality '{}'", self.audio_quality));
        }
        None
    }

    /// Height component of `resolution`, if it parses.
    pub fn resolution_height(&self) -> Option<u32> {
        let (width, height) = self.resolution.as_deref()?.split_once('x')?;
        width.parse::<u32>().ok()?;
        height.parse().ok()
    }

    /// MIME type served for the chosen container.
    pub fn media_type(&self) -> &'static str {
        match self.file_format.as_str() {
            "mp4" => "video/mp4",
            _ => "application/octet-stream",
        }
    }
}

// == Video Record ==
/// What the video cache stores under a video hash.
///
/// Created on successful extraction with no artifact; a later download
/// rewrites the same key with `output_path` and `download_options` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Cache key, see [`video_hash`]
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    pub info: VideoInfo,
    /// Unmodified provider response
    #[serde(default)]
    pub raw_info: serde_json::Value,
    #[serde(default)]
    pub download_options: Option<DownloadOptions>,
    /// When the metadata was extracted (Unix milliseconds)
    pub cached_at: u64,
}

impl VideoRecord {
    /// Returns the artifact path if one is recorded and still on disk.
    pub fn artifact(&self) -> Option<&PathBuf> {
        self.output_path.as_ref().filter(|path| path.is_file())
    }

    /// Attaches a finished download.
    pub fn with_download(mut self, path: PathBuf, options: DownloadOptions) -> Self {
        self.output_path = Some(path);
        self.download_options = Some(options);
        self
    }
}
