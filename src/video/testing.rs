//! In-process extractor for tests and local development.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use super::extractor::{ExtractedVideo, ExtractorError, VideoExtractor};
use crate::models::DownloadOptions;

/// Extractor that derives metadata from the URL and writes small files
/// instead of calling a provider.
///
/// The video id is the URL's last path segment and the platform is
/// `"fake"`. URLs whose path contains `/missing` fail extraction.
#[derive(Debug, Default)]
pub struct FakeExtractor {
    extracts: AtomicUsize,
    downloads: AtomicUsize,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract_calls(&self) -> usize {
        self.extracts.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

fn video_id(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl VideoExtractor for FakeExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedVideo, ExtractorError> {
        self.extracts.fetch_add(1, Ordering::SeqCst);
        if url.contains("/missing") {
            return Err(ExtractorError::Failed {
                status: "exit status: 1".to_string(),
                stderr: format!("ERROR: Unsupported URL: {}", url),
            });
        }

        let id = video_id(url);
        let raw = json!({
            "id": id,
            "extractor": "fake",
            "title": format!("Video {}", id),
            "duration": 42,
            "uploader": "Fake Channel",
            "view_count": 7,
        });
        Ok(ExtractedVideo::from_raw(url, raw))
    }

    async fn download(
        &self,
        options: &DownloadOptions,
        output_stem: &Path,
    ) -> Result<PathBuf, ExtractorError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        let path = output_stem.with_extension(&options.file_format);
        tokio::fs::write(&path, format!("media for {}", options.url)).await?;
        Ok(path)
    }
}
