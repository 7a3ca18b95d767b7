//! API Handlers
//!
//! HTTP request handlers for each video service endpoint.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};

use tokio_util::io::ReaderStream;

use crate::cache::Registry;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    CacheStatusResponse, DownloadOptions, HealthResponse, MessageResponse, UrlQuery, VideoInfo,
    VideoRecord,
};
use crate::video::{VideoExtractor, VideoService, YtDlpExtractor};

type Result<T> = std::result::Result<T, ApiError>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Named caches; handlers use its default cache
    pub registry: Arc<Registry<VideoRecord>>,
    pub service: VideoService,
}

impl AppState {
    pub fn new(
        registry: Arc<Registry<VideoRecord>>,
        extractor: Arc<dyn VideoExtractor>,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        let service = VideoService::new(registry.clone(), extractor, download_dir);
        Self { registry, service }
    }

    /// Wires the process-wide registry to a yt-dlp extractor.
    pub fn from_config(config: &Config) -> Self {
        let registry = crate::cache::init_global(config.cache_settings());
        let extractor = Arc::new(YtDlpExtractor::new(&config.ytdlp_path));
        Self::new(registry, extractor, &config.download_dir)
    }
}

/// Streams the record's artifact back as an attachment.
async fn file_response(
    record: &VideoRecord,
    media_type: &'static str,
    extra: &[(&'static str, String)],
) -> Result<Response> {
    let path = record
        .output_path
        .as_ref()
        .ok_or_else(|| ApiError::Internal(format!("no file recorded for {}", record.id)))?;
    let unreadable = |e: std::io::Error| {
        ApiError::Internal(format!("cannot read {}: {}", path.display(), e))
    };
    let file = tokio::fs::File::open(path).await.map_err(unreadable)?;
    let length = file.metadata().await.map_err(unreadable)?.len();

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.bin", record.id));

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(media_type));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    headers.insert(
        header::CONTENT_DISPOSITION,
        header_value(format!("attachment; filename=\"{}\"", file_name))?,
    );
    headers.insert("x-video-hash", header_value(record.id.clone())?);
    for (name, value) in extra {
        headers.insert(HeaderName::from_static(name), header_value(value.clone())?);
    }

    let body = Body::from_stream(ReaderStream::new(file));
    Ok((headers, body).into_response())
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::try_from(value).map_err(|e| ApiError::Internal(e.to_string()))
}

/// Handler for GET /api/extract?url=
///
/// Extracts metadata and caches it under the video hash.
pub async fn extract_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<VideoInfo>> {
    if let Some(error_msg) = query.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let record = state.service.extract(&query.url).await?;
    Ok(Json(record.info))
}

/// Handler for GET /api/info/:hash
pub async fn info_handler(
    State(state): State<AppState>,
    Path(video_hash): Path<String>,
) -> Result<Json<VideoInfo>> {
    Ok(Json(state.service.info(&video_hash)?))
}

/// Handler for GET /api/download?url=
///
/// Downloads with default options and returns the file.
pub async fn download_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Response> {
    if let Some(error_msg) = query.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let options = DownloadOptions::for_url(query.url);
    let media_type = options.media_type();
    let record = state.service.download(options).await?;
    file_response(&record, media_type, &[]).await
}

/// Handler for GET /api/download/:hash
///
/// Serves the cached file, downloading it again if it is gone.
pub async fn download_by_hash_handler(
    State(state): State<AppState>,
    Path(video_hash): Path<String>,
) -> Result<Response> {
    let record = state.service.download_by_hash(&video_hash).await?;
    let media_type = record
        .download_options
        .as_ref()
        .map_or("application/octet-stream", DownloadOptions::media_type);
    file_response(&record, media_type, &[]).await
}

/// Handler for POST /api/download/advanced
pub async fn advanced_download_handler(
    State(state): State<AppState>,
    Json(options): Json<DownloadOptions>,
) -> Result<Response> {
    if let Some(error_msg) = crate::models::validate_url(&options.url) {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let media_type = options.media_type();
    let extra = [
        ("x-quality", options.quality.clone()),
        ("x-format", options.file_format.clone()),
    ];
    let record = state.service.download(options).await?;
    file_response(&record, media_type, &extra).await
}

/// Handler for GET /api/cache
pub async fn cache_status_handler(State(state): State<AppState>) -> Result<Json<CacheStatusResponse>> {
    let (videos, stats) = state.service.status()?;
    Ok(Json(CacheStatusResponse::new(videos, stats)))
}

/// Handler for DELETE /api/cache/:hash
pub async fn delete_cache_handler(
    State(state): State<AppState>,
    Path(video_hash): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.service.evict(&video_hash)?;
    Ok(Json(MessageResponse::cache_cleared(&video_hash)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheSettings;
    use crate::video::testing::FakeExtractor;

    fn test_state(dir: &std::path::Path) -> AppState {
        let registry = Arc::new(Registry::new(CacheSettings {
            default_ttl: Some(3600),
            sweep_interval: None,
        }));
        AppState::new(registry, Arc::new(FakeExtractor::new()), dir)
    }

    #[tokio::test]
    async fn test_extract_and_info_handler() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let query = UrlQuery {
            url: "https://example.com/watch/abc".to_string(),
        };
        let info = extract_handler(State(state.clone()), Query(query)).await.unwrap();
        assert_eq!(info.video_id.as_deref(), Some("abc"));

        let cached = info_handler(State(state), Path(info.video_hash.clone()))
            .await
            .unwrap();
        assert_eq!(cached.0, info.0);
    }

    #[tokio::test]
    async fn test_extract_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let query = UrlQuery {
            url: "javascript:alert(1)".to_string(),
        };
        let result = extract_handler(State(state), Query(query)).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_cache_handler() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let query = UrlQuery {
            url: "https://example.com/watch/del".to_string(),
        };
        let info = extract_handler(State(state.clone()), Query(query)).await.unwrap();

        let result = delete_cache_handler(State(state.clone()), Path(info.video_hash.clone())).await;
        assert!(result.is_ok());

        let result = delete_cache_handler(State(state), Path(info.video_hash.clone())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    async fn downloaded_record(url: &str, path: PathBuf) -> VideoRecord {
        let extracted = FakeExtractor::new().extract(url).await.unwrap();
        let record = VideoRecord {
            id: extracted.info.video_hash.clone(),
            url: url.to_string(),
            output_path: None,
            info: extracted.info,
            raw_info: extracted.raw,
            download_options: None,
            cached_at: crate::cache::current_timestamp_ms(),
        };
        record.with_download(path, DownloadOptions::for_url(url))
    }

    #[tokio::test]
    async fn test_file_response_streams_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        let payload = vec![7u8; 256 * 1024];
        std::fs::write(&path, &payload).unwrap();

        let record = downloaded_record("https://example.com/watch/clip", path).await;

        let response = file_response(&record, "video/mp4", &[("x-quality", "best".to_string())])
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_LENGTH], payload.len().to_string().as_str());
        assert_eq!(headers[header::CONTENT_TYPE], "video/mp4");
        assert_eq!(headers["x-video-hash"], record.id.as_str());
        assert_eq!(headers["x-quality"], "best");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body.len(), payload.len());
        assert!(body.iter().all(|b| *b == 7));
    }

    #[tokio::test]
    async fn test_file_response_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let record =
            downloaded_record("https://example.com/watch/gone", dir.path().join("gone.mp4")).await;

        let result = file_response(&record, "video/mp4", &[]).await;

        assert!(matches!(result, Err(ApiError::Internal(_))));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
