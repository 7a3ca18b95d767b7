//! Video record lifecycle
//!
//! Populates the default cache from extraction results, attaches download
//! artifacts to existing records, and serves both back by video hash.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use super::extractor::VideoExtractor;
use crate::cache::{current_timestamp_ms, CacheManager, CacheStats, Registry};
use crate::error::ApiError;
use crate::models::{validate_url, CachedVideoSummary, DownloadOptions, VideoInfo, VideoRecord};

type ApiResult<T> = std::result::Result<T, ApiError>;

// == Video Service ==
/// Reads and writes [`VideoRecord`]s through the registry's default cache.
///
/// Expiry only drops the record; a downloaded file stays on disk and is
/// reused only while a live record still points at it.
#[derive(Clone)]
pub struct VideoService {
    registry: Arc<Registry<VideoRecord>>,
    extractor: Arc<dyn VideoExtractor>,
    download_dir: PathBuf,
}

impl VideoService {
    pub fn new(
        registry: Arc<Registry<VideoRecord>>,
        extractor: Arc<dyn VideoExtractor>,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            extractor,
            download_dir: download_dir.into(),
        }
    }

    pub fn registry(&self) -> &Arc<Registry<VideoRecord>> {
        &self.registry
    }

    fn cache(&self) -> ApiResult<Arc<CacheManager<VideoRecord>>> {
        Ok(self.registry.get_default()?)
    }

    // == Extract ==
    /// Extracts metadata for `url` and writes it to the cache.
    ///
    /// A live record under the same key keeps its artifact, so re-extracting
    /// a downloaded video does not forget the file.
    pub async fn extract(&self, url: &str) -> ApiResult<VideoRecord> {
        if let Some(msg) = validate_url(url) {
            return Err(ApiError::InvalidRequest(msg));
        }

        let extracted = self.extractor.extract(url).await?;
        let cache = self.cache()?;
        let key = extracted.info.video_hash.clone();

        let mut record = VideoRecord {
            id: key.clone(),
            url: url.to_string(),
            output_path: None,
            info: extracted.info,
            raw_info: extracted.raw,
            download_options: None,
            cached_at: current_timestamp_ms(),
        };

        if let Some(existing) = cache.get(&key) {
            if let Some(path) = existing.artifact() {
                record.output_path = Some(path.clone());
                record.download_options = existing.download_options.clone();
            }
        }

        cache.set_with_default_ttl(key.clone(), record.clone());
        info!("Cached metadata for {} as {}", url, key);
        Ok(record)
    }

    // == Info ==
    pub fn info(&self, video_hash: &str) -> ApiResult<VideoInfo> {
        self.cache()?
            .get(video_hash)
            .map(|record| record.info)
            .ok_or_else(|| ApiError::NotFound("Video hash not found in cache".to_string()))
    }

    // == Download ==
    /// Extracts, then downloads `options.url` unless the cached record
    /// already holds an artifact produced with the same options.
    pub async fn download(&self, options: DownloadOptions) -> ApiResult<VideoRecord> {
        if let Some(msg) = options.validate() {
            return Err(ApiError::InvalidRequest(msg));
        }

        let record = self.extract(&options.url).await?;
        if record.artifact().is_some() && record.download_options.as_ref() == Some(&options) {
            debug!("Reusing downloaded file for {}", record.id);
            return Ok(record);
        }

        self.fetch(record, options).await
    }

    /// Downloads a previously extracted video by its hash.
    pub async fn download_by_hash(&self, video_hash: &str) -> ApiResult<VideoRecord> {
        let record = self.cache()?.get(video_hash).ok_or_else(|| {
            ApiError::NotFound(
                "Video hash not found in cache. Please extract info first.".to_string(),
            )
        })?;

        if record.artifact().is_some() {
            debug!("Reusing downloaded file for {}", record.id);
            return Ok(record);
        }

        let options = record
            .download_options
            .clone()
            .unwrap_or_else(|| DownloadOptions::for_url(&record.url));
        self.fetch(record, options).await
    }

    async fn fetch(&self, record: VideoRecord, options: DownloadOptions) -> ApiResult<VideoRecord> {
        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .map_err(|e| ApiError::Internal(format!("cannot create download dir: {}", e)))?;

        let stem = self.download_dir.join(&record.id);
        let path = self
            .extractor
            .download(&options, &stem)
            .await
            .map_err(|e| ApiError::Download(e.to_string()))?;

        let record = record.with_download(path, options);
        self.cache()?
            .set_with_default_ttl(record.id.clone(), record.clone());
        info!(
            "Downloaded {} to {}",
            record.id,
            record.output_path.as_deref().unwrap_or(stem.as_path()).display()
        );
        Ok(record)
    }

    // == Status ==
    /// Summaries of every live record, ordered by hash, with store counters.
    pub fn status(&self) -> ApiResult<(Vec<CachedVideoSummary>, CacheStats)> {
        let cache = self.cache()?;
        let mut summaries: Vec<CachedVideoSummary> = cache
            .items()
            .into_iter()
            .map(|(hash, record)| CachedVideoSummary {
                expires_in_seconds: cache.get_ttl(&hash),
                age_seconds: age_seconds(record.cached_at),
                downloaded: record.output_path.is_some(),
                video_hash: hash,
                title: record.info.title,
                platform: record.info.platform,
                video_id: record.info.video_id,
                url: record.url,
            })
            .collect();
        summaries.sort_by(|a, b| a.video_hash.cmp(&b.video_hash));
        Ok((summaries, cache.stats()))
    }

    // == Evict ==
    pub fn evict(&self, video_hash: &str) -> ApiResult<()> {
        if self.cache()?.delete(video_hash) {
            info!("Evicted {} from cache", video_hash);
            Ok(())
        } else {
            Err(ApiError::NotFound("Video hash not found in cache".to_string()))
        }
    }
}

/// Seconds since `cached_at`, rounded to two decimals.
fn age_seconds(cached_at: u64) -> f64 {
    let ms = current_timestamp_ms().saturating_sub(cached_at);
    (ms as f64 / 10.0).round() / 100.0
}
