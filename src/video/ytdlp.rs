//! yt-dlp backed extractor
//!
//! Runs the yt-dlp binary as a child process for metadata and downloads.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use super::extractor::{ExtractedVideo, ExtractorError, VideoExtractor};
use crate::models::DownloadOptions;

const AUDIO_FORMATS: &[&str] = &["m4a", "wav", "mp3"];

#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    binary: PathBuf,
}

impl YtDlpExtractor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: &[String]) -> Result<String, ExtractorError> {
        debug!("Running {} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ExtractorError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

#[async_trait]
impl VideoExtractor for YtDlpExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedVideo, ExtractorError> {
        let args = [
            "--dump-single-json",
            "--no-playlist",
            "--no-warnings",
            "--skip-download",
            url,
        ]
        .map(str::to_string);

        let stdout = self.run(&args).await?;
        let raw: serde_json::Value = serde_json::from_str(stdout.trim())?;
        Ok(ExtractedVideo::from_raw(url, raw))
    }

    async fn download(
        &self,
        options: &DownloadOptions,
        output_stem: &Path,
    ) -> Result<PathBuf, ExtractorError> {
        let args = download_args(options, output_stem);
        info!("Downloading {} ({})", options.url, format_selector(options));

        let stdout = self.run(&args).await?;

        // `--print after_move:filepath` emits the final path last
        let printed = stdout.lines().rev().find(|line| !line.trim().is_empty());
        let mut candidates: Vec<PathBuf> =
            printed.map(|p| PathBuf::from(p.trim())).into_iter().collect();
        candidates.push(output_stem.with_extension(&options.file_format));

        for candidate in candidates {
            if tokio::fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
                return Ok(candidate);
            }
        }

        Err(ExtractorError::MissingOutput(
            output_stem.with_extension(&options.file_format).display().to_string(),
        ))
    }
}

// == Format Selection ==
/// Builds the yt-dlp `-f` selector for `options`.
///
/// An explicit `format_code` wins. Otherwise height comes from
/// `resolution`, falling back to the quality tier, and `fps` caps the
/// frame rate.
pub fn format_selector(options: &DownloadOptions) -> String {
    if let Some(code) = options.format_code.as_deref().filter(|c| !c.is_empty()) {
        return code.to_string();
    }

    let worst = options.quality == "worst";
    if options.audio_only {
        return if worst { "worstaudio" } else { "bestaudio" }.to_string();
    }

    let max_height = options.resolution_height().or(match options.quality.as_str() {
        "high" => Some(1080),
        "medium" => Some(720),
        "low" => Some(480),
        _ => None,
    });

    let mut filter = String::new();
    if let Some(height) = max_height {
        filter.push_str(&format!("[height<={}]", height));
    }
    if let Some(fps) = options.fps {
        filter.push_str(&format!("[fps<={}]", fps));
    }

    match (options.video_only, worst) {
        (true, true) => format!("worstvideo{}", filter),
        (true, false) => format!("bestvideo{}", filter),
        (false, true) if filter.is_empty() => "worst".to_string(),
        (false, true) => format!("wv*{f}+wa/w{f}", f = filter),
        (false, false) => format!("bv*{f}+ba/b{f}", f = filter),
    }
}

/// Full argument list for a download of `options` into `output_stem`.
pub fn download_args(options: &DownloadOptions, output_stem: &Path) -> Vec<String> {
    let mut args = vec![
        "--no-playlist".to_string(),
        "--no-warnings".to_string(),
        "-f".to_string(),
        format_selector(options),
        "-o".to_string(),
        format!("{}.%(ext)s", output_stem.display()),
        "--print".to_string(),
        "after_move:filepath".to_string(),
    ];

    let audio_target = AUDIO_FORMATS.contains(&options.file_format.as_str());
    if audio_target {
        args.extend([
            "-x".to_string(),
            "--audio-format".to_string(),
            options.file_format.clone(),
            "--audio-quality".to_string(),
            format!("{}K", options.audio_quality),
        ]);
    } else if !options.audio_only {
        args.extend([
            "--merge-output-format".to_string(),
            options.file_format.clone(),
        ]);
    }

    args.push(options.url.clone());
    args
}
