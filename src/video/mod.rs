//! Video Module
//!
//! Extraction/download engine boundary and the service that keeps video
//! records in the cache.

mod extractor;
mod service;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
mod ytdlp;

pub use extractor::{ExtractedVideo, ExtractorError, VideoExtractor};
pub use service::VideoService;
pub use ytdlp::{download_args, format_selector, YtDlpExtractor};
