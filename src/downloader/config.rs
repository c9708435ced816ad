//! Configuration structures and defaults for the downloader.
//!
//! # Examples
//!
//! ```rust
//! use splitfetch::downloader::DownloadCallback;
//! use splitfetch::Summary;
//!
//! let callback: DownloadCallback = Box::new(|summary: &Summary| {
//!     println!(
//!         "{} saved to {} in {:?}",
//!         summary.download().filename,
//!         summary.path().display(),
//!         summary.elapsed()
//!     );
//! });
//! ```

use crate::download::Summary;
use crate::progress::ProgressCallback;
use crate::sink::DEFAULT_BUFFER_SIZE;
use crate::StyleOptions;

use reqwest::header::HeaderMap;
use std::env::current_dir;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

/// Callback type for download completion events
pub type DownloadCallback = Box<dyn Fn(&Summary) + Send + Sync>;

/// Number of workers used when none is configured: one per available CPU.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Configuration structure for the downloader
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Directory where to store the downloaded file.
    pub directory: PathBuf,
    /// Number of parallel connections, one per part.
    pub workers: usize,
    /// Upper bound on a single write, in bytes.
    pub buffer_size: usize,
    /// Downloader style options.
    pub style_options: StyleOptions,
    /// Custom HTTP headers.
    pub headers: Option<HeaderMap>,
    /// Optional proxy configuration.
    pub proxy: Option<reqwest::Proxy>,
    /// Prefix the file name with a hexadecimal nanosecond timestamp.
    pub timestamped: bool,
    /// Callback for when the download completes.
    pub on_complete: Option<Arc<DownloadCallback>>,
    /// Callback for when a part crosses a new integer percentage.
    pub on_progress: Option<Arc<ProgressCallback>>,
}

impl std::fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("directory", &self.directory)
            .field("workers", &self.workers)
            .field("buffer_size", &self.buffer_size)
            .field("style_options", &self.style_options)
            .field("headers", &self.headers)
            .field("proxy", &self.proxy)
            .field("timestamped", &self.timestamped)
            .field("on_complete", &self.on_complete.is_some())
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            directory: current_dir().unwrap_or_default(),
            workers: default_workers(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            style_options: StyleOptions::default(),
            headers: None,
            proxy: None,
            timestamped: false,
            on_complete: None,
            on_progress: None,
        }
    }
}
