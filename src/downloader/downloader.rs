//! The downloader: fetch one URL into a file over parallel connections.
//!
//! # Examples
//!
//! ```rust,no_run
//! use splitfetch::downloader::DownloaderBuilder;
//! use splitfetch::download::Download;
//! use std::convert::TryFrom;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("./downloads"))
//!     .workers(8)
//!     .build();
//!
//! let download = Download::try_from("https://example.com/ubuntu.iso")?;
//! let summary = downloader.download(&download).await?;
//! println!("saved {} bytes to {}", summary.size(), summary.path().display());
//! # Ok(())
//! # }
//! ```

use super::config::DownloaderConfig;
use super::engine::Coordinator;
use crate::download::{Download, Summary};
use crate::error::Result;
use crate::http::{create_http_client, HttpClientConfig, HttpSource};

use reqwest::header::HeaderMap;
use std::fmt;
use std::fmt::Debug;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

/// Represents the download controller.
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main()  {
/// use splitfetch::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().build();
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    config: DownloaderConfig,
}

impl Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .finish()
    }
}

impl Downloader {
    /// Creates a new Downloader with the given configuration.
    pub(crate) fn new(config: DownloaderConfig) -> Self {
        Self { config }
    }

    /// Gets the directory where files will be downloaded.
    pub fn directory(&self) -> &PathBuf {
        &self.config.directory
    }

    /// Gets the number of parallel connections.
    pub fn workers(&self) -> usize {
        self.config.workers
    }

    /// Gets the upper bound on a single write.
    pub fn buffer_size(&self) -> usize {
        self.config.buffer_size
    }

    /// Gets the custom headers.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.config.headers.as_ref()
    }

    /// Gets whether file names are prefixed with a timestamp.
    pub fn timestamped(&self) -> bool {
        self.config.timestamped
    }

    /// Where `download` will be written.
    pub fn output_path(&self, download: &Download) -> PathBuf {
        self.config
            .directory
            .join(download.output_name(self.config.timestamped))
    }

    /// Downloads the file.
    ///
    /// Any failure aborts the whole transfer. A partially written file is
    /// left on disk as is.
    pub async fn download(&self, download: &Download) -> Result<Summary> {
        let client = create_http_client(HttpClientConfig {
            proxy: self.config.proxy.clone(),
            headers: self.config.headers.clone(),
        })?;
        let source = HttpSource::new(client, download.url.clone());

        let output = self.output_path(download);
        let output_dir = output.parent().unwrap_or(&output);
        debug!("Creating destination directory {:?}", output_dir);
        fs::create_dir_all(output_dir).await?;

        let coordinator = Coordinator::new(source)
            .workers(self.config.workers)
            .buffer_size(self.config.buffer_size)
            .style_options(self.config.style_options.clone())
            .progress_callback(self.config.on_progress.clone());

        let transfer = coordinator.run(|_| open_output(&output)).await?;
        info!("Saved {} to {:?}", &download.url, &output);

        let summary = Summary::new(download.clone(), output, transfer);
        if let Some(ref callback) = self.config.on_complete {
            callback(&summary);
        }

        Ok(summary)
    }
}

/// Open the output file for positional writes, truncating earlier content.
async fn open_output(path: &Path) -> Result<Arc<File>> {
    debug!("Creating destination file {:?}", path);
    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await?;
    Ok(Arc::new(file.into_std().await))
}
