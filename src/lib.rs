//! splitfetch downloads a single HTTP(S) resource over parallel connections.
//!
//! The resource is probed for its size and range support, split into
//! contiguous byte ranges, and every range is fetched by its own worker and
//! written straight into its offset of one output file. The result is
//! byte-for-byte what a single unranged GET would have produced.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use splitfetch::{Download, DownloaderBuilder, Error};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let download = Download::try_from("https://github.com/seanmonstar/reqwest/archive/refs/tags/v0.11.9.zip")?;
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("output"))
//!     .workers(8)
//!     .build();
//! let summary = downloader.download(&download).await?;
//! println!("{} bytes in {:?}", summary.size(), summary.elapsed());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`range`] - probing results, partitioning into byte ranges, the [`RangeSource`] seam
//! - [`http`] - the HTTP client and [`HttpSource`]
//! - [`sink`] - output targets and the per-worker write loop
//! - [`progress`] - per-part progress accounting and progress bars
//! - [`downloader`] - the [`Coordinator`] engine and the [`Downloader`] front door
//! - [`download`] - [`Download`] targets and [`Summary`] results
//! - [`error`] - the [`Error`] enum
//! - [`utils`] - header parsing

pub mod download;
pub mod downloader;
pub mod error;
pub mod http;
pub mod progress;
pub mod range;
pub mod sink;
pub mod utils;

pub use download::{Download, Summary};
pub use downloader::{Coordinator, Downloader, DownloaderBuilder, Phase, Transfer};
pub use error::{Error, Result};
pub use http::{create_http_client, HttpClientConfig, HttpSource};
pub use progress::{PartSnapshot, ProgressBarOpts, ProgressSnapshot, StyleOptions};
pub use range::{partition, ByteRange, RangeBody, RangeSource, Resource};
pub use sink::OutputTarget;
