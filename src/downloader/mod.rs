//! Downloader module containing the transfer engine, the builder and configuration.
//!
//! - `engine` - [`Coordinator`], the phase state machine driving the workers
//! - `downloader` - [`Downloader`], fetching a [`Download`](crate::Download) into a file
//! - `builder` - [`DownloaderBuilder`]
//! - `config` - configuration structures and callback types
//!
//! # Examples
//!
//! ```rust
//! use splitfetch::downloader::DownloaderBuilder;
//!
//! // Create a downloader with hidden progress bars
//! let downloader = DownloaderBuilder::hidden().workers(4).build();
//! assert_eq!(downloader.workers(), 4);
//! ```

pub mod builder;
pub mod config;
pub mod downloader;
pub mod engine;

pub use builder::DownloaderBuilder;
pub use config::{default_workers, DownloadCallback, DownloaderConfig};
pub use downloader::Downloader;
pub use engine::{Coordinator, PartSummary, Phase, Transfer};
