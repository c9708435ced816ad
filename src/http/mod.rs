//! HTTP module containing the network side of a transfer.
//!
//! - [`client`] - HTTP client creation and middleware configuration
//! - [`source`] - [`HttpSource`], the [`RangeSource`](crate::range::RangeSource) over HTTP(S)
//!
//! # Examples
//!
//! ```rust,no_run
//! use splitfetch::http::{create_http_client, HttpClientConfig, HttpSource};
//! use splitfetch::range::RangeSource;
//! use reqwest::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_http_client(HttpClientConfig::default())?;
//! let source = HttpSource::new(client, Url::parse("https://example.com/file.iso")?);
//! let resource = source.probe().await?;
//! println!("{} bytes, ranges supported: {}", resource.total_size, resource.range_supported);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod source;

pub use client::{create_http_client, HttpClientConfig};
pub use source::HttpSource;
