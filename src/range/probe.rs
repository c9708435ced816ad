//! What the server told us about the resource before the transfer.

use crate::error::Result;
use crate::utils::headers::{check_accept_ranges, parse_content_length};
use reqwest::{header::HeaderMap, Url};

/// A remote resource, as learned from the probe request.
///
/// Immutable once probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Location of the resource.
    pub url: Url,
    /// Size of the resource in bytes.
    pub total_size: u64,
    /// Whether the server serves byte ranges of the resource.
    pub range_supported: bool,
}

impl Resource {
    /// Build a [`Resource`] from the headers of a probe response.
    ///
    /// Fails when `Content-Length` is missing or malformed, or when the server
    /// declares anything other than the `bytes` range unit, `none` included.
    ///
    /// ```rust
    /// use reqwest::{header::{HeaderMap, HeaderValue, CONTENT_LENGTH}, Url};
    /// use splitfetch::range::Resource;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert(CONTENT_LENGTH, HeaderValue::from_static("1000"));
    /// let url = Url::parse("https://example.com/file.iso")?;
    /// let resource = Resource::from_headers(url, &headers)?;
    /// assert_eq!(resource.total_size, 1000);
    /// assert!(resource.range_supported);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_headers(url: Url, headers: &HeaderMap) -> Result<Self> {
        let total_size = parse_content_length(headers)?;
        check_accept_ranges(headers)?;
        Ok(Self {
            url,
            total_size,
            range_supported: true,
        })
    }
}
