//! Probing and range requests over HTTP(S).

use crate::error::{Error, Result};
use crate::range::{fetch::resolve_expected, ByteRange, RangeBody, RangeSource, Resource};
use crate::utils::headers::{content_range_start, parse_content_length};

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::{header::RANGE, StatusCode, Url};
use reqwest_middleware::ClientWithMiddleware;
use tracing::debug;

/// A [`RangeSource`] backed by an HTTP server.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: ClientWithMiddleware,
    url: Url,
}

impl HttpSource {
    /// Creates a new [`HttpSource`] for `url`.
    pub fn new(client: ClientWithMiddleware, url: Url) -> Self {
        Self { client, url }
    }

    /// Location of the resource.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl RangeSource for HttpSource {
    /// Issue a plain GET and read the size and range support from its headers.
    ///
    /// The body is never read; the response is dropped as soon as the headers
    /// are parsed.
    async fn probe(&self) -> Result<Resource> {
        debug!("Probing {}", &self.url);
        let res = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?;
        Resource::from_headers(self.url.clone(), res.headers())
    }

    async fn fetch(&self, range: &ByteRange, ranged: bool) -> Result<RangeBody> {
        let mut req = self.client.get(self.url.clone());
        if ranged {
            debug!(part = range.index, "Requesting {}", range);
            req = req.header(RANGE, range.header_value());
        }

        let res = req.send().await?.error_for_status()?;

        let declared = parse_content_length(res.headers())?;
        if ranged {
            // A full response is only acceptable when it is exactly the range.
            if res.status() == StatusCode::OK && (range.start != 0 || declared != range.len()) {
                return Err(Error::RangeIgnored);
            }
            if let Some(actual) = content_range_start(res.headers()) {
                if actual != range.start {
                    return Err(Error::RangeMismatch {
                        requested: range.start,
                        actual,
                    });
                }
            }
        }

        let expected = resolve_expected(range, declared);
        let stream = res.bytes_stream().map_err(Error::from).boxed();

        Ok(RangeBody::new(expected, stream))
    }
}
