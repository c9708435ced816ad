//! Header parsing for range downloads.
//!
//! These helpers read the handful of response headers the transfer relies
//! on: `Content-Length` for the size of a body, `Accept-Ranges` for range
//! support and `Content-Range` for the slice a partial response carries.

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE};

/// Read the `Content-Length` header as a byte count.
///
/// A missing header and a value that is not a non-negative integer are both
/// errors, the transfer cannot be planned or verified without it.
///
/// ```rust
/// use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH};
/// use splitfetch::utils::parse_content_length;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(CONTENT_LENGTH, HeaderValue::from_static("1024"));
/// assert_eq!(parse_content_length(&headers).unwrap(), 1024);
/// ```
pub fn parse_content_length(headers: &HeaderMap) -> Result<u64> {
    let value = headers
        .get(CONTENT_LENGTH)
        .ok_or(Error::MissingContentLength)?;
    let text = value
        .to_str()
        .map_err(|_| Error::InvalidContentLength(String::from_utf8_lossy(value.as_bytes()).into()))?;
    text.trim()
        .parse::<u64>()
        .map_err(|_| Error::InvalidContentLength(text.to_string()))
}

/// Check the `Accept-Ranges` header.
///
/// Passes when the header is absent (ranges are assumed to work) or lists the
/// `bytes` unit. Anything else, `none` included, is an error: the transfer
/// must abort rather than quietly fall back to a single connection.
pub fn check_accept_ranges(headers: &HeaderMap) -> Result<()> {
    let Some(value) = headers.get(ACCEPT_RANGES) else {
        return Ok(());
    };
    let text = value
        .to_str()
        .map_err(|_| Error::UnsupportedRangeUnit(String::from_utf8_lossy(value.as_bytes()).into()))?
        .trim();

    if text
        .split(',')
        .map(str::trim)
        .any(|unit| unit.eq_ignore_ascii_case("bytes"))
    {
        return Ok(());
    }
    Err(Error::UnsupportedRangeUnit(text.to_string()))
}

/// Parse a `Content-Range` value of the form `bytes start-end/total`.
///
/// Returns the start and end offsets and the total size, which is `None` when
/// the server sends `*`.
///
/// ```rust
/// use splitfetch::utils::parse_content_range;
///
/// assert_eq!(parse_content_range("bytes 200-1023/2048"), Some((200, 1023, Some(2048))));
/// assert_eq!(parse_content_range("bytes 0-9/*"), Some((0, 9, None)));
/// assert_eq!(parse_content_range("invalid"), None);
/// ```
pub fn parse_content_range(content_range: &str) -> Option<(u64, u64, Option<u64>)> {
    let rest = content_range.trim().strip_prefix("bytes")?.trim_start();
    let (span, total) = rest.split_once('/')?;
    let (start, end) = span.trim().split_once('-')?;
    let start = start.trim().parse::<u64>().ok()?;
    let end = end.trim().parse::<u64>().ok()?;
    let total = match total.trim() {
        "*" => None,
        t => Some(t.parse::<u64>().ok()?),
    };
    (start <= end).then_some((start, end, total))
}

/// Start offset of the `Content-Range` header, if the response carries one.
pub fn content_range_start(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_content_range)
        .map(|(start, _, _)| start)
}
