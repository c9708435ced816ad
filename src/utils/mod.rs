//! Shared utility functions.
//!
//! - [`headers`] - parsing of `Content-Length`, `Accept-Ranges` and `Content-Range`

pub mod headers;

pub use headers::{
    check_accept_ranges, content_range_start, parse_content_length, parse_content_range,
};
