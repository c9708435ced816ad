//! Streaming a single part of the resource.
//!
//! [`RangeSource`] is the seam between the transfer engine and the network.
//! The HTTP implementation lives in [`crate::http::HttpSource`]; anything else
//! that can answer a probe and stream a byte range (an in-memory fixture, a
//! mirror list) can drive the same engine.

use super::{partition::ByteRange, probe::Resource};
use crate::error::Result;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use std::fmt;
use tracing::warn;

/// Body of one part, together with the size the server declared for it.
pub struct RangeBody {
    /// Number of bytes the part is expected to deliver.
    pub expected: u64,
    /// The body, chunk by chunk.
    pub stream: BoxStream<'static, Result<Bytes>>,
}

impl RangeBody {
    /// Creates a new [`RangeBody`].
    pub fn new(expected: u64, stream: BoxStream<'static, Result<Bytes>>) -> Self {
        Self { expected, stream }
    }
}

impl fmt::Debug for RangeBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeBody")
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

/// Something that can describe a resource and stream byte ranges of it.
#[async_trait]
pub trait RangeSource: Send + Sync + 'static {
    /// Learn the total size of the resource and whether it can be split.
    async fn probe(&self) -> Result<Resource>;

    /// Stream one part of the resource.
    ///
    /// When `ranged` is `false` the whole resource is requested without a
    /// `Range` header; the partition then holds a single range.
    async fn fetch(&self, range: &ByteRange, ranged: bool) -> Result<RangeBody>;
}

/// Pick the number of bytes a part must deliver.
///
/// The server-declared length wins: some servers clamp ranges, and the write
/// loop drives completion off what the server promised. A mismatch with the
/// requested length is logged.
pub fn resolve_expected(range: &ByteRange, declared: u64) -> u64 {
    if declared != range.len() {
        warn!(
            part = range.index,
            requested = range.len(),
            declared,
            "server declared a different length for {range}"
        );
    }
    declared
}
