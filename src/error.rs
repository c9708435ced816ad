//! Error handling for the splitfetch library.
//!
//! Every failure in probing, partitioning or downloading is fatal to the run.
//! Failures raised inside a worker are wrapped in [`Error::Part`] so the caller
//! can tell which byte range broke and why.

use crate::range::ByteRange;
use std::io;
use thiserror::Error;

/// Errors that can happen when using splitfetch.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    ///
    /// This variant captures internal errors that don't fit into other categories.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// I/O Error.
    ///
    /// Raised when opening, writing or syncing the output file fails.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error from the HTTP middleware stack.
    #[error("HTTP middleware error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },

    /// A worker task panicked or was aborted by the runtime.
    #[error("worker task failed")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },

    /// The response carried no `Content-Length` header.
    #[error("missing Content-Length header")]
    MissingContentLength,

    /// The `Content-Length` header could not be read as a byte count.
    #[error("malformed Content-Length header: {0:?}")]
    InvalidContentLength(String),

    /// The server declared a range unit this crate cannot partition on.
    #[error("server accepts ranges in unit {0:?}, expected \"bytes\"")]
    UnsupportedRangeUnit(String),

    /// Partitioning needs at least one worker.
    #[error("invalid worker count {0}, at least one worker is required")]
    InvalidWorkerCount(usize),

    /// A ranged request was answered with the full resource.
    #[error("server ignored the Range header and sent the whole resource")]
    RangeIgnored,

    /// The `Content-Range` of a response does not start where it was asked to.
    #[error("server answered with range starting at {actual}, requested {requested}")]
    RangeMismatch { requested: u64, actual: u64 },

    /// The output target persisted fewer bytes than it was handed.
    #[error("short write: {written} of {requested} bytes persisted")]
    ShortWrite { written: usize, requested: usize },

    /// The response body ran past the end of its assigned range.
    #[error("received data beyond the end of the range at offset {offset}")]
    Overrun { offset: u64 },

    /// The stream ended before the expected number of bytes arrived.
    #[error("incomplete part: {written} of {expected} bytes written")]
    IncompletePart { written: u64, expected: u64 },

    /// The worker was told to stop because another part failed.
    #[error("transfer cancelled")]
    Cancelled,

    /// A worker failure, tagged with the part that raised it.
    #[error("part {index} ({range}) failed: {source}")]
    Part {
        index: usize,
        range: ByteRange,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the failing part to an error raised inside a worker.
    ///
    /// Cancellations and already tagged errors pass through untouched.
    pub(crate) fn in_part(self, range: &ByteRange) -> Self {
        match self {
            Error::Cancelled | Error::Part { .. } => self,
            other => Error::Part {
                index: range.index,
                range: range.clone(),
                source: Box::new(other),
            },
        }
    }

    /// Returns `true` if this error only reports a cooperative stop.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Result type alias for operations that can fail with a splitfetch error.
pub type Result<T> = std::result::Result<T, Error>;
