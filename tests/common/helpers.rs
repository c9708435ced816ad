#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{
        header::{ACCEPT_RANGES, CONTENT_RANGE, RANGE},
        HeaderMap as AxumHeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use bytes::Bytes;
use futures::{stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH};
use reqwest::Url;
use splitfetch::{ByteRange, Error, OutputTarget, RangeBody, RangeSource, Resource, Result};
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const TEST_URL: &str = "http://fixture.test/data.bin";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates test file content of specified size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

/// Creates random test content of specified size
pub fn create_random_content(size: usize) -> Vec<u8> {
    let mut data = vec![0u8; size];
    rand::fill(&mut data[..]);
    data
}

/// Reads a file written by a transfer
pub fn read_file(path: &Path) -> Vec<u8> {
    std::fs::read(path).expect("Failed to read output file")
}

// === In-memory source ===

/// A [`RangeSource`] serving a byte buffer, with knobs to misbehave.
pub struct MemorySource {
    data: Bytes,
    accept_ranges: Option<&'static str>,
    chunk_size: usize,
    chunk_delay: Option<Duration>,
    truncated_part: Option<usize>,
    failing_part: Option<usize>,
    declared_part: Option<(usize, u64)>,
    fetches: Mutex<Vec<(ByteRange, bool)>>,
}

impl MemorySource {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: Bytes::from(data),
            accept_ranges: Some("bytes"),
            chunk_size: 64,
            chunk_delay: None,
            truncated_part: None,
            failing_part: None,
            declared_part: None,
            fetches: Mutex::new(Vec::new()),
        }
    }

    /// Value of the `Accept-Ranges` header, `None` to omit it.
    pub fn accept_ranges(mut self, value: Option<&'static str>) -> Self {
        self.accept_ranges = value;
        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Sleep before yielding every chunk.
    pub fn chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = Some(delay);
        self
    }

    /// The body of this part stops halfway while declaring its full length.
    pub fn truncate_part(mut self, index: usize) -> Self {
        self.truncated_part = Some(index);
        self
    }

    /// This part declares, and sends, `declared` bytes from its start
    /// whatever the length of its range.
    pub fn declare_part(mut self, index: usize, declared: u64) -> Self {
        self.declared_part = Some((index, declared));
        self
    }

    /// Fetching this part fails with a network-like error.
    pub fn fail_part(mut self, index: usize) -> Self {
        self.failing_part = Some(index);
        self
    }

    /// Every fetch issued so far, with its `ranged` flag.
    pub fn fetches(&self) -> Vec<(ByteRange, bool)> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl RangeSource for MemorySource {
    async fn probe(&self) -> Result<Resource> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from(self.data.len() as u64));
        if let Some(value) = self.accept_ranges {
            headers.insert(reqwest::header::ACCEPT_RANGES, HeaderValue::from_static(value));
        }
        Resource::from_headers(Url::parse(TEST_URL).unwrap(), &headers)
    }

    async fn fetch(&self, range: &ByteRange, ranged: bool) -> Result<RangeBody> {
        self.fetches.lock().unwrap().push((range.clone(), ranged));
        if self.failing_part == Some(range.index) {
            return Err(Error::Internal(format!("connection refused for part {}", range.index)));
        }

        let mut body = match self.declared_part {
            Some((index, declared)) if index == range.index => {
                let start = range.start as usize;
                let end = (start + declared as usize).min(self.data.len());
                self.data.slice(start..end)
            }
            _ if ranged => self.data.slice(range.start as usize..=range.end as usize),
            _ => self.data.clone(),
        };
        let expected = body.len() as u64;
        if self.truncated_part == Some(range.index) {
            body.truncate(body.len() / 2);
        }

        let mut chunks = Vec::new();
        while !body.is_empty() {
            let n = self.chunk_size.min(body.len());
            chunks.push(Ok(body.split_to(n)));
        }

        let stream = match self.chunk_delay {
            Some(delay) => stream::iter(chunks)
                .then(move |chunk| async move {
                    tokio::time::sleep(delay).await;
                    chunk
                })
                .boxed(),
            None => stream::iter(chunks).boxed(),
        };
        Ok(RangeBody::new(expected, stream))
    }
}

// === Output targets ===

/// Creates an empty in-memory output target
pub fn memory_target() -> Arc<Mutex<Vec<u8>>> {
    Arc::new(Mutex::new(Vec::new()))
}

/// Persists only part of any write that starts at or after `from`.
pub struct ShortWriteTarget {
    pub inner: Mutex<Vec<u8>>,
    pub from: u64,
}

impl ShortWriteTarget {
    pub fn new(from: u64) -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
            from,
        }
    }
}

impl OutputTarget for ShortWriteTarget {
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<usize> {
        let n = if offset >= self.from {
            buf.len().saturating_sub(1)
        } else {
            buf.len()
        };
        self.inner.write_at(&buf[..n], offset)
    }
}

// === HTTP fixture server ===

/// Serves `data` on loopback:
///
/// - `/file.bin` honours `Range` requests
/// - `/no-ranges.bin` declares `Accept-Ranges: none`
/// - `/items.bin` declares `Accept-Ranges: items`
/// - `/ignores-range.bin` omits `Accept-Ranges` and always sends everything
pub async fn spawn_server(data: Vec<u8>) -> SocketAddr {
    let app = Router::new()
        .route("/file.bin", get(serve_ranged))
        .route("/no-ranges.bin", get(serve_no_ranges))
        .route("/items.bin", get(serve_items))
        .route("/ignores-range.bin", get(serve_ignoring_range))
        .with_state(Arc::new(data));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read server address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    addr
}

/// URL of `path` on the fixture server.
pub fn server_url(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}

fn parse_range_header(value: &str) -> Option<(usize, usize)> {
    let (start, end) = value.strip_prefix("bytes=")?.split_once('-')?;
    Some((start.parse().ok()?, end.parse().ok()?))
}

async fn serve_ranged(State(data): State<Arc<Vec<u8>>>, headers: AxumHeaderMap) -> Response {
    let total = data.len();
    let requested = headers
        .get(RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_range_header);

    match requested {
        Some((start, end)) if start < total => {
            let end = end.min(total - 1);
            (
                StatusCode::PARTIAL_CONTENT,
                [
                    (ACCEPT_RANGES, "bytes".to_string()),
                    (CONTENT_RANGE, format!("bytes {start}-{end}/{total}")),
                ],
                data[start..=end].to_vec(),
            )
                .into_response()
        }
        _ => ([(ACCEPT_RANGES, "bytes")], data.to_vec()).into_response(),
    }
}

async fn serve_no_ranges(State(data): State<Arc<Vec<u8>>>) -> Response {
    ([(ACCEPT_RANGES, "none")], data.to_vec()).into_response()
}

async fn serve_items(State(data): State<Arc<Vec<u8>>>) -> Response {
    ([(ACCEPT_RANGES, "items")], data.to_vec()).into_response()
}

async fn serve_ignoring_range(State(data): State<Arc<Vec<u8>>>) -> Response {
    data.to_vec().into_response()
}
