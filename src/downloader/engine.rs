//! The transfer engine.
//!
//! [`Coordinator`] drives one transfer through its phases:
//!
//! ```text
//! Probing -> Partitioning -> Downloading -> Finalizing -> Done
//!     \____________\_____________\______________\______-> Failed
//! ```
//!
//! One worker task is spawned per range. Workers share the output target and
//! write only inside their own range, so the target needs no lock. The first
//! worker failure cancels the others; the coordinator waits for all of them to
//! unwind before it returns the error.

use super::config::default_workers;
use crate::error::{Error, Result};
use crate::progress::{PartProgress, Progress, ProgressCallback, ProgressDisplay, StyleOptions};
use crate::range::{plan, ByteRange, RangeSource, Resource};
use crate::sink::{write_range, OutputTarget, DEFAULT_BUFFER_SIZE};

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Phase of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing happened yet.
    Idle,
    /// Learning the size and range support of the resource.
    Probing,
    /// Computing the byte ranges.
    Partitioning,
    /// Workers are fetching and writing their parts.
    Downloading,
    /// Every part is written, the output is being flushed.
    Finalizing,
    /// The transfer succeeded.
    Done,
    /// The transfer failed.
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Probing => "probing",
            Phase::Partitioning => "partitioning",
            Phase::Downloading => "downloading",
            Phase::Finalizing => "finalizing",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of one part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartSummary {
    /// Byte range of the part.
    pub range: ByteRange,
    /// Bytes written for the part.
    pub bytes_written: u64,
}

/// Outcome of a successful transfer.
#[derive(Debug, Clone)]
pub struct Transfer {
    /// The probed resource.
    pub resource: Resource,
    /// One entry per part, ordered by index.
    pub parts: Vec<PartSummary>,
    /// Time from the probe to the flushed output.
    pub elapsed: Duration,
}

impl Transfer {
    /// Bytes written across all parts.
    pub fn bytes_written(&self) -> u64 {
        self.parts.iter().map(|p| p.bytes_written).sum()
    }
}

/// Orchestrates a parallel ranged transfer from a [`RangeSource`].
///
/// ```rust,no_run
/// use splitfetch::downloader::Coordinator;
/// use splitfetch::http::{create_http_client, HttpClientConfig, HttpSource};
/// use reqwest::Url;
/// use std::{fs::File, sync::Arc};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = create_http_client(HttpClientConfig::default())?;
/// let source = HttpSource::new(client, Url::parse("https://example.com/file.iso")?);
///
/// let transfer = Coordinator::new(source)
///     .workers(8)
///     .run(|_resource| async {
///         let file = File::create("file.iso")?;
///         Ok::<_, splitfetch::Error>(Arc::new(file))
///     })
///     .await?;
/// println!("{} bytes in {:?}", transfer.bytes_written(), transfer.elapsed);
/// # Ok(())
/// # }
/// ```
pub struct Coordinator<S> {
    source: Arc<S>,
    workers: usize,
    buffer_size: usize,
    style_options: StyleOptions,
    on_progress: Option<Arc<ProgressCallback>>,
    phase: watch::Sender<Phase>,
}

impl<S> fmt::Debug for Coordinator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("workers", &self.workers)
            .field("buffer_size", &self.buffer_size)
            .field("phase", &*self.phase.borrow())
            .finish_non_exhaustive()
    }
}

impl<S: RangeSource> Coordinator<S> {
    /// Creates a coordinator with one worker per available CPU and hidden
    /// progress bars.
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            workers: default_workers(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            style_options: StyleOptions::hidden(),
            on_progress: None,
            phase: watch::Sender::new(Phase::Idle),
        }
    }

    /// Set the number of parallel workers.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the upper bound on a single write.
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// Set the progress bar style options.
    pub fn style_options(mut self, style_options: StyleOptions) -> Self {
        self.style_options = style_options;
        self
    }

    /// Set the callback invoked when a part crosses a new integer percentage.
    pub fn on_progress<F>(self, callback: F) -> Self
    where
        F: Fn(&crate::progress::PartSnapshot) + Send + Sync + 'static,
    {
        self.progress_callback(Some(Arc::new(Box::new(callback))))
    }

    pub(crate) fn progress_callback(mut self, callback: Option<Arc<ProgressCallback>>) -> Self {
        self.on_progress = callback;
        self
    }

    /// Current phase of the transfer.
    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Watch the phase transitions of the transfer.
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// Run the transfer.
    ///
    /// `open` is called once the resource is partitioned and before any
    /// worker starts; the target it resolves to is shared by every worker and
    /// dropped once the transfer is over.
    pub async fn run<T, F, Fut>(&self, open: F) -> Result<Transfer>
    where
        T: OutputTarget,
        F: FnOnce(&Resource) -> Fut,
        Fut: Future<Output = Result<Arc<T>>>,
    {
        let started = Instant::now();
        let result = self.drive(open, started).await;
        if let Err(ref e) = result {
            warn!(phase = %self.phase(), "Transfer failed: {}", e);
            self.enter(Phase::Failed);
        }
        result
    }

    fn enter(&self, next: Phase) {
        let previous = self.phase.send_replace(next);
        debug!(from = %previous, to = %next, "Transfer phase changed");
    }

    async fn drive<T, F, Fut>(&self, open: F, started: Instant) -> Result<Transfer>
    where
        T: OutputTarget,
        F: FnOnce(&Resource) -> Fut,
        Fut: Future<Output = Result<Arc<T>>>,
    {
        self.enter(Phase::Probing);
        let resource = self.source.probe().await?;
        info!(
            url = %resource.url,
            size = resource.total_size,
            ranged = resource.range_supported,
            "Probed resource"
        );

        self.enter(Phase::Partitioning);
        let ranges = plan(&resource, self.workers)?;
        debug!(parts = ranges.len(), "Partitioned resource");

        self.enter(Phase::Downloading);
        let target = open(&resource).await?;
        let display = ProgressDisplay::new(self.style_options.clone(), resource.total_size);
        let progress = Progress::new(&ranges, display, self.on_progress.clone());

        let parts = match self
            .download_parts(resource.range_supported, &ranges, &target, &progress)
            .await
            .and_then(|parts| check_complete(&resource, parts))
        {
            Ok(parts) => parts,
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        };
        progress.wait_all().await;

        self.enter(Phase::Finalizing);
        let flushed = target.clone();
        tokio::task::spawn_blocking(move || flushed.flush()).await??;
        drop(target);
        progress.finish();

        self.enter(Phase::Done);
        let transfer = Transfer {
            resource,
            parts,
            elapsed: started.elapsed(),
        };
        info!(
            bytes = transfer.bytes_written(),
            elapsed = ?transfer.elapsed,
            "Transfer complete"
        );
        Ok(transfer)
    }

    /// Spawn one worker per range and wait for every one of them.
    async fn download_parts<T: OutputTarget>(
        &self,
        ranged: bool,
        ranges: &[ByteRange],
        target: &Arc<T>,
        progress: &Progress,
    ) -> Result<Vec<PartSummary>> {
        let cancel = CancellationToken::new();
        let mut workers = JoinSet::new();
        for (range, part) in ranges.iter().zip(progress.parts()) {
            workers.spawn(run_worker(
                self.source.clone(),
                target.clone(),
                range.clone(),
                part.clone(),
                ranged,
                self.buffer_size,
                cancel.child_token(),
            ));
        }

        let mut parts = Vec::with_capacity(ranges.len());
        let mut failure: Option<Error> = None;
        while let Some(joined) = workers.join_next().await {
            match joined.map_err(Error::from).and_then(|outcome| outcome) {
                Ok(part) => parts.push(part),
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    if failure.is_none() {
                        warn!("{}; stopping the remaining parts", e);
                        cancel.cancel();
                        failure = Some(e);
                    }
                }
            }
        }

        if let Some(e) = failure {
            return Err(e);
        }
        parts.sort_by_key(|p| p.range.index);
        Ok(parts)
    }
}

/// Make sure the parts add up to the whole resource.
///
/// Each part is complete once it wrote what the server declared for it, which
/// can be less than its range. The first part short of its range is blamed.
fn check_complete(resource: &Resource, parts: Vec<PartSummary>) -> Result<Vec<PartSummary>> {
    let written: u64 = parts.iter().map(|p| p.bytes_written).sum();
    if written == resource.total_size {
        return Ok(parts);
    }

    let err = Error::IncompletePart {
        written,
        expected: resource.total_size,
    };
    match parts.iter().find(|p| p.bytes_written != p.range.len()) {
        Some(short) => Err(err.in_part(&short.range)),
        None => Err(err),
    }
}

/// Fetch one range and write it into the target.
async fn run_worker<S, T>(
    source: Arc<S>,
    target: Arc<T>,
    range: ByteRange,
    part: Arc<PartProgress>,
    ranged: bool,
    buffer_size: usize,
    cancel: CancellationToken,
) -> Result<PartSummary>
where
    S: RangeSource,
    T: OutputTarget,
{
    let body = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(Error::Cancelled),
        body = source.fetch(&range, ranged) => body.map_err(|e| e.in_part(&range))?,
    };
    debug!(part = range.index, expected = body.expected, "Fetching {}", range);
    part.set_expected(body.expected);

    let bytes_written = write_range(
        target,
        &range,
        body.expected,
        body.stream,
        &part,
        buffer_size,
        &cancel,
    )
    .await
    .map_err(|e| e.in_part(&range))?;

    part.finish();
    Ok(PartSummary {
        range,
        bytes_written,
    })
}
