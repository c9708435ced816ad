//! Per-part progress accounting.
//!
//! [`Progress`] is created once per transfer with one [`PartProgress`] per
//! range. The list never changes after creation; each worker gets its own
//! handle and is the only writer of it. Progress is observational only:
//! nothing in here decides whether the transfer succeeds.

use super::display::ProgressDisplay;
use crate::range::ByteRange;

use indicatif::ProgressBar;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::warn;

/// Callback invoked when the integer percentage of a part changes.
pub type ProgressCallback = Box<dyn Fn(&PartSnapshot) + Send + Sync>;

/// Point-in-time view of one part.
#[derive(Debug, Clone, PartialEq)]
pub struct PartSnapshot {
    /// Index of the part.
    pub index: usize,
    /// Byte range of the part.
    pub range: ByteRange,
    /// Bytes written so far.
    pub bytes_written: u64,
    /// Bytes the part is expected to deliver.
    pub expected: u64,
    /// `bytes_written / expected * 100`, truncated.
    pub percent: u64,
    /// Average throughput since the part was created, in bytes per second.
    pub bytes_per_sec: f64,
    /// Whether the part finished.
    pub done: bool,
}

/// Point-in-time view of the whole transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    /// One entry per part, ordered by index.
    pub parts: Vec<PartSnapshot>,
    /// Time since the transfer started.
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    /// Bytes written across all parts.
    pub fn bytes_written(&self) -> u64 {
        self.parts.iter().map(|p| p.bytes_written).sum()
    }

    /// Bytes expected across all parts.
    pub fn expected(&self) -> u64 {
        self.parts.iter().map(|p| p.expected).sum()
    }

    /// Overall integer percentage.
    pub fn percent(&self) -> u64 {
        percent(self.bytes_written(), self.expected())
    }

    /// Whether every part finished.
    pub fn is_complete(&self) -> bool {
        self.parts.iter().all(|p| p.done)
    }
}

fn percent(written: u64, expected: u64) -> u64 {
    if expected == 0 {
        return 100;
    }
    (u128::from(written) * 100 / u128::from(expected)) as u64
}

/// Progress handle of a single part.
pub struct PartProgress {
    range: ByteRange,
    expected: AtomicU64,
    written: AtomicU64,
    last_percent: AtomicU64,
    done: AtomicBool,
    started: Instant,
    bar: ProgressBar,
    total: ProgressBar,
    clear: bool,
    remaining: Arc<watch::Sender<usize>>,
    on_progress: Option<Arc<ProgressCallback>>,
}

impl PartProgress {
    /// Byte range of the part.
    pub fn range(&self) -> &ByteRange {
        &self.range
    }

    /// Record the size the server declared for this part.
    pub fn set_expected(&self, expected: u64) {
        self.expected.store(expected, Ordering::Release);
        self.bar.set_length(expected);
    }

    /// Record `n` more bytes written.
    ///
    /// Notifies the callback only when the integer percentage changes. A
    /// panicking callback is logged and otherwise ignored.
    pub fn advance(&self, n: u64) {
        let written = self.written.fetch_add(n, Ordering::AcqRel) + n;
        self.bar.inc(n);
        self.total.inc(n);

        let pct = percent(written, self.expected.load(Ordering::Acquire));
        if self.last_percent.swap(pct, Ordering::AcqRel) != pct {
            self.bar.set_message(format!("{pct}%"));
            if let Some(ref callback) = self.on_progress {
                let snapshot = self.snapshot();
                if panic::catch_unwind(AssertUnwindSafe(|| callback(&snapshot))).is_err() {
                    warn!(part = self.range.index, "Progress callback panicked");
                }
            }
        }
    }

    /// Mark the part as done.
    ///
    /// Only the first call counts towards the completion of the transfer.
    pub fn finish(&self) {
        if self.done.swap(true, Ordering::AcqRel) {
            return;
        }
        if self.clear {
            self.bar.finish_and_clear();
        } else {
            self.bar.finish();
        }
        self.remaining.send_modify(|n| *n = n.saturating_sub(1));
    }

    /// Whether the part finished.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Current view of the part.
    pub fn snapshot(&self) -> PartSnapshot {
        let bytes_written = self.written.load(Ordering::Acquire);
        let expected = self.expected.load(Ordering::Acquire);
        let secs = self.started.elapsed().as_secs_f64();
        PartSnapshot {
            index: self.range.index,
            range: self.range.clone(),
            bytes_written,
            expected,
            percent: percent(bytes_written, expected),
            bytes_per_sec: if secs > 0.0 {
                bytes_written as f64 / secs
            } else {
                0.0
            },
            done: self.is_done(),
        }
    }
}

/// Aggregated progress of a transfer.
pub struct Progress {
    parts: Vec<Arc<PartProgress>>,
    remaining: Arc<watch::Sender<usize>>,
    display: ProgressDisplay,
    started: Instant,
}

impl Progress {
    /// Create one progress handle per range.
    ///
    /// Until a worker reports the declared size, a part expects the length of
    /// its range.
    pub fn new(
        ranges: &[ByteRange],
        display: ProgressDisplay,
        on_progress: Option<Arc<ProgressCallback>>,
    ) -> Self {
        let started = Instant::now();
        let (remaining, _) = watch::channel(ranges.len());
        let remaining = Arc::new(remaining);
        let clear = display.clears_parts();

        let parts = ranges
            .iter()
            .map(|range| {
                Arc::new(PartProgress {
                    range: range.clone(),
                    expected: AtomicU64::new(range.len()),
                    written: AtomicU64::new(0),
                    last_percent: AtomicU64::new(0),
                    done: AtomicBool::new(false),
                    started,
                    bar: display.create_part_bar(range),
                    total: display.total(),
                    clear,
                    remaining: remaining.clone(),
                    on_progress: on_progress.clone(),
                })
            })
            .collect();

        Self {
            parts,
            remaining,
            display,
            started,
        }
    }

    /// Handles of all parts, ordered by index.
    pub fn parts(&self) -> &[Arc<PartProgress>] {
        &self.parts
    }

    /// Handle of the part at `index`.
    pub fn part(&self, index: usize) -> Option<Arc<PartProgress>> {
        self.parts.get(index).cloned()
    }

    /// Number of parts not yet done.
    pub fn remaining(&self) -> usize {
        *self.remaining.borrow()
    }

    /// Whether every part finished.
    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Wait until every part reported done.
    pub async fn wait_all(&self) {
        let mut rx = self.remaining.subscribe();
        // The sender lives in `self`, the channel cannot close while we wait.
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    /// Current view of the transfer.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            parts: self.parts.iter().map(|p| p.snapshot()).collect(),
            elapsed: self.started.elapsed(),
        }
    }

    /// Finish the display after a successful transfer.
    pub fn finish(&self) {
        self.display.finish();
    }

    /// Stop the display after a failed transfer.
    pub fn abandon(&self) {
        for part in self.parts.iter().filter(|p| !p.is_done()) {
            part.bar.abandon();
        }
        self.display.abandon();
    }
}
