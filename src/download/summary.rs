//! Outcome of a finished download.

use super::download::Download;
use crate::downloader::{PartSummary, Transfer};
use crate::range::Resource;

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Represents a [`Download`] summary.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Downloaded item.
    download: Download,
    /// Where the file was written.
    path: PathBuf,
    /// What the transfer did.
    transfer: Transfer,
}

impl Summary {
    /// Create a new [`Download`] [`Summary`].
    pub fn new(download: Download, path: PathBuf, transfer: Transfer) -> Self {
        Self {
            download,
            path,
            transfer,
        }
    }

    /// Get a reference to the summary's download.
    pub fn download(&self) -> &Download {
        &self.download
    }

    /// Path of the written file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The probed resource.
    pub fn resource(&self) -> &Resource {
        &self.transfer.resource
    }

    /// Size of the resource in bytes.
    pub fn size(&self) -> u64 {
        self.transfer.resource.total_size
    }

    /// Bytes written across all parts.
    pub fn bytes_written(&self) -> u64 {
        self.transfer.bytes_written()
    }

    /// Per-part outcome, ordered by index.
    pub fn parts(&self) -> &[PartSummary] {
        &self.transfer.parts
    }

    /// Time the transfer took.
    pub fn elapsed(&self) -> Duration {
        self.transfer.elapsed
    }
}
