//! Random-access output targets.

use std::fs::File;
use std::io;
use std::sync::Mutex;

/// A destination that accepts writes at absolute byte offsets.
///
/// One target is shared by every worker of a transfer. Workers only ever
/// write inside their own disjoint range, so implementations need no
/// coordination between concurrent writes to different offsets.
pub trait OutputTarget: Send + Sync + 'static {
    /// Write `buf` at `offset`, returning how many bytes were persisted.
    ///
    /// A return value smaller than `buf.len()` is a short write.
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<usize>;

    /// Flush written data to its backing store.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

impl OutputTarget for File {
    #[cfg(unix)]
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<usize> {
        std::os::unix::fs::FileExt::write_at(self, buf, offset)
    }

    #[cfg(windows)]
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<usize> {
        std::os::windows::fs::FileExt::seek_write(self, buf, offset)
    }

    fn flush(&self) -> io::Result<()> {
        self.sync_data()
    }
}

/// In-memory target, grown on demand.
impl OutputTarget for Mutex<Vec<u8>> {
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<usize> {
        let offset = usize::try_from(offset)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "offset out of memory range"))?;
        let mut data = self
            .lock()
            .map_err(|_| io::Error::other("output buffer lock poisoned"))?;
        let end = offset + buf.len();
        if data.len() < end {
            data.resize(end, 0);
        }
        data[offset..end].copy_from_slice(buf);
        Ok(buf.len())
    }
}
