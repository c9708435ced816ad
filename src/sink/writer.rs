//! The per-worker write loop.

use super::target::OutputTarget;
use crate::error::{Error, Result};
use crate::progress::PartProgress;
use crate::range::ByteRange;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default upper bound on a single write, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

/// Drain `stream` into `target`, starting at `range.start`.
///
/// Chunks are written in stream order, in pieces of at most `buffer_size`
/// bytes, each at the current absolute offset. The loop fails on a short
/// write, on data past `range.end`, and when the stream ends before
/// `expected` bytes were written. Progress is reported after every piece.
///
/// Returns the number of bytes written.
pub async fn write_range<T, S>(
    target: Arc<T>,
    range: &ByteRange,
    expected: u64,
    mut stream: S,
    progress: &PartProgress,
    buffer_size: usize,
    cancel: &CancellationToken,
) -> Result<u64>
where
    T: OutputTarget,
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    let buffer_size = buffer_size.max(1);
    let mut offset = range.start;
    let mut written: u64 = 0;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            next = stream.next() => next,
        };
        let Some(chunk) = next else {
            break;
        };
        let mut chunk = chunk?;

        while !chunk.is_empty() {
            let piece = chunk.split_to(buffer_size.min(chunk.len()));
            let requested = piece.len();
            if offset + requested as u64 > range.end + 1 {
                return Err(Error::Overrun { offset });
            }

            let persisted = write_piece(target.clone(), piece, offset).await?;
            if persisted != requested {
                return Err(Error::ShortWrite {
                    written: persisted,
                    requested,
                });
            }

            offset += persisted as u64;
            written += persisted as u64;
            progress.advance(persisted as u64);
        }
    }

    if written != expected {
        return Err(Error::IncompletePart { written, expected });
    }

    debug!(part = range.index, written, "Part written");
    Ok(written)
}

/// Run one positional write on the blocking pool.
async fn write_piece<T: OutputTarget>(target: Arc<T>, piece: Bytes, offset: u64) -> Result<usize> {
    let persisted = tokio::task::spawn_blocking(move || target.write_at(&piece, offset)).await??;
    Ok(persisted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{Progress, ProgressDisplay, StyleOptions};
    use futures::stream;
    use std::io;
    use std::sync::Mutex;

    struct HalfWriter;

    impl OutputTarget for HalfWriter {
        fn write_at(&self, buf: &[u8], _offset: u64) -> io::Result<usize> {
            Ok(buf.len() / 2)
        }
    }

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<Bytes>> + Unpin {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::from_static(p.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    fn tracker(range: &ByteRange) -> Progress {
        let display = ProgressDisplay::new(StyleOptions::hidden(), range.end + 1);
        Progress::new(std::slice::from_ref(range), display, None)
    }

    #[tokio::test]
    async fn test_writes_at_range_offset() {
        let target = Arc::new(Mutex::new(vec![0u8; 8]));
        let range = ByteRange::new(1, 4, 7);
        let progress = tracker(&range);
        let part = progress.part(0).unwrap();
        part.set_expected(4);

        let written = write_range(
            target.clone(),
            &range,
            4,
            chunks(&["ab", "cd"]),
            &part,
            3,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(written, 4);
        assert_eq!(*target.lock().unwrap(), b"\0\0\0\0abcd");
        assert_eq!(part.snapshot().bytes_written, 4);
    }

    #[tokio::test]
    async fn test_short_write_is_fatal() {
        let range = ByteRange::new(0, 0, 3);
        let progress = tracker(&range);
        let part = progress.part(0).unwrap();

        let err = write_range(
            Arc::new(HalfWriter),
            &range,
            4,
            chunks(&["abcd"]),
            &part,
            1024,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            Error::ShortWrite {
                written: 2,
                requested: 4
            }
        ));
    }

    #[tokio::test]
    async fn test_early_end_of_stream_is_incomplete() {
        let range = ByteRange::new(0, 0, 9);
        let progress = tracker(&range);
        let part = progress.part(0).unwrap();

        let err = write_range(
            Arc::new(Mutex::new(Vec::new())),
            &range,
            10,
            chunks(&["abc"]),
            &part,
            1024,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            Error::IncompletePart {
                written: 3,
                expected: 10
            }
        ));
    }

    #[tokio::test]
    async fn test_data_past_range_end_is_rejected() {
        let target = Arc::new(Mutex::new(Vec::new()));
        let range = ByteRange::new(0, 0, 1);
        let progress = tracker(&range);
        let part = progress.part(0).unwrap();

        let err = write_range(
            target.clone(),
            &range,
            3,
            chunks(&["ab", "c"]),
            &part,
            1024,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Overrun { offset: 2 }));
        assert_eq!(*target.lock().unwrap(), b"ab");
    }

    #[tokio::test]
    async fn test_cancelled_before_reading() {
        let range = ByteRange::new(0, 0, 1);
        let progress = tracker(&range);
        let part = progress.part(0).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = write_range(
            Arc::new(Mutex::new(Vec::new())),
            &range,
            2,
            chunks(&["ab"]),
            &part,
            1024,
            &cancel,
        )
        .await
        .unwrap_err();

        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_stream_error_is_propagated() {
        let range = ByteRange::new(0, 0, 9);
        let progress = tracker(&range);
        let part = progress.part(0).unwrap();
        let body = stream::iter(vec![
            Ok(Bytes::from_static(b"ab")),
            Err(Error::Internal("connection reset".into())),
        ]);

        let err = write_range(
            Arc::new(Mutex::new(Vec::new())),
            &range,
            10,
            body,
            &part,
            1024,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Internal(_)));
    }
}
