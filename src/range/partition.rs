//! Partitioning of a resource into disjoint byte ranges.

use super::probe::Resource;
use crate::error::{Error, Result};
use std::fmt;

/// A contiguous, inclusive byte interval assigned to one worker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ByteRange {
    /// Position of this part in the partition, starting at 0.
    pub index: usize,
    /// First byte offset of the part.
    pub start: u64,
    /// Last byte offset of the part, inclusive.
    pub end: u64,
}

impl ByteRange {
    /// Creates a new [`ByteRange`].
    pub fn new(index: usize, start: u64, end: u64) -> Self {
        debug_assert!(start <= end, "range {start}-{end} is inverted");
        Self { index, start, end }
    }

    /// Number of bytes covered by the range.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value of the `Range` request header for this part.
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }

    /// Returns `true` if `offset` lies inside the range.
    pub fn contains(&self, offset: u64) -> bool {
        (self.start..=self.end).contains(&offset)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bytes {}-{}", self.start, self.end)
    }
}

/// Split `total_size` bytes into at most `workers` contiguous ranges.
///
/// Every range but the last spans `total_size / workers` bytes and the last
/// one absorbs the remainder, so the ranges cover `[0, total_size - 1]`
/// exactly. The worker count is clamped to `total_size` so no range is empty,
/// and an empty resource yields no ranges at all.
///
/// ```rust
/// use splitfetch::range::partition;
///
/// let ranges = partition(1000, 4)?;
/// let bounds: Vec<_> = ranges.iter().map(|r| (r.start, r.end)).collect();
/// assert_eq!(bounds, vec![(0, 249), (250, 499), (500, 749), (750, 999)]);
/// # Ok::<(), splitfetch::Error>(())
/// ```
pub fn partition(total_size: u64, workers: usize) -> Result<Vec<ByteRange>> {
    if workers == 0 {
        return Err(Error::InvalidWorkerCount(workers));
    }
    if total_size == 0 {
        return Ok(Vec::new());
    }

    let count = (workers as u64).min(total_size);
    let chunk = total_size / count;
    let last = count - 1;

    let ranges = (0..count)
        .map(|i| {
            let start = i * chunk;
            let end = if i == last {
                total_size - 1
            } else {
                start + chunk - 1
            };
            ByteRange::new(i as usize, start, end)
        })
        .collect();

    Ok(ranges)
}

/// Partition a probed resource.
///
/// A resource without range support is always fetched by a single worker.
pub fn plan(resource: &Resource, workers: usize) -> Result<Vec<ByteRange>> {
    if workers == 0 {
        return Err(Error::InvalidWorkerCount(workers));
    }
    let workers = if resource.range_supported { workers } else { 1 };
    partition(resource.total_size, workers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;

    fn bounds(ranges: &[ByteRange]) -> Vec<(u64, u64)> {
        ranges.iter().map(|r| (r.start, r.end)).collect()
    }

    fn resource(total_size: u64, range_supported: bool) -> Resource {
        Resource {
            url: Url::parse("http://localhost/file.bin").unwrap(),
            total_size,
            range_supported,
        }
    }

    #[test]
    fn test_even_split() {
        let ranges = partition(1000, 4).unwrap();
        assert_eq!(
            bounds(&ranges),
            vec![(0, 249), (250, 499), (500, 749), (750, 999)]
        );
        assert!(ranges.iter().enumerate().all(|(i, r)| r.index == i));
    }

    #[test]
    fn test_last_range_absorbs_remainder() {
        let ranges = partition(1001, 4).unwrap();
        assert_eq!(
            bounds(&ranges),
            vec![(0, 249), (250, 499), (500, 749), (750, 1000)]
        );
        assert_eq!(ranges[3].len(), 251);
    }

    #[test]
    fn test_single_worker_covers_everything() {
        assert_eq!(bounds(&partition(10, 1).unwrap()), vec![(0, 9)]);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            partition(10, 0),
            Err(Error::InvalidWorkerCount(0))
        ));
    }

    #[test]
    fn test_empty_resource_has_no_ranges() {
        assert!(partition(0, 8).unwrap().is_empty());
    }

    #[test]
    fn test_more_workers_than_bytes() {
        let ranges = partition(3, 8).unwrap();
        assert_eq!(bounds(&ranges), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_plan_without_range_support_uses_one_worker() {
        let ranges = plan(&resource(1000, false), 8).unwrap();
        assert_eq!(bounds(&ranges), vec![(0, 999)]);
    }

    #[test]
    fn test_plan_with_range_support_uses_requested_workers() {
        assert_eq!(plan(&resource(1000, true), 8).unwrap().len(), 8);
    }

    #[test]
    fn test_plan_rejects_zero_workers_without_range_support() {
        assert!(plan(&resource(1000, false), 0).is_err());
    }

    #[test]
    fn test_header_value_and_display() {
        let range = ByteRange::new(3, 750, 1000);
        assert_eq!(range.header_value(), "bytes=750-1000");
        assert_eq!(range.to_string(), "bytes 750-1000");
        assert!(range.contains(750));
        assert!(range.contains(1000));
        assert!(!range.contains(1001));
    }
}
