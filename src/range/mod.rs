//! Byte-range model of a remote resource.
//!
//! This module knows what a resource looks like before the transfer starts and
//! how it is cut into parts:
//!
//! - `probe` - [`Resource`], the size and range support learned from the server
//! - `partition` - [`ByteRange`] and the partitioning of a resource into disjoint parts
//! - `fetch` - the [`RangeSource`] seam that streams a single part
//!
//! # Examples
//!
//! ```rust
//! use splitfetch::range::partition;
//!
//! let ranges = partition(1001, 4)?;
//! assert_eq!(ranges.len(), 4);
//! assert_eq!((ranges[3].start, ranges[3].end), (750, 1000));
//! # Ok::<(), splitfetch::Error>(())
//! ```

pub mod fetch;
pub mod partition;
pub mod probe;

pub use fetch::{RangeBody, RangeSource};
pub use partition::{partition, plan, ByteRange};
pub use probe::Resource;
