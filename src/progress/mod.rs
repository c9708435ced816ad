//! Progress reporting for a transfer.
//!
//! - `tracker` - [`Progress`] and [`PartProgress`], per-part byte counts, percentages,
//!   throughput and the "all parts done" signal
//! - `display` - [`ProgressDisplay`], the indicatif bars
//! - `style` - [`StyleOptions`] and [`ProgressBarOpts`]
//!
//! # Examples
//!
//! ```rust
//! use splitfetch::progress::{Progress, ProgressDisplay, StyleOptions};
//! use splitfetch::range::partition;
//!
//! let ranges = partition(1000, 4)?;
//! let display = ProgressDisplay::new(StyleOptions::hidden(), 1000);
//! let progress = Progress::new(&ranges, display, None);
//!
//! let part = progress.part(0).unwrap();
//! part.advance(125);
//! assert_eq!(part.snapshot().percent, 50);
//! assert_eq!(progress.snapshot().percent(), 12);
//! # Ok::<(), splitfetch::Error>(())
//! ```

pub(crate) mod display;
pub(crate) mod style;
pub(crate) mod tracker;

pub use display::ProgressDisplay;
pub use style::{ProgressBarOpts, StyleOptions};
pub use tracker::{PartProgress, PartSnapshot, Progress, ProgressCallback, ProgressSnapshot};
