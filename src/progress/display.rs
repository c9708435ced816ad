//! Terminal rendering of a transfer.
//!
//! [`ProgressDisplay`] owns the indicatif bars: one for the whole resource and
//! one per part. It only renders; the numbers it shows come from
//! [`Progress`](super::Progress).

use super::StyleOptions;
use crate::range::ByteRange;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};

/// Progress display manager that coordinates the bars of one transfer.
pub struct ProgressDisplay {
    /// The multi-progress instance for coordinating multiple progress bars.
    multi: MultiProgress,
    /// Bar of the whole resource.
    total: ProgressBar,
    /// Style options for progress bars.
    style_options: StyleOptions,
}

impl ProgressDisplay {
    /// Create a display for a resource of `total_size` bytes.
    pub fn new(style_options: StyleOptions, total_size: u64) -> Self {
        let multi = match style_options.is_enabled() {
            true => MultiProgress::new(),
            false => MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
        };

        let total = multi.add(style_options.total().clone().to_progress_bar(total_size));
        total.set_prefix("total");
        total.tick();

        Self {
            multi,
            total,
            style_options,
        }
    }

    /// Bar of the whole resource.
    pub fn total(&self) -> ProgressBar {
        self.total.clone()
    }

    /// Create the bar of one part.
    pub fn create_part_bar(&self, range: &ByteRange) -> ProgressBar {
        let pb = self
            .multi
            .add(self.style_options.part().clone().to_progress_bar(range.len()));
        pb.set_prefix(format!("Part {}", range.index));
        pb
    }

    /// Whether part bars are cleared once their part is written.
    pub(crate) fn clears_parts(&self) -> bool {
        self.style_options.part().clear
    }

    /// Finish the whole-transfer bar.
    pub fn finish(&self) {
        if self.style_options.total().clear {
            self.total.finish_and_clear();
        } else {
            self.total.finish();
        }
    }

    /// Leave every bar where it stopped after a failed transfer.
    pub fn abandon(&self) {
        self.total.abandon();
    }
}
