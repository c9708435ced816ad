//! Progress bar styling and configuration options.
//!
//! A transfer shows one bar for the whole resource and one bar per part.
//!
//! # Examples
//!
//! ```rust
//! use splitfetch::progress::{StyleOptions, ProgressBarOpts};
//!
//! // Keep the per-part bars on screen once finished.
//! let mut part = ProgressBarOpts::part_style();
//! part.set_clear(false);
//! let style = StyleOptions::new(ProgressBarOpts::total_style(), part);
//! assert!(style.is_enabled());
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

/// Define the transfer style options.
///
/// By default the bar of the whole transfer stays on the screen upon
/// completion, the per-part bars are cleared once their part is written.
#[derive(Debug, Clone)]
pub struct StyleOptions {
    /// Style options for the whole-transfer bar.
    pub(crate) total: ProgressBarOpts,
    /// Style options for the per-part bars.
    pub(crate) part: ProgressBarOpts,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            total: ProgressBarOpts::total_style(),
            part: ProgressBarOpts::part_style(),
        }
    }
}

impl StyleOptions {
    /// Create new [`StyleOptions`].
    pub fn new(total: ProgressBarOpts, part: ProgressBarOpts) -> Self {
        Self { total, part }
    }

    /// Style options with every bar hidden.
    pub fn hidden() -> Self {
        Self::new(ProgressBarOpts::hidden(), ProgressBarOpts::hidden())
    }

    /// Set the options for the whole-transfer bar.
    pub fn set_total(&mut self, total: ProgressBarOpts) {
        self.total = total;
    }

    /// Set the options for the per-part bars.
    pub fn set_part(&mut self, part: ProgressBarOpts) {
        self.part = part;
    }

    /// Return `false` if no bar is enabled.
    pub fn is_enabled(&self) -> bool {
        self.total.enabled || self.part.enabled
    }

    /// Get a reference to the whole-transfer bar options.
    pub fn total(&self) -> &ProgressBarOpts {
        &self.total
    }

    /// Get a reference to the per-part bar options.
    pub fn part(&self) -> &ProgressBarOpts {
        &self.part
    }
}

/// Define the options for a progress bar.
#[derive(Debug, Clone)]
pub struct ProgressBarOpts {
    /// Progress bar template string.
    template: Option<String>,
    /// Progression characters set.
    ///
    /// There must be at least 3 characters for the following states:
    /// "filled", "current", and "to do".
    progress_chars: Option<String>,
    /// Enable or disable the progress bar.
    pub(crate) enabled: bool,
    /// Clear the progress bar once completed.
    pub(crate) clear: bool,
}

impl Default for ProgressBarOpts {
    fn default() -> Self {
        Self {
            template: None,
            progress_chars: None,
            enabled: true,
            clear: true,
        }
    }
}

impl ProgressBarOpts {
    /// Template of the whole-transfer bar.
    ///
    /// `total ████████████████████░░░░ 40.00 MiB/48.00 MiB 12.50 MiB/s eta 1s`
    pub const TEMPLATE_TOTAL: &'static str =
        "{prefix:>8.bold} {bar:40.blue} {bytes:>11}/{total_bytes:<11} {bytes_per_sec:>13.red} eta {eta:.blue}";
    /// Template of a per-part bar; the message carries the integer percentage.
    ///
    /// `  Part 3 ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╾────── 9.00 MiB/12.00 MiB 3.10 MiB/s 75%`
    pub const TEMPLATE_PART: &'static str =
        "{prefix:>8.cyan} {bar:40.green/black} {bytes:>11.green}/{total_bytes:<11.green} {bytes_per_sec:>13.red} {msg}";
    /// Use fine blocks as progress characters: `"█▉▊▋▌▍▎▏  "`.
    pub const CHARS_FINE: &'static str = "█▉▊▋▌▍▎▏  ";
    /// Use a line as progress characters: `"━╾╴─"`.
    pub const CHARS_LINE: &'static str = "━╾╴─";
    /// Use fade-in blocks as progress characters: `"█▓▒░  "`.
    pub const CHARS_FADE_IN: &'static str = "█▓▒░  ";

    /// Create a new [`ProgressBarOpts`].
    pub fn new(
        template: Option<String>,
        progress_chars: Option<String>,
        enabled: bool,
        clear: bool,
    ) -> Self {
        Self {
            template,
            progress_chars,
            enabled,
            clear,
        }
    }

    /// Options of the whole-transfer bar, kept on screen when done.
    pub fn total_style() -> Self {
        Self {
            template: Some(Self::TEMPLATE_TOTAL.into()),
            progress_chars: Some(Self::CHARS_FINE.into()),
            enabled: true,
            clear: false,
        }
    }

    /// Options of a per-part bar, cleared when done.
    pub fn part_style() -> Self {
        Self {
            template: Some(Self::TEMPLATE_PART.into()),
            progress_chars: Some(Self::CHARS_LINE.into()),
            enabled: true,
            clear: true,
        }
    }

    /// Create a [`ProgressStyle`] based on the provided options.
    ///
    /// An invalid template falls back to the default bar.
    pub fn to_progress_style(self) -> ProgressStyle {
        let mut style = ProgressStyle::default_bar();
        if let Some(template) = self.template {
            style = match style.clone().template(&template) {
                Ok(templated) => templated,
                Err(e) => {
                    warn!("Ignoring invalid progress template {:?}: {}", template, e);
                    style
                }
            };
        }
        if let Some(progress_chars) = self.progress_chars {
            style = style.progress_chars(&progress_chars);
        }
        style
    }

    /// Create a [`ProgressBar`] based on the provided options.
    pub fn to_progress_bar(self, len: u64) -> ProgressBar {
        // Return a hidden Progress bar if we disabled it.
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let style = self.to_progress_style();
        ProgressBar::new(len).with_style(style)
    }

    /// Set to `true` to clear the progress bar upon completion.
    pub fn set_clear(&mut self, clear: bool) {
        self.clear = clear;
    }

    /// Create a new [`ProgressBarOpts`] which hides the progress bars.
    pub fn hidden() -> Self {
        Self {
            enabled: false,
            ..ProgressBarOpts::default()
        }
    }
}
