//! Terminal progress reporting for the long-running harvest phases.

use core::time::Duration;
use indicatif::{ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Phase-prefixed progress indicator.
///
/// The planner and fetcher report through `log`; this is the user-facing
/// companion for interactive runs. Construct it hidden when logging is
/// enabled so bar redraws do not interleave with log output.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// A visible reporter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::no_length(),
        }
    }

    /// A reporter that renders nothing.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Set the phase label shown ahead of the indicator.
    pub fn set_prefix(&self, prefix: &'static str) {
        self.bar.set_prefix(prefix);
    }

    /// Spinner mode, for phases with an unknown amount of work.
    pub fn enable_indeterminate_mode(&self) {
        let style = ProgressStyle::with_template("{prefix:>10} {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        self.bar.set_style(style);
        self.bar.unset_length();
        self.bar.enable_steady_tick(TICK_INTERVAL);
    }

    /// Bar mode with a known total.
    pub fn enable_determinate_mode(&self, total: u64) {
        let style = ProgressStyle::with_template("{prefix:>10} [{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        self.bar.set_style(style);
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_message("");
    }

    pub fn set_message(&self, message: String) {
        self.bar.set_message(message);
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
