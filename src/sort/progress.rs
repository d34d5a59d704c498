//! Directory progress tracking
//!
//! The total is written once, when enumeration finishes; the processed count
//! is bumped by whichever worker finishes a directory. The terminal bar is
//! only a view of these two numbers.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// Shared progress counter with an optional terminal bar
pub struct Progress {
    total: OnceLock<usize>,
    processed: AtomicUsize,
    bar: ProgressBar,
}

impl Progress {
    /// Progress drawn on stderr (hidden automatically when not a terminal)
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.cyan} [{bar:40.green/white}] {pos}/{len} {percent}%")
                .expect("Invalid progress template")
                .progress_chars("█▓░"),
        );
        bar.set_prefix("Processing");
        Self::with_bar(bar)
    }

    /// Progress without any terminal output
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        Self {
            total: OnceLock::new(),
            processed: AtomicUsize::new(0),
            bar,
        }
    }

    /// Record the number of discovered directories; only the first call counts
    pub fn set_total(&self, total: usize) -> bool {
        if self.total.set(total).is_err() {
            warn!(total, "Progress total already recorded, ignoring");
            return false;
        }
        self.bar.set_length(total as u64);
        true
    }

    /// Total directory count, once enumeration has finished
    pub fn total(&self) -> Option<usize> {
        self.total.get().copied()
    }

    /// Mark one directory as done
    pub fn advance(&self) -> usize {
        self.bar.inc(1);
        self.processed.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Acquire)
    }

    /// Whether every discovered directory has been processed
    pub fn is_complete(&self) -> bool {
        self.total() == Some(self.processed())
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_total_written_once() {
        let progress = Progress::hidden();
        assert_eq!(progress.total(), None);
        assert!(progress.set_total(7));
        assert!(!progress.set_total(9));
        assert_eq!(progress.total(), Some(7));
    }

    #[test]
    fn test_concurrent_advance() {
        let progress = Progress::hidden();
        progress.set_total(800);

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..100 {
                        progress.advance();
                    }
                });
            }
        });

        assert_eq!(progress.processed(), 800);
        assert!(progress.is_complete());
    }
}
