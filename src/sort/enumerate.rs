//! Directory enumeration
//!
//! A single depth-first pass over the source tree. Every directory below the
//! root is pushed into the work queue before its children are visited; the
//! root itself is seeded by the caller before any thread starts. When the
//! walk ends the directory total is recorded and the start gate opens.

use super::CancelToken;
use super::gate::StartSignal;
use super::progress::Progress;
use super::queue::WorkQueueSender;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome of the enumeration pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkReport {
    /// Directories in the queue, root included
    pub discovered: usize,
    /// Entries the walk could not inspect
    ///
    /// A queued directory that cannot be listed is not counted here; the
    /// worker that claims it reports it.
    pub errors: usize,
    /// The walk stopped early because of cancellation
    pub cancelled: bool,
}

/// Depth-first directory walker feeding the work queue
pub struct Enumerator<'a> {
    root: &'a Path,
    exclude: &'a [PathBuf],
    cancel: &'a CancelToken,
}

impl<'a> Enumerator<'a> {
    pub fn new(root: &'a Path, cancel: &'a CancelToken) -> Self {
        Self {
            root,
            exclude: &[],
            cancel,
        }
    }

    /// Skip these subtrees entirely (output folders inside the source)
    pub fn exclude(mut self, paths: &'a [PathBuf]) -> Self {
        self.exclude = paths;
        self
    }

    /// Walk the tree, publish every directory, then record the total and
    /// release the workers
    pub fn run(self, sender: WorkQueueSender, progress: &Progress, mut signal: StartSignal) -> WalkReport {
        let report = self.walk(&sender);
        drop(sender);

        progress.set_total(report.discovered);
        info!(
            directories = report.discovered,
            errors = report.errors,
            cancelled = report.cancelled,
            "Completed searching folder"
        );
        signal.release();

        report
    }

    /// Push every directory below the root into the queue
    ///
    /// A directory that cannot be listed is still reported as discovered
    /// (its parent listed it) but its subtree is skipped.
    pub fn walk(&self, sender: &WorkQueueSender) -> WalkReport {
        let mut report = WalkReport::default();
        debug!(root = %self.root.display(), "Start looking for folders");

        let walker = WalkDir::new(self.root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry.path()));

        // walkdir reports a failed listing right after yielding the directory.
        let mut last_queued: Option<PathBuf> = None;

        for entry in walker {
            if self.cancel.is_cancelled() {
                warn!("Enumeration cancelled");
                report.cancelled = true;
                break;
            }

            match entry {
                Ok(entry) if entry.file_type().is_dir() => {
                    debug!(path = %entry.path().display(), "Found folder");
                    let path = entry.into_path();
                    last_queued = Some(path.clone());
                    if !sender.push(path) {
                        warn!("Work queue closed, stopping enumeration");
                        report.cancelled = true;
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    let queued = err
                        .path()
                        .is_some_and(|p| p == self.root || last_queued.as_deref() == Some(p));
                    if !queued {
                        report.errors += 1;
                    }
                    warn!(
                        path = ?err.path(),
                        error = %err,
                        "Cannot read directory, skipping its subtree"
                    );
                }
            }
        }

        report.discovered = sender.enqueued() as usize;
        report
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let excluded = self.exclude.iter().any(|exclude| path == exclude);
        if excluded {
            debug!(path = %path.display(), "Skipping output directory");
        }
        excluded
    }
}
