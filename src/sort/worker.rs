//! Worker loop
//!
//! Each worker waits on the start gate once, then claims directories from
//! the queue until it is drained. For every regular file directly inside a
//! claimed directory it classifies, normalizes and copies the file into
//! `output/<category>/`. A failure on one file never stops the others.

use super::gate::StartGate;
use super::progress::Progress;
use super::queue::WorkQueueReceiver;
use super::{CancelToken, SortStats};
use crate::classify::{Category, classify_path};
use crate::error::Error;
use crate::normalize::normalize;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use tracing::{debug, error, warn};

/// Name used when normalization leaves nothing of the original name
const EMPTY_NAME_FALLBACK: &str = "_";

/// Per-run copy settings
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptions {
    /// Compute destinations only
    pub dry_run: bool,
    /// Copy the source modification time onto the destination
    pub preserve_mtime: bool,
}

/// Why a file was not copied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Dry run mode
    DryRun,
    /// The file disappeared between listing and copy
    Vanished,
    /// The destination is the source file itself
    SameFile,
}

/// Result of handling one file
#[derive(Debug)]
pub enum CopyOutcome {
    Copied { destination: PathBuf },
    Skipped(SkipReason),
    Failed(Error),
}

/// State shared by every worker of one run
#[derive(Clone, Copy)]
pub struct WorkerShared<'a> {
    pub output: &'a Path,
    pub options: CopyOptions,
    pub progress: &'a Progress,
    pub stats: &'a SortStats,
    pub cancel: &'a CancelToken,
}

/// A single pool worker
pub struct Worker<'a> {
    id: usize,
    receiver: WorkQueueReceiver,
    gate: StartGate,
    shared: WorkerShared<'a>,
    /// Category folders this worker already made sure exist
    created: HashSet<Category>,
}

impl<'a> Worker<'a> {
    pub fn new(id: usize, receiver: WorkQueueReceiver, gate: StartGate, shared: WorkerShared<'a>) -> Self {
        Self {
            id,
            receiver,
            gate,
            shared,
            created: HashSet::new(),
        }
    }

    /// Wait for enumeration, then drain the queue; returns the number of
    /// directories this worker handled
    pub fn run(mut self) -> usize {
        self.gate.wait();
        debug!(worker = self.id, "Worker released");

        let mut handled = 0;
        loop {
            if self.shared.cancel.is_cancelled() {
                debug!(worker = self.id, "Worker cancelled");
                break;
            }
            let Some(dir) = self.receiver.try_pop() else {
                break;
            };
            self.process_directory(&dir);
            handled += 1;
        }

        debug!(worker = self.id, directories = handled, "Worker finished");
        handled
    }

    /// Copy every regular file directly inside `dir`, then advance progress
    pub fn process_directory(&mut self, dir: &Path) {
        debug!(path = %dir.display(), "Looking for files");

        match fs::read_dir(dir) {
            Ok(entries) => {
                for entry in entries {
                    let entry = match entry {
                        Ok(entry) => entry,
                        Err(e) => {
                            warn!(path = %dir.display(), error = %e, "Failed to read directory entry");
                            continue;
                        }
                    };

                    let path = entry.path();
                    // Follows symlinks, so linked files are copied by content.
                    if !path.is_file() {
                        continue;
                    }

                    let outcome = self.copy_file(&path, &entry.file_name());
                    self.record(&path, outcome);
                }
            }
            Err(source) => {
                let err = Error::ListDirectory {
                    path: dir.to_path_buf(),
                    source,
                };
                warn!(error = %err, "Skipping unreadable directory");
                self.shared.stats.unreadable_dirs.fetch_add(1, Ordering::Relaxed);
            }
        }

        self.shared.progress.advance();
    }

    /// Classify, normalize and copy a single file
    pub fn copy_file(&mut self, source: &Path, file_name: &OsStr) -> CopyOutcome {
        let category = classify_path(source);
        let mut name = normalize(&file_name.to_string_lossy());
        if name.is_empty() {
            name = EMPTY_NAME_FALLBACK.to_string();
        }

        let dest_dir = self.shared.output.join(category.folder_name());
        let destination = dest_dir.join(&name);

        if self.shared.options.dry_run {
            debug!(source = %source.display(), destination = %destination.display(), "Would copy file");
            return CopyOutcome::Skipped(SkipReason::DryRun);
        }

        if let Err(e) = self.ensure_category_dir(category, &dest_dir) {
            return CopyOutcome::Failed(e);
        }

        if is_same_file(source, &destination) {
            warn!(path = %source.display(), "Source is already in place, not copying onto itself");
            return CopyOutcome::Skipped(SkipReason::SameFile);
        }

        if let Err(e) = fs::copy(source, &destination) {
            if e.kind() == ErrorKind::NotFound && !source.exists() {
                return CopyOutcome::Skipped(SkipReason::Vanished);
            }
            return CopyOutcome::Failed(Error::Copy {
                from: source.to_path_buf(),
                to: destination,
                source: e,
            });
        }

        if self.shared.options.preserve_mtime {
            preserve_mtime(source, &destination);
        }

        CopyOutcome::Copied { destination }
    }

    /// Create the category folder unless this worker already did
    ///
    /// `create_dir_all` tolerates a concurrent creation by another worker.
    fn ensure_category_dir(&mut self, category: Category, dir: &Path) -> Result<(), Error> {
        if self.created.contains(&category) {
            return Ok(());
        }
        fs::create_dir_all(dir).map_err(|source| Error::CreateCategory {
            path: dir.to_path_buf(),
            source,
        })?;
        self.created.insert(category);
        Ok(())
    }

    fn record(&self, source: &Path, outcome: CopyOutcome) {
        let stats = self.shared.stats;
        match outcome {
            CopyOutcome::Copied { destination } => {
                debug!(source = %source.display(), destination = %destination.display(), "Copied file");
                stats.files_copied.fetch_add(1, Ordering::Relaxed);
            }
            CopyOutcome::Skipped(reason) => {
                debug!(source = %source.display(), ?reason, "Skipped file");
                stats.files_skipped.fetch_add(1, Ordering::Relaxed);
            }
            CopyOutcome::Failed(err) => {
                error!(source = %source.display(), error = %err, "Failed to copy file");
                stats.files_failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Both paths resolve to the same existing file
///
/// `fs::copy` truncates the destination before reading, so copying a file
/// onto itself would empty it.
fn is_same_file(source: &Path, destination: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy the source modification time onto the destination
fn preserve_mtime(source: &Path, destination: &Path) {
    let mtime = match fs::metadata(source).and_then(|m| m.modified()) {
        Ok(mtime) => mtime,
        Err(e) => {
            warn!(path = %source.display(), error = %e, "Cannot read modification time");
            return;
        }
    };
    if let Err(e) = filetime::set_file_mtime(destination, filetime::FileTime::from_system_time(mtime)) {
        warn!(path = %destination.display(), error = %e, "Failed to set modification time");
    }
}
