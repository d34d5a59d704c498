//! Concurrent directory sorter
//!
//! One run wires together:
//! - the work queue, seeded with the source root
//! - an enumerator thread that discovers every directory
//! - a start gate that holds the workers until enumeration is done
//! - a fixed pool of workers that drain the queue and copy files

pub mod enumerate;
pub mod gate;
pub mod progress;
pub mod queue;
pub mod worker;

pub use enumerate::{Enumerator, WalkReport};
pub use gate::{StartGate, StartSignal, start_gate};
pub use progress::Progress;
pub use queue::{WorkQueue, WorkQueueReceiver, WorkQueueSender};
pub use worker::{CopyOptions, CopyOutcome, SkipReason, Worker, WorkerShared};

use crate::classify::Category;
use crate::config::Config;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;
use tracing::{Level, info, span, warn};

/// Cooperative cancellation flag shared by the enumerator and the workers
///
/// The `sorter` binary cancels it on Ctrl-C; the enumerator then stops and
/// workers finish the directory they hold.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// File level statistics for one run
#[derive(Debug, Default)]
pub struct SortStats {
    pub files_copied: AtomicUsize,
    pub files_skipped: AtomicUsize,
    pub files_failed: AtomicUsize,
    /// Directories a worker could not list
    pub unreadable_dirs: AtomicUsize,
}

/// Snapshot of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct SortSummary {
    pub source: PathBuf,
    pub output: PathBuf,
    pub workers: usize,
    pub dry_run: bool,
    pub directories_total: usize,
    pub directories_processed: usize,
    pub walk_errors: usize,
    pub unreadable_dirs: usize,
    pub files_copied: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub cancelled: bool,
    pub elapsed_ms: u64,
}

impl SortSummary {
    /// Every discovered directory went through a worker
    pub fn is_complete(&self) -> bool {
        self.directories_processed == self.directories_total
    }

    pub fn summary(&self) -> String {
        format!(
            "Directories: {}/{}, Copied: {}, Skipped: {}, Failed: {}, Unreadable: {}",
            self.directories_processed,
            self.directories_total,
            self.files_copied,
            self.files_skipped,
            self.files_failed,
            self.unreadable_dirs + self.walk_errors,
        )
    }

    /// Write the summary as pretty JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Sorts one source tree into category folders
pub struct Sorter {
    source: PathBuf,
    output: PathBuf,
    workers: usize,
    options: CopyOptions,
    progress: Progress,
    cancel: CancelToken,
}

impl Sorter {
    /// Resolve the configured paths and prepare a run
    pub fn new(config: &Config) -> Result<Self> {
        let source = fs::canonicalize(&config.source).map_err(|e| Error::InvalidSource {
            path: config.source.clone(),
            message: e.to_string(),
        })?;
        if !source.is_dir() {
            return Err(Error::InvalidSource {
                path: source,
                message: "not a directory".into(),
            });
        }

        let output = resolve_output(&config.output)?;

        Ok(Self {
            source,
            output,
            workers: config.effective_workers(),
            options: CopyOptions {
                dry_run: config.dry_run,
                preserve_mtime: config.preserve_mtime,
            },
            // Verbose log lines share stderr with the bar.
            progress: if config.verbose { Progress::hidden() } else { Progress::new() },
            cancel: CancelToken::new(),
        })
    }

    /// Replace the progress reporter (e.g. with [`Progress::hidden`])
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Handle that stops the run when cancelled
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Run enumeration and the worker pool to completion
    pub fn run(&self) -> Result<SortSummary> {
        let _span = span!(Level::INFO, "sorter_run", source = %self.source.display()).entered();
        let started = Instant::now();
        info!(
            source = %self.source.display(),
            output = %self.output.display(),
            workers = self.workers,
            "Start sorting"
        );

        let stats = SortStats::default();
        let queue = WorkQueue::new();
        queue.seed(self.source.clone());
        let (sender, receiver) = queue.split();
        let (signal, gate) = start_gate();

        let exclude = excluded_dirs(&self.source, &self.output);

        let shared = WorkerShared {
            output: &self.output,
            options: self.options,
            progress: &self.progress,
            stats: &stats,
            cancel: &self.cancel,
        };

        let walk = thread::scope(|s| -> Result<WalkReport> {
            let enumerator = Enumerator::new(&self.source, &self.cancel).exclude(&exclude);
            let progress = &self.progress;
            let enumerator_handle = thread::Builder::new()
                .name("enumerator".into())
                .spawn_scoped(s, move || enumerator.run(sender, progress, signal))
                .map_err(|source| Error::Spawn {
                    name: "enumerator".into(),
                    source,
                })?;

            let mut worker_handles = Vec::with_capacity(self.workers);
            let mut spawn_error = None;
            for id in 0..self.workers {
                let name = format!("worker-{id}");
                let worker = Worker::new(id, receiver.clone(), gate.clone(), shared);
                match thread::Builder::new()
                    .name(name.clone())
                    .spawn_scoped(s, move || worker.run())
                {
                    Ok(handle) => worker_handles.push((name, handle)),
                    Err(source) => {
                        spawn_error = Some(Error::Spawn { name, source });
                        break;
                    }
                }
            }
            drop(receiver);
            drop(gate);

            let mut first_error = spawn_error;
            let walk = match enumerator_handle.join() {
                Ok(walk) => Some(walk),
                Err(_) => {
                    first_error.get_or_insert(Error::ThreadPanicked("enumerator".into()));
                    None
                }
            };
            for (name, handle) in worker_handles {
                if handle.join().is_err() {
                    first_error.get_or_insert(Error::ThreadPanicked(name));
                }
            }

            match (first_error, walk) {
                (Some(err), _) => Err(err),
                (None, Some(walk)) => Ok(walk),
                (None, None) => Err(Error::ThreadPanicked("enumerator".into())),
            }
        })?;

        self.progress.finish();

        let summary = SortSummary {
            source: self.source.clone(),
            output: self.output.clone(),
            workers: self.workers,
            dry_run: self.options.dry_run,
            directories_total: self.progress.total().unwrap_or(walk.discovered),
            directories_processed: self.progress.processed(),
            walk_errors: walk.errors,
            unreadable_dirs: stats.unreadable_dirs.load(Ordering::Relaxed),
            files_copied: stats.files_copied.load(Ordering::Relaxed),
            files_skipped: stats.files_skipped.load(Ordering::Relaxed),
            files_failed: stats.files_failed.load(Ordering::Relaxed),
            cancelled: walk.cancelled || self.cancel.is_cancelled(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        if !summary.cancelled && !summary.is_complete() {
            warn!(
                processed = summary.directories_processed,
                total = summary.directories_total,
                "Processed directory count does not match discovered total"
            );
        }
        info!("{}", summary.summary());

        Ok(summary)
    }
}

/// Output folders strictly below the source root; these are not enumerated
///
/// When the output is the source or one of its ancestors, the category
/// folders that fall inside the source are excluded instead.
fn excluded_dirs(source: &Path, output: &Path) -> Vec<PathBuf> {
    let output = fs::canonicalize(output).unwrap_or_else(|_| output.to_path_buf());
    let categories = Category::ALL.iter().map(|c| output.join(c.folder_name()));

    std::iter::once(output.clone())
        .chain(categories)
        .filter(|dir| dir.starts_with(source) && dir.as_path() != source)
        .collect()
}

/// Make the output root absolute without requiring it to exist
fn resolve_output(output: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(output).map_err(|e| Error::InvalidOutput {
        path: output.to_path_buf(),
        message: e.to_string(),
    })?;
    if absolute.exists() && !absolute.is_dir() {
        return Err(Error::InvalidOutput {
            path: absolute,
            message: "exists and is not a directory".into(),
        });
    }
    // Canonicalize when possible so it compares cleanly with the source.
    Ok(fs::canonicalize(&absolute).unwrap_or(absolute))
}
