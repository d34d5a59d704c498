//! Sorter - copies a directory tree into category folders
//!
//! Confirms the source folder, then runs the enumerator and the worker pool
//! and prints a summary.

use anyhow::{Context, Result};
use category_sorter::console::{print_banner, print_error, print_path, print_summary, print_warning};
use category_sorter::{Cli, Config, Confirmation, Sorter, confirm_source, init_locale};
use chrono::Local;
use clap::Parser;
use rust_i18n::t;
use std::fs;
use std::io::{stdin, stdout};
use std::path::{Path, PathBuf};
use tracing::{Level, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// Initialize i18n for this binary
rust_i18n::i18n!("locales", fallback = "en");

/// Keeps the file writer alive until the end of `main`
struct LogHandle {
    path: Option<PathBuf>,
    _guard: Option<WorkerGuard>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_locale();

    let config = load_config(&cli)?;
    let log = setup_logging(&cli, config.verbose)?;

    print_banner();
    info!(version = env!("CARGO_PKG_VERSION"), "Sorter starting");
    if config.verbose {
        info!(?config, "Configuration loaded");
    }

    let source = if cli.yes {
        config.source.clone()
    } else {
        match confirm_source(&config.source, stdin().lock(), stdout()) {
            Ok(Confirmation::Proceed(path)) => path,
            Ok(Confirmation::Abort) => {
                print_warning(&t!("aborted"));
                info!("User aborted");
                return Ok(());
            }
            Err(e) => exit_with_error(&e, "Startup failed", log),
        }
    };
    let config = Config { source, ..config };

    let sorter = match Sorter::new(&config) {
        Ok(sorter) => sorter,
        Err(e) => exit_with_error(&e, "Startup failed", log),
    };
    info!(source = %sorter.source().display(), "Start in folder");

    let cancel = sorter.cancel_token();
    ctrlc::set_handler(move || {
        warn!("Interrupt received, stopping after the current folders");
        cancel.cancel();
    })
    .context("Failed to set signal handler")?;

    let summary = match sorter.run() {
        Ok(summary) => summary,
        Err(e) => exit_with_error(&e, "Sorting failed", log),
    };

    print_summary(&summary);

    if let Some(ref report) = cli.report {
        summary
            .write_json(report)
            .with_context(|| format!("writing report to {}", report.display()))?;
        print_path(&t!("report_written"), report);
    }
    if let Some(ref path) = log.path {
        print_path(&t!("log_file"), path);
    }

    info!(
        output = %summary.output.display(),
        "Completed copying files, unsorted files can be removed"
    );
    Ok(())
}

/// Log and print a fatal error, flush the log file, exit non-zero
fn exit_with_error(err: &category_sorter::Error, context: &str, log: LogHandle) -> ! {
    error!(error = %err, "{}", context);
    print_error(&err.to_string());
    drop(log);
    std::process::exit(1);
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli) -> Result<Config> {
    match cli.config {
        Some(ref path) => {
            let file_config = Config::load_from_file(path)?;
            Ok(cli.merge_with_config(file_config))
        }
        None => Ok(cli.to_config()),
    }
}

/// Setup logging: stderr always, a timestamped file when a log dir is given
fn setup_logging(cli: &Cli, verbose: bool) -> Result<LogHandle> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let (file_layer, guard, path) = match cli.log_dir {
        Some(ref dir) => {
            let path = log_file_path(dir);
            fs::create_dir_all(dir)?;
            let file = fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_thread_names(true)
                .with_writer(non_blocking);
            (Some(layer), Some(guard), Some(path))
        }
        None => (None, None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_thread_names(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_names(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(LogHandle { path, _guard: guard })
}

fn log_file_path(dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("sorter_{}.log", timestamp))
}
