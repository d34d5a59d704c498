//! CLI argument parsing with clap

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Sorter - copies a directory tree into category folders
///
/// Every folder below the source is searched; files are copied into
/// images/, video/, documents/, audio/, archives/ or others/ under the
/// output folder with transliterated, sanitized names.
#[derive(Parser, Debug)]
#[command(name = "sorter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Source folder [default: current folder]
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Output folder [default: sorted]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of worker threads (0 = one per CPU) [default: 5]
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Dry run mode - show where files would go without copying them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Keep the source modification time on copied files
    #[arg(long)]
    pub preserve_mtime: bool,

    /// Verbose mode - log every folder searched and file copied
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip the interactive confirmation of the source folder
    #[arg(short, long)]
    pub yes: bool,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,

    /// Also write logs to a timestamped file in this directory
    #[arg(long, env = "SORTER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref source) = self.source {
            config.source = source.clone();
        }
        if let Some(ref output) = self.output {
            config.output = output.clone();
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.preserve_mtime {
            config.preserve_mtime = true;
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}
