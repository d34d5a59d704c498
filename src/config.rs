//! Configuration types for the category sorter

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Worker count used when nothing else is configured
pub const DEFAULT_WORKERS: usize = 5;

/// Configuration for a sorting run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory tree to sort
    pub source: PathBuf,

    /// Destination root; category folders are created below it
    pub output: PathBuf,

    /// Number of worker threads (0 = auto)
    pub workers: usize,

    /// Dry run mode - compute destinations without copying
    pub dry_run: bool,

    /// Copy the source modification time onto each copied file
    pub preserve_mtime: bool,

    /// Verbose output - log every search and copy action
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            output: PathBuf::from("sorted"),
            workers: DEFAULT_WORKERS,
            dry_run: false,
            preserve_mtime: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Number of workers to actually start
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(DEFAULT_WORKERS)
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError { source: e })?;

        fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Category Sorter Configuration File
# This file uses TOML format (https://toml.io)

# Directory tree to sort
source = "D:/Downloads"

# Output directory; images/, video/, documents/, audio/, archives/
# and others/ are created below it on demand
output = "D:/Sorted"

# Number of worker threads (0 = one per CPU)
workers = 5

# Dry run mode - show where files would go without copying them
dry_run = false

# Keep the source modification time on copied files
preserve_mtime = false

# Verbose output - log every directory searched and file copied
verbose = false
"#
        .to_string()
    }
}

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {source}")]
    SerializeError { source: toml::ser::Error },
}
