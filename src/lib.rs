//! Category Sorter - copies a directory tree into category folders
//!
//! This library provides:
//! - Extension based classification (images, video, documents, audio, archives, others)
//! - Cyrillic transliteration and filename sanitizing
//! - A single-pass directory enumerator feeding a shared work queue
//! - A one-shot start gate and a fixed worker pool with per-file failure isolation
//! - Directory-level progress reporting
//! - A parallel divisor utility

// Initialize i18n with locale files
rust_i18n::i18n!("locales", fallback = "en");

pub mod classify;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod factorize;
pub mod i18n;
pub mod normalize;
pub mod prompt;
pub mod sort;

pub use classify::{Category, classify, classify_path};
pub use cli::Cli;
pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use factorize::{divisors, divisors_parallel};
pub use i18n::init_locale;
pub use normalize::normalize;
pub use prompt::{Confirmation, confirm_source};
pub use sort::{CancelToken, Progress, SortSummary, Sorter};
