//! CLI output styling
//!
//! Colors and layout for the banner and the end-of-run summary.

use crate::sort::SortSummary;
use crossterm::{
    ExecutableCommand,
    style::{Color, Print, Stylize, style},
};
use rust_i18n::t;
use std::io::stdout;
use std::path::Path;

/// CLI theme colors
pub struct CliTheme;

impl CliTheme {
    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
    pub const HINT: Color = Color::DarkGrey;
    pub const ACCENT: Color = Color::Cyan;
}

const BANNER: &str = r#"
  ____             _
 / ___|  ___  _ __| |_ ___ _ __
 \___ \ / _ \| '__| __/ _ \ '__|
  ___) | (_) | |  | ||  __/ |
 |____/ \___/|_|   \__\___|_|
"#;

/// Print the startup banner
pub fn print_banner() {
    let _ = stdout().execute(Print(style(BANNER).with(Color::Blue).bold()));
    let _ = stdout().execute(Print(format!(
        "{}\n",
        style(format!("      {}", t!("banner_welcome"))).with(CliTheme::ACCENT)
    )));
}

/// Print separator line
pub fn print_separator() {
    let _ = stdout().execute(Print(format!("{}\n", "─".repeat(LINE_WIDTH))));
}

/// Width of separators and centered titles
const LINE_WIDTH: usize = 60;

/// Left padding that centers `title` on a line of `width` characters
fn centered_padding(title: &str, width: usize) -> usize {
    width.saturating_sub(title.chars().count()) / 2
}

/// Print a centered title
pub fn print_title(title: &str) {
    let padding = centered_padding(title, LINE_WIDTH);
    let _ = stdout().execute(Print(format!(
        "{}{}\n\n",
        " ".repeat(padding),
        title.bold()
    )));
}

pub fn print_warning(msg: &str) {
    let _ = stdout().execute(Print(style("⚠ ").with(CliTheme::WARNING).bold()));
    let _ = stdout().execute(Print(format!("{}\n", msg)));
}

pub fn print_error(msg: &str) {
    let _ = stdout().execute(Print(style("✗ ").with(CliTheme::ERROR).bold()));
    let _ = stdout().execute(Print(format!("{}: {}\n", t!("error_prefix"), msg)));
}

pub fn print_hint(msg: &str) {
    let _ = stdout().execute(Print(style("→ ").with(CliTheme::HINT)));
    let _ = stdout().execute(Print(format!("{}\n", msg)));
}

/// Print a statistics line
pub fn print_stat(key: &str, value: &str, color: Color) {
    let key_styled = style(key).with(CliTheme::HINT);
    let value_styled = style(value).with(color).bold();
    let _ = stdout().execute(Print("  "));
    let _ = stdout().execute(Print(key_styled));
    let _ = stdout().execute(Print(": "));
    let _ = stdout().execute(Print(value_styled));
    let _ = stdout().execute(Print("\n"));
}

/// Print a labelled path
pub fn print_path(label: &str, path: &Path) {
    let _ = stdout().execute(Print(style("  📁 ").with(CliTheme::ACCENT)));
    let _ = stdout().execute(Print(style(format!("{}: ", label)).with(CliTheme::HINT)));
    let _ = stdout().execute(Print(format!("{}\n", path.display())));
}

pub fn print_blank() {
    let _ = stdout().execute(Print("\n"));
}

/// Print the end-of-run summary
pub fn print_summary(summary: &SortSummary) {
    print_blank();
    print_separator();
    print_title(&t!("summary_title"));

    let directories = format!(
        "{}/{}",
        summary.directories_processed, summary.directories_total
    );
    let unreadable = summary.unreadable_dirs + summary.walk_errors;

    print_stat(&t!("stat_directories"), &directories, CliTheme::ACCENT);
    print_stat(&t!("stat_copied"), &summary.files_copied.to_string(), CliTheme::SUCCESS);
    print_stat(&t!("stat_skipped"), &summary.files_skipped.to_string(), CliTheme::WARNING);
    print_stat(&t!("stat_failed"), &summary.files_failed.to_string(), CliTheme::ERROR);
    if unreadable > 0 {
        print_stat(&t!("stat_unreadable"), &unreadable.to_string(), CliTheme::ERROR);
    }
    print_stat(
        &t!("stat_elapsed"),
        &format!("{:.2}s", summary.elapsed_ms as f64 / 1000.0),
        CliTheme::HINT,
    );
    print_blank();

    if summary.dry_run {
        print_warning(&t!("dry_run_notice"));
    }
    if summary.cancelled {
        print_warning(&t!("cancelled_notice"));
    }

    print_separator();
    print_path(&t!("summary_output"), &summary.output);
    if !summary.dry_run {
        print_hint(&t!("summary_hint"));
    }
}
