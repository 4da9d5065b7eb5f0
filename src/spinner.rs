//! Status spinner and styled output
//!
//! Provides:
//! - A spinner that mirrors the engine's status line while a scan runs
//! - Color-coded status indicators and print helpers

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner animation frames
const HOUND_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Longest status line shown before the middle is elided.
const MAX_STATUS_WIDTH: usize = 72;

/// Status indicators
pub struct StatusIcons;

impl StatusIcons {
    pub const SUCCESS: &'static str = "✓";
    pub const ERROR: &'static str = "✗";
    pub const WARNING: &'static str = "⚠";
    pub const INFO: &'static str = "ℹ";
    pub const SCAN: &'static str = "🔍";
    pub const DUPES: &'static str = "👯";
}

/// Spinner fed by scan status strings.
pub struct ScanSpinner {
    bar: ProgressBar,
}

impl ScanSpinner {
    /// Create and start a new spinner
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(HOUND_FRAMES);
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// A spinner that draws nothing, for `--json` and piped output.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update the spinner message
    pub fn set_message(&self, msg: &str) {
        self.bar.set_message(elide_middle(msg, MAX_STATUS_WIDTH));
    }

    /// Stop with success message
    pub fn success(self, msg: &str) {
        self.bar.finish_and_clear();
        if !self.bar.is_hidden() {
            print_success(msg);
        }
    }

    /// Stop with warning message
    pub fn warn(self, msg: &str) {
        self.bar.finish_and_clear();
        if !self.bar.is_hidden() {
            print_warning(msg);
        }
    }
}

/// Shorten `text` to at most `max` characters by cutting out the middle.
pub fn elide_middle(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max || max < 5 {
        return text.to_string();
    }
    let keep = max - 3;
    let head = keep / 2;
    let tail = keep - head;
    let start: String = text.chars().take(head).collect();
    let end: String = text.chars().skip(count - tail).collect();
    format!("{}...{}", start, end)
}

/// Format duration for display
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

/// Human-readable byte size
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

const HEADER_WIDTH: usize = 60;

fn header_padding(title: &str) -> usize {
    HEADER_WIDTH.saturating_sub(title.chars().count() + 4) / 2
}

/// Print a styled header
pub fn print_header(title: &str) {
    let width = HEADER_WIDTH;
    let padding = header_padding(title);

    println!();
    println!("{}", "═".repeat(width).cyan());
    println!(
        "{}  {}  {}",
        " ".repeat(padding),
        title.bright_white().bold(),
        " ".repeat(padding)
    );
    println!("{}", "═".repeat(width).cyan());
    println!();
}

/// Print a styled subheader
pub fn print_subheader(title: &str) {
    println!("\n{} {}", "▶".bright_cyan(), title.bright_white());
    println!("{}", "─".repeat(40).bright_black());
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {}: {}", key.bright_black(), value.white());
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("{} {}", StatusIcons::SUCCESS.green(), msg.green());
}

/// Print an error message
pub fn print_error(msg: &str) {
    println!("{} {}", StatusIcons::ERROR.red(), msg.red());
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("{} {}", StatusIcons::WARNING.yellow(), msg.yellow());
}

/// Print an info message
pub fn print_info(msg: &str) {
    println!("{} {}", StatusIcons::INFO.cyan(), msg.cyan());
}
