//! Terminal output formatting.
//!
//! Human-readable lines with colored status symbols, or one JSON object
//! per line with `--json` for scripting. `--quiet` drops everything but
//! warnings, errors and JSON.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::json;
use tabled::{Table, Tabled};

use crate::application::{Progress, RunStats};

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Verbosity level (0 = normal, 1+ = increasingly verbose).
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

fn write_config(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

fn regular_output_suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

fn emit_json_line(kind: &str, payload: serde_json::Value) {
    println!(
        "{}",
        json!({
            "type": kind,
            "payload": payload,
        })
    );
}

/// Apply output settings from the global CLI flags.
pub fn configure(config: OutputConfig) {
    write_config(config);
}

#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

/// Verbosity from `-v` flags.
#[must_use]
pub fn verbosity() -> u8 {
    read_config().verbose
}

/// Print the application name and version.
pub fn header(version: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("header", json!({ "app": "sedori", "version": version }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("{} {}", "sedori".bold(), version.dimmed());
    println!();
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    let value = value.to_string();

    if config.json {
        emit_json_line("field", json!({ "label": label, "value": value }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {:<14} {}", label.dimmed(), value);
}

pub fn success(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {} {}", "✓".green(), message);
}

pub fn warning(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("warning", json!({ "message": message }));
        return;
    }

    println!("  {} {}", "⚠".yellow(), message);
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    let config = read_config();

    if config.json {
        eprintln!(
            "{}",
            json!({
                "type": "error",
                "payload": { "message": message },
            })
        );
        return;
    }

    eprintln!("  {} {}", "✗".red(), message);
}

pub fn section(title: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("section", json!({ "title": title }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!();
    println!("{}", title.bold());
}

pub fn hint(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("hint", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed());
}

/// Emit a JSON value directly.
pub fn json_output(value: serde_json::Value) {
    println!("{value}");
}

/// Format a value in cyan.
pub fn highlight(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    format!("{}", value.cyan())
}

/// Print rows as a table. Nothing in JSON or quiet mode.
pub fn table<T: Tabled>(rows: &[T]) {
    let config = read_config();
    if config.json || config.quiet || rows.is_empty() {
        return;
    }

    for line in Table::new(rows).to_string().lines() {
        println!("  {line}");
    }
}

/// Emit report rows as one JSON line.
pub fn rows<T: serde::Serialize>(command: &str, rows: &[T]) {
    if is_json() {
        emit_json_line("rows", json!({ "command": command, "rows": rows }));
    }
}

/// Print the counters of a finished pipeline run.
pub fn run_stats(stats: &RunStats) {
    let config = read_config();

    if config.json {
        emit_json_line("stats", json!(stats));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    section("Summary");
    field("Examined", stats.examined);
    field("Accepted", stats.accepted);
    field("Rejected", stats.rejected_total());
    if verbosity() > 0 {
        for (reason, count) in &stats.rejected {
            field(&format!("  {reason}"), count);
        }
    }
    if stats.failed > 0 {
        warning(&format!("{} lookups failed and were skipped", stats.failed));
    }
}

const BAR_TEMPLATE: &str = "  {spinner:.cyan} {prefix:.bold} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}";

/// [`Progress`] drawn as an indicatif bar on stderr.
///
/// Hidden in JSON or quiet mode.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    #[must_use]
    pub fn new() -> Self {
        let config = read_config();
        if config.json || config.quiet {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        let bar = ProgressBar::new(0);
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for ProgressReporter {
    fn start(&self, total: usize, label: &str) {
        self.bar.reset();
        self.bar.set_length(total as u64);
        self.bar.set_prefix(label.to_string());
    }

    fn advance(&self, message: &str) {
        self.bar.set_message(message.to_string());
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
