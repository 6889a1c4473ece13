//! Progress reporting for a rebuild
//!
//! Provides a stage spinner using indicatif and the styled header and
//! summary printed around a run.

use crate::pipeline::BuildResult;
use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner showing the current build stage
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        bar.set_style(spinner_style);

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Finish and clear the progress display
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Print a header at the start of the build
pub fn print_header(input: &str, output: &str) {
    println!();
    println!(
        "{} {}",
        style("topictree-db").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Input:").bold(), input);
    println!("  {} {}", style("Output:").bold(), output);
    println!();
}

/// Print a summary of the build results
pub fn print_summary(result: &BuildResult, db_path: &str) {
    println!();
    println!("{}", style("Build Complete").green().bold());
    println!("{}", style("─".repeat(50)).dim());

    for report in result.write.reports() {
        let label = format!("{}:", report.table);
        let rows = result
            .table_rows
            .iter()
            .find(|(table, _)| *table == report.table)
            .map_or(report.inserted as u64, |(_, n)| *n as u64);
        println!(
            "  {} {} rows ({} of {} inserted)",
            style(format!("{:<12}", label)).bold(),
            format_number(rows),
            format_number(report.inserted as u64),
            format_number(report.attempted as u64)
        );
    }

    if result.flatten.skipped > 0 {
        println!(
            "  {} {}",
            style(format!("{:<12}", "Skipped:")).yellow().bold(),
            format_number(result.flatten.skipped as u64)
        );
    }
    println!(
        "  {} {}",
        style(format!("{:<12}", "Depth:")).bold(),
        result.flatten.max_depth
    );
    println!(
        "  {} {:.2}s",
        style(format!("{:<12}", "Duration:")).bold(),
        result.duration.as_secs_f64()
    );

    // Show database path with size if available
    let database = style(format!("{:<12}", "Database:")).bold();
    if let Some(size) = result.db_size {
        println!("  {} {} ({})", database, db_path, format_size(size, BINARY));
    } else {
        println!("  {} {}", database, db_path);
    }
    println!();
}
