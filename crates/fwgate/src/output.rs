//! Output: progress lines for `apply`, rendered rule sets for `plan`.
//!
//! Progress goes to stdout as plain lines. Rule sets render as a table
//! via `tabled`, or as JSON / YAML via serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Progress ─────────────────────────────────────────────────────────

/// Human-readable status lines on stdout.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    quiet: bool,
    color: bool,
}

impl Progress {
    pub fn new(quiet: bool, color: bool) -> Self {
        Self { quiet, color }
    }

    pub fn line(&self, msg: &str) {
        if !self.quiet {
            print_line(msg);
        }
    }

    pub fn success(&self, msg: &str) {
        if self.quiet {
            return;
        }
        if self.color {
            print_line(&msg.green().bold().to_string());
        } else {
            print_line(msg);
        }
    }
}

fn print_line(msg: &str) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{msg}");
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render `data` in the chosen format. Table mode uses `rows`.
pub fn render<T, R>(format: &OutputFormat, data: &T, rows: &[R]) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
    R: Tabled,
{
    match format {
        OutputFormat::Table => Ok(render_table(rows)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(data).map_err(|e| CliError::Render(e.to_string()))
        }
        OutputFormat::JsonCompact => {
            serde_json::to_string(data).map_err(|e| CliError::Render(e.to_string()))
        }
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string())),
    }
}

/// Print rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    print_line(output);
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}
