//! Styled status output.
//!
//! Everything here writes to stderr; stdout is reserved for generated code
//! and JSON dumps.

use owo_colors::OwoColorize;

/// Print a header/title
pub fn header(text: &str) {
    eprintln!("{}", text.bold().cyan());
    eprintln!("{}", "─".repeat(text.len()).dimmed());
}

/// Print a section header
pub fn section(text: &str) {
    eprintln!("{}", text.bold().white());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    eprintln!("  {}: {}", key.dimmed(), value);
}

/// Print a success message
pub fn success(text: &str) {
    eprintln!("{} {}", "✔".green().bold(), text.green());
}

/// Print a warning message
pub fn warn(text: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), text.yellow());
}

/// Print a step indicator
pub fn step(current: usize, total: usize, text: &str) {
    eprintln!("{} {}", format!("[{}/{}]", current, total).dimmed(), text);
}

/// Print a newline
pub fn newline() {
    eprintln!();
}
