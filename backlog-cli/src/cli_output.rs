// ABOUTME: Centralized CLI output utilities for consistent user-facing messages
// ABOUTME: Renders errors, warnings, successes and cancellation notes on stderr

use owo_colors::OwoColorize;
use std::io::IsTerminal;

pub struct CliOutput {
    use_color: bool,
}

impl CliOutput {
    /// Create new CLI output utility with TTY detection
    pub fn new() -> Self {
        Self {
            use_color: std::io::stderr().is_terminal(),
        }
    }

    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.format_error(message));
    }

    pub fn warning(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "warning:".yellow().bold(), message);
        } else {
            eprintln!("warning: {}", message);
        }
    }

    /// Follow-up advice printed under an error
    pub fn hint(&self, message: &str) {
        if self.use_color {
            eprintln!("  {} {}", "hint:".cyan(), message.dimmed());
        } else {
            eprintln!("  hint: {}", message);
        }
    }

    pub fn success(&self, message: &str) {
        eprintln!("{}", self.format_success(message));
    }

    /// The user backed out of a prompt; not an error
    pub fn cancelled(&self) {
        if self.use_color {
            eprintln!("{}", "Cancelled".dimmed());
        } else {
            eprintln!("Cancelled");
        }
    }

    pub fn format_error(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "error:".red().bold(), message)
        } else {
            format!("error: {}", message)
        }
    }

    pub fn format_success(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "✔".green().bold(), message)
        } else {
            format!("✔ {}", message)
        }
    }
}

impl Default for CliOutput {
    fn default() -> Self {
        Self::new()
    }
}
