//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream};

/// Text styles used across commands
pub trait Stylize {
    /// Highlighted value
    fn accent(&self) -> String;
    /// De-emphasized label
    fn muted(&self) -> String;
    /// Heading
    fn emphasis(&self) -> String;
}

impl<T: std::fmt::Display> Stylize for T {
    fn accent(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.cyan())
            .to_string()
    }

    fn muted(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.dimmed())
            .to_string()
    }

    fn emphasis(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.bold())
            .to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    "✓".if_supports_color(Stream::Stdout, |t| t.green())
        .to_string()
}

/// Spinner used while waiting on the network
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}
