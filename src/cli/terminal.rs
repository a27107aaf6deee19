//! Terminal capability detection and utilities

use owo_colors::{OwoColorize, colors::css};
use supports_color::Stream;

/// Terminals narrower than this get stacked rather than tabular output.
const NARROW_WIDTH: u16 = 80;

/// Detects whether colored output should be enabled for both streams.
///
/// Warnings go to stderr while tables go to stdout; color is only used when
/// both support it so that redirecting either one yields plain text.
pub fn supports_color() -> bool {
    supports_color::on(Stream::Stdout).is_some() && supports_color::on(Stream::Stderr).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Check if terminal is narrow
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < NARROW_WIDTH)
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as a headline figure (blue, bold)
    fn figure(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as success (green)
    fn success(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn figure(&self) -> String {
        paint(self, |s| s.fg::<css::DodgerBlue>().bold().to_string())
    }

    fn warning(&self) -> String {
        paint(self, |s| s.fg::<css::Orange>().to_string())
    }

    fn success(&self) -> String {
        paint(self, |s| s.fg::<css::Green>().to_string())
    }

    fn dim(&self) -> String {
        paint(self, |s| s.dimmed().to_string())
    }
}

impl Colorize for String {
    fn figure(&self) -> String {
        self.as_str().figure()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn success(&self) -> String {
        self.as_str().success()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}

fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(text)
    } else {
        text.to_string()
    }
}
