//! Terminal messages.
//!
//! Everything goes to stderr; stdout is reserved for the asset stream.

use clap::ColorChoice;
use owo_colors::OwoColorize;
use std::io::{self, IsTerminal, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Plain,
    Warn,
    Success,
    Indent,
    Error,
    Hint,
}

/// Writes user-facing status lines to stderr.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    colored: bool,
}

impl OutputManager {
    /// Creates a manager; verbose lines are printed only when `verbose`.
    ///
    /// `ColorChoice::Auto` colours only when stderr is a terminal and
    /// `NO_COLOR` is unset.
    pub fn new(verbose: bool, color: ColorChoice) -> Self {
        let colored = match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
        };
        Self { verbose, colored }
    }

    /// Prints a line only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.verbose {
            self.line(Level::Plain, message)?;
        }
        Ok(())
    }

    /// Prints a warning.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.line(Level::Warn, message)
    }

    /// Prints a success line.
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.line(Level::Success, message)
    }

    /// Prints an indented detail line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        self.line(Level::Indent, message)
    }

    /// Prints a fatal error.
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.line(Level::Error, message)
    }

    /// Prints a recovery hint.
    pub fn hint(&self, message: &str) -> io::Result<()> {
        self.line(Level::Hint, message)
    }

    fn prefix(&self, level: Level) -> String {
        let label = match level {
            Level::Plain => return String::new(),
            Level::Warn => "warning:",
            Level::Success => "✓",
            Level::Indent => "  →",
            Level::Error => "Error:",
            Level::Hint => "  hint:",
        };
        if !self.colored {
            return format!("{label} ");
        }
        let painted = match level {
            Level::Warn => label.yellow().bold().to_string(),
            Level::Success => label.green().to_string(),
            Level::Indent => label.cyan().to_string(),
            Level::Error => label.red().bold().to_string(),
            Level::Hint => label.yellow().to_string(),
            Level::Plain => String::new(),
        };
        format!("{painted} ")
    }

    fn line(&self, level: Level, message: &str) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{}{}", self.prefix(level), message)
    }
}
