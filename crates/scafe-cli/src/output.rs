//! Output management and formatting.

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use scafe_core::error::ScafeError;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Manages CLI output based on flags and configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // The flag wins unless left at auto; then the configured format applies.
        let requested = match args.output_format {
            OutputFormat::Auto => config.output.format,
            explicit => explicit,
        };
        let resolved_format = match requested {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            other => other,
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    /// Human-readable lines are suppressed in quiet and JSON modes.
    fn chatty(&self) -> bool {
        !self.quiet && self.resolved_format != OutputFormat::Json
    }

    // ── Public write methods ───────────────────────────────────────────────

    pub fn print(&self, msg: &str) -> io::Result<()> {
        if !self.chatty() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// `✓ <msg>`
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked("\u{2713}", msg, |s| s.green().bold().to_string())
    }

    /// `⚠ <msg>`; goes to stderr so it survives piping.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}")
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        Term::stderr().write_line(&line)
    }

    /// `ℹ <msg>`
    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked("\u{2139}", msg, |s| s.blue().bold().to_string())
    }

    /// `• <msg>` in dim text, for entries that were already there.
    pub fn skipped(&self, msg: &str) -> io::Result<()> {
        self.marked("\u{2022}", msg, |s| s.dimmed().to_string())
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if !self.chatty() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    fn marked(&self, mark: &str, msg: &str, paint: impl Fn(&str) -> String) -> io::Result<()> {
        if !self.chatty() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("{mark} {msg}")
        } else {
            format!("{} {msg}", paint(mark))
        };
        self.term.write_line(&line)
    }

    /// Pretty JSON on stdout. Printed even in quiet mode.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> CliResult<()> {
        let rendered = serde_json::to_string_pretty(value).map_err(|e| {
            CliError::Core(ScafeError::Internal {
                message: format!("could not serialise output: {e}"),
            })
        })?;
        self.term.write_line(&rendered)?;
        Ok(())
    }

    /// A spinner on stderr; hidden unless the output is for a human.
    pub fn spinner(&self, msg: impl Into<String>) -> ProgressBar {
        if self.quiet || self.resolved_format != OutputFormat::Human {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_message(msg.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}
