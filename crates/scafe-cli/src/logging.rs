//! Tracing subscriber initialisation.
//!
//! Only the CLI crate calls [`init_logging`]; `scafe-core` and
//! `scafe-adapters` only *emit* spans and events.
//!
//! # Verbosity mapping
//!
//! | Flag(s)  | Filter level |
//! |----------|--------------|
//! | (none)   | WARN         |
//! | `-v`     | INFO         |
//! | `-vv`    | DEBUG        |
//! | `-vvv`   | TRACE        |
//! | `--quiet`| ERROR        |
//!
//! `RUST_LOG` overrides all of the above if set.

use std::io::IsTerminal as _;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

const LOG_FILE_PREFIX: &str = "scafe.log";

/// Keeps the file writer flushing until dropped at the end of `main`.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard(#[allow(dead_code)] Option<WorkerGuard>);

/// Initialise the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros fire. With
/// `directory` set, events are also appended to a daily-rolling file there
/// (at least INFO, without ANSI codes).
pub fn init_logging(args: &GlobalArgs, directory: Option<&Path>) -> anyhow::Result<LogGuard> {
    let level = derive_level(args);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    let (file_layer, guard) = match directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .with_filter(EnvFilter::new(filter_directive(file_level(level))));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(LogGuard(guard))
}

fn filter_directive(level: &str) -> String {
    format!("scafe={level},scafe_core={level},scafe_adapters={level}")
}

/// Translate the verbosity counter + quiet flag to a level string.
fn derive_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// The log file records at least every created entry.
fn file_level(level: &'static str) -> &'static str {
    match level {
        "error" | "warn" => "info",
        other => other,
    }
}
