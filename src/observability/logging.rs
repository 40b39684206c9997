//! Logging initialization for `compdocs`.
//!
//! Provides structured logging via `tracing` with human-readable and
//! JSON output formats, configurable verbosity, and environment-based
//! override via `COMPDOCS_LOG_LEVEL`.
//!
//! Content anomalies are logged on [`DIAGNOSTICS_TARGET`]. That target is
//! switched off unless diagnostics are enabled, so a production build stays
//! quiet about stale references and half-written content files.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Tracing target for content diagnostics.
pub const DIAGNOSTICS_TARGET: &str = "compdocs::diagnostics";

/// Environment variable overriding the log filter.
pub const LOG_LEVEL_ENV: &str = "COMPDOCS_LOG_LEVEL";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with optional ANSI colors.
    #[default]
    Human,
    /// Newline-delimited JSON for machine consumption.
    Json,
}

/// Maps a verbosity level to a tracing directive string.
///
/// - 0 → `"warn"`
/// - 1 → `"info"`
/// - 2 → `"debug"`
/// - 3+ → `"trace"` (saturates)
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Builds the filter for the given verbosity and diagnostics switch.
///
/// `env_override` takes precedence over `verbosity` for the base level;
/// the diagnostics directive is appended either way.
#[must_use]
pub fn build_filter(verbosity: u8, diagnostics: bool, env_override: Option<&str>) -> EnvFilter {
    let base = env_override
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity_to_directive(verbosity)));

    let level = if diagnostics {
        // Diagnostics are warnings; keep them visible under a quieter base.
        if verbosity >= 2 { "debug" } else { "warn" }
    } else {
        "off"
    };

    match format!("{DIAGNOSTICS_TARGET}={level}").parse() {
        Ok(directive) => base.add_directive(directive),
        Err(_) => base,
    }
}

/// Initializes the global tracing subscriber.
///
/// If `COMPDOCS_LOG_LEVEL` is set it takes precedence over `verbosity`.
/// Uses `try_init()` so calling this more than once (e.g. in tests) is safe.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice, diagnostics: bool) {
    let env_override = std::env::var(LOG_LEVEL_ENV).ok();
    let filter = build_filter(verbosity, diagnostics, env_override.as_deref());

    let show_target = verbosity >= 2;

    let use_ansi = match color {
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    match format {
        LogFormat::Human => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(use_ansi)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
