//! Log subscriber setup for the CLI.
//!
//! # Environment Variables
//!
//! - `TQLGEN_LOG` - an `EnvFilter` directive such as `debug` or
//!   `tqlgen_schema=trace`; overrides `-v`
//! - `TQLGEN_LOG_FORMAT=pretty|compact|json` - output format (default: compact)
//!
//! Without `TQLGEN_LOG` the level follows the `-v` count: none is `warn`,
//! then `info`, `debug` and `trace`. Logs always go to stderr.

use std::env;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter directive variable.
pub const LOG_ENV: &str = "TQLGEN_LOG";

/// Output format variable.
pub const LOG_FORMAT_ENV: &str = "TQLGEN_LOG_FORMAT";

/// Log line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// Parse a format name; unknown names fall back to compact.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }

    fn from_env() -> Self {
        env::var(LOG_FORMAT_ENV)
            .map(|f| Self::parse(&f))
            .unwrap_or_default()
    }
}

/// Level selected by the `-v` count.
pub fn verbosity_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        let level = verbosity_level(verbose);
        EnvFilter::try_new(format!(
            "warn,tqlgen_schema={level},tqlgen_codegen={level},tqlgen_cli={level}"
        ))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
    })
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: u8) {
    let filter = filter(verbose);
    let registry = tracing_subscriber::registry().with(filter);

    // A subscriber may already be installed; keep it.
    let _ = match LogFormat::from_env() {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };

    tracing::debug!(verbose, "logging initialized");
}
