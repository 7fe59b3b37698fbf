//! Logging setup for the `dalias` binary.
//!
//! Library code only emits `tracing` events; embedders install their own
//! subscriber. The binary calls [`init_logging`] once at startup.
//!
//! Level resolution, first match wins:
//! 1. `--debug` / `--quiet`
//! 2. `RUST_LOG`
//! 3. `log_level` from configuration
//! 4. `warn`

use std::sync::Once;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Log level for CLI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn as_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Silent => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    /// Pick the level from CLI flags, falling back to a configured name.
    pub fn from_flags(debug: bool, quiet: bool, configured: Option<&str>) -> Self {
        if debug {
            LogLevel::Debug
        } else if quiet {
            LogLevel::Error
        } else {
            configured
                .and_then(|name| name.parse().ok())
                .unwrap_or_default()
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Install the global subscriber. Later calls are no-ops.
///
/// With `force` set (from `--debug`/`--quiet`) `RUST_LOG` is ignored.
pub fn init_logging(level: LogLevel, force: bool) {
    INIT.call_once(|| {
        let builder = EnvFilter::builder().with_default_directive(level.as_level_filter().into());
        let filter = if force {
            builder.parse_lossy("")
        } else {
            builder.from_env_lossy()
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    });
}
