//! Paragraph logging as an injected capability.
//!
//! The library never decides where log output goes. A client hands a
//! [`LogConfig`] to the layout context; when it carries no sink, logging
//! costs a single branch and nothing is formatted.
//!
//! Debug messages are compiled out of release builds regardless of the
//! configured level.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use strum_macros::Display;

/// Severity of a log message, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
#[strum(serialize_all = "UPPERCASE")]
pub enum LogLevel {
    /// Debug level logging.
    Debug,
    /// Info level logging.
    Info,
    /// Notice level logging.
    Notice,
    /// Warning level logging.
    Warning,
    /// Error level logging.
    Error,
}

impl LogLevel {
    /// Lowest level that survives compilation in this build profile.
    pub const MIN_COMPILED: Self = if cfg!(debug_assertions) {
        Self::Debug
    } else {
        Self::Info
    };
}

/// Destination for paragraph log messages.
///
/// Clients implement this to route messages into their own logging. Any
/// client state the sink needs travels inside the implementing value.
pub trait LogSink: Send + Sync {
    /// Record one message.
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>);
}

/// Writes `paragraph: LEVEL: message` lines to standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        eprintln!("paragraph: {:>7}: {args}", level.to_string());
    }
}

/// Forwards messages into the [`log`](::log) facade under the `paragraph`
/// target, so hosts that already install a logger need no extra plumbing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacadeSink;

impl LogSink for FacadeSink {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        let level = match level {
            LogLevel::Debug => ::log::Level::Debug,
            LogLevel::Info | LogLevel::Notice => ::log::Level::Info,
            LogLevel::Warning => ::log::Level::Warn,
            LogLevel::Error => ::log::Level::Error,
        };
        ::log::log!(target: "paragraph", level, "{args}");
    }
}

/// Logging configuration: an optional sink and the minimum level to emit.
#[derive(Clone)]
pub struct LogConfig {
    sink: Option<Arc<dyn LogSink>>,
    level: LogLevel,
}

impl LogConfig {
    /// A configuration that discards everything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            sink: None,
            level: LogLevel::Warning,
        }
    }

    /// Log to `sink` at `level` and above.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>, level: LogLevel) -> Self {
        Self {
            sink: Some(sink),
            level,
        }
    }

    /// Log to standard error at `level` and above.
    #[must_use]
    pub fn stderr(level: LogLevel) -> Self {
        Self::new(Arc::new(StderrSink), level)
    }

    /// The configured minimum level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether a message at `level` would reach a sink.
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.sink.is_some() && level >= self.level && level >= LogLevel::MIN_COMPILED
    }

    /// Hand a message to the sink if `level` is enabled.
    ///
    /// Prefer the [`para_log!`](crate::para_log) macro, which skips building
    /// the arguments when nothing would be emitted.
    pub fn emit(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        if let Some(sink) = &self.sink {
            sink.log(level, args);
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for LogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogConfig")
            .field("has_sink", &self.sink.is_some())
            .field("level", &self.level)
            .finish()
    }
}

/// Log through a [`LogConfig`] without formatting when disabled.
///
/// ```
/// use paragraph_common::{para_log, LogConfig, LogLevel};
///
/// let cfg = LogConfig::disabled();
/// para_log!(&cfg, LogLevel::Info, "laid out {} lines", 3);
/// ```
#[macro_export]
macro_rules! para_log {
    ($cfg:expr, $level:expr, $($arg:tt)+) => {{
        let cfg: &$crate::LogConfig = $cfg;
        let level: $crate::LogLevel = $level;
        if cfg.enabled(level) {
            cfg.emit(level, format_args!($($arg)+));
        }
    }};
}
