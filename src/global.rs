//! Process-wide defaults.
//!
//! Every new [`Logger`] starts at the default threshold, and loggers without
//! their own clock read the default clock on every call. Both can be replaced
//! at runtime; tests that do so should hold a [`ClockOverride`] (or restore
//! the level themselves) and run serially.

use crate::domain::LogLevel;
use crate::logger::clock::{self, Clock};
use crate::logger::{Logger, Sink};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::LazyLock;

static DEFAULT_LEVEL: RwLock<LogLevel> = parking_lot::const_rwlock(LogLevel::Info);
static DEFAULT_CLOCK: RwLock<Option<Clock>> = parking_lot::const_rwlock(None);
static DEFAULT_LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::with_sink(Sink::stdout()));

/// The threshold newly created loggers start with.
pub fn default_log_level() -> LogLevel {
    *DEFAULT_LEVEL.read()
}

/// Changes the threshold for loggers created from now on.
///
/// Existing loggers keep their own threshold.
pub fn set_default_log_level(level: LogLevel) {
    *DEFAULT_LEVEL.write() = level;
}

/// The clock used by loggers that were not given one.
pub fn default_clock() -> Clock {
    DEFAULT_CLOCK.read().clone().unwrap_or_else(clock::system_clock)
}

pub fn set_default_clock(clock: Clock) {
    *DEFAULT_CLOCK.write() = Some(clock);
}

/// Goes back to wall-clock time.
pub fn reset_default_clock() {
    *DEFAULT_CLOCK.write() = None;
}

pub(crate) fn now() -> DateTime<Utc> {
    let clock = DEFAULT_CLOCK.read().clone();
    match clock {
        Some(clock) => clock(),
        None => Utc::now(),
    }
}

/// A logger writing to stdout, created on first use.
///
/// The logger is shared, so its `keys` cannot be reassigned and always stay
/// the defaults. For other key names, build a logger with
/// [`Logger::with_sink`] and [`Sink::stdout`], or from a
/// [`LoggerConfig`](crate::LoggerConfig).
pub fn default_logger() -> &'static Logger {
    &DEFAULT_LOGGER
}

/// Replaces the default clock until dropped, then puts the previous one back.
#[must_use = "the override is undone as soon as the guard is dropped"]
pub struct ClockOverride {
    previous: Option<Clock>,
}

impl ClockOverride {
    pub fn new(clock: Clock) -> Self {
        let previous = DEFAULT_CLOCK.write().replace(clock);
        Self { previous }
    }
}

impl Drop for ClockOverride {
    fn drop(&mut self) {
        *DEFAULT_CLOCK.write() = self.previous.take();
    }
}
