//! The JSON logger.
//!
//! A [`Logger`] owns a threshold, an immutable set of contextual fields, the
//! names of its three reserved keys, a clock and a [`Sink`]. Accepted calls
//! are formatted and encoded without any lock held; only the final write
//! goes through the sink's mutex, so records never interleave.

pub mod clock;
pub mod format;
pub mod record;
pub mod sink;

pub use format::{Arg, sprintf};
pub use sink::Sink;

use crate::domain::{FieldKeys, Fields, LogLevel};
use crate::global;
use chrono::{DateTime, Utc};
use clock::Clock;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

struct State {
    level: LogLevel,
    fields: Fields,
}

/// Logs JSON formatted messages to a single output destination.
pub struct Logger {
    /// Reserved key names, read on every call.
    pub keys: FieldKeys,
    state: RwLock<State>,
    clock: Option<Clock>,
    sink: Sink,
}

impl Logger {
    /// Creates a logger writing to `out` with the default keys, the
    /// process-wide default threshold and the process-wide clock.
    pub fn new<W>(out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::with_sink(Sink::from_writer(out))
    }

    pub fn with_sink(sink: Sink) -> Self {
        Self {
            keys: FieldKeys::default(),
            state: RwLock::new(State {
                level: global::default_log_level(),
                fields: Fields::default(),
            }),
            clock: None,
            sink,
        }
    }

    /// Pins this logger (and loggers derived from it) to `clock`.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn set_log_level(&self, level: LogLevel) {
        self.state.write().level = level;
    }

    pub fn log_level(&self) -> LogLevel {
        self.state.read().level
    }

    /// Whether a call at `level` would produce a record. `Fatal` always does.
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level == LogLevel::Fatal || level >= self.log_level()
    }

    /// Snapshot of the contextual fields.
    pub fn fields(&self) -> Fields {
        Arc::clone(&self.state.read().fields)
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    /// Returns a new logger carrying `key: value` in addition to this
    /// logger's fields.
    ///
    /// The new logger shares the sink and clock, but starts with the default
    /// threshold and default key names. `self` is left untouched.
    #[must_use = "with_field returns a new logger and leaves this one unchanged"]
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<Value>) -> Logger {
        self.with_fields([(key.into(), value.into())])
    }

    /// Like [`with_field`](Self::with_field) for several fields at once;
    /// later pairs overwrite earlier ones with the same key.
    #[must_use = "with_fields returns a new logger and leaves this one unchanged"]
    pub fn with_fields<I, K, V>(&self, fields: I) -> Logger
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut merged: BTreeMap<String, Value> = self.fields().as_ref().clone();
        for (key, value) in fields {
            merged.insert(key.into(), value.into());
        }
        self.derive(Arc::new(merged))
    }

    /// Attaches any serializable value as a field. A value that fails to
    /// serialize is stored as `null`.
    #[must_use = "with_field_serialized returns a new logger and leaves this one unchanged"]
    pub fn with_field_serialized<T>(&self, key: impl Into<String>, value: &T) -> Logger
    where
        T: Serialize + ?Sized,
    {
        let key = key.into();
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            debug!(field = %key, error = %e, "field value failed to serialize");
            Value::Null
        });
        self.with_field(key, value)
    }

    fn derive(&self, fields: Fields) -> Logger {
        Logger {
            keys: FieldKeys::default(),
            state: RwLock::new(State {
                level: global::default_log_level(),
                fields,
            }),
            clock: self.clock.clone(),
            sink: self.sink.clone(),
        }
    }

    /// Logs on `Fatal`. Fatal records bypass the threshold; the process is
    /// not terminated.
    pub fn fatalf(&self, template: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Fatal, template, args);
    }

    pub fn errorf(&self, template: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Error, template, args);
    }

    pub fn warnf(&self, template: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Warning, template, args);
    }

    pub fn infof(&self, template: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Info, template, args);
    }

    pub fn debugf(&self, template: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Debug, template, args);
    }

    fn log(&self, level: LogLevel, template: &str, args: &[Arg<'_>]) {
        let fields = {
            let state = self.state.read();
            if level != LogLevel::Fatal && level < state.level {
                return;
            }
            Arc::clone(&state.fields)
        };

        let message = sprintf(template, args);
        let timestamp = clock::format_timestamp(&self.now());
        let record = record::assemble(&self.keys, &fields, level, message, timestamp);

        if let Some(bytes) = record::encode(&record) {
            self.sink.write_record(&bytes);
        }
    }

    fn now(&self) -> DateTime<Utc> {
        match &self.clock {
            Some(clock) => clock(),
            None => global::now(),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Logger")
            .field("keys", &self.keys)
            .field("level", &state.level)
            .field("fields", &state.fields)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SharedBuffer;
    use serde_json::json;

    fn test_logger() -> (Logger, SharedBuffer) {
        let buf = SharedBuffer::new();
        let logger = Logger::new(buf.clone()).with_clock(clock::fixed_clock(clock::zero_instant()));
        (logger, buf)
    }

    #[test]
    fn test_fatal_bypasses_threshold() {
        let (logger, buf) = test_logger();
        logger.set_log_level(LogLevel::Fatal);
        logger.errorf("dropped", &[]);
        logger.fatalf("kept", &[]);

        let lines = buf.json_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["@level"], json!("fatal"));
        assert!(logger.is_enabled(LogLevel::Fatal));
        assert!(!logger.is_enabled(LogLevel::Error));
    }

    #[test]
    fn test_unknown_threshold_admits_everything() {
        let (logger, buf) = test_logger();
        logger.set_log_level(LogLevel::Unknown);
        logger.debugf("d", &[]);
        assert_eq!(buf.lines().len(), 1);
    }

    #[test]
    fn test_with_field_overwrites_inherited_value() {
        let (logger, buf) = test_logger();
        logger
            .with_field("k", "old")
            .with_field("k", "new")
            .infof("x", &[]);

        assert_eq!(buf.json_lines()[0]["k"], json!("new"));
    }

    #[test]
    fn test_with_fields_single_snapshot() {
        let (logger, _buf) = test_logger();
        let child = logger.with_fields([("a", json!(1)), ("b", json!([true]))]);
        let fields = child.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["b"], json!([true]));
        assert!(logger.fields().is_empty());
    }

    #[test]
    fn test_with_field_serialized() {
        #[derive(Serialize)]
        struct Peer {
            host: &'static str,
            port: u16,
        }

        let (logger, buf) = test_logger();
        logger
            .with_field_serialized("peer", &Peer { host: "db", port: 5432 })
            .infof("connected", &[]);

        assert_eq!(buf.json_lines()[0]["peer"], json!({"host": "db", "port": 5432}));
    }

    #[test]
    fn test_clone_shares_sink_and_clock_but_resets_keys() {
        let (mut logger, buf) = test_logger();
        logger.keys = FieldKeys::short();
        let child = logger.with_field("k", "v");

        assert!(child.sink().same_as(logger.sink()));
        assert_eq!(child.keys, FieldKeys::default());

        child.infof("from child", &[]);
        let line = &buf.json_lines()[0];
        assert_eq!(line["@timestamp"], json!("0001-01-01T00:00:00Z"));
    }

    #[test]
    fn test_key_changes_apply_to_next_call() {
        let (mut logger, buf) = test_logger();
        logger.infof("first", &[]);
        logger.keys.message = "text".to_string();
        logger.infof("second", &[]);

        let lines = buf.json_lines();
        assert_eq!(lines[0]["@message"], json!("first"));
        assert_eq!(lines[1]["text"], json!("second"));
        assert!(lines[1].get("@message").is_none());
    }
}
