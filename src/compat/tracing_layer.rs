//! Bridge from `tracing` to a jlo `Logger`.

use crate::domain::LogLevel;
use crate::logger::Logger;
use serde_json::Value;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Field under which the event target is recorded.
pub const TARGET_FIELD: &str = "target";
/// Field under which the names of the enclosing spans are recorded.
pub const SPAN_FIELD: &str = "span";

thread_local! {
    static FORWARDING: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as forwarding an event until dropped.
///
/// The logger reports its own failures through `tracing`; those diagnostics
/// must not come back into the layer while it is still writing.
struct ForwardingGuard;

impl ForwardingGuard {
    fn enter() -> Option<Self> {
        if FORWARDING.with(|flag| flag.replace(true)) {
            None
        } else {
            Some(Self)
        }
    }
}

impl Drop for ForwardingGuard {
    fn drop(&mut self) {
        FORWARDING.with(|flag| flag.set(false));
    }
}

/// A tracing layer that writes every event as a JSON record.
///
/// Event fields other than `message` become contextual fields of the record.
/// The wrapped logger's threshold and key names apply.
pub struct JloLayer {
    logger: Arc<Logger>,
}

impl JloLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

pub fn level_from_tracing(level: &tracing::Level) -> LogLevel {
    match *level {
        tracing::Level::ERROR => LogLevel::Error,
        tracing::Level::WARN => LogLevel::Warning,
        tracing::Level::INFO => LogLevel::Info,
        tracing::Level::DEBUG | tracing::Level::TRACE => LogLevel::Debug,
    }
}

impl<S> Layer<S> for JloLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(_forwarding) = ForwardingGuard::enter() else {
            return;
        };

        let level = level_from_tracing(event.metadata().level());
        if !self.logger.is_enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut fields = visitor.fields;
        fields.insert(
            TARGET_FIELD.to_string(),
            Value::String(event.metadata().target().to_string()),
        );
        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<&str> = scope.from_root().map(|span| span.name()).collect();
            fields.insert(SPAN_FIELD.to_string(), Value::String(spans.join("::")));
        }

        let mut child = self.logger.with_fields(fields);
        child.keys = self.logger.keys.clone();
        child.set_log_level(self.logger.log_level());

        let message = visitor.message;
        match level {
            LogLevel::Debug => child.debugf(&message, &[]),
            LogLevel::Info => child.infof(&message, &[]),
            LogLevel::Warning => child.warnf(&message, &[]),
            LogLevel::Error => child.errorf(&message, &[]),
            LogLevel::Unknown | LogLevel::Fatal => child.fatalf(&message, &[]),
        }
    }
}

/// Visitor to split the message from the structured fields
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: BTreeMap<String, Value>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(format!("{value:?}")));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::Bool(value));
    }
}

/// Installs a global subscriber that forwards all tracing events to `logger`.
pub fn init_tracing_bridge(logger: Arc<Logger>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
        .with(JloLayer::new(logger))
        .try_init()?;

    Ok(())
}
