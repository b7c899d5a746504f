use crate::domain::{FieldKeys, LogLevel};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// One log event, keyed the way it will appear on the wire.
pub type Record = BTreeMap<String, Value>;

/// Merges contextual fields with the reserved keys.
///
/// Reserved keys are inserted last, so a contextual field named like one of
/// them is shadowed in the record.
pub fn assemble(
    keys: &FieldKeys,
    fields: &BTreeMap<String, Value>,
    level: LogLevel,
    message: String,
    timestamp: String,
) -> Record {
    let mut record = fields.clone();
    record.insert(keys.time.clone(), Value::String(timestamp));
    record.insert(keys.level.clone(), Value::String(level.as_str().to_string()));
    record.insert(keys.message.clone(), Value::String(message));
    record
}

/// Serializes a record as one JSON object plus the terminating newline.
///
/// Returns `None` if serialization fails; the record is dropped.
pub fn encode(record: &Record) -> Option<Vec<u8>> {
    let mut buffer = Vec::with_capacity(128);
    match serde_json::to_writer(&mut buffer, record) {
        Ok(()) => {
            buffer.push(b'\n');
            Some(buffer)
        }
        Err(e) => {
            debug!(error = %e, "dropping log record that failed to serialize");
            None
        }
    }
}
