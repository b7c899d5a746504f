use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Default key for the severity name.
pub const FIELD_KEY_LEVEL: &str = "@level";
/// Default key for the formatted message.
pub const FIELD_KEY_MESSAGE: &str = "@message";
/// Default key for the RFC 3339 timestamp.
pub const FIELD_KEY_TIME: &str = "@timestamp";

/// Contextual fields attached to a logger.
///
/// The map behind the `Arc` is never mutated once a logger holds it; adding a
/// field builds a new map for the derived logger. `BTreeMap` keeps the keys
/// sorted so every record serializes in the same order.
pub type Fields = Arc<BTreeMap<String, Value>>;

/// Names of the three reserved keys in every emitted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldKeys {
    pub level: String,
    pub message: String,
    pub time: String,
}

impl FieldKeys {
    /// The compact `lvl` / `msg` / `time` naming.
    pub fn short() -> Self {
        Self {
            level: "lvl".to_string(),
            message: "msg".to_string(),
            time: "time".to_string(),
        }
    }

    pub fn is_reserved(&self, key: &str) -> bool {
        key == self.level || key == self.message || key == self.time
    }
}

impl Default for FieldKeys {
    fn default() -> Self {
        Self {
            level: FIELD_KEY_LEVEL.to_string(),
            message: FIELD_KEY_MESSAGE.to_string(),
            time: FIELD_KEY_TIME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys() {
        let keys = FieldKeys::default();
        assert_eq!(keys.level, "@level");
        assert_eq!(keys.message, "@message");
        assert_eq!(keys.time, "@timestamp");
        assert!(keys.is_reserved("@message"));
        assert!(!keys.is_reserved("msg"));
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let keys: FieldKeys = toml::from_str(r#"message = "msg""#).unwrap();
        assert_eq!(keys.message, "msg");
        assert_eq!(keys.level, "@level");
        assert_eq!(keys.time, "@timestamp");
    }
}
