//! Decoded record: a JSON object with a couple of well-known identifying fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One decoded API payload. Immutable after decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Human-facing identifier, used for the output filename when it is a non-empty string.
    pub fn polymer_id(&self) -> Option<&str> {
        self.0
            .get("polymer_id")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Raw `polymer_id` value, whatever its JSON type.
    pub fn polymer_id_value(&self) -> Option<&Value> {
        self.0.get("polymer_id")
    }

    pub fn polymer_uuid(&self) -> Option<&Value> {
        self.0.get("polymer_uuid")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}
