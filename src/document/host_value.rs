//! Rich host property values.
//!
//! Fills, strokes, effects and text content models come out of the host as nested
//! values that mix plain data with host-only objects. `HostValue` is the closed set
//! of shapes such a value can take; the safe serializer decides per variant what
//! survives.
//!
//! Snapshots written as JSON mark host-only values with reserved keys:
//! - `{"$class": "ColorFill", ...}` - an instance of a host class with its own fields
//! - `{"$handle": "node:42"}` - an opaque host handle
//! - `{"$function": "getList"}` - a function value

use serde::Deserialize;
use serde_json::Value;

const CLASS_KEY: &str = "$class";
const HANDLE_KEY: &str = "$handle";
const FUNCTION_KEY: &str = "$function";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum HostValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<HostValue>),
    /// A plain data container
    Record(Vec<(String, HostValue)>),
    /// An instance of a host class; only its own fields are visible
    Object {
        class: String,
        fields: Vec<(String, HostValue)>,
    },
    /// Opaque reference into the host runtime
    Handle(String),
    Function(String),
}

impl HostValue {
    /// Look up a field on a record or object
    pub fn get(&self, key: &str) -> Option<&HostValue> {
        match self {
            HostValue::Record(fields) | HostValue::Object { fields, .. } => {
                fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Build a plain record from key/value pairs
    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, HostValue)>) -> Self {
        HostValue::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<Value> for HostValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => HostValue::Null,
            Value::Bool(b) => HostValue::Bool(b),
            Value::Number(n) => n.as_f64().map(HostValue::Number).unwrap_or(HostValue::Null),
            Value::String(s) => HostValue::String(s),
            Value::Array(items) => HostValue::List(items.into_iter().map(HostValue::from).collect()),
            Value::Object(mut map) => {
                if let Some(Value::String(handle)) = map.get(HANDLE_KEY) {
                    return HostValue::Handle(handle.clone());
                }
                if let Some(Value::String(name)) = map.get(FUNCTION_KEY) {
                    return HostValue::Function(name.clone());
                }
                let class = match map.remove(CLASS_KEY) {
                    Some(Value::String(class)) => Some(class),
                    _ => None,
                };
                let fields = map
                    .into_iter()
                    .map(|(k, v)| (k, HostValue::from(v)))
                    .collect();
                match class {
                    Some(class) => HostValue::Object { class, fields },
                    None => HostValue::Record(fields),
                }
            }
        }
    }
}
