//! Safe serializer - copies host values into plain JSON
//!
//! The copy keeps plain records, lists and scalars. Everything that only makes sense
//! inside the host runtime is dropped:
//! - as a record value, a class instance, handle, function or non-finite number is
//!   omitted together with its key
//! - in a positional slot (list element, or the value itself), a class instance is
//!   reduced to a record of its own fields, and handles, functions and non-finite
//!   numbers become `null` so list indices stay stable
//!
//! Nesting is bounded by `max_depth`; a deeper container is replaced with
//! `TRUNCATION_MARKER` instead of being copied.

use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::document::HostValue;

/// Default nesting bound for copied values
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Stands in for a subtree nested deeper than the configured bound
pub const TRUNCATION_MARKER: &str = "[truncated]";

#[derive(Debug, Clone, Copy)]
pub struct SafeSerializer {
    max_depth: usize,
}

impl Default for SafeSerializer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl SafeSerializer {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Copy `value` into plain JSON.
    ///
    /// Returns `None` when the value itself is not representable at all (a bare
    /// handle, function or non-finite number); the caller omits the field.
    pub fn serialize(&self, value: &HostValue) -> Option<Value> {
        match value {
            HostValue::Handle(_) | HostValue::Function(_) => return None,
            HostValue::Number(n) if !n.is_finite() => return None,
            _ => {}
        }

        let mut truncated = 0usize;
        let copied = self.copy_positional(value, 0, &mut truncated);
        if truncated > 0 {
            warn!(
                "Truncated {} subtree(s) nested deeper than {} levels",
                truncated, self.max_depth
            );
        }
        Some(copied)
    }

    fn copy_positional(&self, value: &HostValue, depth: usize, truncated: &mut usize) -> Value {
        match value {
            HostValue::Null => Value::Null,
            HostValue::Bool(b) => Value::Bool(*b),
            HostValue::Number(n) => number(*n).unwrap_or(Value::Null),
            HostValue::String(s) => Value::String(s.clone()),
            HostValue::List(items) => self.copy_list(items, depth, truncated),
            HostValue::Record(fields) | HostValue::Object { fields, .. } => {
                self.copy_record(fields, depth, truncated)
            }
            HostValue::Handle(_) | HostValue::Function(_) => Value::Null,
        }
    }

    fn copy_list(&self, items: &[HostValue], depth: usize, truncated: &mut usize) -> Value {
        if depth >= self.max_depth {
            *truncated += 1;
            return Value::String(TRUNCATION_MARKER.to_string());
        }
        Value::Array(
            items
                .iter()
                .map(|item| self.copy_positional(item, depth + 1, truncated))
                .collect(),
        )
    }

    fn copy_record(
        &self,
        fields: &[(String, HostValue)],
        depth: usize,
        truncated: &mut usize,
    ) -> Value {
        if depth >= self.max_depth {
            *truncated += 1;
            return Value::String(TRUNCATION_MARKER.to_string());
        }
        let mut map = Map::new();
        for (key, value) in fields {
            let copied = match value {
                HostValue::Null => Some(Value::Null),
                HostValue::Bool(b) => Some(Value::Bool(*b)),
                HostValue::Number(n) => number(*n),
                HostValue::String(s) => Some(Value::String(s.clone())),
                HostValue::List(items) => Some(self.copy_list(items, depth + 1, truncated)),
                HostValue::Record(fields) => Some(self.copy_record(fields, depth + 1, truncated)),
                HostValue::Object { .. } | HostValue::Handle(_) | HostValue::Function(_) => None,
            };
            if let Some(copied) = copied {
                map.insert(key.clone(), copied);
            }
        }
        Value::Object(map)
    }
}

fn number(n: f64) -> Option<Value> {
    Number::from_f64(n).map(Value::Number)
}
