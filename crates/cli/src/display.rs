// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conversions between [`AnyValue`] and `serde_json::Value`, used only
//! at the CLI boundary: reading call arguments off the command line and
//! printing results. Neither direction is the wire codec — that's
//! `meshrpc_wire::codec`, which serializes `AnyValue`'s own tagged
//! `Serialize` impl.

use meshrpc_core::AnyValue;
use serde_json::{Number, Value};

/// Parses one positional CLI argument as a call parameter. Valid JSON
/// (numbers, booleans, `null`, quoted strings, arrays, objects) is
/// taken at face value; anything else — including an unquoted word
/// like `hello` — is treated as a bare string, so callers don't need to
/// quote every argument twice.
pub fn parse_arg(raw: &str) -> AnyValue {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => json_to_any(&value),
        Err(_) => AnyValue::from(raw),
    }
}

fn json_to_any(value: &Value) -> AnyValue {
    match value {
        Value::Null => AnyValue::Nil,
        Value::Bool(b) => AnyValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                AnyValue::Int(i)
            } else {
                AnyValue::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => AnyValue::from(s.clone()),
        Value::Array(items) => AnyValue::List(items.iter().map(json_to_any).collect()),
        Value::Object(map) => AnyValue::Map(
            map.iter().map(|(k, v)| (AnyValue::from(k.clone()), json_to_any(v))).collect(),
        ),
    }
}

/// Renders a result for display. Handles the tracer-refused variants
/// (`Raw`, `Object`, `Pointer`, `Unknown`) as readable placeholders
/// rather than failing, since a human is reading this, not a decoder.
pub fn any_to_json(value: &AnyValue) -> Value {
    match value {
        AnyValue::Nil => Value::Null,
        AnyValue::Bool(b) => Value::Bool(*b),
        AnyValue::Int(i) => Value::Number((*i).into()),
        AnyValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        AnyValue::String(s) => Value::String(s.clone()),
        AnyValue::List(items) | AnyValue::Tuple(items) => {
            Value::Array(items.iter().map(any_to_json).collect())
        }
        AnyValue::Map(pairs) => {
            let mut map = serde_json::Map::new();
            for (k, v) in pairs {
                let key = match k {
                    AnyValue::String(s) => s.clone(),
                    other => format!("{other:?}"),
                };
                map.insert(key, any_to_json(v));
            }
            Value::Object(map)
        }
        AnyValue::Raw(bytes) => Value::String(format!("<{} raw bytes>", bytes.len())),
        AnyValue::Object(id) => Value::String(format!("<object #{id}>")),
        AnyValue::Pointer(id) => Value::String(format!("<pointer #{id}>")),
        AnyValue::Unknown => Value::String("<unknown>".to_string()),
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
