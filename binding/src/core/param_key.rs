//! Parameter key normalization
//!
//! A binding refetches only when the key of its parameters changes, so two
//! deep-equal parameter values must produce the same key no matter how they
//! were built. Values are rendered through `serde_json::Value` with object
//! keys sorted at every depth and arrays kept in positional order.
//!
//! Parameters that cannot be serialized fall back to the address of the
//! value itself. That degrades to reference identity: equal but distinct
//! values then always look different, and an address reused after a drop
//! could look equal. This is a known approximation, logged when it happens.

use serde::Serialize;
use serde_json::Value;
use shared::{Component, component_warn};
use std::fmt;

/// Canonical identity of a binding's parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    /// null, bool, number or string, as its JSON rendering
    Primitive(String),
    /// Array or object in canonical form
    Composite(String),
    /// Address of a value that could not be serialized
    Reference(usize),
}

impl ParamKey {
    pub fn is_reference(&self) -> bool {
        matches!(self, ParamKey::Reference(_))
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::Primitive(key) | ParamKey::Composite(key) => write!(f, "{key}"),
            ParamKey::Reference(address) => write!(f, "ref@{address:#x}"),
        }
    }
}

/// Derive the key for a parameter value
pub fn normalize<P: Serialize + ?Sized>(params: &P) -> ParamKey {
    match serde_json::to_value(params) {
        Ok(value @ (Value::Array(_) | Value::Object(_))) => {
            let mut out = String::new();
            write_canonical(&value, &mut out);
            ParamKey::Composite(out)
        }
        Ok(primitive) => ParamKey::Primitive(primitive.to_string()),
        Err(e) => {
            let address = (params as *const P).cast::<()>() as usize;
            component_warn!(
                Component::Binding,
                error = %e,
                "Parameters are not serializable, falling back to reference identity"
            );
            ParamKey::Reference(address)
        }
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (position, item) in items.iter().enumerate() {
                if position > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (position, (key, item)) in entries.into_iter().enumerate() {
                if position > 0 {
                    out.push(',');
                }
                // Escaping through Value keeps quotes and control characters valid
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        leaf => out.push_str(&leaf.to_string()),
    }
}
