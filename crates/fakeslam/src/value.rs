//! Open key/value payloads for generic command dispatch.
//!
//! Commands are string-keyed maps over a small closed set of value kinds. The
//! wire shape is plain JSON: every [`Value`] serializes to, and deserializes
//! from, the matching JSON value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A command payload or result.
pub type CommandMap = BTreeMap<String, Value>;

/// A single dispatch value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(CommandMap),
}

impl Value {
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub const fn as_map(&self) -> Option<&CommandMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(list: Vec<Value>) -> Self {
        Self::List(list)
    }
}

impl From<CommandMap> for Value {
    fn from(map: CommandMap) -> Self {
        Self::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_maps_onto_value_kinds() {
        let cmd: CommandMap = serde_json::from_str(
            r#"{"boom": null, "big": true, "n": 2.5, "s": "x", "l": [1, "a"], "m": {"k": false}}"#,
        )
        .unwrap();

        assert_eq!(cmd["boom"], Value::Null);
        assert_eq!(cmd["big"].as_bool(), Some(true));
        assert_eq!(cmd["n"].as_f64(), Some(2.5));
        assert_eq!(cmd["s"].as_str(), Some("x"));
        assert_eq!(
            cmd["l"],
            Value::List(vec![Value::Number(1.0), Value::from("a")])
        );
        assert_eq!(
            cmd["m"].as_map().and_then(|m| m.get("k")),
            Some(&Value::Bool(false))
        );
    }

    #[test]
    fn values_serialize_as_plain_json() {
        let mut nested = CommandMap::new();
        nested.insert("ok".into(), true.into());
        let mut cmd = CommandMap::new();
        cmd.insert("nested".into(), nested.into());
        cmd.insert("count".into(), 3.0.into());

        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"count":3.0,"nested":{"ok":true}}"#);
    }
}
