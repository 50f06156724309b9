//! Request option values and their canonical string encoding.
//!
//! Callers hand the driver a loosely typed map (usually decoded from JSON).
//! Values are narrowed to [`OptionValue`] at that boundary, then every value
//! is turned into a single canonical string by [`uniformize`] before it is
//! compared against allow-lists or rendered.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Options supplied by a caller with a mount request.
pub type RequestOptions = BTreeMap<String, OptionValue>;

/// Keys whose boolean values encode as `"1"`/`"0"` instead of
/// `"true"`/`"false"`.
pub const BOOL_AS_INT_KEYS: &[&str] = &["auto-traverse-mounts", "dircache"];

/// A single scalar value supplied with a mount request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    /// Native boolean.
    Bool(bool),
    /// Native integer.
    Int(i64),
    /// Literal string.
    String(String),
    /// Any value with no canonical encoding (floats, null, arrays, maps).
    ///
    /// The key still counts as supplied for validation but never resolves.
    Unsupported,
}

impl OptionValue {
    /// Encode this value as a string, ignoring any per-key exception.
    ///
    /// Returns an empty string for [`OptionValue::Unsupported`].
    pub fn encode(&self, bool_as_int: bool) -> String {
        match self {
            OptionValue::Int(i) => i.to_string(),
            OptionValue::String(s) => s.clone(),
            OptionValue::Bool(true) if bool_as_int => "1".to_string(),
            OptionValue::Bool(false) if bool_as_int => "0".to_string(),
            OptionValue::Bool(b) => b.to_string(),
            OptionValue::Unsupported => String::new(),
        }
    }
}

/// Whether boolean values for `key` encode as integers.
pub fn encodes_bool_as_int(key: &str) -> bool {
    BOOL_AS_INT_KEYS.contains(&key)
}

/// Canonical string encoding of `value` when supplied for `key`.
///
/// An empty result means "absent": callers drop it without raising an error.
pub fn uniformize(key: &str, value: &OptionValue) -> String {
    value.encode(encodes_bool_as_int(key))
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        OptionValue::Int(i)
    }
}

impl From<i32> for OptionValue {
    fn from(i: i32) -> Self {
        OptionValue::Int(i64::from(i))
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::String(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::String(s)
    }
}

impl From<serde_json::Value> for OptionValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => OptionValue::Bool(b),
            serde_json::Value::String(s) => OptionValue::String(s),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => OptionValue::Int(i),
                None => OptionValue::Unsupported,
            },
            _ => OptionValue::Unsupported,
        }
    }
}

impl<'de> Deserialize<'de> for OptionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(OptionValue::from)
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionValue::Bool(b) => serializer.serialize_bool(*b),
            OptionValue::Int(i) => serializer.serialize_i64(*i),
            OptionValue::String(s) => serializer.serialize_str(s),
            OptionValue::Unsupported => serializer.serialize_unit(),
        }
    }
}
