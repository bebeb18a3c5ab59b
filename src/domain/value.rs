use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of value types a configuration can distribute.
///
/// Decoding is directed by this kind rather than by runtime reflection: a
/// payload is decoded *as* a kind, and a payload that cannot be read as the
/// requested kind is a decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Boolean flag.
    Bool,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// Double-precision floating point.
    Float,
    /// UTF-8 string.
    Str,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Long => "long",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
        };
        f.write_str(name)
    }
}

/// A typed configuration value.
///
/// Serializes to its natural JSON form (`true`, `42`, `"text"`); the
/// [`ValueKind`] tag travels out of band (in the configuration definition or
/// as a subscription parameter), which is what makes decoding unambiguous.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean flag.
    Bool(bool),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// Double-precision floating point.
    Float(f64),
    /// UTF-8 string.
    Str(String),
}

impl ConfigValue {
    /// The kind this value belongs to.
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::Bool(_) => ValueKind::Bool,
            ConfigValue::Int(_) => ValueKind::Int,
            ConfigValue::Long(_) => ValueKind::Long,
            ConfigValue::Float(_) => ValueKind::Float,
            ConfigValue::Str(_) => ValueKind::Str,
        }
    }

    /// Returns the boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the 32-bit integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            ConfigValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the 64-bit integer payload, if this is a `Long`.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            ConfigValue::Long(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the floating-point payload, if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Long(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Str(value)
    }
}
