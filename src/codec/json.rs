use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::domain::{ConfigValue, Configuration, ConfigurationEntry, ConfigurationKey, ValueKind};

use super::{Codec, CodecError};

/// JSON codec for persisted records.
///
/// Definitions and entries serialize to plain JSON objects; entry values
/// serialize to their natural JSON form and are read back under the decode's
/// directing kind.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl JsonCodec {
    /// Creates the codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn encode_configuration(&self, configuration: &Configuration) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec_pretty(configuration).map_err(|e| CodecError::Encode {
            record: "configuration",
            details: e.to_string(),
        })
    }

    fn encode_entry(&self, entry: &ConfigurationEntry) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec_pretty(entry).map_err(|e| CodecError::Encode {
            record: "entry",
            details: e.to_string(),
        })
    }

    fn decode_configuration(&self, data: &[u8]) -> Result<Option<Configuration>, CodecError> {
        if data.is_empty() {
            return Ok(None);
        }
        let json: JsonValue = serde_json::from_slice(data).map_err(|e| malformed("configuration", e))?;

        let kind: ValueKind = serde_json::from_value(required(&json, "configuration", "value_kind")?.clone())
            .map_err(|e| malformed("configuration", e))?;
        let key = ConfigurationKey::new(string_field(&json, "configuration", "key")?)
            .map_err(|e| malformed("configuration", e))?;
        let name = string_field(&json, "configuration", "name")?;

        let mut metadata = HashMap::new();
        if let Some(object) = json.get("metadata").and_then(JsonValue::as_object) {
            for (field, value) in object {
                let value = value.as_str().ok_or_else(|| CodecError::Malformed {
                    record: "configuration",
                    details: format!("metadata field '{field}' is not a string"),
                })?;
                metadata.insert(field.clone(), value.to_string());
            }
        }

        let raw_variants = required(&json, "configuration", "variants")?
            .as_array()
            .ok_or_else(|| CodecError::Malformed {
                record: "configuration",
                details: "'variants' is not an array".to_string(),
            })?;
        let mut variants = Vec::with_capacity(raw_variants.len());
        for raw in raw_variants {
            variants.push(entry_from_json(raw, kind)?);
        }
        let default_variant = entry_from_json(required(&json, "configuration", "default_variant")?, kind)?;

        Configuration::new(key, name, kind, metadata, variants, default_variant)
            .map(Some)
            .map_err(|e| malformed("configuration", e))
    }

    fn decode_entry(
        &self,
        data: &[u8],
        kind: ValueKind,
    ) -> Result<Option<ConfigurationEntry>, CodecError> {
        if data.is_empty() {
            return Ok(None);
        }
        let json: JsonValue = serde_json::from_slice(data).map_err(|e| malformed("entry", e))?;
        entry_from_json(&json, kind).map(Some)
    }
}

fn entry_from_json(json: &JsonValue, kind: ValueKind) -> Result<ConfigurationEntry, CodecError> {
    let name = string_field(json, "entry", "name")?;
    let description = string_field(json, "entry", "description")?;
    let value = match json.get("value") {
        None | Some(JsonValue::Null) => None,
        Some(raw) => Some(value_from_json(raw, kind)?),
    };
    ConfigurationEntry::new(name, value, description).map_err(|e| malformed("entry", e))
}

fn value_from_json(raw: &JsonValue, kind: ValueKind) -> Result<ConfigValue, CodecError> {
    let decoded = match kind {
        ValueKind::Bool => raw.as_bool().map(ConfigValue::Bool),
        ValueKind::Int => raw
            .as_i64()
            .and_then(|wide| i32::try_from(wide).ok())
            .map(ConfigValue::Int),
        ValueKind::Long => raw.as_i64().map(ConfigValue::Long),
        ValueKind::Float => raw.as_f64().map(ConfigValue::Float),
        ValueKind::Str => raw.as_str().map(ConfigValue::from),
    };
    decoded.ok_or_else(|| CodecError::KindMismatch {
        expected: kind,
        actual: raw.clone(),
    })
}

fn string_field(json: &JsonValue, record: &'static str, field: &str) -> Result<String, CodecError> {
    required(json, record, field)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CodecError::Malformed {
            record,
            details: format!("'{field}' is not a string"),
        })
}

fn required<'a>(
    json: &'a JsonValue,
    record: &'static str,
    field: &str,
) -> Result<&'a JsonValue, CodecError> {
    json.get(field).ok_or_else(|| CodecError::Malformed {
        record,
        details: format!("missing field '{field}'"),
    })
}

fn malformed(record: &'static str, details: impl std::fmt::Display) -> CodecError {
    CodecError::Malformed {
        record,
        details: details.to_string(),
    }
}
