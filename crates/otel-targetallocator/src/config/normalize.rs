//! Conversion of parsed YAML values into JSON-compatible values.
//!
//! YAML mappings may be keyed by any value (numbers, booleans, even nested
//! collections), while consumers of the allocator configuration require text
//! keys. Scalar keys are rendered as text; keys without a textual
//! representation are rejected.

use serde_yaml::Value;
use snafu::{OptionExt, Snafu};

use crate::crd::AnyConfig;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Snafu)]
pub enum Error {
    #[snafu(display("mapping key of kind {kind} has no textual representation"))]
    UnrepresentableKey { kind: &'static str },

    #[snafu(display("number {number} cannot be represented in JSON"))]
    UnrepresentableNumber { number: serde_yaml::Number },

    #[snafu(display("expected a mapping, found a {kind}"))]
    NotAMapping { kind: &'static str },
}

/// Normalizes a single scrape job, which must be a mapping.
pub fn normalize_entry(value: &Value) -> Result<AnyConfig> {
    match normalize_value(value)? {
        serde_json::Value::Object(object) => Ok(object),
        _ => NotAMappingSnafu {
            kind: kind_of(value),
        }
        .fail(),
    }
}

/// Converts `value` into an equivalent [`serde_json::Value`] whose mappings
/// are all keyed by text. Tags are dropped, only the tagged value is kept.
pub fn normalize_value(value: &Value) -> Result<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(number) => serde_json::Value::Number(normalize_number(number)?),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(sequence) => serde_json::Value::Array(
            sequence
                .iter()
                .map(normalize_value)
                .collect::<Result<_>>()?,
        ),
        Value::Mapping(mapping) => serde_json::Value::Object(
            mapping
                .iter()
                .map(|(key, value)| Ok((normalize_key(key)?, normalize_value(value)?)))
                .collect::<Result<_>>()?,
        ),
        Value::Tagged(tagged) => normalize_value(&tagged.value)?,
    })
}

fn normalize_key(key: &Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Null => Ok("null".to_owned()),
        Value::Tagged(tagged) => normalize_key(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => UnrepresentableKeySnafu {
            kind: kind_of(key),
        }
        .fail(),
    }
}

fn normalize_number(number: &serde_yaml::Number) -> Result<serde_json::Number> {
    if let Some(i) = number.as_i64() {
        Ok(i.into())
    } else if let Some(u) = number.as_u64() {
        Ok(u.into())
    } else {
        number
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .context(UnrepresentableNumberSnafu {
                number: number.clone(),
            })
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
