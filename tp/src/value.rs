//! YAML to JSON value normalization
//!
//! Input files and converted output are both parsed with `serde_yaml` (YAML is
//! a superset of JSON) and normalized into `serde_json::Value`, which is what
//! the template engine consumes and what the output serializers emit. Mapping
//! keys end up sorted because `serde_json::Map` is ordered by key.

use serde_json::{Map, Number, Value};
use serde_yaml::Value as Yaml;
use thiserror::Error;
use tracing::debug;

/// Errors raised while normalizing a YAML document
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("{0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("mapping key must be a scalar, found {0}")]
    ComplexKey(&'static str),

    #[error("cannot represent non-finite number {0}")]
    NonFiniteNumber(f64),
}

/// Parse a YAML or JSON document into a normalized value
pub fn parse_document(bytes: &[u8]) -> Result<Value, ConversionError> {
    debug!(len = bytes.len(), "parse_document: called");
    let mut yaml: Yaml = serde_yaml::from_slice(bytes)?;
    yaml.apply_merge()?;
    yaml_to_json(yaml)
}

/// Convert a YAML value into a JSON value
///
/// Tags are dropped, scalar keys are stringified the way YAML prints them and
/// sequence or mapping keys are rejected.
pub fn yaml_to_json(yaml: Yaml) -> Result<Value, ConversionError> {
    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(b)),
        Yaml::Number(n) => number_to_json(&n),
        Yaml::String(s) => Ok(Value::String(s)),
        Yaml::Sequence(seq) => seq.into_iter().map(yaml_to_json).collect::<Result<Vec<_>, _>>().map(Value::Array),
        Yaml::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(key_to_string(key)?, yaml_to_json(value)?);
            }
            Ok(Value::Object(map))
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

/// Name of a value's kind, for diagnostics
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

fn number_to_json(n: &serde_yaml::Number) -> Result<Value, ConversionError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Number(i.into()));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::Number(u.into()));
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or(ConversionError::NonFiniteNumber(f))
}

fn key_to_string(key: Yaml) -> Result<String, ConversionError> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Sequence(_) => Err(ConversionError::ComplexKey("a sequence")),
        Yaml::Mapping(_) => Err(ConversionError::ComplexKey("a mapping")),
        Yaml::Tagged(tagged) => key_to_string(tagged.value),
    }
}
