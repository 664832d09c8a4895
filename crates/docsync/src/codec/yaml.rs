//! Conversion from a parsed YAML tree to a document.
//!
//! YAML is richer than JSON: mapping keys may be numbers or booleans (API
//! descriptions routinely write `200:` under `responses`), values may carry
//! tags, and floats may be `.nan` or `.inf`. Scalar keys are stringified,
//! tags are dropped, and anything else JSON cannot hold is rejected.

use serde_json::{Map, Number, Value};
use serde_yaml::Value as Yaml;

use super::ParseError;

/// Convert a YAML value into a document value.
pub fn to_document(yaml: Yaml) -> Result<Value, ParseError> {
    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => Value::Number(number(&n)?),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(to_document)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(key_string(key)?, to_document(value)?);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => to_document(tagged.value)?,
    })
}

fn number(n: &serde_yaml::Number) -> Result<Number, ParseError> {
    if let Some(i) = n.as_i64() {
        return Ok(Number::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Number::from(u));
    }
    n.as_f64()
        .and_then(Number::from_f64)
        .ok_or_else(|| ParseError::Unrepresentable(format!("non-finite number {n}")))
}

fn key_string(key: Yaml) -> Result<String, ParseError> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => key_string(tagged.value),
        Yaml::Sequence(_) | Yaml::Mapping(_) => Err(ParseError::Unrepresentable(
            "mapping keys must be scalars".to_string(),
        )),
    }
}
