//! Text ⇄ document conversion for the two supported syntaxes.
//!
//! Parsing tries strict JSON first and falls back to YAML, recording which
//! one succeeded as the [`Format`]. Serializing writes the document back in a
//! given format. Mapping key order survives both directions.

mod yaml;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use yaml::to_document;

/// Which textual syntax produced (and will serialize) the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Neither parser accepted the text. The message is the YAML parser's,
    /// the more permissive of the two.
    #[error("{yaml}")]
    Syntax {
        json: String,
        yaml: String,
        line: Option<usize>,
        column: Option<usize>,
    },
    /// The text parsed but holds something JSON cannot represent.
    #[error("unsupported value: {0}")]
    Unrepresentable(String),
    #[error("document root must be a mapping, found {found}")]
    RootNotMapping { found: &'static str },
}

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("serialized text is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Options for [`serialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Spaces per JSON indentation level; `0` writes compact JSON.
    pub json_indent: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self { json_indent: 2 }
    }
}

/// Parse text as JSON, falling back to YAML.
///
/// # Example
///
/// ```
/// use docsync::codec::{parse, Format};
///
/// let (doc, format) = parse("openapi: 3.0.0\ninfo:\n  title: Pets\n").unwrap();
/// assert_eq!(format, Format::Yaml);
/// assert_eq!(doc["info"]["title"], "Pets");
///
/// let (_, format) = parse(r#"{"openapi": "3.0.0"}"#).unwrap();
/// assert_eq!(format, Format::Json);
/// ```
pub fn parse(text: &str) -> Result<(Value, Format), ParseError> {
    let json_error = match serde_json::from_str::<Value>(text) {
        Ok(value) => return Ok((value, Format::Json)),
        Err(e) => e,
    };
    let yaml_value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| {
        let location = e.location();
        ParseError::Syntax {
            json: json_error.to_string(),
            yaml: e.to_string(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
        }
    })?;
    Ok((to_document(yaml_value)?, Format::Yaml))
}

/// Serialize a document in the given format.
pub fn serialize(
    doc: &Value,
    format: Format,
    options: &SerializeOptions,
) -> Result<String, SerializeError> {
    match format {
        Format::Json => to_json(doc, options.json_indent),
        Format::Yaml => Ok(serde_yaml::to_string(doc)?),
    }
}

fn to_json(doc: &Value, indent: usize) -> Result<String, SerializeError> {
    if indent == 0 {
        return Ok(serde_json::to_string(doc)?);
    }
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Name of a value's kind, for messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_wins_when_valid() {
        let (doc, format) = parse(r#"{"a": [1, 2]}"#).unwrap();
        assert_eq!(format, Format::Json);
        assert_eq!(doc, json!({"a": [1, 2]}));
    }

    #[test]
    fn yaml_fallback() {
        let (doc, format) = parse("a:\n  - 1\n  - two\n").unwrap();
        assert_eq!(format, Format::Yaml);
        assert_eq!(doc, json!({"a": [1, "two"]}));
    }

    #[test]
    fn neither_parses() {
        let err = parse("a: [1, 2\nb: }").unwrap_err();
        match &err {
            ParseError::Syntax { json, yaml, .. } => {
                assert!(!json.is_empty());
                assert!(!yaml.is_empty());
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn key_order_preserved() {
        let (doc, _) = parse("z: 1\na: 2\nm: 3\n").unwrap();
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        let text = serialize(&doc, Format::Json, &SerializeOptions { json_indent: 0 }).unwrap();
        assert_eq!(text, r#"{"z":1,"a":2,"m":3}"#);
    }

    #[test]
    fn pretty_json_indent() {
        let doc = json!({"a": {"b": 1}});
        let text = serialize(&doc, Format::Json, &SerializeOptions { json_indent: 4 }).unwrap();
        assert_eq!(text, "{\n    \"a\": {\n        \"b\": 1\n    }\n}");
        let text = serialize(&doc, Format::Json, &SerializeOptions::default()).unwrap();
        assert_eq!(text, "{\n  \"a\": {\n    \"b\": 1\n  }\n}");
    }

    #[test]
    fn yaml_round_trip() {
        let doc = json!({
            "paths": {"/pets": {"get": {"responses": {"200": {"description": "ok"}}}}}
        });
        let text = serialize(&doc, Format::Yaml, &SerializeOptions::default()).unwrap();
        let (back, format) = parse(&text).unwrap();
        assert_eq!(format, Format::Yaml);
        assert_eq!(back, doc);
    }

    #[test]
    fn kind_names() {
        assert_eq!(kind_name(&json!([])), "sequence");
        assert_eq!(kind_name(&json!({})), "mapping");
        assert_eq!(kind_name(&json!("s")), "string");
    }
}
