//! Strict-mode schema normalization for structured output.
//!
//! Strict enforcement rejects schemas that implicitly allow extra
//! properties, so every `"type": "object"` node without an explicit
//! `additionalProperties` gets `additionalProperties: false`, at every depth.

use serde_json::{Map, Value};

/// Format name used when the schema has no `title`.
pub const DEFAULT_FORMAT_NAME: &str = "response";

/// Return a closed-object copy of `schema`. The input is never modified.
pub fn to_strict_schema(schema: &Value) -> Value {
    let mut copy = schema.clone();
    close_objects(&mut copy);
    copy
}

/// Name for the `json_schema` format directive: the schema's `title`, or
/// [`DEFAULT_FORMAT_NAME`].
pub fn format_name(schema: &Value) -> String {
    schema
        .get("title")
        .and_then(Value::as_str)
        .filter(|title| !title.is_empty())
        .unwrap_or(DEFAULT_FORMAT_NAME)
        .to_string()
}

fn close_objects(node: &mut Value) {
    let Value::Object(map) = node else {
        return;
    };

    if is_object_type(map) && !map.contains_key("additionalProperties") {
        map.insert("additionalProperties".to_string(), Value::Bool(false));
    }

    if let Some(Value::Object(properties)) = map.get_mut("properties") {
        for property in properties.values_mut() {
            close_objects(property);
        }
    }

    if let Some(items) = map.get_mut("items") {
        match items {
            Value::Array(tuple) => tuple.iter_mut().for_each(close_objects),
            other => close_objects(other),
        }
    }

    for key in ["anyOf", "allOf", "oneOf"] {
        if let Some(Value::Array(variants)) = map.get_mut(key) {
            variants.iter_mut().for_each(close_objects);
        }
    }
}

fn is_object_type(map: &Map<String, Value>) -> bool {
    map.get("type").and_then(Value::as_str) == Some("object")
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_object_closed() {
        let schema = json!({
            "type": "object",
            "properties": {"sentiment": {"type": "string"}, "confidence": {"type": "number"}},
            "required": ["sentiment", "confidence"]
        });
        let strict = to_strict_schema(&schema);

        assert_eq!(strict["additionalProperties"], false);
        assert!(strict["properties"]["sentiment"].get("additionalProperties").is_none());
        assert_eq!(strict["required"], json!(["sentiment", "confidence"]));
    }

    #[test]
    fn test_nested_objects_closed_everywhere() {
        let schema = json!({
            "type": "object",
            "properties": {
                "author": {
                    "type": "object",
                    "properties": {"name": {"type": "string"}}
                },
                "tags": {
                    "type": "array",
                    "items": {"type": "object", "properties": {"label": {"type": "string"}}}
                },
                "payload": {
                    "anyOf": [
                        {"type": "object", "properties": {"a": {"type": "integer"}}},
                        {"type": "null"}
                    ]
                },
                "merged": {
                    "allOf": [{"type": "object"}]
                },
                "choice": {
                    "oneOf": [
                        {"type": "object", "properties": {
                            "inner": {"type": "object"}
                        }}
                    ]
                }
            }
        });
        let strict = to_strict_schema(&schema);
        let props = &strict["properties"];

        assert_eq!(strict["additionalProperties"], false);
        assert_eq!(props["author"]["additionalProperties"], false);
        assert_eq!(props["tags"]["items"]["additionalProperties"], false);
        assert!(props["tags"].get("additionalProperties").is_none());
        assert_eq!(props["payload"]["anyOf"][0]["additionalProperties"], false);
        assert!(props["payload"]["anyOf"][1].get("additionalProperties").is_none());
        assert_eq!(props["merged"]["allOf"][0]["additionalProperties"], false);
        assert_eq!(props["choice"]["oneOf"][0]["additionalProperties"], false);
        assert_eq!(
            props["choice"]["oneOf"][0]["properties"]["inner"]["additionalProperties"],
            false
        );
    }

    #[test]
    fn test_explicit_additional_properties_preserved() {
        let schema = json!({
            "type": "object",
            "additionalProperties": true,
            "properties": {
                "extra": {"type": "object", "additionalProperties": {"type": "string"}},
                "closed": {"type": "object"}
            }
        });
        let strict = to_strict_schema(&schema);

        assert_eq!(strict["additionalProperties"], true);
        assert_eq!(
            strict["properties"]["extra"]["additionalProperties"],
            json!({"type": "string"})
        );
        assert_eq!(strict["properties"]["closed"]["additionalProperties"], false);
    }

    #[test]
    fn test_input_never_mutated() {
        let schema = json!({
            "type": "object",
            "properties": {"child": {"type": "object"}}
        });
        let before = schema.clone();
        let mut strict = to_strict_schema(&schema);

        strict["properties"]["child"]["type"] = json!("string");
        strict["title"] = json!("mutated");

        assert_eq!(schema, before);
        assert!(schema.get("additionalProperties").is_none());
    }

    #[test]
    fn test_non_object_schema_untouched() {
        let schema = json!({"type": "string", "enum": ["a", "b"]});
        assert_eq!(to_strict_schema(&schema), schema);
    }

    #[test]
    fn test_format_name() {
        assert_eq!(format_name(&json!({"title": "Sentiment", "type": "object"})), "Sentiment");
        assert_eq!(format_name(&json!({"type": "object"})), "response");
        assert_eq!(format_name(&json!({"title": 7})), "response");
    }
}
