use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::InferenceClientError;

#[derive(Clone, Debug, PartialEq)]
pub struct SchemaSpec {
    pub schema: Value,        // pure JSON Schema root
    pub name: Option<String>, // used by providers that want a name
    pub strict: Option<bool>, // opt-in, only applied where supported
}

impl SchemaSpec {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    pub fn from_value(schema: Value) -> Self {
        Self {
            schema,
            name: None,
            strict: None,
        }
    }

    /// Derives the schema of `T`. The schema title, when present, becomes the
    /// spec name.
    pub fn from_type<T: JsonSchema>() -> Result<Self, InferenceClientError> {
        let schema = serde_json::to_value(schema_for!(T))?;
        let name = schema
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(Self {
            schema,
            name,
            strict: None,
        })
    }

    /// Schema without the `$schema` meta keyword, which some providers reject.
    pub fn bare_schema(&self) -> Value {
        let mut schema = self.schema.clone();
        if let Some(obj) = schema.as_object_mut() {
            obj.remove("$schema");
        }
        schema
    }
}

/// Provider-specific encoding of a [`SchemaSpec`] into the request `format`.
pub trait StructuredOutputFormat {
    fn format(spec: &SchemaSpec) -> Value;
}

/// Pulls the JSON document out of raw model content.
///
/// Drops a `<think>...</think>` block the reply opens with and a surrounding
/// Markdown code fence, then trims whitespace. Content after the opening
/// block is never searched for think tags.
pub fn extract_json(content: &str) -> &str {
    let rest = content.trim_start();
    let rest = rest
        .strip_prefix("<think>")
        .and_then(|r| r.split_once("</think>"))
        .map_or(rest, |(_, after)| after)
        .trim();

    if let Some(fenced) = rest.strip_prefix("```") {
        let body = match fenced.find('\n') {
            Some(pos) => &fenced[pos + 1..],
            None => fenced,
        };
        return body.trim_end().trim_end_matches("```").trim();
    }
    rest
}

/// Parses model content into `O`, rejecting anything that does not conform.
pub fn parse_structured<O: DeserializeOwned>(content: &str) -> Result<O, InferenceClientError> {
    let json = extract_json(content);
    let value: Value = serde_json::from_str(json).map_err(|e| {
        InferenceClientError::StructuredOutput(format!("response is not JSON: {e}; raw: {content}"))
    })?;
    serde_json::from_value(value).map_err(|e| {
        InferenceClientError::StructuredOutput(format!(
            "response does not match schema: {e}; raw: {content}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, JsonSchema, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Weather {
        windy: bool,
        temperature: i32,
    }

    #[test]
    fn from_type_uses_title_as_name() {
        let spec = SchemaSpec::from_type::<Weather>().unwrap();
        assert_eq!(spec.name.as_deref(), Some("Weather"));
        assert_eq!(spec.schema["type"], "object");
        assert!(spec.schema["properties"].get("windy").is_some());
        assert!(spec.bare_schema().get("$schema").is_none());
    }

    #[test]
    fn extract_json_strips_think_block_and_fence() {
        let raw = "<think>hmm</think>\n```json\n{\"windy\": true, \"temperature\": 3}\n```\n";
        assert_eq!(extract_json(raw), "{\"windy\": true, \"temperature\": 3}");
        assert_eq!(extract_json("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn extract_json_keeps_think_tags_inside_the_document() {
        let raw = r#"{"topics": ["The </think> token in reasoning models", "Chain of thought"]}"#;
        assert_eq!(extract_json(raw), raw);

        let raw = "<think>a</think>{\"note\": \"ends with </think>\"}";
        assert_eq!(extract_json(raw), "{\"note\": \"ends with </think>\"}");
    }

    #[test]
    fn parse_structured_accepts_think_tag_in_a_string_value() {
        #[derive(Debug, Deserialize)]
        struct Topics {
            topics: Vec<String>,
        }

        let t: Topics = parse_structured(
            r#"{"topics": ["The </think> token in reasoning models", "Chain of thought"]}"#,
        )
        .unwrap();
        assert_eq!(
            t.topics,
            vec!["The </think> token in reasoning models", "Chain of thought"]
        );
    }

    #[test]
    fn parse_structured_accepts_conforming_content() {
        let w: Weather = parse_structured("{\"windy\": false, \"temperature\": 21}").unwrap();
        assert_eq!(
            w,
            Weather {
                windy: false,
                temperature: 21
            }
        );
    }

    #[test]
    fn parse_structured_rejects_non_json_and_schema_mismatch() {
        let err = parse_structured::<Weather>("it is sunny").unwrap_err();
        assert!(matches!(err, InferenceClientError::StructuredOutput(_)));

        let err = parse_structured::<Weather>("{\"windy\": true}").unwrap_err();
        assert!(matches!(err, InferenceClientError::StructuredOutput(_)));

        let err =
            parse_structured::<Weather>("{\"windy\": true, \"temperature\": 1, \"extra\": 0}")
                .unwrap_err();
        assert!(matches!(err, InferenceClientError::StructuredOutput(_)));
    }
}
