//! Output schema for schema-constrained generation.
//!
//! The provider is asked to conform its answer to a fixed JSON Schema with a
//! single boolean field. The raw payload is never trusted: it is decoded into
//! [`SpamVerdict`] and any mismatch surfaces as
//! [`ClassifyError::SchemaValidationFailed`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ClassifyError, Result};

/// Name the schema is registered under with the provider.
pub const SCHEMA_NAME: &str = "spam_classification";

/// Field carrying the verdict in provider output.
pub const VERDICT_FIELD: &str = "isSpam";

/// A named JSON Schema attached to a generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    /// Schema name.
    pub name: &'static str,
    /// Whether the provider should enforce the schema strictly.
    pub strict: bool,
    /// The JSON Schema document.
    pub schema: Value,
}

impl OutputSchema {
    /// The fixed spam classification schema: `{ "isSpam": boolean }`.
    pub fn spam_classification() -> Self {
        Self {
            name: SCHEMA_NAME,
            strict: true,
            schema: json!({
                "type": "object",
                "properties": {
                    VERDICT_FIELD: {
                        "type": "boolean",
                        "description": "True if the submitted text is spam"
                    }
                },
                "required": [VERDICT_FIELD],
                "additionalProperties": false
            }),
        }
    }

    /// Renders the schema as an OpenAI-compatible `response_format` value.
    pub fn to_response_format(&self) -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": self.name,
                "strict": self.strict,
                "schema": self.schema
            }
        })
    }
}

/// Typed form of the provider's answer.
///
/// Unknown fields are ignored; `isSpam` must be present and a JSON boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpamVerdict {
    #[serde(rename = "isSpam")]
    pub is_spam: bool,
}

/// Decodes raw provider output into a [`SpamVerdict`].
pub fn decode_verdict(value: &Value) -> Result<SpamVerdict> {
    if !value.is_object() {
        return Err(ClassifyError::SchemaValidationFailed(format!(
            "expected a JSON object, got {}",
            json_type_name(value)
        )));
    }

    SpamVerdict::deserialize(value)
        .map_err(|e| ClassifyError::SchemaValidationFailed(e.to_string()))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
