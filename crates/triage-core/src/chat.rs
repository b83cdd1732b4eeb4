//! Wire types for the external chat API.
//!
//! The backend contract changed shape over time. Rather than accepting every
//! historical shape, a client is pinned to one [`ResponseSchema`] and
//! [`ChatReply::parse`] decodes strictly against it.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::ResponseSchema;
use crate::errors::CoreError;

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChatRequest {
    pub query: String,
}

impl ChatRequest {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// `v1-minimal` reply: a single text answer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MinimalReply {
    pub response: String,
}

/// `v2-rich` reply with optional summary, recommendation, and the past
/// incidents the answer was drawn from.
///
/// The optional fields may be absent or `null`; both decode to empty.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RichReply {
    pub full_response: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub recommendation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<Vec<SourceIncident>>")]
    pub source_incidents: Vec<SourceIncident>,
}

/// A past incident cited by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SourceIncident {
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "Metadata", default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<BTreeMap<String, MetadataValue>>")]
    pub metadata: BTreeMap<String, MetadataValue>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Renderable metadata value. Anything outside this set (nulls, arrays) is
/// rejected at parse time so rendering stays total.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(#[schemars(with = "f64")] serde_json::Number),
    Text(String),
    Map(BTreeMap<String, MetadataValue>),
}

/// A decoded chat reply in one of the two versioned shapes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "schema", rename_all = "snake_case")]
pub enum ChatReply {
    Minimal(MinimalReply),
    Rich(RichReply),
}

impl ChatReply {
    /// Decode a reply body against the expected schema version.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ReplyShape`] if the body is not JSON or does not
    /// match `schema`.
    pub fn parse(body: &[u8], schema: ResponseSchema) -> Result<Self, CoreError> {
        let shape_error = |source| CoreError::ReplyShape {
            schema: schema.version(),
            source,
        };
        match schema {
            ResponseSchema::Minimal => serde_json::from_slice::<MinimalReply>(body)
                .map(Self::Minimal)
                .map_err(shape_error),
            ResponseSchema::Rich => serde_json::from_slice::<RichReply>(body)
                .map(Self::Rich)
                .map_err(shape_error),
        }
    }

    #[must_use]
    pub const fn schema(&self) -> ResponseSchema {
        match self {
            Self::Minimal(_) => ResponseSchema::Minimal,
            Self::Rich(_) => ResponseSchema::Rich,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const RICH_FIXTURE: &str = r#"{
        "full_response": "Database pool exhaustion caused the outage.",
        "summary": "Pool exhausted",
        "recommendation": "Raise pool size and add alerting",
        "source_incidents": [
            {
                "Content": "INC0042: payments API timeouts",
                "Metadata": {
                    "ticket": "INC0042",
                    "severity_rank": 1,
                    "resolved": true,
                    "owner": { "team": "payments", "oncall": "alice" }
                }
            },
            { "Content": "INC0077: connection resets" }
        ]
    }"#;

    #[test]
    fn parses_rich_reply() {
        let reply = ChatReply::parse(RICH_FIXTURE.as_bytes(), ResponseSchema::Rich).unwrap();
        let ChatReply::Rich(rich) = reply else {
            panic!("expected rich reply");
        };
        assert_eq!(rich.summary, "Pool exhausted");
        assert_eq!(rich.source_incidents.len(), 2);

        let metadata = &rich.source_incidents[0].metadata;
        assert_eq!(metadata["ticket"], MetadataValue::Text("INC0042".into()));
        assert_eq!(metadata["resolved"], MetadataValue::Bool(true));
        assert!(matches!(metadata["severity_rank"], MetadataValue::Number(_)));
        assert!(matches!(metadata["owner"], MetadataValue::Map(_)));
        assert!(rich.source_incidents[1].metadata.is_empty());
    }

    #[test]
    fn rich_optional_fields_default_to_empty() {
        let reply =
            ChatReply::parse(br#"{"full_response":"F"}"#, ResponseSchema::Rich).unwrap();
        assert_eq!(
            reply,
            ChatReply::Rich(RichReply {
                full_response: "F".into(),
                summary: String::new(),
                recommendation: String::new(),
                source_incidents: Vec::new(),
            })
        );
    }

    #[test]
    fn null_optional_fields_are_treated_as_absent() {
        let body = br#"{"full_response":"F","summary":null,"recommendation":null,"source_incidents":[{"Content":"c","Metadata":null}]}"#;
        let ChatReply::Rich(rich) = ChatReply::parse(body, ResponseSchema::Rich).unwrap() else {
            panic!("expected rich reply");
        };
        assert_eq!(rich.summary, "");
        assert_eq!(rich.recommendation, "");
        assert_eq!(rich.source_incidents.len(), 1);
        assert!(rich.source_incidents[0].metadata.is_empty());

        let body = br#"{"full_response":"F","source_incidents":null}"#;
        let ChatReply::Rich(rich) = ChatReply::parse(body, ResponseSchema::Rich).unwrap() else {
            panic!("expected rich reply");
        };
        assert!(rich.source_incidents.is_empty());
    }

    #[test]
    fn null_full_response_is_rejected() {
        let body = br#"{"full_response":null,"summary":"s"}"#;
        assert!(ChatReply::parse(body, ResponseSchema::Rich).is_err());
    }

    #[test]
    fn parses_minimal_reply() {
        let reply = ChatReply::parse(br#"{"response":"ok"}"#, ResponseSchema::Minimal).unwrap();
        assert_eq!(
            reply,
            ChatReply::Minimal(MinimalReply {
                response: "ok".into()
            })
        );
        assert_eq!(reply.schema(), ResponseSchema::Minimal);
    }

    #[test]
    fn minimal_body_is_rejected_by_rich_schema() {
        let err = ChatReply::parse(br#"{"response":"ok"}"#, ResponseSchema::Rich).unwrap_err();
        assert!(err.to_string().contains("v2-rich"));
    }

    #[test]
    fn null_metadata_values_are_rejected() {
        let body = br#"{"full_response":"F","source_incidents":[{"Content":"c","Metadata":{"k":null}}]}"#;
        assert!(ChatReply::parse(body, ResponseSchema::Rich).is_err());
    }

    #[test]
    fn non_json_body_is_rejected() {
        assert!(ChatReply::parse(b"<html>502</html>", ResponseSchema::Minimal).is_err());
    }

    #[test]
    fn request_serializes_query_field() {
        let json = serde_json::to_string(&ChatRequest::new("why did payments fail?")).unwrap();
        assert_eq!(json, r#"{"query":"why did payments fail?"}"#);
    }
}
