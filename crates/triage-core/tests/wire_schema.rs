//! Serde roundtrip and JsonSchema validation tests for the wire types.

use std::collections::BTreeMap;

use chrono::Utc;
use schemars::schema_for;
use triage_core::chat::*;
use triage_core::enums::*;
use triage_core::message::{Message, MessageBody};
use triage_core::rca::*;
use triage_core::render::ReplyView;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_rich_reply() -> RichReply {
    let mut owner = BTreeMap::new();
    owner.insert("team".to_string(), MetadataValue::Text("payments".into()));

    let mut metadata = BTreeMap::new();
    metadata.insert("ticket".to_string(), MetadataValue::Text("INC0042".into()));
    metadata.insert("resolved".to_string(), MetadataValue::Bool(true));
    metadata.insert(
        "duration_minutes".to_string(),
        MetadataValue::Number(serde_json::Number::from(95)),
    );
    metadata.insert("owner".to_string(), MetadataValue::Map(owner));

    RichReply {
        full_response: "Pool exhaustion on the payments database.".into(),
        summary: "Pool exhausted".into(),
        recommendation: "Alert on pool saturation".into(),
        source_incidents: vec![SourceIncident {
            content: "INC0042: payments API timeouts".into(),
            metadata,
        }],
    }
}

fn sample_form() -> RcaFormData {
    let mut draft = RcaDraft::new();
    for field in RcaField::ALL {
        let value = match field {
            RcaField::Severity => "P2".to_string(),
            RcaField::Status => "In Progress".to_string(),
            f if f.is_datetime() => "2024-05-01T09:15".to_string(),
            f => format!("{} value", f.label()),
        };
        draft.set(field, value);
    }
    draft.validate().expect("sample draft validates")
}

roundtrip_and_validate!(
    chat_request_roundtrip,
    ChatRequest,
    ChatRequest::new("What caused INC0042?")
);

roundtrip_and_validate!(
    minimal_reply_roundtrip,
    MinimalReply,
    MinimalReply {
        response: "ok".into()
    }
);

roundtrip_and_validate!(rich_reply_roundtrip, RichReply, sample_rich_reply());

roundtrip_and_validate!(
    chat_reply_roundtrip,
    ChatReply,
    ChatReply::Rich(sample_rich_reply())
);

roundtrip_and_validate!(
    bot_message_roundtrip,
    Message,
    Message {
        id: "msg-1714554900000-0a1b2c3d".into(),
        body: MessageBody::Reply(ReplyView::from(&ChatReply::Rich(sample_rich_reply()))),
        sender: Sender::Bot,
        timestamp: Utc::now(),
    }
);

roundtrip_and_validate!(rca_form_roundtrip, RcaFormData, sample_form());

roundtrip_and_validate!(
    rca_draft_roundtrip,
    RcaDraft,
    RcaDraft {
        incident_ticket_number: Some("INC1".into()),
        severity: Some("P0".into()),
        ..RcaDraft::default()
    }
);

roundtrip_and_validate!(
    submission_result_roundtrip,
    SubmissionResult,
    SubmissionResult {
        success: true,
        message: "logged".into(),
        ticket_number: Some("INC1".into()),
    }
);

roundtrip_and_validate!(
    field_error_roundtrip,
    FieldError,
    FieldError {
        field: RcaField::Severity,
        message: "Severity is required.".into(),
    }
);

#[test]
fn rich_schema_rejects_minimal_shape() {
    let schema = serde_json::to_value(schema_for!(RichReply)).unwrap();
    let errors = validate_against_schema(&schema, &serde_json::json!({ "response": "ok" }));
    assert!(!errors.is_empty());
}

#[test]
fn rca_schema_rejects_severity_outside_set() {
    let schema = serde_json::to_value(schema_for!(RcaFormData)).unwrap();
    let mut instance = serde_json::to_value(sample_form()).unwrap();
    instance["severity"] = serde_json::json!("P7");
    let errors = validate_against_schema(&schema, &instance);
    assert!(!errors.is_empty());
}

#[test]
fn rich_schema_allows_null_optional_fields() {
    let schema = serde_json::to_value(schema_for!(RichReply)).unwrap();
    let instance = serde_json::json!({
        "full_response": "F",
        "summary": null,
        "source_incidents": [{ "Content": "c", "Metadata": null }]
    });
    assert!(validate_against_schema(&schema, &instance).is_empty());
}
