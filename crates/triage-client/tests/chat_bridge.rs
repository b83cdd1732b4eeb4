//! Chat bridge tests against a mock backend.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use triage_client::{BridgeError, ChatClient};
use triage_config::ChatConfig;
use triage_core::chat::{ChatReply, MinimalReply};
use triage_core::enums::ResponseSchema;
use triage_core::render::ReplyView;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ChatConfig {
    ChatConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        ..Default::default()
    }
}

#[tokio::test]
async fn posts_query_and_decodes_rich_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "query": "why is payments down?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "full_response": "Pool exhaustion.",
            "summary": "Pool exhausted",
            "recommendation": "",
            "source_incidents": [
                { "Content": "INC0042", "Metadata": { "team": "payments" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(&config_for(&server)).unwrap();
    let reply = client.send_query("why is payments down?").await.unwrap();

    let ChatReply::Rich(rich) = &reply else {
        panic!("expected rich reply");
    };
    assert_eq!(rich.summary, "Pool exhausted");
    assert_eq!(rich.source_incidents[0].content, "INC0042");

    let text = ReplyView::from(&reply).to_plain_text();
    assert!(text.starts_with("Pool exhaustion."));
    assert!(!text.contains("Recommendation"));
}

#[tokio::test]
async fn null_optional_fields_render_without_sections() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "full_response": "F",
            "summary": null,
            "recommendation": null,
            "source_incidents": [{ "Content": "c", "Metadata": null }]
        })))
        .mount(&server)
        .await;

    let reply = ChatClient::new(&config_for(&server))
        .unwrap()
        .send_query("q")
        .await
        .unwrap();

    let text = ReplyView::from(&reply).to_plain_text();
    assert!(text.starts_with('F'));
    assert!(!text.contains("Summary"));
    assert!(!text.contains("Recommendation"));
    assert!(text.contains("Source Incidents:\n- Content:\n  c"));
}

#[tokio::test]
async fn zero_timeout_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "full_response": "F" })))
        .expect(0)
        .mount(&server)
        .await;

    let config = ChatConfig {
        timeout_secs: 0,
        ..config_for(&server)
    };
    let err = ChatClient::new(&config).err().unwrap();
    assert!(matches!(err, BridgeError::Configuration(ref detail) if detail.contains("timeout_secs")));
}

#[tokio::test]
async fn minimal_schema_reply_renders_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "ok" })))
        .mount(&server)
        .await;

    let config = ChatConfig {
        schema: ResponseSchema::Minimal,
        ..config_for(&server)
    };
    let reply = ChatClient::new(&config)
        .unwrap()
        .send_query("ping")
        .await
        .unwrap();

    assert_eq!(
        reply,
        ChatReply::Minimal(MinimalReply {
            response: "ok".into()
        })
    );
    assert_eq!(ReplyView::from(&reply).to_plain_text(), "ok");
}

#[tokio::test]
async fn api_key_is_sent_in_configured_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("X-OpenAI-Key", "sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "full_response": "F" })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ChatConfig {
        api_key: "sk-test".into(),
        ..config_for(&server)
    };
    ChatClient::new(&config)
        .unwrap()
        .send_query("q")
        .await
        .unwrap();
}

#[tokio::test]
async fn no_api_key_header_without_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header_exists("X-OpenAI-Key"))
        .respond_with(ResponseTemplate::new(400))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "full_response": "F" })))
        .mount(&server)
        .await;

    ChatClient::new(&config_for(&server))
        .unwrap()
        .send_query("q")
        .await
        .unwrap();
}

#[tokio::test]
async fn server_error_is_api_error_with_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = ChatClient::new(&config_for(&server))
        .unwrap()
        .send_query("q")
        .await
        .unwrap_err();

    match &err {
        BridgeError::Api { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected API error, got {other:?}"),
    }
    assert_eq!(
        err.user_message(),
        "Failed to get AI response from the external API. Status: 500"
    );
}

#[tokio::test]
async fn malformed_json_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = ChatClient::new(&config_for(&server))
        .unwrap()
        .send_query("q")
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Parse(_)));
}

#[tokio::test]
async fn wrong_schema_version_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "ok" })))
        .mount(&server)
        .await;

    let err = ChatClient::new(&config_for(&server))
        .unwrap()
        .send_query("q")
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Parse(ref msg) if msg.contains("v2-rich")));
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let config = ChatConfig {
        base_url: "http://127.0.0.1:1".into(),
        timeout_secs: 5,
        ..Default::default()
    };
    let err = ChatClient::new(&config)
        .unwrap()
        .send_query("q")
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::Transport(_)));
    assert_eq!(
        err.user_message(),
        "Failed to connect to the AI service. Please try again later."
    );
}

#[tokio::test]
async fn slow_backend_times_out_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "full_response": "late" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ChatConfig {
        timeout_secs: 1,
        ..config_for(&server)
    };
    let err = ChatClient::new(&config)
        .unwrap()
        .send_query("q")
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::Transport(_)));
    assert!(err.user_message().contains("did not respond in time"));
}
