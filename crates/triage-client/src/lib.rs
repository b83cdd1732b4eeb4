//! # triage-client
//!
//! HTTP clients for Triage's external collaborators:
//! - [`ChatClient`]: the chat bridge. Sends one `POST` with `{ "query" }` per
//!   user message and decodes the reply against the configured schema version.
//! - [`submit`]: RCA report submitters (HTTP endpoint or local simulation).
//!
//! Neither client retries, caches, or streams.

pub mod submit;

mod error;
mod http;

pub use error::{BridgeError, SubmissionError};
pub use submit::{HttpSubmitter, RcaSubmitter, SimulatedSubmitter};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use triage_config::ChatConfig;
use triage_core::chat::{ChatReply, ChatRequest};
use triage_core::enums::ResponseSchema;

use crate::http::check_response;

/// User agent sent with every request.
pub(crate) const USER_AGENT: &str = concat!("triage/", env!("CARGO_PKG_VERSION"));

/// Anything that can answer a chat query. Implemented by [`ChatClient`];
/// front ends and tests may supply their own.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send `text` and return the decoded reply.
    async fn send_query(&self, text: &str) -> Result<ChatReply, BridgeError>;
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for the external chat API.
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: Option<String>,
    schema: ResponseSchema,
}

impl ChatClient {
    /// Build a client from configuration.
    ///
    /// A missing base URL is not an error here: the client is still usable
    /// and every [`ChatClient::send_query`] fails fast with
    /// [`BridgeError::MissingEndpoint`].
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Configuration`] if the timeout is zero, the API
    /// key header name or value is not a valid HTTP header, or the HTTP client
    /// cannot be built.
    pub fn new(config: &ChatConfig) -> Result<Self, BridgeError> {
        if config.timeout_secs == 0 {
            return Err(BridgeError::Configuration(String::from(
                "chat.timeout_secs must be greater than zero",
            )));
        }

        let mut headers = HeaderMap::new();
        if config.has_api_key() {
            let name = HeaderName::from_bytes(config.api_key_header.trim().as_bytes())
                .map_err(|e| {
                    BridgeError::Configuration(format!(
                        "chat.api_key_header '{}' is not a valid header name: {e}",
                        config.api_key_header
                    ))
                })?;
            let mut value = HeaderValue::from_str(config.api_key.trim()).map_err(|_| {
                BridgeError::Configuration(String::from("chat.api_key is not a valid header value"))
            })?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| BridgeError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint_url(),
            schema: config.schema,
        })
    }

    /// Resolved chat endpoint, if configured.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    #[must_use]
    pub const fn schema(&self) -> ResponseSchema {
        self.schema
    }

    /// Send one query to the chat endpoint.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::MissingEndpoint`] if no endpoint is configured (no
    ///   request is made).
    /// - [`BridgeError::Transport`] if the backend cannot be reached or the
    ///   body cannot be read.
    /// - [`BridgeError::Api`] on a non-2xx status, with the raw body.
    /// - [`BridgeError::Parse`] if the body does not match the configured
    ///   reply schema.
    pub async fn send_query(&self, text: &str) -> Result<ChatReply, BridgeError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(BridgeError::MissingEndpoint)?;

        tracing::debug!(endpoint, schema = self.schema.version(), "sending chat query");

        let resp = self
            .http
            .post(endpoint)
            .json(&ChatRequest::new(text))
            .send()
            .await
            .map_err(BridgeError::Transport)?;

        let resp = check_response(resp).await.map_err(|rejection| {
            tracing::warn!(status = rejection.status, "chat backend rejected query");
            BridgeError::Api {
                status: rejection.status,
                body: rejection.body,
            }
        })?;

        let body = resp.bytes().await.map_err(BridgeError::Transport)?;
        ChatReply::parse(&body, self.schema).map_err(|e| {
            tracing::warn!(error = %e, bytes = body.len(), "chat reply did not match schema");
            BridgeError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn send_query(&self, text: &str) -> Result<ChatReply, BridgeError> {
        Self::send_query(self, text).await
    }
}
