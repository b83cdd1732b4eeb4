//! Chat backend configuration.

use std::fmt;

use serde::{Deserialize, Serialize};
use triage_core::enums::ResponseSchema;

fn default_api_key_header() -> String {
    String::from("X-OpenAI-Key")
}

fn default_chat_path() -> String {
    String::from("chat")
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    /// Base URL of the chat backend (e.g., `https://incidents.example.com/api`).
    #[serde(default)]
    pub base_url: String,

    /// Optional API key forwarded to the backend in `api_key_header`.
    #[serde(default)]
    pub api_key: String,

    /// Header carrying the API key.
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,

    /// Path of the chat route, appended to `base_url`.
    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    /// Request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Reply schema version the backend speaks.
    #[serde(default)]
    pub schema: ResponseSchema,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            api_key_header: default_api_key_header(),
            chat_path: default_chat_path(),
            timeout_secs: default_timeout_secs(),
            schema: ResponseSchema::default(),
        }
    }
}

impl ChatConfig {
    /// A base URL is the only required field.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Full chat endpoint, joining base URL and path with exactly one slash.
    /// `None` when no base URL is set.
    #[must_use]
    pub fn endpoint_url(&self) -> Option<String> {
        if !self.is_configured() {
            return None;
        }
        let base = self.base_url.trim().trim_end_matches('/');
        let path = self.chat_path.trim().trim_start_matches('/');
        if path.is_empty() {
            return Some(base.to_string());
        }
        Some(format!("{base}/{path}"))
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.has_api_key() { "<redacted>" } else { "" })
            .field("api_key_header", &self.api_key_header)
            .field("chat_path", &self.chat_path)
            .field("timeout_secs", &self.timeout_secs)
            .field("schema", &self.schema)
            .finish()
    }
}
