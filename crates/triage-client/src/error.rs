//! Bridge and submission error types.

use thiserror::Error;

/// Errors raised by the chat bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No chat endpoint is configured. Raised per query, before any network
    /// call.
    #[error("chat.base_url is not set")]
    MissingEndpoint,

    /// The client could not be built from the configured values. The detail
    /// names the offending setting and never carries the API key.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The backend answered with a non-success status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// The backend could not be reached (DNS, refused connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered 2xx with a body that does not match the
    /// configured reply schema.
    #[error("parse error: {0}")]
    Parse(String),
}

impl BridgeError {
    /// End-user text for a transcript error entry. Distinguishes the failure
    /// classes and never includes configured secrets or response bodies.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingEndpoint => {
                String::from("Chatbot API URL is not configured. Please contact support.")
            }
            Self::Configuration(detail) => {
                format!("The chat client is misconfigured ({detail}). Please contact support.")
            }
            Self::Api { status, .. } => format!(
                "Failed to get AI response from the external API. Status: {status}"
            ),
            Self::Transport(error) if error.is_timeout() => String::from(
                "The AI service did not respond in time. Please try again later.",
            ),
            Self::Transport(_) => {
                String::from("Failed to connect to the AI service. Please try again later.")
            }
            Self::Parse(_) => String::from(
                "The AI service returned a response that could not be read. Please try again later.",
            ),
        }
    }

    /// Short machine-readable class name, used in logs and JSON output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingEndpoint | Self::Configuration(_) => "configuration",
            Self::Api { .. } => "api",
            Self::Transport(_) => "transport",
            Self::Parse(_) => "parse",
        }
    }
}

/// Errors raised while submitting an RCA report.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The submitter could not be built from configuration.
    #[error("submission endpoint misconfigured: {0}")]
    Configuration(String),

    /// The endpoint rejected the report.
    #[error("submission rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The endpoint could not be reached.
    #[error("submission endpoint unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    /// The endpoint's acknowledgement could not be decoded.
    #[error("unreadable submission acknowledgement: {0}")]
    Parse(String),
}

impl SubmissionError {
    /// Human-readable reason shown to the operator.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Configuration(detail) => {
                format!("The RCA submission service is misconfigured: {detail}")
            }
            Self::Rejected { status, .. } => {
                format!("The RCA submission service rejected the report. Status: {status}")
            }
            Self::Transport(_) => String::from(
                "Could not reach the RCA submission service. Please try again later.",
            ),
            Self::Parse(_) => String::from(
                "The RCA submission service returned an unreadable acknowledgement.",
            ),
        }
    }
}
