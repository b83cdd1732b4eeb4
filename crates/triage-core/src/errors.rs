//! Cross-cutting error types for Triage.
//!
//! Component errors (`BridgeError`, `SubmissionError`, `SessionError`,
//! `ConfigError`) live in their own crates. This module holds the errors that
//! core parsing can raise.

use thiserror::Error;

/// Errors raised by `triage-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value is outside the closed set accepted for its field.
    #[error("invalid {field} '{value}': expected one of {expected}")]
    InvalidEnum {
        field: &'static str,
        value: String,
        expected: String,
    },

    /// A chat reply body did not match the configured response schema.
    #[error("reply does not match the {schema} response schema: {source}")]
    ReplyShape {
        schema: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
