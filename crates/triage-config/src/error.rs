//! Errors raised while loading Triage configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("failed to load triage config: {0}")]
    Figment(#[from] figment::Error),

    /// A value parsed but is outside the range the clients accept.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}
