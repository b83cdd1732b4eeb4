//! General application configuration.

use serde::{Deserialize, Serialize};

/// Banner shown as the first system message of every session.
pub const DEFAULT_WELCOME_MESSAGE: &str = "Welcome to the M-pesa Incident Analysis assistant! I can help you analyze IT incidents. How can I assist you today?";

fn default_welcome_message() -> String {
    String::from(DEFAULT_WELCOME_MESSAGE)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Welcome banner seeded into an empty transcript.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            welcome_message: default_welcome_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert!(config.welcome_message.starts_with("Welcome to the M-pesa"));
    }
}
