//! RCA submission endpoint configuration.

use serde::{Deserialize, Serialize};

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RcaConfig {
    /// Submission endpoint. Empty selects the local simulated submitter.
    #[serde(default)]
    pub submit_url: String,

    /// Request timeout for submissions, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RcaConfig {
    fn default() -> Self {
        Self {
            submit_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RcaConfig {
    /// Whether a remote submission endpoint is set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.submit_url.trim().is_empty()
    }
}
