//! # triage-config
//!
//! Layered configuration loading for Triage using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TRIAGE_*` prefix, `__` as separator)
//! 2. Project-level `.triage/config.toml`
//! 3. User-level `~/.config/triage/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TRIAGE_CHAT__BASE_URL` -> `chat.base_url`, `TRIAGE_RCA__SUBMIT_URL` -> `rca.submit_url`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use triage_config::TriageConfig;
//!
//! let config = TriageConfig::load_with_dotenv().expect("config");
//!
//! if let Some(url) = config.chat.endpoint_url() {
//!     println!("Chat endpoint: {url}");
//! }
//! ```

mod chat;
mod error;
mod general;
mod rca;

pub use chat::ChatConfig;
pub use error::ConfigError;
pub use general::{DEFAULT_WELCOME_MESSAGE, GeneralConfig};
pub use rca::RcaConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Env var prefix for every config key.
pub const ENV_PREFIX: &str = "TRIAGE_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TriageConfig {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub rca: RcaConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl TriageConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be read or a value
    /// has the wrong type, and [`ConfigError::InvalidValue`] if
    /// [`Self::validate`] fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".triage/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values that parse but cannot drive a client. A missing URL is
    /// not an error: the chat bridge reports it per query and RCA submission
    /// falls back to simulation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a timeout is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.chat.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chat.timeout_secs",
                reason: "must be greater than zero",
            });
        }
        if self.rca.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "rca.timeout_secs",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("triage").join("config.toml"))
    }
}
