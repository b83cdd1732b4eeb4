use anyhow::Context;
use triage_config::TriageConfig;

/// Load configuration, reading `.env` from the working directory first.
pub fn load_config() -> anyhow::Result<TriageConfig> {
    TriageConfig::load_with_dotenv().context("failed to load triage configuration")
}
