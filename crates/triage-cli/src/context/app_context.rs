use anyhow::Context;
use triage_client::{ChatClient, RcaSubmitter};
use triage_config::TriageConfig;
use triage_session::Conversation;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: TriageConfig,
    pub chat: ChatClient,
    pub submitter: Box<dyn RcaSubmitter>,
}

impl AppContext {
    pub fn init(config: TriageConfig) -> anyhow::Result<Self> {
        // An unset base URL is reported per query, not at startup.
        if !config.chat.is_configured() {
            tracing::warn!("chat.base_url is not set; queries will fail until it is configured");
        }

        let chat = ChatClient::new(&config.chat).context("failed to initialize chat client")?;
        let submitter = triage_client::submit::from_config(&config.rca)
            .context("failed to initialize RCA submitter")?;

        Ok(Self {
            config,
            chat,
            submitter,
        })
    }

    /// A fresh conversation using the configured welcome banner.
    #[must_use]
    pub fn conversation(&self) -> Conversation {
        Conversation::new(self.config.general.welcome_message.clone())
    }
}
