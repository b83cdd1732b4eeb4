//! RCA report submitters.
//!
//! Submission is an external collaborator: it takes a validated
//! [`RcaFormData`] and answers with a [`SubmissionResult`]. A result with
//! `success == false` is a soft rejection the operator can fix and resend;
//! a [`SubmissionError`] means the submission did not complete.

use std::time::Duration;

use async_trait::async_trait;
use triage_config::RcaConfig;
use triage_core::rca::{RcaFormData, SubmissionResult};

use crate::error::SubmissionError;
use crate::http::check_response;
use crate::USER_AGENT;

/// Accepts validated RCA reports.
#[async_trait]
pub trait RcaSubmitter: Send + Sync {
    /// Submit one report as a unit.
    async fn submit(&self, form: &RcaFormData) -> Result<SubmissionResult, SubmissionError>;
}

/// Pick the submitter for the configuration: HTTP when `rca.submit_url`
/// is set, simulated otherwise.
///
/// # Errors
///
/// Returns [`SubmissionError::Configuration`] if the HTTP client cannot be
/// built.
pub fn from_config(config: &RcaConfig) -> Result<Box<dyn RcaSubmitter>, SubmissionError> {
    if config.is_configured() {
        Ok(Box::new(HttpSubmitter::new(config)?))
    } else {
        tracing::debug!("rca.submit_url not set; using simulated submitter");
        Ok(Box::new(SimulatedSubmitter))
    }
}

// ── Simulated ──────────────────────────────────────────────────────

/// Acknowledges every report locally without any network call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedSubmitter;

#[async_trait]
impl RcaSubmitter for SimulatedSubmitter {
    async fn submit(&self, form: &RcaFormData) -> Result<SubmissionResult, SubmissionError> {
        let ticket = form.incident_ticket_number.clone();
        tracing::info!(ticket = %ticket, "simulated RCA submission");
        Ok(SubmissionResult {
            success: true,
            message: format!("RCA for ticket {ticket} has been logged."),
            ticket_number: Some(ticket),
        })
    }
}

// ── HTTP ───────────────────────────────────────────────────────────

/// Posts reports as JSON to `rca.submit_url`.
pub struct HttpSubmitter {
    http: reqwest::Client,
    url: String,
}

impl HttpSubmitter {
    /// # Errors
    ///
    /// Returns [`SubmissionError::Configuration`] if the URL is blank, the
    /// timeout is zero, or the HTTP client cannot be built.
    pub fn new(config: &RcaConfig) -> Result<Self, SubmissionError> {
        if !config.is_configured() {
            return Err(SubmissionError::Configuration(String::from(
                "rca.submit_url is not set",
            )));
        }
        if config.timeout_secs == 0 {
            return Err(SubmissionError::Configuration(String::from(
                "rca.timeout_secs must be greater than zero",
            )));
        }
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SubmissionError::Configuration(e.to_string()))?;
        Ok(Self {
            http,
            url: config.submit_url.trim().to_string(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RcaSubmitter for HttpSubmitter {
    async fn submit(&self, form: &RcaFormData) -> Result<SubmissionResult, SubmissionError> {
        tracing::debug!(url = %self.url, ticket = %form.incident_ticket_number, "submitting RCA");

        let resp = self
            .http
            .post(&self.url)
            .json(form)
            .send()
            .await
            .map_err(SubmissionError::Transport)?;

        let resp = check_response(resp)
            .await
            .map_err(|rejection| SubmissionError::Rejected {
                status: rejection.status,
                body: rejection.body,
            })?;

        let body = resp.bytes().await.map_err(SubmissionError::Transport)?;
        serde_json::from_slice::<SubmissionResult>(&body)
            .map_err(|e| SubmissionError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use triage_core::rca::{RcaDraft, RcaField};

    use super::*;

    fn form() -> RcaFormData {
        let mut draft = RcaDraft::new();
        for field in RcaField::ALL {
            let value = match field {
                RcaField::Severity => "P3",
                RcaField::Status => "Open",
                RcaField::IncidentTicketNumber => "INC7",
                f if f.is_datetime() => "2024-01-02T03:04",
                _ => "text",
            };
            draft.set(field, value);
        }
        draft.validate().unwrap()
    }

    #[tokio::test]
    async fn simulated_submitter_acknowledges_ticket() {
        let result = SimulatedSubmitter.submit(&form()).await.unwrap();
        assert_eq!(
            result,
            SubmissionResult {
                success: true,
                message: "RCA for ticket INC7 has been logged.".into(),
                ticket_number: Some("INC7".into()),
            }
        );
    }

    #[test]
    fn from_config_without_url_is_simulated() {
        assert!(from_config(&RcaConfig::default()).is_ok());
    }

    #[test]
    fn http_submitter_requires_url() {
        let err = HttpSubmitter::new(&RcaConfig::default()).err().unwrap();
        assert!(matches!(err, SubmissionError::Configuration(_)));
    }

    #[test]
    fn zero_timeout_is_rejected_before_submitting() {
        let config = RcaConfig {
            submit_url: "http://localhost:9000/rca".into(),
            timeout_secs: 0,
        };
        let err = from_config(&config).err().unwrap();
        assert_eq!(
            err.reason(),
            "The RCA submission service is misconfigured: rca.timeout_secs must be greater than zero"
        );
    }
}
