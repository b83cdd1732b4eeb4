//! # triage-session
//!
//! The conversation controller. Owns the transcript, the pending RCA draft
//! and the notification queue, and moves between three states:
//!
//! ```text
//!            send            reply / failure
//!   Idle ───────────▶ AwaitingResponse ───────────▶ Idle
//!    │  ▲
//!    │  │ cancel / submit success
//!    ▼  │
//!   RcaDialogOpen ◀── submit failure
//! ```
//!
//! The chat backend and the RCA submitter are passed in per call, so front
//! ends own the clients and tests can substitute fakes.

mod error;
mod notification;

pub use error::SessionError;
pub use notification::{Notification, NotificationKind};

use std::fmt;

use serde::Serialize;
use triage_client::{BridgeError, ChatBackend, RcaSubmitter};
use triage_core::chat::ChatReply;
use triage_core::enums::Sender;
use triage_core::message::{Message, Transcript};
use triage_core::rca::{FieldError, RcaDraft, RcaFormData, SubmissionResult};
use triage_core::render::ReplyView;

pub const ANALYTICS_PLACEHOLDER: &str = "Analytics functionality is not yet implemented.";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    AwaitingResponse,
    RcaDialogOpen,
}

impl SessionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingResponse => "awaiting_response",
            Self::RcaDialogOpen => "rca_dialog_open",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an RCA submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RcaOutcome {
    /// Accepted. The transcript was reset for the ticket.
    Logged { ticket: String },
    /// The draft failed validation; every violation is listed.
    Invalid(Vec<FieldError>),
    /// The submitter declined or failed. The dialog stays open.
    Rejected { reason: String },
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Conversation {
    transcript: Transcript,
    state: SessionState,
    draft: Option<RcaDraft>,
    notifications: Vec<Notification>,
    welcome: String,
    initialized: bool,
}

impl Conversation {
    /// Create an idle conversation with an empty transcript. Call
    /// [`Conversation::initialize`] to seed the welcome message.
    pub fn new(welcome: impl Into<String>) -> Self {
        Self {
            transcript: Transcript::new(),
            state: SessionState::Idle,
            draft: None,
            notifications: Vec::new(),
            welcome: welcome.into(),
            initialized: false,
        }
    }

    /// Seed the welcome system message. Only the first call on an empty
    /// transcript has an effect; returns whether a message was added.
    pub fn initialize(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;
        if !self.transcript.is_empty() {
            return false;
        }
        self.transcript.append(self.welcome.as_str(), Sender::System);
        true
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self.state, SessionState::AwaitingResponse)
    }

    /// Drain pending notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // -- chat ---------------------------------------------------------------

    /// First half of a chat turn: record the user's message and enter
    /// `AwaitingResponse`. Returns the trimmed query to send.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Busy`] while a reply is pending.
    /// - [`SessionError::InvalidState`] while the RCA dialog is open.
    /// - [`SessionError::EmptyInput`] if `input` is blank; nothing is recorded.
    pub fn begin_send(&mut self, input: &str) -> Result<String, SessionError> {
        self.require_idle("send a message")?;
        let query = input.trim();
        if query.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        self.transcript.append(query, Sender::User);
        self.state = SessionState::AwaitingResponse;
        tracing::debug!(chars = query.len(), "chat turn started");
        Ok(query.to_string())
    }

    /// Second half of a chat turn: record the bot reply, or exactly one
    /// error entry, and return to `Idle`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] if no reply is pending.
    pub fn complete_send(
        &mut self,
        outcome: Result<ChatReply, BridgeError>,
    ) -> Result<&Message, SessionError> {
        if self.state != SessionState::AwaitingResponse {
            return Err(SessionError::InvalidState {
                action: "complete a reply",
                state: self.state,
            });
        }
        self.state = SessionState::Idle;
        let message = match outcome {
            Ok(reply) => self
                .transcript
                .append(ReplyView::from(&reply), Sender::Bot),
            Err(error) => {
                tracing::warn!(kind = error.kind(), error = %error, "chat turn failed");
                self.transcript.append(error.user_message(), Sender::Error)
            }
        };
        Ok(message)
    }

    /// Run a whole chat turn against `backend`.
    ///
    /// # Errors
    ///
    /// Same as [`Conversation::begin_send`]. Backend failures are recorded
    /// in the transcript, not returned.
    pub async fn send(
        &mut self,
        backend: &dyn ChatBackend,
        input: &str,
    ) -> Result<&Message, SessionError> {
        let query = self.begin_send(input)?;
        let outcome = backend.send_query(&query).await;
        self.complete_send(outcome)
    }

    // -- RCA dialog ---------------------------------------------------------

    /// Open the RCA dialog with a blank draft.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] while a reply is pending,
    /// [`SessionError::InvalidState`] if the dialog is already open.
    pub fn open_rca_form(&mut self) -> Result<&mut RcaDraft, SessionError> {
        self.require_idle("open the RCA form")?;
        self.state = SessionState::RcaDialogOpen;
        Ok(self.draft.insert(RcaDraft::new()))
    }

    /// The open draft, if any.
    #[must_use]
    pub const fn draft(&self) -> Option<&RcaDraft> {
        self.draft.as_ref()
    }

    /// # Errors
    ///
    /// [`SessionError::InvalidState`] unless the dialog is open.
    pub fn draft_mut(&mut self) -> Result<&mut RcaDraft, SessionError> {
        let state = self.state;
        self.draft.as_mut().ok_or(SessionError::InvalidState {
            action: "edit the RCA form",
            state,
        })
    }

    /// Close the dialog and discard the draft. The transcript is untouched.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidState`] unless the dialog is open.
    pub fn cancel_rca(&mut self) -> Result<(), SessionError> {
        self.require_dialog("cancel the RCA form")?;
        self.draft = None;
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Validate the draft and hand it to `submitter`.
    ///
    /// On success the transcript is replaced by a single system notice for
    /// the ticket and the dialog closes. Any failure keeps the dialog open
    /// with the draft intact and raises a destructive notification.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidState`] unless the dialog is open.
    pub async fn submit_rca(
        &mut self,
        submitter: &dyn RcaSubmitter,
    ) -> Result<RcaOutcome, SessionError> {
        let draft = self.require_dialog("submit the RCA form")?;
        let form = match draft.validate() {
            Ok(form) => form,
            Err(errors) => {
                tracing::debug!(count = errors.len(), "RCA draft failed validation");
                self.notifications.push(Notification::destructive(
                    "RCA Form Incomplete",
                    format!("Please correct {} field(s) before submitting.", errors.len()),
                ));
                return Ok(RcaOutcome::Invalid(errors));
            }
        };

        match submitter.submit(&form).await {
            Ok(result) if result.success => Ok(self.finish_rca(&form, &result)),
            Ok(result) => {
                let reason = if result.message.trim().is_empty() {
                    String::from("An unknown error occurred while submitting the RCA.")
                } else {
                    result.message
                };
                tracing::warn!(ticket = %form.incident_ticket_number, "RCA submission declined");
                self.notifications
                    .push(Notification::destructive("RCA Submission Failed", reason.clone()));
                Ok(RcaOutcome::Rejected { reason })
            }
            Err(error) => {
                tracing::warn!(error = %error, "RCA submission failed");
                let reason = error.reason();
                self.notifications
                    .push(Notification::destructive("RCA Submission Error", reason.clone()));
                Ok(RcaOutcome::Rejected { reason })
            }
        }
    }

    fn finish_rca(&mut self, form: &RcaFormData, result: &SubmissionResult) -> RcaOutcome {
        let ticket = form.incident_ticket_number.clone();
        let description = if result.message.trim().is_empty() {
            let acknowledged = result.ticket_number.as_deref().unwrap_or(&ticket);
            format!("RCA for ticket {acknowledged} has been logged.")
        } else {
            result.message.clone()
        };
        self.notifications
            .push(Notification::info("RCA Submitted Successfully", description));

        self.draft = None;
        self.state = SessionState::Idle;
        self.transcript.clear();
        self.transcript.append(
            format!(
                "New RCA started for ticket: {ticket}. Details logged. You can now ask questions related to this incident or provide further information."
            ),
            Sender::System,
        );
        tracing::info!(ticket = %ticket, "RCA logged; transcript reset");
        RcaOutcome::Logged { ticket }
    }

    // -- misc ---------------------------------------------------------------

    /// Analytics placeholder: raises an informational notification only.
    pub fn analytics(&mut self) {
        self.notifications
            .push(Notification::info("Analytics", ANALYTICS_PLACEHOLDER));
    }

    fn require_idle(&self, action: &'static str) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle => Ok(()),
            SessionState::AwaitingResponse => Err(SessionError::Busy),
            state @ SessionState::RcaDialogOpen => {
                Err(SessionError::InvalidState { action, state })
            }
        }
    }

    fn require_dialog(&self, action: &'static str) -> Result<&RcaDraft, SessionError> {
        match (&self.state, &self.draft) {
            (SessionState::RcaDialogOpen, Some(draft)) => Ok(draft),
            _ => Err(SessionError::InvalidState {
                action,
                state: self.state,
            }),
        }
    }
}
