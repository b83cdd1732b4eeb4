use thiserror::Error;

use crate::SessionState;

/// Controller misuse. Chat and RCA failures are not errors at this level:
/// they are recorded in the transcript or raised as notifications.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A chat reply is still pending.
    #[error("a reply is still pending")]
    Busy,

    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },

    /// Input was empty after trimming.
    #[error("message is empty")]
    EmptyInput,
}
