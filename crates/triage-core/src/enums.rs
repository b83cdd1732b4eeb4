//! Closed enums for Triage: message senders, RCA severity and status, and the
//! chat reply schema version.
//!
//! Senders and schema versions serialize as `snake_case`. Severity and status
//! serialize with the labels operators see in the RCA form (`P0`, `In Progress`).

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Sender
// ---------------------------------------------------------------------------

/// Originator of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
    System,
    Error,
}

impl Sender {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
            Self::System => "system",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Incident priority, `P0` being the most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum Severity {
    P0,
    P1,
    P2,
    P3,
    P4,
}

impl Severity {
    pub const ALL: [Self; 5] = [Self::P0, Self::P1, Self::P2, Self::P3, Self::P4];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::P0 => "P0",
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::P4 => "P4",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    /// Accepts exactly the labels in [`Self::ALL`]; surrounding whitespace is
    /// ignored.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str() == trimmed)
            .ok_or_else(|| CoreError::InvalidEnum {
                field: "severity",
                value: raw.to_string(),
                expected: join_labels(Self::ALL.iter().map(|s| s.as_str())),
            })
    }
}

// ---------------------------------------------------------------------------
// IncidentStatus
// ---------------------------------------------------------------------------

/// Workflow status of the incident an RCA describes.
///
/// ```text
/// Open → Assigned → In Progress → Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum IncidentStatus {
    Open,
    Assigned,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl IncidentStatus {
    pub const ALL: [Self; 4] = [Self::Open, Self::Assigned, Self::InProgress, Self::Closed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncidentStatus {
    type Err = CoreError;

    /// Accepts exactly the display labels; surrounding whitespace is ignored.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == trimmed)
            .ok_or_else(|| CoreError::InvalidEnum {
                field: "status",
                value: raw.to_string(),
                expected: join_labels(Self::ALL.iter().map(|s| s.as_str())),
            })
    }
}

// ---------------------------------------------------------------------------
// ResponseSchema
// ---------------------------------------------------------------------------

/// Version of the chat reply contract the backend is expected to speak.
///
/// Exactly one version is accepted per client; a body in the other shape is
/// rejected rather than silently coerced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSchema {
    /// `{ "response": string }`
    Minimal,
    /// `{ "full_response", "summary", "recommendation", "source_incidents" }`
    #[default]
    Rich,
}

impl ResponseSchema {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Rich => "rich",
        }
    }

    /// Versioned identifier reported in logs and schema output.
    #[must_use]
    pub const fn version(self) -> &'static str {
        match self {
            Self::Minimal => "v1-minimal",
            Self::Rich => "v2-rich",
        }
    }
}

impl fmt::Display for ResponseSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}
