//! RCA (root cause analysis) form schema.
//!
//! Operators fill an [`RcaDraft`] (every field optional, all text). Validation
//! checks every field and reports all violations together; on success it
//! produces a typed [`RcaFormData`] that is submitted as one unit.
//!
//! Payload keys are `camelCase` to match the submission endpoint.

use std::fmt;

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{IncidentStatus, Severity};

/// Accepted date-time layouts, HTML `datetime-local` first.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

// ---------------------------------------------------------------------------
// RcaField
// ---------------------------------------------------------------------------

/// Every field of the RCA form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum RcaField {
    IncidentTicketNumber,
    TimeDetected,
    TimeRecorded,
    TimeRestored,
    AffectedCi,
    Severity,
    Status,
    IncidentOwner,
    NotDetectedByMonitoringReason,
    Description,
    SystemImpact,
    BusinessImpact,
    RootCauseFindings,
    CorrectiveActions,
    PreventativeMeasures,
}

impl RcaField {
    pub const ALL: [Self; 15] = [
        Self::IncidentTicketNumber,
        Self::TimeDetected,
        Self::TimeRecorded,
        Self::TimeRestored,
        Self::AffectedCi,
        Self::Severity,
        Self::Status,
        Self::IncidentOwner,
        Self::NotDetectedByMonitoringReason,
        Self::Description,
        Self::SystemImpact,
        Self::BusinessImpact,
        Self::RootCauseFindings,
        Self::CorrectiveActions,
        Self::PreventativeMeasures,
    ];

    /// Payload key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IncidentTicketNumber => "incidentTicketNumber",
            Self::TimeDetected => "timeDetected",
            Self::TimeRecorded => "timeRecorded",
            Self::TimeRestored => "timeRestored",
            Self::AffectedCi => "affectedCi",
            Self::Severity => "severity",
            Self::Status => "status",
            Self::IncidentOwner => "incidentOwner",
            Self::NotDetectedByMonitoringReason => "notDetectedByMonitoringReason",
            Self::Description => "description",
            Self::SystemImpact => "systemImpact",
            Self::BusinessImpact => "businessImpact",
            Self::RootCauseFindings => "rootCauseFindings",
            Self::CorrectiveActions => "correctiveActions",
            Self::PreventativeMeasures => "preventativeMeasures",
        }
    }

    /// Human-readable form label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::IncidentTicketNumber => "Incident Ticket Number",
            Self::TimeDetected => "Time and Date Detected",
            Self::TimeRecorded => "Time and Date Recorded",
            Self::TimeRestored => "Time and Date Restored",
            Self::AffectedCi => "Affected Configuration Item",
            Self::Severity => "Severity",
            Self::Status => "Status",
            Self::IncidentOwner => "Incident Owner",
            Self::NotDetectedByMonitoringReason => "Reason Not Detected by Monitoring",
            Self::Description => "Description",
            Self::SystemImpact => "System Impact",
            Self::BusinessImpact => "Business Impact",
            Self::RootCauseFindings => "Root Cause Findings",
            Self::CorrectiveActions => "Corrective Actions/Interim Solutions",
            Self::PreventativeMeasures => "Long Term Preventative Measures",
        }
    }

    #[must_use]
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::NotDetectedByMonitoringReason)
    }

    #[must_use]
    pub const fn is_datetime(self) -> bool {
        matches!(
            self,
            Self::TimeDetected | Self::TimeRecorded | Self::TimeRestored
        )
    }

    /// Input hint shown next to the label.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::IncidentTicketNumber => Some("e.g., INC1234567"),
            Self::AffectedCi => Some("e.g., Server_XYZ, App_ABC"),
            Self::TimeDetected | Self::TimeRecorded | Self::TimeRestored => {
                Some("YYYY-MM-DDTHH:MM")
            }
            Self::Severity => Some("P0, P1, P2, P3, P4"),
            Self::Status => Some("Open, Assigned, In Progress, Closed"),
            _ => None,
        }
    }

    const fn required_message(self) -> &'static str {
        match self {
            Self::IncidentTicketNumber => "Incident Ticket Number is required.",
            Self::TimeDetected => "Time and Date Detected is required.",
            Self::TimeRecorded => "Time and Date Recorded is required.",
            Self::TimeRestored => "Time and Date Restored is required.",
            Self::AffectedCi => "Affected Configuration Item is required.",
            Self::Severity => "Severity is required.",
            Self::Status => "Status is required.",
            Self::IncidentOwner => "Incident Owner is required.",
            Self::NotDetectedByMonitoringReason => "",
            Self::Description => "Description is required.",
            Self::SystemImpact => "System Impact is required.",
            Self::BusinessImpact => "Business Impact is required.",
            Self::RootCauseFindings => "Root Cause Findings are required.",
            Self::CorrectiveActions => "Corrective Actions/Interim Solutions are required.",
            Self::PreventativeMeasures => "Long Term Preventative Measures are required.",
        }
    }
}

impl fmt::Display for RcaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FieldError
// ---------------------------------------------------------------------------

/// A single validation failure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FieldError {
    pub field: RcaField,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// ---------------------------------------------------------------------------
// RcaDraft
// ---------------------------------------------------------------------------

/// Raw, unvalidated form input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RcaDraft {
    pub incident_ticket_number: Option<String>,
    pub time_detected: Option<String>,
    pub time_recorded: Option<String>,
    pub time_restored: Option<String>,
    pub affected_ci: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub incident_owner: Option<String>,
    pub not_detected_by_monitoring_reason: Option<String>,
    pub description: Option<String>,
    pub system_impact: Option<String>,
    pub business_impact: Option<String>,
    pub root_cause_findings: Option<String>,
    pub corrective_actions: Option<String>,
    pub preventative_measures: Option<String>,
}

impl RcaDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, field: RcaField) -> &Option<String> {
        match field {
            RcaField::IncidentTicketNumber => &self.incident_ticket_number,
            RcaField::TimeDetected => &self.time_detected,
            RcaField::TimeRecorded => &self.time_recorded,
            RcaField::TimeRestored => &self.time_restored,
            RcaField::AffectedCi => &self.affected_ci,
            RcaField::Severity => &self.severity,
            RcaField::Status => &self.status,
            RcaField::IncidentOwner => &self.incident_owner,
            RcaField::NotDetectedByMonitoringReason => &self.not_detected_by_monitoring_reason,
            RcaField::Description => &self.description,
            RcaField::SystemImpact => &self.system_impact,
            RcaField::BusinessImpact => &self.business_impact,
            RcaField::RootCauseFindings => &self.root_cause_findings,
            RcaField::CorrectiveActions => &self.corrective_actions,
            RcaField::PreventativeMeasures => &self.preventative_measures,
        }
    }

    fn slot_mut(&mut self, field: RcaField) -> &mut Option<String> {
        match field {
            RcaField::IncidentTicketNumber => &mut self.incident_ticket_number,
            RcaField::TimeDetected => &mut self.time_detected,
            RcaField::TimeRecorded => &mut self.time_recorded,
            RcaField::TimeRestored => &mut self.time_restored,
            RcaField::AffectedCi => &mut self.affected_ci,
            RcaField::Severity => &mut self.severity,
            RcaField::Status => &mut self.status,
            RcaField::IncidentOwner => &mut self.incident_owner,
            RcaField::NotDetectedByMonitoringReason => {
                &mut self.not_detected_by_monitoring_reason
            }
            RcaField::Description => &mut self.description,
            RcaField::SystemImpact => &mut self.system_impact,
            RcaField::BusinessImpact => &mut self.business_impact,
            RcaField::RootCauseFindings => &mut self.root_cause_findings,
            RcaField::CorrectiveActions => &mut self.corrective_actions,
            RcaField::PreventativeMeasures => &mut self.preventative_measures,
        }
    }

    #[must_use]
    pub fn get(&self, field: RcaField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: RcaField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    pub fn unset(&mut self, field: RcaField) {
        *self.slot_mut(field) = None;
    }

    /// True when no field holds any input.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        RcaField::ALL.iter().all(|field| self.get(*field).is_none())
    }

    /// Validate every field, collecting all violations.
    ///
    /// # Errors
    ///
    /// Returns every [`FieldError`] found, in form order, when any required
    /// field is missing or blank, a timestamp is malformed, or an enum value
    /// is outside its closed set.
    pub fn validate(&self) -> Result<RcaFormData, Vec<FieldError>> {
        let mut check = Checker {
            draft: self,
            errors: Vec::new(),
        };

        let incident_ticket_number = check.text(RcaField::IncidentTicketNumber);
        let time_detected = check.datetime(RcaField::TimeDetected);
        let time_recorded = check.datetime(RcaField::TimeRecorded);
        let time_restored = check.datetime(RcaField::TimeRestored);
        let affected_ci = check.text(RcaField::AffectedCi);
        let severity = check.parsed::<Severity>(RcaField::Severity);
        let status = check.parsed::<IncidentStatus>(RcaField::Status);
        let incident_owner = check.text(RcaField::IncidentOwner);
        let not_detected_by_monitoring_reason =
            check.optional_text(RcaField::NotDetectedByMonitoringReason);
        let description = check.text(RcaField::Description);
        let system_impact = check.text(RcaField::SystemImpact);
        let business_impact = check.text(RcaField::BusinessImpact);
        let root_cause_findings = check.text(RcaField::RootCauseFindings);
        let corrective_actions = check.text(RcaField::CorrectiveActions);
        let preventative_measures = check.text(RcaField::PreventativeMeasures);

        let (
            Some(incident_ticket_number),
            Some(time_detected),
            Some(time_recorded),
            Some(time_restored),
            Some(affected_ci),
            Some(severity),
            Some(status),
            Some(incident_owner),
            Some(description),
            Some(system_impact),
            Some(business_impact),
            Some(root_cause_findings),
            Some(corrective_actions),
            Some(preventative_measures),
        ) = (
            incident_ticket_number,
            time_detected,
            time_recorded,
            time_restored,
            affected_ci,
            severity,
            status,
            incident_owner,
            description,
            system_impact,
            business_impact,
            root_cause_findings,
            corrective_actions,
            preventative_measures,
        )
        else {
            return Err(check.errors);
        };

        Ok(RcaFormData {
            incident_ticket_number,
            time_detected,
            time_recorded,
            time_restored,
            affected_ci,
            severity,
            status,
            incident_owner,
            not_detected_by_monitoring_reason,
            description,
            system_impact,
            business_impact,
            root_cause_findings,
            corrective_actions,
            preventative_measures,
        })
    }
}

/// Field-by-field validation state. Each accessor records an error and
/// returns `None` on failure so validation never stops early.
struct Checker<'a> {
    draft: &'a RcaDraft,
    errors: Vec<FieldError>,
}

impl Checker<'_> {
    fn present(&mut self, field: RcaField) -> Option<&str> {
        let draft = self.draft;
        match draft.get(field).map(str::trim) {
            Some(value) if !value.is_empty() => Some(value),
            _ => {
                self.errors.push(FieldError {
                    field,
                    message: field.required_message().to_string(),
                });
                None
            }
        }
    }

    fn text(&mut self, field: RcaField) -> Option<String> {
        self.present(field).map(str::to_string)
    }

    fn optional_text(&self, field: RcaField) -> Option<String> {
        self.draft
            .get(field)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn datetime(&mut self, field: RcaField) -> Option<NaiveDateTime> {
        let raw = self.present(field)?.to_string();
        let parsed = parse_datetime(&raw);
        if parsed.is_none() {
            self.errors.push(FieldError {
                field,
                message: format!(
                    "{} must be a date and time (YYYY-MM-DDTHH:MM), got '{raw}'.",
                    field.label()
                ),
            });
        }
        parsed
    }

    fn parsed<T>(&mut self, field: RcaField) -> Option<T>
    where
        T: std::str::FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.present(field)?.to_string();
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors.push(FieldError {
                    field,
                    message: error.to_string(),
                });
                None
            }
        }
    }
}

/// Parse an operator-entered timestamp in any of the accepted layouts.
#[must_use]
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

// ---------------------------------------------------------------------------
// RcaFormData / SubmissionResult
// ---------------------------------------------------------------------------

/// A validated RCA report, ready for submission.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RcaFormData {
    pub incident_ticket_number: String,
    pub time_detected: NaiveDateTime,
    pub time_recorded: NaiveDateTime,
    pub time_restored: NaiveDateTime,
    pub affected_ci: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub incident_owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_detected_by_monitoring_reason: Option<String>,
    pub description: String,
    pub system_impact: String,
    pub business_impact: String,
    pub root_cause_findings: String,
    pub corrective_actions: String,
    pub preventative_measures: String,
}

/// Acknowledgement returned by the submission endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_number: Option<String>,
}
