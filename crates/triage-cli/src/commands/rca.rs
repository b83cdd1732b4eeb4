use anyhow::bail;
use serde::Serialize;
use triage_core::rca::{RcaField, RcaFormData};
use triage_session::{Notification, RcaOutcome};

use crate::cli::root_commands::RcaFileArgs;
use crate::cli::{GlobalFlags, RcaCommands};
use crate::commands::shared::parse::read_draft;
use crate::context::AppContext;
use crate::output::{TextView, output};
use crate::progress::Progress;

/// Handle `triage rca`.
pub async fn handle(
    action: &RcaCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        RcaCommands::Validate(args) => validate(args, flags),
        RcaCommands::Submit(args) => submit(args, ctx, flags).await,
    }
}

fn validate(args: &RcaFileArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let draft = read_draft(&args.file)?;
    match draft.validate() {
        Ok(form) => output(&form, flags.format),
        Err(errors) => {
            output(&errors, flags.format)?;
            bail!("{} field(s) failed validation", errors.len())
        }
    }
}

async fn submit(args: &RcaFileArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let draft = read_draft(&args.file)?;

    let mut conversation = ctx.conversation();
    *conversation.open_rca_form()? = draft;

    let spinner = Progress::spinner("Submitting RCA...");
    let outcome = conversation.submit_rca(ctx.submitter.as_ref()).await?;
    spinner.finish_clear();

    let notification = conversation.take_notifications().into_iter().next();
    match outcome {
        RcaOutcome::Logged { ticket } => {
            let report = SubmitReport {
                ticket,
                notification,
                notice: conversation
                    .transcript()
                    .last()
                    .map(|message| message.text())
                    .unwrap_or_default(),
            };
            output(&report, flags.format)
        }
        RcaOutcome::Invalid(errors) => {
            output(&errors, flags.format)?;
            bail!("{} field(s) failed validation", errors.len())
        }
        RcaOutcome::Rejected { reason } => bail!("RCA submission failed: {reason}"),
    }
}

#[derive(Debug, Serialize)]
struct SubmitReport {
    ticket: String,
    notification: Option<Notification>,
    notice: String,
}

impl TextView for SubmitReport {
    fn to_text(&self) -> String {
        match &self.notification {
            Some(notification) => format!("{}\n{}", notification.to_text(), self.notice),
            None => self.notice.clone(),
        }
    }
}

impl TextView for RcaFormData {
    /// One `Label: value` line per field in form order.
    fn to_text(&self) -> String {
        let value = |field: RcaField| -> String {
            match field {
                RcaField::IncidentTicketNumber => self.incident_ticket_number.clone(),
                RcaField::TimeDetected => self.time_detected.format("%Y-%m-%d %H:%M").to_string(),
                RcaField::TimeRecorded => self.time_recorded.format("%Y-%m-%d %H:%M").to_string(),
                RcaField::TimeRestored => self.time_restored.format("%Y-%m-%d %H:%M").to_string(),
                RcaField::AffectedCi => self.affected_ci.clone(),
                RcaField::Severity => self.severity.to_string(),
                RcaField::Status => self.status.to_string(),
                RcaField::IncidentOwner => self.incident_owner.clone(),
                RcaField::NotDetectedByMonitoringReason => self
                    .not_detected_by_monitoring_reason
                    .clone()
                    .unwrap_or_else(|| String::from("-")),
                RcaField::Description => self.description.clone(),
                RcaField::SystemImpact => self.system_impact.clone(),
                RcaField::BusinessImpact => self.business_impact.clone(),
                RcaField::RootCauseFindings => self.root_cause_findings.clone(),
                RcaField::CorrectiveActions => self.corrective_actions.clone(),
                RcaField::PreventativeMeasures => self.preventative_measures.clone(),
            }
        };
        RcaField::ALL
            .iter()
            .map(|field| format!("{}: {}", field.label(), value(*field)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
