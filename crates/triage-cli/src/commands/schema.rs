use schemars::{Schema, schema_for};
use triage_core::chat::{ChatRequest, MinimalReply, RichReply};
use triage_core::message::Message;
use triage_core::rca::{RcaDraft, RcaFormData, SubmissionResult};

use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::cli::{GlobalFlags, OutputFormat};

/// Handle `triage schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = schema_of(args.type_name);
    let rendered = match flags.format {
        OutputFormat::Raw => serde_json::to_string(&schema)?,
        OutputFormat::Text | OutputFormat::Json => serde_json::to_string_pretty(&schema)?,
    };
    println!("{rendered}");
    Ok(())
}

fn schema_of(type_name: SchemaType) -> Schema {
    match type_name {
        SchemaType::ChatRequest => schema_for!(ChatRequest),
        SchemaType::ChatReplyRich => schema_for!(RichReply),
        SchemaType::ChatReplyMinimal => schema_for!(MinimalReply),
        SchemaType::RcaDraft => schema_for!(RcaDraft),
        SchemaType::RcaForm => schema_for!(RcaFormData),
        SchemaType::SubmissionResult => schema_for!(SubmissionResult),
        SchemaType::Message => schema_for!(Message),
    }
}
