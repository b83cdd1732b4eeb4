use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Start an interactive incident-analysis session.
    Chat,
    /// Send a single query and print the reply.
    Ask(AskArgs),
    /// Root cause analysis reports.
    Rca {
        #[command(subcommand)]
        action: RcaCommands,
    },
    /// Print the JSON Schema of a wire type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct AskArgs {
    /// Question for the assistant.
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl AskArgs {
    /// Words joined back into a single query.
    #[must_use]
    pub fn text(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Clone, Debug, Subcommand)]
pub enum RcaCommands {
    /// Validate an RCA draft and list every field error.
    Validate(RcaFileArgs),
    /// Validate and submit an RCA draft.
    Submit(RcaFileArgs),
}

#[derive(Clone, Debug, Args)]
pub struct RcaFileArgs {
    /// JSON file holding the draft (camelCase field names).
    #[arg(short = 'F', long)]
    pub file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    #[arg(value_enum)]
    pub type_name: SchemaType,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    ChatRequest,
    ChatReplyRich,
    ChatReplyMinimal,
    RcaDraft,
    RcaForm,
    SubmissionResult,
    Message,
}
