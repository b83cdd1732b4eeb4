//! `triage chat`: the interactive session.
//!
//! Lines starting with `/` are commands; anything else is sent as a query.
//! In `text` format new transcript entries are printed as they appear; in
//! `json`/`raw` format every entry (including the operator's own messages)
//! is emitted as one JSON document per line and no prompts are written.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use triage_client::{ChatBackend, RcaSubmitter};
use triage_core::enums::Sender;
use triage_core::message::Message;
use triage_core::rca::RcaField;
use triage_session::{Conversation, RcaOutcome};

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::TextView;
use crate::progress::{Progress, THINKING};

const HELP: &str = "\
Commands:
  /rca        open the RCA form (type /cancel at any prompt to discard)
  /analytics  analytics overview
  /help       show this help
  /quit       end the session
Anything else is sent to the assistant.";

const CANCEL: &str = "/cancel";

/// Handle `triage chat`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut repl = Repl::new(ctx.conversation(), stdin, std::io::stdout(), flags.format);
    repl.run(&ctx.chat, ctx.submitter.as_ref()).await
}

// ---------------------------------------------------------------------------
// Line commands
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Rca,
    Analytics,
    Help,
    Quit,
    Empty,
    Unknown(&'a str),
    Query(&'a str),
}

impl<'a> ReplCommand<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line {
            "" => Self::Empty,
            "/rca" => Self::Rca,
            "/analytics" => Self::Analytics,
            "/help" | "/?" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            cmd if cmd.starts_with('/') => Self::Unknown(cmd),
            query => Self::Query(query),
        }
    }
}

// ---------------------------------------------------------------------------
// REPL
// ---------------------------------------------------------------------------

struct Repl<R, W> {
    conversation: Conversation,
    lines: Lines<R>,
    out: W,
    format: OutputFormat,
    last_shown: Option<String>,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    fn new(conversation: Conversation, input: R, out: W, format: OutputFormat) -> Self {
        Self {
            conversation,
            lines: input.lines(),
            out,
            format,
            last_shown: None,
        }
    }

    async fn run(
        &mut self,
        backend: &dyn ChatBackend,
        submitter: &dyn RcaSubmitter,
    ) -> anyhow::Result<()> {
        self.conversation.initialize();
        self.flush_transcript()?;
        self.say("Type /help for commands.")?;

        while let Some(line) = self.prompt("> ").await? {
            match ReplCommand::parse(&line) {
                ReplCommand::Empty => {}
                ReplCommand::Quit => break,
                ReplCommand::Help => self.say(HELP)?,
                ReplCommand::Analytics => {
                    self.conversation.analytics();
                    self.flush_notifications()?;
                }
                ReplCommand::Rca => self.rca_dialog(submitter).await?,
                ReplCommand::Unknown(cmd) => {
                    self.say(&format!("Unknown command {cmd}. Type /help for commands."))?;
                }
                ReplCommand::Query(query) => {
                    let spinner = Progress::spinner(THINKING);
                    let sent = self.conversation.send(backend, query).await.map(|_| ());
                    spinner.finish_clear();
                    if let Err(error) = sent {
                        self.say(&error.to_string())?;
                    }
                    self.flush_transcript()?;
                }
            }
        }

        tracing::debug!(
            messages = self.conversation.transcript().len(),
            "chat session ended"
        );
        Ok(())
    }

    /// Walk the operator through the RCA form until it is submitted or
    /// discarded. Failed submissions re-prompt only what needs fixing.
    async fn rca_dialog(&mut self, submitter: &dyn RcaSubmitter) -> anyhow::Result<()> {
        if let Err(error) = self.conversation.open_rca_form() {
            return self.say(&error.to_string());
        }
        self.say("RCA form. Press Enter to keep a field as is; /cancel discards the form.")?;

        let mut pending = RcaField::ALL.to_vec();
        loop {
            for field in std::mem::take(&mut pending) {
                let current = self
                    .conversation
                    .draft()
                    .and_then(|draft| draft.get(field))
                    .map(str::to_string);
                let Some(input) = self.prompt(&field_prompt(field, current.as_deref())).await?
                else {
                    return self.discard_rca();
                };
                let input = input.trim();
                if input == CANCEL {
                    return self.discard_rca();
                }
                if !input.is_empty() {
                    self.conversation.draft_mut()?.set(field, input);
                }
            }

            let spinner = Progress::spinner("Submitting RCA...");
            let outcome = self.conversation.submit_rca(submitter).await?;
            spinner.finish_clear();
            self.flush_notifications()?;

            match outcome {
                RcaOutcome::Logged { .. } => return self.flush_transcript(),
                RcaOutcome::Invalid(errors) => {
                    self.say(&errors.to_text())?;
                    pending = errors.iter().map(|error| error.field).collect();
                    pending.dedup();
                }
                RcaOutcome::Rejected { .. } => {
                    let Some(answer) = self
                        .prompt("Press Enter to resubmit, or /cancel to discard: ")
                        .await?
                    else {
                        return self.discard_rca();
                    };
                    if answer.trim() == CANCEL {
                        return self.discard_rca();
                    }
                }
            }
        }
    }

    fn discard_rca(&mut self) -> anyhow::Result<()> {
        self.conversation.cancel_rca()?;
        self.say("RCA form discarded.")
    }

    /// Print a prompt (text format only) and read one line. `None` at EOF.
    async fn prompt(&mut self, text: &str) -> anyhow::Result<Option<String>> {
        if self.format == OutputFormat::Text {
            write!(self.out, "{text}")?;
            self.out.flush()?;
        }
        Ok(self.lines.next_line().await?)
    }

    /// Operator-facing text that is not part of the transcript.
    fn say(&mut self, text: &str) -> anyhow::Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.out, "{text}")?;
        }
        Ok(())
    }

    fn flush_notifications(&mut self) -> anyhow::Result<()> {
        for notification in self.conversation.take_notifications() {
            match self.format {
                OutputFormat::Text => writeln!(self.out, "{}", notification.to_text())?,
                OutputFormat::Json | OutputFormat::Raw => {
                    writeln!(self.out, "{}", serde_json::to_string(&notification)?)?;
                }
            }
        }
        Ok(())
    }

    /// Print transcript entries added since the last flush. A reset
    /// transcript is printed from the start.
    fn flush_transcript(&mut self) -> anyhow::Result<()> {
        let messages = self.conversation.transcript().messages();
        let start = self
            .last_shown
            .as_deref()
            .and_then(|id| messages.iter().position(|m| m.id == id))
            .map_or(0, |index| index + 1);

        for message in &messages[start..] {
            write_message(&mut self.out, self.format, message)?;
        }
        if let Some(last) = messages.last() {
            self.last_shown = Some(last.id.clone());
        }
        Ok(())
    }
}

fn write_message(
    out: &mut impl Write,
    format: OutputFormat,
    message: &Message,
) -> anyhow::Result<()> {
    match format {
        // The operator already sees what they typed.
        OutputFormat::Text if message.sender == Sender::User => {}
        OutputFormat::Text => writeln!(out, "{}\n", message.to_text())?,
        OutputFormat::Json | OutputFormat::Raw => {
            writeln!(out, "{}", serde_json::to_string(message)?)?;
        }
    }
    Ok(())
}

fn field_prompt(field: RcaField, current: Option<&str>) -> String {
    let mut prompt = String::from(field.label());
    if !field.is_required() {
        prompt.push_str(" (optional)");
    }
    if let Some(hint) = field.hint() {
        prompt.push_str(&format!(" <{hint}>"));
    }
    if let Some(current) = current {
        prompt.push_str(&format!(" [{current}]"));
    }
    prompt.push_str(": ");
    prompt
}
