use anyhow::bail;
use triage_core::enums::Sender;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AskArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::{Progress, THINKING};

/// Handle `triage ask`.
pub async fn handle(args: &AskArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut conversation = ctx.conversation();

    let spinner = Progress::spinner(THINKING);
    let message = conversation.send(&ctx.chat, &args.text()).await?;
    spinner.finish_clear();

    if message.sender == Sender::Error {
        bail!("{}", message.text());
    }
    output(message, flags.format)
}
