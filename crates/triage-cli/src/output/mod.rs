use serde::Serialize;

use crate::cli::OutputFormat;

pub mod transcript;

/// Terminal rendering for `--format text`.
pub trait TextView {
    fn to_text(&self) -> String;
}

/// Render a response to a string in the requested format.
pub fn render<T: Serialize + TextView>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(value.to_text()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a response in the requested format.
pub fn output<T: Serialize + TextView>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}
