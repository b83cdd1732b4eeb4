use std::path::Path;

use anyhow::Context;
use triage_core::rca::RcaDraft;

/// Parse an RCA draft from JSON. Keys are the camelCase payload names;
/// absent keys stay unset.
pub fn parse_draft(raw: &str) -> anyhow::Result<RcaDraft> {
    serde_json::from_str(raw).context("invalid RCA draft JSON")
}

/// Read and parse an RCA draft file.
pub fn read_draft(path: &Path) -> anyhow::Result<RcaDraft> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read RCA draft at {}", path.display()))?;
    parse_draft(&raw)
}
