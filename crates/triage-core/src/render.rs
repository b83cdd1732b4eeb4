//! Render-ready views of chat replies.
//!
//! A [`ReplyView`] is an ordered list of [`Block`]s. Sections whose source
//! text is empty are omitted, and the incidents block only appears when at
//! least one incident was cited.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::chat::{ChatReply, MetadataValue, RichReply, SourceIncident};

pub const SUMMARY_HEADING: &str = "Summary";
pub const RECOMMENDATION_HEADING: &str = "Recommendation";
pub const INCIDENTS_HEADING: &str = "Source Incidents";

/// One display block of a bot reply.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph { text: String },
    Section { heading: String, body: String },
    Incidents { items: Vec<IncidentView> },
}

/// A cited incident with its metadata pre-rendered as pretty JSON.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IncidentView {
    pub content: String,
    pub metadata: Option<String>,
}

/// Render-ready content of a bot message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReplyView {
    pub blocks: Vec<Block>,
}

impl ReplyView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Flatten the view to terminal text. Blocks are separated by a blank
    /// line; a single paragraph renders as its text verbatim.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(render_block)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl From<&ChatReply> for ReplyView {
    fn from(reply: &ChatReply) -> Self {
        match reply {
            ChatReply::Minimal(minimal) => {
                let mut blocks = Vec::new();
                push_paragraph(&mut blocks, &minimal.response);
                Self { blocks }
            }
            ChatReply::Rich(rich) => from_rich(rich),
        }
    }
}

fn from_rich(rich: &RichReply) -> ReplyView {
    let mut blocks = Vec::new();
    push_paragraph(&mut blocks, &rich.full_response);
    push_section(&mut blocks, SUMMARY_HEADING, &rich.summary);
    push_section(&mut blocks, RECOMMENDATION_HEADING, &rich.recommendation);

    if !rich.source_incidents.is_empty() {
        blocks.push(Block::Incidents {
            items: rich.source_incidents.iter().map(incident_view).collect(),
        });
    }

    ReplyView { blocks }
}

fn push_paragraph(blocks: &mut Vec<Block>, text: &str) {
    if !text.is_empty() {
        blocks.push(Block::Paragraph {
            text: text.to_string(),
        });
    }
}

fn push_section(blocks: &mut Vec<Block>, heading: &str, body: &str) {
    if !body.is_empty() {
        blocks.push(Block::Section {
            heading: heading.to_string(),
            body: body.to_string(),
        });
    }
}

fn incident_view(incident: &SourceIncident) -> IncidentView {
    IncidentView {
        content: incident.content.clone(),
        metadata: render_metadata(&incident.metadata),
    }
}

fn render_metadata(metadata: &BTreeMap<String, MetadataValue>) -> Option<String> {
    if metadata.is_empty() {
        return None;
    }
    // Every MetadataValue variant is plain JSON, so serialization cannot fail.
    serde_json::to_string_pretty(metadata).ok()
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Paragraph { text } => text.clone(),
        Block::Section { heading, body } => format!("{heading}:\n{body}"),
        Block::Incidents { items } => {
            let mut out = format!("{INCIDENTS_HEADING}:");
            for item in items {
                out.push_str("\n- Content:\n");
                out.push_str(&indent(&item.content, "  "));
                if let Some(metadata) = &item.metadata {
                    out.push_str("\n  Metadata:\n");
                    out.push_str(&indent(metadata, "    "));
                }
            }
            out
        }
    }
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chat::MinimalReply;

    fn rich(summary: &str, recommendation: &str, incidents: Vec<SourceIncident>) -> ChatReply {
        ChatReply::Rich(RichReply {
            full_response: "F".into(),
            summary: summary.into(),
            recommendation: recommendation.into(),
            source_incidents: incidents,
        })
    }

    #[test]
    fn minimal_reply_renders_text_exactly() {
        let reply = ChatReply::Minimal(MinimalReply {
            response: "ok".into(),
        });
        assert_eq!(ReplyView::from(&reply).to_plain_text(), "ok");
    }

    #[test]
    fn rich_reply_without_incidents_omits_incident_block() {
        let view = ReplyView::from(&rich("S", "R", Vec::new()));
        assert_eq!(
            view.blocks,
            vec![
                Block::Paragraph { text: "F".into() },
                Block::Section {
                    heading: "Summary".into(),
                    body: "S".into()
                },
                Block::Section {
                    heading: "Recommendation".into(),
                    body: "R".into()
                },
            ]
        );
        assert_eq!(view.to_plain_text(), "F\n\nSummary:\nS\n\nRecommendation:\nR");
    }

    #[test]
    fn empty_optional_strings_are_omitted() {
        let incidents = vec![SourceIncident {
            content: "INC0042".into(),
            metadata: BTreeMap::new(),
        }];
        let view = ReplyView::from(&rich("", "", incidents));

        assert_eq!(view.blocks.len(), 2);
        assert_eq!(view.blocks[0], Block::Paragraph { text: "F".into() });
        assert!(matches!(&view.blocks[1], Block::Incidents { items } if items.len() == 1));

        let text = view.to_plain_text();
        assert!(!text.contains("Summary"));
        assert!(!text.contains("Recommendation"));
        assert!(text.contains("Source Incidents:\n- Content:\n  INC0042"));
    }

    #[test]
    fn metadata_renders_as_pretty_json() {
        let mut metadata = BTreeMap::new();
        metadata.insert("ticket".to_string(), MetadataValue::Text("INC0042".into()));
        let view = ReplyView::from(&rich(
            "",
            "",
            vec![SourceIncident {
                content: "c".into(),
                metadata,
            }],
        ));

        let Block::Incidents { items } = &view.blocks[1] else {
            panic!("expected incidents block");
        };
        assert_eq!(
            items[0].metadata.as_deref(),
            Some("{\n  \"ticket\": \"INC0042\"\n}")
        );
        assert!(view.to_plain_text().contains("  Metadata:\n    {"));
    }

    #[test]
    fn empty_minimal_reply_renders_nothing() {
        let reply = ChatReply::Minimal(MinimalReply {
            response: String::new(),
        });
        let view = ReplyView::from(&reply);
        assert!(view.is_empty());
        assert_eq!(view.to_plain_text(), "");
    }
}
