//! Terminal rendering of transcript entries, notifications and field errors.

use chrono::Local;
use triage_core::enums::Sender;
use triage_core::message::Message;
use triage_core::rca::FieldError;
use triage_session::{Notification, NotificationKind};

use super::TextView;

#[must_use]
pub const fn sender_label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "You",
        Sender::Bot => "Bot",
        Sender::System => "System",
        Sender::Error => "Error",
    }
}

impl TextView for Message {
    /// `Label (HH:MM)` on one line, the body indented below it.
    fn to_text(&self) -> String {
        let time = self.timestamp.with_timezone(&Local).format("%H:%M");
        let body = self
            .text()
            .lines()
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("  {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("{} ({time})\n{body}", sender_label(self.sender))
    }
}

impl TextView for Notification {
    fn to_text(&self) -> String {
        let marker = match self.kind {
            NotificationKind::Info => "*",
            NotificationKind::Destructive => "!",
        };
        format!("[{marker}] {}: {}", self.title, self.description)
    }
}

impl TextView for Vec<FieldError> {
    fn to_text(&self) -> String {
        self.iter()
            .map(|error| format!("  {}: {}", error.field.label(), error.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use triage_core::rca::RcaField;

    use super::*;

    #[rstest]
    #[case(Sender::User, "You")]
    #[case(Sender::Bot, "Bot")]
    #[case(Sender::System, "System")]
    #[case(Sender::Error, "Error")]
    fn labels(#[case] sender: Sender, #[case] label: &str) {
        assert_eq!(sender_label(sender), label);
    }

    #[test]
    fn message_has_label_time_and_indented_body() {
        let message = Message::new("line one\n\nline two", Sender::Bot);
        let text = message.to_text();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("Bot ("));
        assert!(header.ends_with(')'));
        assert_eq!(header.len(), "Bot (HH:MM)".len());
        assert_eq!(lines.collect::<Vec<_>>(), vec!["  line one", "", "  line two"]);
    }

    #[test]
    fn notification_marks_destructive() {
        let note = Notification::destructive("RCA Submission Failed", "Duplicate");
        assert_eq!(note.to_text(), "[!] RCA Submission Failed: Duplicate");
        let info = Notification::info("Analytics", "Soon");
        assert_eq!(info.to_text(), "[*] Analytics: Soon");
    }

    #[test]
    fn field_errors_use_labels() {
        let errors = vec![FieldError {
            field: RcaField::Severity,
            message: "Severity is required.".to_string(),
        }];
        assert_eq!(errors.to_text(), "  Severity: Severity is required.");
    }
}
