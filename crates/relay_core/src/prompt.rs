//! crates/relay_core/src/prompt.rs
//!
//! Builds the message sequence sent to the completion service.

use crate::domain::{AttachmentDescriptor, ChatMessage};

pub const SYSTEM_INSTRUCTIONS: &str = "You are a helpful assistant. Keep answers concise and to the point. \
The user may reference attached files by name, type and URL. You cannot open or view those files; \
unless their extracted text is included in the message, say plainly that you cannot see the attachment contents.";

pub const ATTACHMENT_NOTE: &str =
    "Note: you may not be able to access the contents of these attachments directly.";

/// Builds the user message body: the raw text, then an `Attachments:` section when
/// there is anything attached.
pub fn compose_user_content(text: Option<&str>, attachments: &[AttachmentDescriptor]) -> String {
    let mut content = text.unwrap_or_default().to_string();
    if attachments.is_empty() {
        return content;
    }

    let lines: Vec<String> = attachments
        .iter()
        .enumerate()
        .map(|(i, a)| attachment_line(i + 1, a))
        .collect();

    content.push_str("\n\nAttachments:\n");
    content.push_str(&lines.join("\n"));
    content.push_str("\n\n");
    content.push_str(ATTACHMENT_NOTE);
    content
}

fn attachment_line(index: usize, attachment: &AttachmentDescriptor) -> String {
    format!(
        "{}. {} ({}) - {}",
        index,
        or_fallback(attachment.name.as_deref(), "file"),
        or_fallback(attachment.mime_type.as_deref(), "unknown"),
        or_fallback(attachment.url.as_deref(), "no-url"),
    )
}

// Empty strings count as missing, same as in `ChatRequest::is_empty`.
fn or_fallback<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(fallback)
}

/// System instruction first, composed user message second.
pub fn build_messages(text: Option<&str>, attachments: &[AttachmentDescriptor]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_INSTRUCTIONS),
        ChatMessage::user(compose_user_content(text, attachments)),
    ]
}
