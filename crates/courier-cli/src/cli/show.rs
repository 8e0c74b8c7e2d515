//! Single message lookup command.

use anyhow::{Context, Result};
use console::style;

use courier_types::message::{ConversationId, Message, MessageId, MessagePayload};

use crate::state::AppState;

/// Print one message in full. A missing message is reported, not an error.
///
/// # Examples
///
/// ```bash
/// courier show 12345@s.whatsapp.net 3EB0C431C26A1916
/// ```
pub fn show_message(
    state: &AppState,
    conversation: &str,
    message_id: &str,
    json: bool,
) -> Result<()> {
    let conversation_id = ConversationId::parse(conversation)
        .with_context(|| format!("Invalid conversation ID '{conversation}'"))?;
    let id = MessageId::parse(message_id)
        .with_context(|| format!("Invalid message ID '{message_id}'"))?;

    let found = state.store.message(&conversation_id, &id);

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    match found {
        Some(message) => print_message(&message),
        None => {
            println!();
            println!(
                "  {} Message '{}' not found in '{}'",
                style("✗").red(),
                style(&id).yellow(),
                style(&conversation_id).cyan()
            );
            println!();
        }
    }

    Ok(())
}

fn print_message(message: &Message) {
    let meta = &message.metadata;

    println!();
    println!("  {}", style("── Message ──").dim());
    println!("  ID:           {}", style(&meta.id).bold());
    println!("  Conversation: {}", style(&meta.conversation_id).cyan());
    println!("  From:         {}", meta.sender);
    if let Some(name) = &meta.push_name {
        println!("  Name:         {name}");
    }
    println!(
        "  Sent:         {}",
        meta.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if meta.is_from_me {
        println!("  Direction:    {}", style("outgoing").green());
    }
    if meta.is_group {
        println!("  Group:        yes");
    }
    if let Some(edited) = &meta.edit_of {
        println!("  Edit of:      {edited}");
    }
    println!();

    println!("  {}", style("── Content ──").dim());
    println!("  Type:         {}", message.payload.kind());
    for (label, value) in detail_lines(&message.payload) {
        println!("  {label:<13} {value}");
    }
    println!();
    println!("  {}", message.payload.preview_text());
    println!();
}

/// Kind-specific fields worth showing beyond the preview text.
fn detail_lines(payload: &MessagePayload) -> Vec<(&'static str, String)> {
    let mut lines = Vec::new();
    match payload {
        MessagePayload::ExtendedText(ext) => {
            if let Some(url) = &ext.canonical_url {
                lines.push(("Link:", url.clone()));
            }
            if let Some(ctx) = &ext.context {
                lines.push(("Reply to:", ctx.stanza_id.clone()));
            }
        }
        MessagePayload::Image(img) => {
            lines.push(("MIME:", img.mime_type.clone()));
            lines.push(("Size:", format!("{}x{}", img.width, img.height)));
        }
        MessagePayload::Video(vid) => {
            lines.push(("MIME:", vid.mime_type.clone()));
            lines.push(("Duration:", format!("{}s", vid.seconds)));
        }
        MessagePayload::Audio(aud) => {
            lines.push(("MIME:", aud.mime_type.clone()));
            lines.push(("Duration:", format!("{}s", aud.seconds)));
            if aud.voice_note {
                lines.push(("Voice note:", "yes".to_string()));
            }
        }
        MessagePayload::Document(doc) => {
            lines.push(("MIME:", doc.mime_type.clone()));
            if let Some(name) = &doc.file_name {
                lines.push(("File:", name.clone()));
            }
            if let Some(pages) = doc.page_count {
                lines.push(("Pages:", pages.to_string()));
            }
        }
        MessagePayload::Sticker(st) if st.animated => {
            lines.push(("Animated:", "yes".to_string()));
        }
        MessagePayload::Unsupported { kind } => {
            lines.push(("Original:", kind.clone()));
        }
        MessagePayload::Text { .. } | MessagePayload::Sticker(_) => {}
    }
    lines
}
