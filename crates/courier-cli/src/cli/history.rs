//! Conversation history command.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use courier_types::message::{ConversationId, Message};

use crate::cli::{format_timestamp, truncate};
use crate::state::AppState;

/// Print one conversation's messages in arrival order.
///
/// # Examples
///
/// ```bash
/// courier history 12345@s.whatsapp.net
/// courier history 12345@s.whatsapp.net --json
/// ```
pub fn show_history(state: &AppState, conversation: &str, json: bool) -> Result<()> {
    let conversation_id = ConversationId::parse(conversation)
        .with_context(|| format!("Invalid conversation ID '{conversation}'"))?;
    let messages = state.store.history(&conversation_id);

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!(
            "  {} No messages in '{}'",
            style("i").blue().bold(),
            style(&conversation_id).cyan()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("  History for '{}'", style(&conversation_id).cyan().bold());
    println!();
    println!("{}", history_table(&messages));
    println!();
    println!(
        "  {} message{}",
        style(messages.len()).bold(),
        if messages.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

fn sender_label(message: &Message) -> String {
    if message.metadata.is_from_me {
        return "me".to_string();
    }
    message
        .metadata
        .push_name
        .clone()
        .unwrap_or_else(|| message.metadata.sender.clone())
}

fn history_table(messages: &[Message]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Time (UTC)").fg(Color::White),
        Cell::new("From").fg(Color::White),
        Cell::new("ID").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for message in messages {
        let from_color = if message.metadata.is_from_me {
            Color::Green
        } else {
            Color::Cyan
        };
        table.add_row(vec![
            Cell::new(format_timestamp(message.metadata.unix_seconds())).fg(Color::DarkGrey),
            Cell::new(truncate(&sender_label(message), 24)).fg(from_color),
            Cell::new(message.id()).fg(Color::DarkGrey),
            Cell::new(truncate(&message.payload.preview_text(), 60)).fg(Color::White),
        ]);
    }

    table
}
