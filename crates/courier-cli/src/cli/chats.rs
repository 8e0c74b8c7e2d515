//! Chat list command.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use courier_types::chat::ChatSummary;

use crate::cli::{format_timestamp, truncate};
use crate::state::AppState;

/// List every conversation with its latest message, newest first.
///
/// # Examples
///
/// ```bash
/// courier chats
/// courier chats --json
/// ```
pub fn list_chats(state: &AppState, json: bool) -> Result<()> {
    let chats = state.store.list_chats();

    if json {
        println!("{}", serde_json::to_string_pretty(&chats)?);
        return Ok(());
    }

    if chats.is_empty() {
        println!();
        println!(
            "  {} No conversations yet. Feed some with: {}",
            style("i").blue().bold(),
            style("courier ingest <file>").yellow()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("{}", chats_table(&chats));
    println!();
    println!(
        "  {} conversation{}",
        style(chats.len()).bold(),
        if chats.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

fn chats_table(chats: &[ChatSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Conversation").fg(Color::White),
        Cell::new("Last message").fg(Color::White),
        Cell::new("Time (UTC)").fg(Color::White),
    ]);

    for chat in chats {
        table.add_row(vec![
            Cell::new(chat.conversation_id.as_str()).fg(Color::Cyan),
            Cell::new(truncate(&chat.text, 48)).fg(Color::White),
            Cell::new(format_timestamp(chat.timestamp)).fg(Color::DarkGrey),
        ]);
    }

    table
}
