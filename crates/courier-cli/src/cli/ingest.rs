//! JSON-lines ingestion command.
//!
//! Each non-blank input line is one `MessageEvent`. Lines that fail to parse
//! are skipped with a warning so a single bad record never aborts a batch.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use courier_core::repository::message::MessageRepository;
use courier_core::store::MessageStore;
use courier_types::chat::IngestOutcome;
use courier_types::message::MessageEvent;

use crate::state::AppState;

/// Per-batch tally of ingest outcomes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub persisted: usize,
    pub duplicate: usize,
    pub memory_only: usize,
    pub malformed: usize,
}

impl IngestSummary {
    fn record(&mut self, outcome: IngestOutcome) {
        match outcome {
            IngestOutcome::Persisted => self.persisted += 1,
            IngestOutcome::Duplicate => self.duplicate += 1,
            IngestOutcome::MemoryOnly => self.memory_only += 1,
        }
    }
}

/// Ingest events from `input` (a path, or `-` for stdin).
///
/// # Examples
///
/// ```bash
/// courier ingest events.jsonl
/// tail -f events.jsonl | courier ingest -
/// ```
pub async fn ingest(state: &AppState, input: &str, json: bool) -> Result<()> {
    let summary = if input == "-" {
        ingest_lines(&state.store, BufReader::new(tokio::io::stdin())).await?
    } else {
        let file = tokio::fs::File::open(input)
            .await
            .with_context(|| format!("Failed to open '{input}'"))?;
        ingest_lines(&state.store, BufReader::new(file)).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Ingested {} new message{}",
        style("✓").green().bold(),
        style(summary.persisted + summary.memory_only).bold(),
        if summary.persisted + summary.memory_only == 1 { "" } else { "s" }
    );
    if summary.duplicate > 0 {
        println!(
            "    {} duplicate{} ignored",
            summary.duplicate,
            if summary.duplicate == 1 { "" } else { "s" }
        );
    }
    if summary.memory_only > 0 {
        println!(
            "    {} {} not written to disk (see log)",
            style("!").yellow().bold(),
            summary.memory_only
        );
    }
    if summary.malformed > 0 {
        println!(
            "    {} {} malformed line{} skipped",
            style("!").yellow().bold(),
            summary.malformed,
            if summary.malformed == 1 { "" } else { "s" }
        );
    }
    println!();

    Ok(())
}

/// Feed every event from `reader` into `store`, one line at a time.
pub async fn ingest_lines<R, B>(store: &MessageStore<R>, reader: B) -> Result<IngestSummary>
where
    R: MessageRepository,
    B: AsyncBufRead + Unpin,
{
    let mut summary = IngestSummary::default();
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<MessageEvent>(&line) {
            Ok(event) => summary.record(store.ingest(event).await),
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Skipping malformed event");
                summary.malformed += 1;
            }
        }
    }

    tracing::info!(
        persisted = summary.persisted,
        duplicate = summary.duplicate,
        memory_only = summary.memory_only,
        malformed = summary.malformed,
        "Ingest finished"
    );
    Ok(summary)
}
