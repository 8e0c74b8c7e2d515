//! Store status command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Display where the store lives, what it holds, and how the load went.
pub fn status(state: &AppState, json: bool) -> Result<()> {
    let stats = state.store.stats();
    let report = state.store.load_report();

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "database": state.database_path().display().to_string(),
            "config": state.config_path.display().to_string(),
            "stats": stats,
            "load": report,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Courier v{}",
        style("✉").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Store ──").dim());
    println!("  Conversations: {}", style(stats.conversations).bold());
    println!("  Messages:      {}", style(stats.messages).bold());
    println!();

    println!("  {}", style("── Last load ──").dim());
    println!("  Loaded:  {}", style(report.loaded).green());
    if report.skipped > 0 {
        println!("  Skipped: {}", style(report.skipped).yellow());
    } else {
        println!("  Skipped: {}", style(0).dim());
    }
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Database: {}", style(state.database_path().display()).dim());
    println!("  Config:   {}", style(state.config_path.display()).dim());
    println!();

    Ok(())
}
