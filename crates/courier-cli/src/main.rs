//! Courier CLI entry point.
//!
//! Binary name: `courier`
//!
//! Loads settings, initializes tracing, opens the message store, then
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use courier_infra::config::{default_config_path, load_effective_settings};
use courier_observe::tracing_setup::{init_tracing, resolve_filter, shutdown_tracing};

use cli::{Cli, Commands, ConfigCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need settings or the store
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "courier", &mut std::io::stdout());
        return Ok(());
    }

    let config_path = cli.config_path.clone().unwrap_or_else(default_config_path);
    let settings = load_effective_settings(&config_path).await?;

    // Verbosity flags decide; without them RUST_LOG, then the configured level
    let flag_filter = match cli.verbose {
        0 if cli.quiet => Some("error"),
        0 => None,
        1 => Some("info,courier_core=debug,courier_infra=debug"),
        _ => Some("trace"),
    };
    let filter = resolve_filter(
        flag_filter,
        std::env::var("RUST_LOG").ok(),
        &settings.log_level,
    );
    init_tracing(&filter, settings.enable_otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli, settings, config_path).await;
    shutdown_tracing();
    result
}

async fn run(
    cli: Cli,
    settings: courier_types::config::Settings,
    config_path: std::path::PathBuf,
) -> anyhow::Result<()> {
    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigCommand::Show => cli::config::show_config(&settings, &config_path, cli.json),
            ConfigCommand::Init { force } => {
                cli::config::init_config(&config_path, *force, cli.json).await
            }
        };
    }

    let state = AppState::init(settings, config_path).await?;

    let result = match &cli.command {
        Commands::Chats => cli::chats::list_chats(&state, cli.json),
        Commands::History { conversation } => {
            cli::history::show_history(&state, conversation, cli.json)
        }
        Commands::Show {
            conversation,
            message_id,
        } => cli::show::show_message(&state, conversation, message_id, cli.json),
        Commands::Ingest { input } => cli::ingest::ingest(&state, input, cli.json).await,
        Commands::Status => cli::status::status(&state, cli.json),
        Commands::Config { .. } | Commands::Completions { .. } => {
            unreachable!("handled before the store is opened")
        }
    };

    state.shutdown().await;
    result
}
