//! Settings file commands: show, init.

use std::path::Path;

use anyhow::{Context, Result, bail};
use console::style;

use courier_infra::config::{resolve_data_dir, save_settings};
use courier_types::config::Settings;

/// Print the effective settings and the paths they resolve to.
pub fn show_config(settings: &Settings, config_path: &Path, json: bool) -> Result<()> {
    let data_dir = resolve_data_dir(settings);

    if json {
        let out = serde_json::json!({
            "config_file": config_path.display().to_string(),
            "config_file_exists": config_path.exists(),
            "data_dir": data_dir.display().to_string(),
            "database": settings.database_path(&data_dir).display().to_string(),
            "settings": settings,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let rendered = toml::to_string_pretty(settings).context("Failed to render settings")?;

    println!();
    println!(
        "  {} {}{}",
        style("Config file:").dim(),
        config_path.display(),
        if config_path.exists() {
            String::new()
        } else {
            format!(" {}", style("(not found, using defaults)").yellow())
        }
    );
    println!(
        "  {} {}",
        style("Database:   ").dim(),
        settings.database_path(&data_dir).display()
    );
    println!();
    for line in rendered.lines() {
        println!("  {line}");
    }
    println!();

    Ok(())
}

/// Write a default settings file at `config_path`.
pub async fn init_config(config_path: &Path, force: bool, json: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    save_settings(config_path, &Settings::default()).await?;

    if json {
        let out = serde_json::json!({ "written": config_path.display().to_string() });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        println!(
            "  {} Wrote default settings to {}",
            style("✓").green().bold(),
            style(config_path.display()).cyan()
        );
        println!();
    }

    Ok(())
}
