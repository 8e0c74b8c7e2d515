//! Settings types for Courier.
//!
//! `Settings` represents the `config.toml` that locates the message database
//! and controls logging. Every field has a default, and each field has exactly
//! one environment variable that overrides it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const ENV_DATA_DIR: &str = "COURIER_DATA_DIR";
pub const ENV_DATABASE_FILE: &str = "COURIER_DATABASE_FILE";
pub const ENV_LOG_LEVEL: &str = "COURIER_LOG_LEVEL";
pub const ENV_ENABLE_OTEL: &str = "COURIER_ENABLE_OTEL";

/// Top-level settings for the message store and its tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the database. `None` means `~/.courier`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Database file name inside the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Default tracing filter when neither `RUST_LOG` nor CLI flags set one.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub enable_otel: bool,
}

fn default_database_file() -> String {
    "messages.db".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            database_file: default_database_file(),
            log_level: default_log_level(),
            enable_otel: false,
        }
    }
}

impl Settings {
    /// Override fields from environment variables.
    ///
    /// `lookup` is usually `|k| std::env::var(k).ok()`. Returns the names of
    /// variables that were set but could not be parsed; those are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Vec<&'static str>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ignored = Vec::new();

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(file) = lookup(ENV_DATABASE_FILE).filter(|v| !v.is_empty()) {
            self.database_file = file;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
            self.log_level = level;
        }
        if let Some(raw) = lookup(ENV_ENABLE_OTEL) {
            match parse_bool(&raw) {
                Some(value) => self.enable_otel = value,
                None => ignored.push(ENV_ENABLE_OTEL),
            }
        }

        ignored
    }

    /// Full path of the database file inside `data_dir`.
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.database_file)
    }

    /// sqlx connection URL for the database file, created on first open.
    pub fn database_url(&self, data_dir: &Path) -> String {
        format!("sqlite://{}?mode=rwc", self.database_path(data_dir).display())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
