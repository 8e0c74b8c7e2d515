//! Settings file loader for Courier.
//!
//! Reads `config.toml` (by default `~/.courier/config.toml`) into
//! [`Settings`]. A missing file yields defaults; a file that exists but cannot
//! be read or parsed is an error, since silently ignoring it would point the
//! store at the wrong database.

use std::path::{Path, PathBuf};

use courier_types::config::{ENV_DATA_DIR, Settings};
use courier_types::error::ConfigError;

const DATA_DIR_NAME: &str = ".courier";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Load settings from `path`.
pub async fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            });
        }
    };

    toml::from_str::<Settings>(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Load settings from `path`, then apply `COURIER_*` environment overrides.
pub async fn load_effective_settings(path: &Path) -> Result<Settings, ConfigError> {
    let mut settings = load_settings(path).await?;
    for name in settings.apply_env(|key| std::env::var(key).ok()) {
        tracing::warn!(variable = name, "Ignoring unparsable environment override");
    }
    Ok(settings)
}

/// Write settings as TOML, creating the parent directory if needed.
pub async fn save_settings(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let content =
        toml::to_string_pretty(settings).map_err(|e| ConfigError::Serialize(e.to_string()))?;

    let write_err = |source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    tokio::fs::write(path, content).await.map_err(write_err)?;

    tracing::debug!("Wrote settings to {}", path.display());
    Ok(())
}

/// Resolve the data directory.
///
/// Priority:
/// 1. `data_dir` from settings (already merged with `COURIER_DATA_DIR`)
/// 2. `~/.courier`
/// 3. `.courier` in the current directory
pub fn resolve_data_dir(settings: &Settings) -> PathBuf {
    if let Some(dir) = &settings.data_dir {
        return dir.clone();
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(DATA_DIR_NAME);
    }

    PathBuf::from(DATA_DIR_NAME)
}

/// Default settings file location.
///
/// Honors `COURIER_DATA_DIR` so the config file lives next to the database
/// it describes.
pub fn default_config_path() -> PathBuf {
    let data_dir = std::env::var(ENV_DATA_DIR)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);

    let settings = Settings {
        data_dir,
        ..Settings::default()
    };
    resolve_data_dir(&settings).join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_settings_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let settings = load_settings(&tmp.path().join("config.toml")).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn load_settings_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
database_file = "chats.db"
log_level = "debug"
"#,
        )
        .await
        .unwrap();

        let settings = load_settings(&config_path).await.unwrap();
        assert_eq!(settings.database_file, "chats.db");
        assert_eq!(settings.log_level, "debug");
        assert!(settings.data_dir.is_none());
    }

    #[tokio::test]
    async fn load_settings_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let err = load_settings(&config_path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn load_settings_directory_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_settings(tmp.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn save_then_load_settings() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("nested").join("config.toml");
        let settings = Settings {
            data_dir: Some(tmp.path().join("data")),
            database_file: "archive.db".to_string(),
            log_level: "info".to_string(),
            enable_otel: true,
        };

        save_settings(&config_path, &settings).await.unwrap();
        let loaded = load_settings(&config_path).await.unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn resolve_data_dir_prefers_settings() {
        let settings = Settings {
            data_dir: Some(PathBuf::from("/srv/courier")),
            ..Settings::default()
        };
        assert_eq!(resolve_data_dir(&settings), PathBuf::from("/srv/courier"));
    }

    #[test]
    fn resolve_data_dir_falls_back_to_dot_courier() {
        let dir = resolve_data_dir(&Settings::default());
        assert!(dir.ends_with(DATA_DIR_NAME));
    }
}
