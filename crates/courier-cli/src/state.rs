//! Application state for store-backed commands.
//!
//! Pins the generic `MessageStore` to the SQLite repository and keeps the
//! resolved locations around for status output.

use std::path::PathBuf;

use courier_infra::config::resolve_data_dir;
use courier_infra::store::{SqliteMessageStore, open_message_store};
use courier_types::config::Settings;

/// Everything a command needs once the store is open.
pub struct AppState {
    pub store: SqliteMessageStore,
    pub settings: Settings,
    pub data_dir: PathBuf,
    pub config_path: PathBuf,
}

impl AppState {
    /// Open the message store described by `settings`.
    pub async fn init(settings: Settings, config_path: PathBuf) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir(&settings);
        let store = open_message_store(&settings).await?;
        Ok(Self {
            store,
            settings,
            data_dir,
            config_path,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.settings.database_path(&self.data_dir)
    }

    /// Close the database. Consumes the state.
    pub async fn shutdown(self) {
        self.store.shutdown().await;
    }
}
