//! User preference flags

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::flush::{start_save_scheduler, SaveScheduler};
use crate::storage::{keys, KeyValueStorage};

/// Current persisted shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsData {
    haptics_enabled: bool,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            haptics_enabled: true,
        }
    }
}

/// Legacy persist-middleware envelope, `{"state": {...}, "version": 0}`
#[derive(Debug, Deserialize)]
struct SettingsEnvelope {
    state: SettingsData,
}

fn decode_settings(raw: &str) -> SettingsData {
    if let Ok(data) = serde_json::from_str::<SettingsData>(raw) {
        return data;
    }
    if let Ok(envelope) = serde_json::from_str::<SettingsEnvelope>(raw) {
        log::info!("settings decoded via legacy persist envelope");
        return envelope.state;
    }
    log::warn!("discarding malformed settings payload");
    SettingsData::default()
}

/// Owns the user's preference flags. Unlike the word and stats managers,
/// settings change rarely, so writes are staged without a quiet window and
/// land in storage in mutation order.
pub struct SettingsStore {
    storage: Arc<dyn KeyValueStorage>,
    data: SettingsData,
    ready: bool,
    saves: SaveScheduler,
}

impl SettingsStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let saves =
            start_save_scheduler(Arc::clone(&storage), keys::SETTINGS, Duration::ZERO, None);
        Self {
            storage,
            data: SettingsData::default(),
            ready: false,
            saves,
        }
    }

    /// Load persisted flags, accepting the legacy envelope shape. Unreadable
    /// data falls back to defaults; a second call is a no-op.
    pub async fn init(&mut self) {
        if self.ready {
            return;
        }

        match self.storage.get(keys::SETTINGS).await {
            Ok(Some(raw)) => self.data = decode_settings(&raw),
            Ok(None) => {}
            Err(e) => log::warn!("failed to read settings: {} — using defaults", e),
        }
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn haptics_enabled(&self) -> bool {
        self.data.haptics_enabled
    }

    /// Flip the haptics flag, stage a save, and return the new value.
    pub fn toggle_haptics(&mut self) -> bool {
        self.data.haptics_enabled = !self.data.haptics_enabled;
        self.schedule_save();
        self.data.haptics_enabled
    }

    fn schedule_save(&self) {
        match serde_json::to_string(&self.data) {
            Ok(payload) => self.saves.schedule(payload),
            Err(e) => log::error!("failed to serialize settings: {}", e),
        }
    }

    /// Flush any staged write and stop the flush task.
    pub async fn shutdown(&mut self) {
        self.saves.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    async fn make_test_store() -> (SettingsStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = SettingsStore::new(Arc::clone(&storage) as Arc<dyn KeyValueStorage>);
        store.init().await;
        (store, storage)
    }

    #[tokio::test]
    async fn test_haptics_default_to_enabled() {
        let (store, _storage) = make_test_store().await;
        assert!(store.haptics_enabled());
    }

    #[tokio::test]
    async fn test_toggle_flips_and_persists_current_shape() {
        let (mut store, storage) = make_test_store().await;

        assert!(!store.toggle_haptics());
        assert!(!store.haptics_enabled());
        store.shutdown().await;

        assert_eq!(
            storage.get(keys::SETTINGS).await.unwrap(),
            Some("{\"hapticsEnabled\":false}".to_string())
        );

        // A fresh store reads the persisted value back.
        let mut reloaded = SettingsStore::new(Arc::clone(&storage) as Arc<dyn KeyValueStorage>);
        reloaded.init().await;
        assert!(!reloaded.haptics_enabled());
    }

    #[tokio::test]
    async fn test_rapid_toggles_persist_the_final_value() {
        let (mut store, storage) = make_test_store().await;

        store.toggle_haptics();
        store.toggle_haptics();
        store.toggle_haptics();
        store.shutdown().await;

        assert_eq!(
            storage.get(keys::SETTINGS).await.unwrap(),
            Some("{\"hapticsEnabled\":false}".to_string())
        );
    }

    #[tokio::test]
    async fn test_reads_legacy_persist_envelope() {
        let storage = Arc::new(MemoryStorage::new());
        storage.seed(
            keys::SETTINGS,
            "{\"state\":{\"hapticsEnabled\":false},\"version\":0}",
        );

        let mut store = SettingsStore::new(Arc::clone(&storage) as Arc<dyn KeyValueStorage>);
        store.init().await;
        assert!(!store.haptics_enabled());

        // The next write upgrades the stored shape.
        store.toggle_haptics();
        store.shutdown().await;
        assert_eq!(
            storage.get(keys::SETTINGS).await.unwrap(),
            Some("{\"hapticsEnabled\":true}".to_string())
        );
    }

    #[tokio::test]
    async fn test_malformed_settings_fall_back_to_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.seed(keys::SETTINGS, "hapticsEnabled");

        let mut store = SettingsStore::new(Arc::clone(&storage) as Arc<dyn KeyValueStorage>);
        store.init().await;
        assert!(store.haptics_enabled());
        assert!(store.is_ready());
    }

    #[tokio::test]
    async fn test_read_failure_uses_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_fail_reads(true);

        let mut store = SettingsStore::new(Arc::clone(&storage) as Arc<dyn KeyValueStorage>);
        store.init().await;
        assert!(store.haptics_enabled());
    }
}
