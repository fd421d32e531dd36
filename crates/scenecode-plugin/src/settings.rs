//! Persisted plugin settings.

use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, info};

use scenecode_core::{ClientStorage, PluginSettings, SETTINGS_STORAGE_KEY};

use crate::error::Result;

/// The current settings, mirrored to client storage on every change.
pub struct SettingsStore {
    storage: Arc<dyn ClientStorage>,
    current: RwLock<PluginSettings>,
}

impl SettingsStore {
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self {
            storage,
            current: RwLock::new(PluginSettings::default()),
        }
    }

    pub fn storage(&self) -> &Arc<dyn ClientStorage> {
        &self.storage
    }

    pub fn current(&self) -> PluginSettings {
        self.current.read().map(|s| s.clone()).unwrap_or_default()
    }

    /// Merge the stored blob against the defaults.
    pub async fn load(&self) -> Result<PluginSettings> {
        let stored = self.storage.get(SETTINGS_STORAGE_KEY).await?;
        let settings = PluginSettings::from_stored(stored.as_ref());
        debug!(framework = settings.framework.as_str(), "settings loaded");
        self.replace(settings.clone());
        Ok(settings)
    }

    /// Validate and persist a single-key change. Rejected changes leave
    /// the settings untouched.
    pub async fn change(&self, key: &str, value: Value) -> Result<PluginSettings> {
        let mut updated = self.current();
        updated.apply_change(key, value)?;
        self.storage.set(SETTINGS_STORAGE_KEY, updated.to_value()).await?;
        info!(key, "setting changed");
        self.replace(updated.clone());
        Ok(updated)
    }

    fn replace(&self, settings: PluginSettings) {
        if let Ok(mut current) = self.current.write() {
            *current = settings;
        }
    }
}
