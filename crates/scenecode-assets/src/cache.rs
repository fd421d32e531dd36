//! Session-scoped upload cache keyed by host node id.
//!
//! Entries live until [`AssetCache::clear`] or the end of the session.
//! Editing a node does not invalidate its entry; a stale image after an
//! edit is accepted behaviour.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    pub node_id: String,
    pub url: String,
    pub width: f64,
    pub height: f64,
    pub uploaded_at: DateTime<Utc>,
}

/// Shared upload cache. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct AssetCache {
    entries: Arc<Mutex<HashMap<String, ImageAsset>>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node_id: &str) -> Option<ImageAsset> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(node_id).cloned())
    }

    pub fn insert(&self, asset: ImageAsset) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(asset.node_id.clone(), asset);
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            tracing::debug!(entries = entries.len(), "clearing image upload cache");
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<ImageAsset> {
        let mut all: Vec<ImageAsset> = self
            .entries
            .lock()
            .map(|e| e.values().cloned().collect())
            .unwrap_or_default();
        all.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at).then(a.node_id.cmp(&b.node_id)));
        all
    }
}
