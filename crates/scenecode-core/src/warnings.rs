//! Session-scoped sink for user-facing conversion warnings.
//!
//! Node- and asset-level failures never abort a run; they are recorded here
//! and drained by the orchestrator into the outbound `code` message. The sink
//! is explicitly cleared at the start of every run.

use std::sync::{Arc, Mutex};

use indexmap::IndexSet;

/// A deduplicating, insertion-ordered warning collector.
#[derive(Debug, Clone, Default)]
pub struct WarningSink {
    inner: Arc<Mutex<IndexSet<String>>>,
}

impl WarningSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning. Duplicates keep their first position.
    pub fn add(&self, warning: impl Into<String>) {
        let warning = warning.into();
        tracing::debug!(%warning, "conversion warning");
        if let Ok(mut set) = self.inner.lock() {
            set.insert(warning);
        }
    }

    /// Remove all recorded warnings.
    pub fn clear(&self) {
        if let Ok(mut set) = self.inner.lock() {
            set.clear();
        }
    }

    /// Current warnings in insertion order.
    pub fn snapshot(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Take all warnings, leaving the sink empty.
    pub fn drain(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|mut set| set.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|set| set.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
