//! Scoped child hiding for isolated exports.

use scenecode_core::HostExporter;

/// Hides a set of nodes and restores their previous visibility on drop.
///
/// Restoration runs on every exit path: normal return, `?` propagation and
/// unwinding.
pub struct HiddenChildren<'a> {
    exporter: &'a dyn HostExporter,
    restore: Vec<(String, bool)>,
}

impl<'a> HiddenChildren<'a> {
    /// Hide every listed node the host knows about.
    pub fn hide<I, S>(exporter: &'a dyn HostExporter, node_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut restore = Vec::new();
        for id in node_ids {
            let id = id.into();
            if let Some(visible) = exporter.is_visible(&id) {
                exporter.set_visible(&id, false);
                restore.push((id, visible));
            }
        }
        Self { exporter, restore }
    }

    /// Number of nodes this guard will restore.
    pub fn len(&self) -> usize {
        self.restore.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restore.is_empty()
    }
}

impl Drop for HiddenChildren<'_> {
    fn drop(&mut self) {
        for (id, visible) in self.restore.drain(..).rev() {
            self.exporter.set_visible(&id, visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scenecode_core::{ExportSettings, HostError};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct VisibilityHost {
        visible: Mutex<HashMap<String, bool>>,
    }

    #[async_trait]
    impl HostExporter for VisibilityHost {
        async fn export_node(&self, _node_id: &str, _settings: ExportSettings) -> Result<Vec<u8>, HostError> {
            Ok(Vec::new())
        }

        fn is_visible(&self, node_id: &str) -> Option<bool> {
            self.visible.lock().unwrap().get(node_id).copied()
        }

        fn set_visible(&self, node_id: &str, visible: bool) {
            self.visible.lock().unwrap().insert(node_id.to_string(), visible);
        }
    }

    #[test]
    fn test_restores_original_visibility() {
        let host = VisibilityHost::default();
        host.set_visible("a", true);
        host.set_visible("b", false);
        {
            let guard = HiddenChildren::hide(&host, ["a", "b", "missing"]);
            assert_eq!(guard.len(), 2);
            assert_eq!(host.is_visible("a"), Some(false));
        }
        assert_eq!(host.is_visible("a"), Some(true));
        assert_eq!(host.is_visible("b"), Some(false));
        assert_eq!(host.is_visible("missing"), None);
    }

    #[test]
    fn test_restores_on_early_return() {
        fn failing(host: &VisibilityHost) -> Result<(), &'static str> {
            let _guard = HiddenChildren::hide(host, ["a"]);
            let export: Result<(), &str> = Err("export failed");
            export?;
            Ok(())
        }
        let host = VisibilityHost::default();
        host.set_visible("a", true);
        assert!(failing(&host).is_err());
        assert_eq!(host.is_visible("a"), Some(true));
    }
}
