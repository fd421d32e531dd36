//! In-memory host for orchestrator tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use scenecode_core::{ExportFormat, ExportSettings, Host, HostError, HostExporter, HostNode, Paint};

#[derive(Default)]
pub(crate) struct TestHost {
    selection: Mutex<Vec<HostNode>>,
    visible: Mutex<HashMap<String, bool>>,
    opened: Mutex<Vec<String>>,
    export_delay: Mutex<Option<Duration>>,
}

impl TestHost {
    pub(crate) fn new(selection: Vec<HostNode>) -> Self {
        Self {
            selection: Mutex::new(selection),
            ..Default::default()
        }
    }

    pub(crate) fn set_export_delay(&self, delay: Duration) {
        *self.export_delay.lock().unwrap() = Some(delay);
    }

    pub(crate) fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostExporter for TestHost {
    async fn export_node(&self, _node_id: &str, settings: ExportSettings) -> Result<Vec<u8>, HostError> {
        let delay = *self.export_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(match settings.format {
            ExportFormat::Svg => b"<svg/>".to_vec(),
            _ => vec![0x89, b'P', b'N', b'G'],
        })
    }

    fn is_visible(&self, node_id: &str) -> Option<bool> {
        Some(*self.visible.lock().unwrap().get(node_id).unwrap_or(&true))
    }

    fn set_visible(&self, node_id: &str, visible: bool) {
        self.visible.lock().unwrap().insert(node_id.to_string(), visible);
    }
}

impl Host for TestHost {
    fn selection(&self) -> Vec<HostNode> {
        self.selection.lock().unwrap().clone()
    }

    fn open_external(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }
}

/// A rectangle filled with an image.
pub(crate) fn image_node(id: &str) -> HostNode {
    HostNode::new(id, "Photo", "RECTANGLE")
        .with_geometry(0.0, 0.0, 120.0, 80.0)
        .with_fill(Paint::image("hash"))
}
