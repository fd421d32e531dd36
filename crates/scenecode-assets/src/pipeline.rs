//! Per-node asset resolution.
//!
//! Decides for every picture node whether to inline, upload or substitute a
//! placeholder. Failures never escape: each one becomes a placeholder plus a
//! warning.

use std::sync::{Arc, RwLock};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;

use scenecode_core::{
    AssetReference, ExportFormat, ExportSettings, HostExporter, ImageUploadMode, PluginSettings,
    WarningSink,
};
use scenecode_normalize::{IntermediateNode, NodeKind};

use crate::cache::{AssetCache, ImageAsset};
use crate::error::{AssetError, Result};
use crate::uploader::{ImageUploadRequest, ImageUploader};
use crate::visibility::HiddenChildren;

pub const UPLOADED_WARNING: &str = "Images uploaded to external storage";
pub const UPLOAD_FAILED_WARNING: &str = "Failed to upload some images, using placeholders";
pub const EXPORT_FAILED_WARNING: &str = "Failed to export some images, using placeholders";

/// Resolves image and vector assets for intermediate nodes.
pub struct AssetPipeline {
    exporter: Arc<dyn HostExporter>,
    uploader: RwLock<Option<Arc<dyn ImageUploader>>>,
    cache: AssetCache,
    warnings: WarningSink,
}

impl AssetPipeline {
    pub fn new(exporter: Arc<dyn HostExporter>, cache: AssetCache, warnings: WarningSink) -> Self {
        Self {
            exporter,
            uploader: RwLock::new(None),
            cache,
            warnings,
        }
    }

    /// Set the uploader used by upload mode.
    pub fn with_uploader(self, uploader: Arc<dyn ImageUploader>) -> Self {
        self.configure(uploader);
        self
    }

    /// Replace the uploader at runtime.
    pub fn configure(&self, uploader: Arc<dyn ImageUploader>) {
        if let Ok(mut slot) = self.uploader.write() {
            *slot = Some(uploader);
        }
    }

    pub fn is_configured(&self) -> bool {
        self.uploader().is_some_and(|u| u.is_configured())
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    fn uploader(&self) -> Option<Arc<dyn ImageUploader>> {
        self.uploader.read().ok().and_then(|slot| slot.clone())
    }

    /// Resolve assets for every picture node in the trees, depth first.
    pub async fn resolve_tree(&self, nodes: &mut [IntermediateNode], settings: &PluginSettings) {
        let mut paths = Vec::new();
        collect_pictures(nodes, &mut Vec::new(), &mut paths);

        let mut resolved = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(node) = node_at(nodes, &path) else {
                continue;
            };
            let vector_like = match &node.kind {
                NodeKind::Vector(_) | NodeKind::BooleanGroup(_) => true,
                NodeKind::Image(image) => image.flattened,
                _ => false,
            };
            let asset = if vector_like && settings.embed_vectors {
                self.resolve_svg(node).await
            } else {
                self.resolve_asset(node, settings.image_upload_mode).await
            };
            resolved.push((path, asset));
        }

        for (path, asset) in resolved {
            if let Some(node) = node_at_mut(nodes, &path) {
                set_asset(node, asset);
            }
        }
    }

    /// Resolve a raster asset for one node in the given mode.
    pub async fn resolve_asset(&self, node: &IntermediateNode, mode: ImageUploadMode) -> AssetReference {
        let placeholder = AssetReference::placeholder(node.width(), node.height());
        match mode {
            ImageUploadMode::Placeholder => placeholder,
            ImageUploadMode::Embed => match self.export(node, ExportSettings::png()).await {
                Ok(bytes) => AssetReference::InlineBase64 {
                    mime_type: ExportFormat::Png.mime_type().to_string(),
                    data: BASE64.encode(bytes),
                },
                Err(err) => {
                    tracing::warn!(node_id = %node.id, error = %err, "image export failed");
                    self.warnings.add(EXPORT_FAILED_WARNING);
                    placeholder
                }
            },
            ImageUploadMode::Upload => self.upload(node).await.unwrap_or(placeholder),
        }
    }

    /// Export a node as inline SVG markup.
    pub async fn resolve_svg(&self, node: &IntermediateNode) -> AssetReference {
        let exported = self
            .export(node, ExportSettings::svg())
            .await
            .and_then(|bytes| String::from_utf8(bytes).map_err(|_| AssetError::InvalidSvg));
        match exported {
            Ok(svg) => AssetReference::InlineSvg { svg },
            Err(err) => {
                tracing::warn!(node_id = %node.id, error = %err, "vector export failed");
                self.warnings.add(EXPORT_FAILED_WARNING);
                AssetReference::placeholder(node.width(), node.height())
            }
        }
    }

    /// Upload flow. `None` means the caller should use a placeholder.
    async fn upload(&self, node: &IntermediateNode) -> Option<AssetReference> {
        let host_id = node.origin.as_deref()?;
        if let Some(cached) = self.cache.get(host_id) {
            tracing::debug!(node_id = %host_id, "image cache hit");
            return Some(AssetReference::RemoteUrl { url: cached.url });
        }

        let uploader = match self.uploader() {
            Some(uploader) if uploader.is_configured() => uploader,
            _ => {
                tracing::debug!(node_id = %host_id, "image upload not configured");
                return None;
            }
        };

        tracing::debug!(node_id = %host_id, "image cache miss, uploading");
        match self.upload_uncached(node, host_id, uploader.as_ref()).await {
            Ok(url) => {
                self.warnings.add(UPLOADED_WARNING);
                Some(AssetReference::RemoteUrl { url })
            }
            Err(err) => {
                tracing::warn!(node_id = %host_id, error = %err, "image upload failed");
                self.warnings.add(UPLOAD_FAILED_WARNING);
                None
            }
        }
    }

    async fn upload_uncached(
        &self,
        node: &IntermediateNode,
        host_id: &str,
        uploader: &dyn ImageUploader,
    ) -> Result<String> {
        let bytes = self.export(node, ExportSettings::png()).await?;
        let request = ImageUploadRequest {
            node_id: host_id.to_string(),
            node_name: node.name.clone(),
            width: node.width(),
            height: node.height(),
            format: "PNG".to_string(),
            timestamp: Utc::now().timestamp_millis(),
        };
        let slot = uploader.request_upload_url(&request).await?;
        uploader.upload_image(&slot.upload_url, bytes).await?;

        self.cache.insert(ImageAsset {
            node_id: host_id.to_string(),
            url: slot.public_url.clone(),
            width: node.width(),
            height: node.height(),
            uploaded_at: Utc::now(),
        });
        Ok(slot.public_url)
    }

    /// Export a node, hiding its children first when the image excludes them.
    async fn export(&self, node: &IntermediateNode, settings: ExportSettings) -> Result<Vec<u8>> {
        let host_id = node.origin.as_deref().ok_or_else(|| {
            AssetError::Export(scenecode_core::HostError::NodeNotFound(node.id.clone()))
        })?;
        let exclude_children = matches!(&node.kind, NodeKind::Image(image) if image.exclude_children);
        let _hidden = exclude_children.then(|| {
            HiddenChildren::hide(
                self.exporter.as_ref(),
                node.children.iter().filter_map(|c| c.origin.clone()),
            )
        });
        Ok(self.exporter.export_node(host_id, settings).await?)
    }
}

/// Child-index paths of every rendered picture node, depth-first.
fn collect_pictures(nodes: &[IntermediateNode], prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    for (i, node) in nodes.iter().enumerate() {
        prefix.push(i);
        if node.is_picture() {
            out.push(prefix.clone());
        }
        if !node.is_picture() || node.renders_children() {
            collect_pictures(&node.children, prefix, out);
        }
        prefix.pop();
    }
}

fn node_at<'a>(nodes: &'a [IntermediateNode], path: &[usize]) -> Option<&'a IntermediateNode> {
    let (first, rest) = path.split_first()?;
    let mut node = nodes.get(*first)?;
    for i in rest {
        node = node.children.get(*i)?;
    }
    Some(node)
}

fn node_at_mut<'a>(nodes: &'a mut [IntermediateNode], path: &[usize]) -> Option<&'a mut IntermediateNode> {
    let (first, rest) = path.split_first()?;
    let mut node = nodes.get_mut(*first)?;
    for i in rest {
        node = node.children.get_mut(*i)?;
    }
    Some(node)
}

fn set_asset(node: &mut IntermediateNode, asset: AssetReference) {
    match &mut node.kind {
        NodeKind::Image(image) => image.asset = Some(asset),
        NodeKind::Vector(vector) | NodeKind::BooleanGroup(vector) => vector.asset = Some(asset),
        _ => {}
    }
}
