//! HTML preview of the converted selection.

use scenecode_codegen::{CodeGenerator, HtmlGenerator};
use scenecode_core::{Framework, HtmlGenerationMode, PluginSettings};
use scenecode_normalize::IntermediateNode;

use crate::error::Result;
use crate::messages::{HtmlPreview, PreviewSize};

/// `settings` switched to plain HTML output.
pub fn html_settings(settings: &PluginSettings) -> PluginSettings {
    PluginSettings {
        framework: Framework::Html,
        html_generation_mode: HtmlGenerationMode::Html,
        ..settings.clone()
    }
}

/// Top-level nodes stack vertically: the preview is as wide as the widest
/// node and as tall as all of them together.
pub fn preview_size(nodes: &[IntermediateNode]) -> PreviewSize {
    nodes.iter().fold(PreviewSize::default(), |size, node| PreviewSize {
        width: size.width.max(node.width()),
        height: size.height + node.height(),
    })
}

pub fn html_preview(nodes: &[IntermediateNode], settings: &PluginSettings) -> Result<HtmlPreview> {
    let generated = HtmlGenerator::new().generate(nodes, &html_settings(settings))?;
    Ok(HtmlPreview {
        size: preview_size(nodes),
        content: generated.code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenecode_core::{HostNode, WarningSink};
    use scenecode_normalize::normalize;

    fn nodes() -> Vec<IntermediateNode> {
        let hosts = [
            HostNode::new("a", "A", "FRAME").with_geometry(0.0, 0.0, 120.0, 40.0),
            HostNode::new("b", "B", "FRAME").with_geometry(0.0, 0.0, 200.0, 60.0),
        ];
        normalize(&hosts, &PluginSettings::default(), &WarningSink::new())
    }

    #[test]
    fn test_preview_size_stacks_vertically() {
        assert_eq!(
            preview_size(&nodes()),
            PreviewSize {
                width: 200.0,
                height: 100.0
            }
        );
        assert_eq!(preview_size(&[]), PreviewSize::default());
    }

    #[test]
    fn test_preview_is_plain_html() {
        let settings = PluginSettings {
            framework: Framework::Flutter,
            html_generation_mode: HtmlGenerationMode::Jsx,
            ..Default::default()
        };
        let preview = html_preview(&nodes(), &settings).unwrap();
        assert!(preview.content.contains("<div"));
        assert!(!preview.content.contains("className"));
        assert!(!preview.content.contains("Widget"));
    }
}
