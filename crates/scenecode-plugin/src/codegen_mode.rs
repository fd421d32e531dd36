//! Code blocks for the host's inspect panel.

use serde::{Deserialize, Serialize};

use scenecode_codegen::{generate_code, retrieve_colors};
use scenecode_core::{
    FlutterGenerationMode, Framework, HtmlGenerationMode, PluginSettings, SwiftUiGenerationMode,
    TailwindGenerationMode,
};
use scenecode_normalize::IntermediateNode;
use scenecode_style::SolidColorConversion;

use crate::error::Result;

/// Syntax highlighting of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockLanguage {
    Html,
    Javascript,
    Swift,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodegenBlock {
    pub title: String,
    pub code: String,
    pub language: BlockLanguage,
}

impl CodegenBlock {
    fn new(title: &str, code: String, language: BlockLanguage) -> Self {
        Self {
            title: title.to_string(),
            code,
            language,
        }
    }
}

/// Languages the panel can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelLanguage {
    Html(HtmlGenerationMode),
    Tailwind(TailwindGenerationMode),
    Flutter,
    SwiftUi,
}

impl PanelLanguage {
    pub fn parse(language: &str) -> Option<Self> {
        Some(match language {
            "html" => PanelLanguage::Html(HtmlGenerationMode::Html),
            "html_jsx" => PanelLanguage::Html(HtmlGenerationMode::Jsx),
            "html_svelte" => PanelLanguage::Html(HtmlGenerationMode::Svelte),
            "html_styled_components" => PanelLanguage::Html(HtmlGenerationMode::StyledComponents),
            "tailwind" => PanelLanguage::Tailwind(TailwindGenerationMode::Html),
            "tailwind_jsx" => PanelLanguage::Tailwind(TailwindGenerationMode::Jsx),
            "flutter" => PanelLanguage::Flutter,
            "swiftUI" => PanelLanguage::SwiftUi,
            _ => return None,
        })
    }

    /// `settings` adjusted for this language. Flutter and SwiftUI always
    /// produce snippets here.
    pub fn settings(&self, settings: &PluginSettings) -> PluginSettings {
        let mut settings = settings.clone();
        match *self {
            PanelLanguage::Html(mode) => {
                settings.framework = Framework::Html;
                settings.html_generation_mode = mode;
            }
            PanelLanguage::Tailwind(mode) => {
                settings.framework = Framework::Tailwind;
                settings.tailwind_generation_mode = mode;
            }
            PanelLanguage::Flutter => {
                settings.framework = Framework::Flutter;
                settings.flutter_generation_mode = FlutterGenerationMode::Snippet;
            }
            PanelLanguage::SwiftUi => {
                settings.framework = Framework::SwiftUi;
                settings.swiftui_generation_mode = SwiftUiGenerationMode::Snippet;
            }
        }
        settings
    }
}

/// Blocks for `language`; unknown languages get none.
pub fn blocks_for(
    language: &str,
    nodes: &[IntermediateNode],
    settings: &PluginSettings,
) -> Result<Vec<CodegenBlock>> {
    let Some(panel) = PanelLanguage::parse(language) else {
        tracing::debug!(language, "no code blocks for language");
        return Ok(Vec::new());
    };
    let settings = panel.settings(settings);
    let generated = generate_code(nodes, &settings)?;

    let blocks = match panel {
        PanelLanguage::Html(_) => vec![
            CodegenBlock::new("Code", generated.code, BlockLanguage::Html),
            CodegenBlock::new("Text Styles", generated.text_styles, BlockLanguage::Html),
        ],
        PanelLanguage::Tailwind(_) => vec![
            CodegenBlock::new("Code", generated.code, BlockLanguage::Html),
            CodegenBlock::new(
                "Tailwind Colors",
                color_list(&retrieve_colors(nodes, &settings)),
                BlockLanguage::Javascript,
            ),
            CodegenBlock::new("Text Styles", generated.text_styles, BlockLanguage::Html),
        ],
        PanelLanguage::Flutter => vec![
            CodegenBlock::new("Code", generated.code, BlockLanguage::Swift),
            CodegenBlock::new("Text Styles", generated.text_styles, BlockLanguage::Swift),
        ],
        PanelLanguage::SwiftUi => vec![
            CodegenBlock::new("SwiftUI", generated.code, BlockLanguage::Swift),
            CodegenBlock::new("Text Styles", generated.text_styles, BlockLanguage::Swift),
        ],
    };
    Ok(blocks)
}

/// One `hex; // name (meta)` line per color.
pub fn color_list(colors: &[SolidColorConversion]) -> String {
    colors
        .iter()
        .map(|color| {
            let mut line = format!("{};", color.hex);
            if color.color_name != color.hex {
                line.push_str(&format!(" // {}", color.color_name));
            }
            if let Some(meta) = &color.meta {
                line.push_str(&format!(" ({})", meta));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenecode_core::{HostNode, Paint, Rgba, TypeStyle, WarningSink};
    use scenecode_normalize::normalize;

    fn nodes() -> Vec<IntermediateNode> {
        let label = HostNode {
            characters: Some("Buy".into()),
            style: Some(TypeStyle {
                font_family: "Inter".into(),
                font_size: 14.0,
                font_weight: 600.0,
                ..Default::default()
            }),
            ..HostNode::new("t", "Label", "TEXT").with_geometry(0.0, 0.0, 40.0, 20.0)
        };
        let button = HostNode::new("b", "Button", "FRAME")
            .with_geometry(0.0, 0.0, 120.0, 40.0)
            .with_fill(Paint::solid(Rgba::new(1.0, 1.0, 1.0, 1.0)))
            .with_child(label);
        normalize(&[button], &PluginSettings::default(), &WarningSink::new())
    }

    fn titles(blocks: &[CodegenBlock]) -> Vec<&str> {
        blocks.iter().map(|b| b.title.as_str()).collect()
    }

    #[test]
    fn test_block_sets_per_language() {
        let settings = PluginSettings::default();
        let html = blocks_for("html_jsx", &nodes(), &settings).unwrap();
        assert_eq!(titles(&html), ["Code", "Text Styles"]);
        assert!(html[0].code.contains("className"));

        let tailwind = blocks_for("tailwind", &nodes(), &settings).unwrap();
        assert_eq!(titles(&tailwind), ["Code", "Tailwind Colors", "Text Styles"]);
        assert_eq!(tailwind[1].language, BlockLanguage::Javascript);
        assert!(tailwind[1].code.starts_with("#ffffff;"));

        let swift = blocks_for("swiftUI", &nodes(), &settings).unwrap();
        assert_eq!(titles(&swift), ["SwiftUI", "Text Styles"]);
        assert_eq!(swift[0].language, BlockLanguage::Swift);

        let flutter = blocks_for("flutter", &nodes(), &settings).unwrap();
        assert_eq!(flutter[0].language, BlockLanguage::Swift);
        assert!(!flutter[0].code.contains("class "));
    }

    #[test]
    fn test_unknown_language_has_no_blocks() {
        let blocks = blocks_for("compose", &nodes(), &PluginSettings::default()).unwrap();
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_color_list_format() {
        let colors = [
            SolidColorConversion {
                hex: "#ffffff".into(),
                color_name: "white".into(),
                export_value: "white".into(),
                contrast_white: 1.0,
                contrast_black: 21.0,
                meta: None,
            },
            SolidColorConversion {
                hex: "#123456".into(),
                color_name: "#123456".into(),
                export_value: "[#123456]".into(),
                contrast_white: 1.0,
                contrast_black: 1.0,
                meta: Some("brand/primary".into()),
            },
        ];
        assert_eq!(
            color_list(&colors),
            "#ffffff; // white\n#123456; (brand/primary)"
        );
    }
}
