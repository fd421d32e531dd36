//! SwiftUI view generator.
//!
//! Views are built as a base expression followed by one modifier per line.
//! Auto layout becomes `HStack`/`VStack` (or an adaptive grid when the flow
//! wraps), absolute children sit in a top-leading `ZStack` with `.offset`.

use serde_json::json;

use scenecode_core::{AssetReference, Framework, PluginSettings, StrokeAlign, SwiftUiGenerationMode};
use scenecode_layout::{Alignment, Axis, Distribution, LayoutBox, Padding};
use scenecode_normalize::{IntermediateNode, NodeKind, TextData, TextRun};
use scenecode_style::{
    format_number, swiftui_color, ColorSpec, CornerRadius, Fill, StyleDescriptor, TextAlign,
    TextCase, TextDecoration, Typography,
};

use super::templates::{indent, TemplateEngine};
use super::{
    asset_or_placeholder, component_name, dimensions, hang, rendered_children, run_color, CodeGenerator,
    Dimension, GeneratedCode, Placement,
};
use crate::error::Result;
use crate::text_styles::{distinct_typographies, text_styles_report};

/// Generates SwiftUI views.
pub struct SwiftUiGenerator<'a> {
    engine: TemplateEngine<'a>,
}

impl<'a> SwiftUiGenerator<'a> {
    pub fn new() -> Self {
        let mut engine = TemplateEngine::new();

        let _ = engine.register_template(
            "swiftui_struct",
            r#"struct {{pascal_case name}}: View {
    var body: some View {
{{indent body 8}}
    }
}"#,
        );

        let _ = engine.register_template(
            "swiftui_preview",
            r#"import SwiftUI

{{view}}

#Preview {
    {{pascal_case name}}()
}"#,
        );

        Self { engine }
    }
}

impl<'a> Default for SwiftUiGenerator<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CodeGenerator for SwiftUiGenerator<'a> {
    fn framework(&self) -> Framework {
        Framework::SwiftUi
    }

    fn generate(&self, nodes: &[IntermediateNode], settings: &PluginSettings) -> Result<GeneratedCode> {
        let builder = ViewBuilder { settings };
        let views: Vec<String> = nodes
            .iter()
            .map(|node| builder.view(node, Placement::Root))
            .collect();
        let body = match views.as_slice() {
            [single] => single.clone(),
            _ => block("VStack(alignment: .leading, spacing: 0)", views),
        };

        let name = component_name(nodes);
        let code = match settings.swiftui_generation_mode {
            SwiftUiGenerationMode::Snippet => body,
            SwiftUiGenerationMode::Struct => {
                self.engine.render("swiftui_struct", &json!({ "name": name, "body": body }))?
            }
            SwiftUiGenerationMode::Preview => {
                let view = self
                    .engine
                    .render("swiftui_struct", &json!({ "name": name, "body": body }))?;
                self.engine
                    .render("swiftui_preview", &json!({ "name": name, "view": view }))?
            }
        };

        let text_styles = text_styles_report(&distinct_typographies(nodes), |typography| {
            font_modifiers(typography).join("\n")
        });
        Ok(GeneratedCode { code, text_styles })
    }
}

/// `head {` + indented children + `}`.
fn block(head: &str, children: Vec<String>) -> String {
    let mut lines = vec![format!("{} {{", head)];
    for child in children {
        lines.push(indent(&child, 4));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

/// Base view followed by one modifier per line.
fn chain(base: String, modifiers: Vec<String>) -> String {
    let mut lines = vec![base];
    lines.extend(modifiers.iter().map(|m| format!("    {}", hang(m, 4))));
    lines.join("\n")
}

fn num(value: f64) -> String {
    format_number(value)
}

struct ViewBuilder<'a> {
    settings: &'a PluginSettings,
}

impl ViewBuilder<'_> {
    fn view(&self, node: &IntermediateNode, placement: Placement<'_>) -> String {
        let (width, height) = dimensions(node, placement, self.settings);
        let mut modifiers = Vec::new();

        let base = match &node.kind {
            NodeKind::Text(text) => self.text(node, text, &mut modifiers),
            NodeKind::Unknown { .. } => image_view(&asset_or_placeholder(node)),
            _ if node.is_picture() && !node.renders_children() => image_view(&asset_or_placeholder(node)),
            _ => self.container(node, &mut modifiers),
        };

        if let Some(frame) = frame(width, height) {
            modifiers.push(frame);
        }
        if !matches!(node.kind, NodeKind::Text(_)) {
            self.decoration(node, &mut modifiers);
        }
        effects(node, &mut modifiers);
        if let Placement::Absolute { x, y, .. } = placement {
            modifiers.push(format!(".offset(x: {}, y: {})", num(x), num(y)));
        }
        chain(base, modifiers)
    }

    fn container(&self, node: &IntermediateNode, modifiers: &mut Vec<String>) -> String {
        let children = rendered_children(node);

        let layout = match &node.layout {
            LayoutBox::Directional(layout) => layout,
            LayoutBox::Absolute { .. } => {
                if children.is_empty() {
                    return "Color.clear".to_string();
                }
                let views = children
                    .iter()
                    .enumerate()
                    .map(|(i, child)| self.view(child, Placement::of_child(node, i, child)))
                    .collect();
                return block("ZStack(alignment: .topLeading)", views);
            }
        };

        padding_modifiers(&layout.padding, modifiers);
        if children.is_empty() {
            return "Color.clear".to_string();
        }

        let views: Vec<String> = children
            .iter()
            .enumerate()
            .map(|(i, child)| self.view(child, Placement::of_child(node, i, child)))
            .collect();

        if layout.wrap {
            let minimum = children.iter().map(|c| c.width()).fold(0.0, f64::max);
            let head = format!(
                "LazyVGrid(columns: [GridItem(.adaptive(minimum: {}), spacing: {})], alignment: .leading, spacing: {})",
                num(minimum),
                num(layout.gap),
                num(layout.cross_gap)
            );
            return block(&head, views);
        }

        let (stack, alignment) = match layout.axis {
            Axis::Horizontal => (
                "HStack",
                match layout.alignment {
                    Alignment::Start => Some(".top"),
                    Alignment::Center => None,
                    Alignment::End => Some(".bottom"),
                    Alignment::Baseline => Some(".firstTextBaseline"),
                },
            ),
            Axis::Vertical => (
                "VStack",
                match layout.alignment {
                    Alignment::Start | Alignment::Baseline => Some(".leading"),
                    Alignment::Center => None,
                    Alignment::End => Some(".trailing"),
                },
            ),
        };
        let spacing = match layout.distribution {
            Distribution::SpaceBetween => 0.0,
            _ => layout.gap,
        };
        let mut params = Vec::new();
        if let Some(alignment) = alignment {
            params.push(format!("alignment: {}", alignment));
        }
        params.push(format!("spacing: {}", num(spacing)));

        let spacer = "Spacer()".to_string();
        let views = match layout.distribution {
            Distribution::Start => views,
            Distribution::Center => {
                let mut out = vec![spacer.clone()];
                out.extend(views);
                out.push(spacer);
                out
            }
            Distribution::End => {
                let mut out = vec![spacer];
                out.extend(views);
                out
            }
            Distribution::SpaceBetween => {
                let mut out = Vec::with_capacity(views.len() * 2);
                for (i, view) in views.into_iter().enumerate() {
                    if i > 0 {
                        out.push(spacer.clone());
                    }
                    out.push(view);
                }
                out
            }
        };
        block(&format!("{}({})", stack, params.join(", ")), views)
    }

    fn text(&self, node: &IntermediateNode, text: &TextData, modifiers: &mut Vec<String>) -> String {
        let first = match text.runs.first() {
            Some(run) => run,
            None => return format!("Text({})", swift_string(&text.characters)),
        };

        let base = if text.is_mixed() {
            let parts: Vec<String> = text
                .runs
                .iter()
                .map(|run| {
                    let mut part = format!("Text({})", swift_string(&run.characters));
                    for modifier in self.run_modifiers(node, run) {
                        part.push_str(&modifier);
                    }
                    part
                })
                .collect();
            format!("({})", parts.join("\n    + "))
        } else {
            modifiers.extend(self.run_modifiers(node, first));
            format!("Text({})", swift_string(&text.characters))
        };

        let typography = &first.typography;
        match typography.case {
            TextCase::Upper => modifiers.push(".textCase(.uppercase)".to_string()),
            TextCase::Lower => modifiers.push(".textCase(.lowercase)".to_string()),
            TextCase::Original | TextCase::Title => {}
        }
        match typography.align {
            TextAlign::Center => modifiers.push(".multilineTextAlignment(.center)".to_string()),
            TextAlign::Right => modifiers.push(".multilineTextAlignment(.trailing)".to_string()),
            TextAlign::Left | TextAlign::Justify => {}
        }
        if let Some(line_height) = typography.line_height.to_pixels(typography.size) {
            let spacing = line_height - typography.size;
            if spacing > 0.0 {
                modifiers.push(format!(".lineSpacing({})", num(spacing)));
            }
        }
        base
    }

    /// Modifiers that keep the view a `Text`, so runs can be concatenated.
    fn run_modifiers(&self, node: &IntermediateNode, run: &TextRun) -> Vec<String> {
        let mut modifiers = font_modifiers(&run.typography);
        if let Some(color) = run_color(node, run) {
            modifiers.push(format!(".foregroundColor({})", self.color(color)));
        }
        modifiers
    }

    fn color(&self, color: &ColorSpec) -> String {
        match color.variable_name() {
            Some(name) if self.settings.use_color_variables => {
                format!("Color({})", swift_string(name))
            }
            _ => swiftui_color(&color.rgb, color.alpha),
        }
    }

    fn decoration(&self, node: &IntermediateNode, modifiers: &mut Vec<String>) {
        let style: &StyleDescriptor = &node.style;
        match style.background() {
            Some(Fill::Solid { color }) => modifiers.push(format!(".background({})", self.color(color))),
            Some(Fill::Gradient { gradient }) => {
                modifiers.push(format!(".background({})", gradient.to_swiftui()))
            }
            _ => {}
        }
        if matches!(node.kind, NodeKind::Image(_)) && node.renders_children() {
            let image = image_view(&asset_or_placeholder(node));
            modifiers.push(format!(".background(\n{}\n)", indent(&image, 4)));
        }
        if style.background_blur.is_some() {
            modifiers.push(".background(.ultraThinMaterial)".to_string());
        }

        let shape = shape(&style.corner_radius);
        if style.corner_radius != CornerRadius::None {
            modifiers.push(format!(".clipShape({})", shape));
        } else if style.clips_content {
            modifiers.push(".clipped()".to_string());
        }
        if let Some(stroke) = &style.stroke {
            let method = match stroke.align {
                StrokeAlign::Inside => "strokeBorder",
                _ => "stroke",
            };
            modifiers.push(format!(
                ".overlay({}.{}({}, lineWidth: {}))",
                shape,
                method,
                self.color(&stroke.color),
                num(stroke.weight)
            ));
        }
        for shadow in style.shadows.iter().filter(|s| !s.inset) {
            modifiers.push(format!(
                ".shadow(color: {}, radius: {}, x: {}, y: {})",
                self.color(&shadow.color),
                num(shadow.blur / 2.0),
                num(shadow.offset_x),
                num(shadow.offset_y)
            ));
        }
    }
}

fn effects(node: &IntermediateNode, modifiers: &mut Vec<String>) {
    if node.style.opacity < 1.0 {
        modifiers.push(format!(".opacity({})", num(node.style.opacity)));
    }
    if let Some(radius) = node.style.layer_blur {
        modifiers.push(format!(".blur(radius: {})", num(radius)));
    }
    if node.rotation.abs() > f64::EPSILON {
        modifiers.push(format!(".rotationEffect(.degrees({}))", num(-node.rotation)));
    }
}

/// `.frame(width:height:)`, or the min/max overload when an axis fills.
fn frame(width: Dimension, height: Dimension) -> Option<String> {
    let fills = width == Dimension::Fill || height == Dimension::Fill;
    let mut params = Vec::new();
    for (axis, dimension) in [("Width", width), ("Height", height)] {
        match dimension {
            Dimension::Fixed(value) if fills => {
                params.push(format!("min{}: {}", axis, num(value)));
                params.push(format!("max{}: {}", axis, num(value)));
            }
            Dimension::Fixed(value) => params.push(format!("{}: {}", axis.to_lowercase(), num(value))),
            Dimension::Fill => params.push(format!("max{}: .infinity", axis)),
            Dimension::Auto => {}
        }
    }
    (!params.is_empty()).then(|| format!(".frame({})", params.join(", ")))
}

fn padding_modifiers(padding: &Padding, modifiers: &mut Vec<String>) {
    if padding.is_zero() {
        return;
    }
    if let Some(all) = padding.as_uniform() {
        modifiers.push(format!(".padding({})", num(all)));
        return;
    }
    if let Some((horizontal, vertical)) = padding.as_symmetric() {
        for (edge, value) in [(".horizontal", horizontal), (".vertical", vertical)] {
            if value != 0.0 {
                modifiers.push(format!(".padding({}, {})", edge, num(value)));
            }
        }
        return;
    }
    for (edge, value) in [
        (".top", padding.top),
        (".leading", padding.left),
        (".bottom", padding.bottom),
        (".trailing", padding.right),
    ] {
        if value != 0.0 {
            modifiers.push(format!(".padding({}, {})", edge, num(value)));
        }
    }
}

fn shape(radius: &CornerRadius) -> String {
    match *radius {
        CornerRadius::None => "Rectangle()".to_string(),
        CornerRadius::All { radius } => format!("RoundedRectangle(cornerRadius: {})", num(radius)),
        CornerRadius::Corners {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        } => format!(
            "UnevenRoundedRectangle(topLeadingRadius: {}, bottomLeadingRadius: {}, bottomTrailingRadius: {}, topTrailingRadius: {})",
            num(top_left),
            num(bottom_left),
            num(bottom_right),
            num(top_right)
        ),
    }
}

fn image_view(asset: &AssetReference) -> String {
    match asset {
        AssetReference::InlineBase64 { data, .. } => chain(
            format!(
                "Image(uiImage: UIImage(data: Data(base64Encoded: \"{}\") ?? Data()) ?? UIImage())",
                data
            ),
            vec![
                ".resizable()".to_string(),
                ".aspectRatio(contentMode: .fill)".to_string(),
            ],
        ),
        other => [
            format!("AsyncImage(url: URL(string: {})) {{ image in", swift_string(&other.url())),
            "    image.resizable().aspectRatio(contentMode: .fill)".to_string(),
            "} placeholder: {".to_string(),
            "    Color.gray.opacity(0.2)".to_string(),
            "}".to_string(),
        ]
        .join("\n"),
    }
}

/// Font modifiers for a typography.
fn font_modifiers(typography: &Typography) -> Vec<String> {
    let mut modifiers = Vec::new();
    if typography.family.is_empty() {
        modifiers.push(format!(".font(.system(size: {}))", num(typography.size)));
    } else {
        modifiers.push(format!(
            ".font(.custom({}, size: {}))",
            swift_string(&typography.family),
            num(typography.size)
        ));
    }
    modifiers.push(format!(".fontWeight(.{})", typography.weight.swiftui_name()));
    if typography.italic {
        modifiers.push(".italic()".to_string());
    }
    match typography.decoration {
        TextDecoration::None => {}
        TextDecoration::Underline => modifiers.push(".underline()".to_string()),
        TextDecoration::Strikethrough => modifiers.push(".strikethrough()".to_string()),
    }
    if typography.letter_spacing.abs() > f64::EPSILON {
        modifiers.push(format!(".tracking({})", num(typography.letter_spacing)));
    }
    modifiers
}

fn swift_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{}\"", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::fixtures;
    use scenecode_normalize::ImageData;
    use scenecode_style::FontWeight;

    fn generate(nodes: &[IntermediateNode], settings: &PluginSettings) -> String {
        SwiftUiGenerator::new().generate(nodes, settings).unwrap().code
    }

    #[test]
    fn test_row_stack_and_modifiers() {
        let code = generate(&fixtures::tree(fixtures::row()), &PluginSettings::default());
        assert!(code.starts_with("HStack(alignment: .top, spacing: 8) {"));
        assert!(code.contains("    .padding(16)"));
        assert!(code.contains("    .frame(width: 136, height: 80)"));
        assert!(code.contains(".background(Color(red: 1, green: 1, blue: 1))"));
        assert_eq!(code.matches(".frame(width: 48, height: 48)").count(), 2);
    }

    #[test]
    fn test_card_text_and_clip_shape() {
        let code = generate(&fixtures::tree(fixtures::card()), &PluginSettings::default());
        assert!(code.starts_with("VStack(alignment: .leading, spacing: 4) {"));
        assert!(code.contains(".clipShape(RoundedRectangle(cornerRadius: 8))"));
        assert!(code.contains("Text(\"Hello 'world'\")"));
        assert!(code.contains(".font(.custom(\"Inter\", size: 16))"));
        assert!(code.contains(".fontWeight(.bold)"));
        assert!(code.contains(".frame(maxWidth: .infinity"));
    }

    #[test]
    fn test_absolute_children_use_zstack() {
        let code = generate(&fixtures::tree(fixtures::canvas()), &PluginSettings::default());
        assert!(code.starts_with("ZStack(alignment: .topLeading) {"));
        assert!(code.contains(".offset(x: 20, y: 30)"));
    }

    #[test]
    fn test_struct_and_preview_modes() {
        let nodes = fixtures::tree(fixtures::row());
        let mut settings = PluginSettings {
            swiftui_generation_mode: SwiftUiGenerationMode::Struct,
            ..Default::default()
        };
        let code = generate(&nodes, &settings);
        assert!(code.starts_with("struct Toolbar: View {\n    var body: some View {\n        HStack("));
        assert!(code.ends_with("    }\n}"));

        settings.swiftui_generation_mode = SwiftUiGenerationMode::Preview;
        let code = generate(&nodes, &settings);
        assert!(code.starts_with("import SwiftUI\n\nstruct Toolbar: View {"));
        assert!(code.ends_with("#Preview {\n    Toolbar()\n}"));
    }

    #[test]
    fn test_mixed_runs_concatenate() {
        let mut nodes = fixtures::tree(fixtures::text_node("t", "ab"));
        if let NodeKind::Text(text) = &mut nodes[0].kind {
            let mut bold = text.runs[0].clone();
            bold.characters = "a".into();
            let mut light = bold.clone();
            light.characters = "b".into();
            light.typography.weight = FontWeight::Light;
            text.runs = vec![bold, light];
        }
        let code = generate(&nodes, &PluginSettings::default());
        assert!(code.starts_with("(Text(\"a\").font(.custom(\"Inter\", size: 16)).fontWeight(.bold)"));
        assert!(code.contains("\n    + Text(\"b\")"));
        assert!(code.contains(".fontWeight(.light)"));
    }

    #[test]
    fn test_multiple_roots_and_images() {
        let mut image = fixtures::tree(fixtures::box_node("photo", 40.0, 30.0)).remove(0);
        image.kind = NodeKind::Image(ImageData {
            asset: Some(AssetReference::InlineBase64 {
                mime_type: "image/png".into(),
                data: "iVBORw==".into(),
            }),
            exclude_children: false,
            flattened: false,
        });
        let mut unknown = image.clone();
        unknown.kind = NodeKind::Unknown {
            host_type: "STICKY".into(),
        };
        let code = generate(&[image, unknown], &PluginSettings::default());
        assert!(code.starts_with("VStack(alignment: .leading, spacing: 0) {"));
        assert!(code.contains("Data(base64Encoded: \"iVBORw==\")"));
        assert!(code.contains("AsyncImage(url: URL(string: \"https://placehold.co/40x30\"))"));
    }

    #[test]
    fn test_text_style_report() {
        let out = SwiftUiGenerator::new()
            .generate(&fixtures::tree(fixtures::card()), &PluginSettings::default())
            .unwrap();
        assert_eq!(
            out.text_styles,
            "// Inter 16px 700\n.font(.custom(\"Inter\", size: 16))\n.fontWeight(.bold)"
        );
    }
}
