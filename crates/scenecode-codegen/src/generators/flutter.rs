//! Flutter widget tree generator.

use serde_json::json;

use scenecode_core::{AssetReference, FlutterGenerationMode, Framework, PluginSettings};
use scenecode_layout::{Alignment, Axis, Distribution, LayoutBox, Padding};
use scenecode_normalize::{IntermediateNode, NodeKind, TextData, TextRun};
use scenecode_style::{
    flutter_color, format_number, CornerRadius, Fill, StyleDescriptor, TextAlign, TextCase,
    TextDecoration, Typography,
};

use super::templates::TemplateEngine;
use super::{
    asset_or_placeholder, component_name, dimensions, hang, rendered_children, run_color,
    CodeGenerator, Dimension, GeneratedCode, Placement,
};
use crate::error::Result;
use crate::text_styles::{distinct_typographies, text_styles_report};

/// Generates Flutter widgets.
pub struct FlutterGenerator<'a> {
    engine: TemplateEngine<'a>,
}

impl<'a> FlutterGenerator<'a> {
    pub fn new() -> Self {
        let mut engine = TemplateEngine::new();

        let _ = engine.register_template(
            "flutter_stateless",
            r#"class {{pascal_case name}} extends StatelessWidget {
  const {{pascal_case name}}({super.key});

  @override
  Widget build(BuildContext context) {
    return {{body}};
  }
}"#,
        );

        let _ = engine.register_template(
            "flutter_app",
            r#"{{#each imports}}import '{{this}}';
{{/each}}
void main() {
  runApp(const ScenecodeApp());
}

class ScenecodeApp extends StatelessWidget {
  const ScenecodeApp({super.key});

  @override
  Widget build(BuildContext context) {
    return MaterialApp(
      debugShowCheckedModeBanner: false,
      home: Scaffold(
        body: ListView(children: [
          {{pascal_case name}}(),
        ]),
      ),
    );
  }
}

{{widget}}"#,
        );

        Self { engine }
    }
}

impl<'a> Default for FlutterGenerator<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CodeGenerator for FlutterGenerator<'a> {
    fn framework(&self) -> Framework {
        Framework::Flutter
    }

    fn generate(&self, nodes: &[IntermediateNode], settings: &PluginSettings) -> Result<GeneratedCode> {
        let builder = WidgetBuilder { settings };
        let widgets: Vec<String> = nodes
            .iter()
            .map(|node| builder.widget(node, Placement::Root, false))
            .collect();
        let body = match widgets.as_slice() {
            [single] => single.clone(),
            _ => call(
                "Column",
                vec![
                    arg("crossAxisAlignment", "CrossAxisAlignment.start"),
                    arg("children", list(widgets)),
                ],
            ),
        };

        let name = component_name(nodes);
        let code = match settings.flutter_generation_mode {
            FlutterGenerationMode::Snippet => body,
            FlutterGenerationMode::Stateless => self.stateless(&name, &body)?,
            FlutterGenerationMode::FullApp => {
                let widget = self.stateless(&name, &body)?;
                self.engine.render(
                    "flutter_app",
                    &json!({ "name": name, "widget": widget, "imports": imports(&body) }),
                )?
            }
        };

        let text_styles = text_styles_report(&distinct_typographies(nodes), |typography| {
            text_style(typography, None)
        });
        Ok(GeneratedCode { code, text_styles })
    }
}

impl<'a> FlutterGenerator<'a> {
    fn stateless(&self, name: &str, body: &str) -> Result<String> {
        self.engine.render(
            "flutter_stateless",
            &json!({ "name": name, "body": hang(body, 4) }),
        )
    }
}

fn imports(body: &str) -> Vec<&'static str> {
    let mut imports = Vec::new();
    if body.contains("base64Decode(") {
        imports.push("dart:convert");
    }
    imports.push("package:flutter/material.dart");
    if body.contains("SvgPicture.") {
        imports.push("package:flutter_svg/flutter_svg.dart");
    }
    imports
}

type Arg = (Option<&'static str>, String);

fn arg(name: &'static str, value: impl Into<String>) -> Arg {
    (Some(name), value.into())
}

/// `Name(\n  a: x,\n  b: y,\n)`, or `Name()` without arguments.
fn call(name: &str, args: Vec<Arg>) -> String {
    if args.is_empty() {
        return format!("{}()", name);
    }
    if let [(Some(key), value)] = args.as_slice() {
        if !value.contains('\n') && value.len() < 40 {
            return format!("{}({}: {})", name, key, value);
        }
    }
    let mut lines = vec![format!("{}(", name)];
    for (key, value) in args {
        let value = hang(&value, 2);
        match key {
            Some(key) => lines.push(format!("  {}: {},", key, value)),
            None => lines.push(format!("  {},", value)),
        }
    }
    lines.push(")".to_string());
    lines.join("\n")
}

fn list(items: Vec<String>) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }
    let mut lines = vec!["[".to_string()];
    for item in items {
        lines.push(format!("  {},", hang(&item, 2)));
    }
    lines.push("]".to_string());
    lines.join("\n")
}

fn num(value: f64) -> String {
    format_number(value)
}

struct WidgetBuilder<'a> {
    settings: &'a PluginSettings,
}

impl WidgetBuilder<'_> {
    /// The widget for a node, wrapped for its placement.
    fn widget(&self, node: &IntermediateNode, placement: Placement<'_>, in_stack: bool) -> String {
        let (width, height) = dimensions(node, placement, self.settings);
        let mut widget = match &node.kind {
            NodeKind::Text(text) => self.text(node, text, width, height),
            NodeKind::Unknown { .. } => self.image(node, width, height),
            _ if node.is_picture() && !node.renders_children() => self.image(node, width, height),
            _ => self.container(node, width, height),
        };

        if node.style.opacity < 1.0 {
            widget = call(
                "Opacity",
                vec![arg("opacity", num(node.style.opacity)), arg("child", widget)],
            );
        }
        if node.rotation.abs() > f64::EPSILON {
            widget = call(
                "Transform.rotate",
                vec![
                    arg("angle", num(-node.rotation.to_radians())),
                    arg("child", widget),
                ],
            );
        }

        match placement {
            Placement::Absolute { x, y, .. } if in_stack => call(
                "Positioned",
                vec![arg("left", num(x)), arg("top", num(y)), arg("child", widget)],
            ),
            Placement::Flow { layout, .. } if self.fills_main_axis(width, height, layout.axis) => {
                call("Expanded", vec![arg("child", widget)])
            }
            _ => widget,
        }
    }

    fn fills_main_axis(&self, width: Dimension, height: Dimension, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => width == Dimension::Fill,
            Axis::Vertical => height == Dimension::Fill,
        }
    }

    fn size_args(&self, width: Dimension, height: Dimension) -> Vec<Arg> {
        let mut args = Vec::new();
        for (name, dimension) in [("width", width), ("height", height)] {
            match dimension {
                Dimension::Fixed(value) => args.push(arg(name, num(value))),
                Dimension::Fill => args.push(arg(name, "double.infinity")),
                Dimension::Auto => {}
            }
        }
        args
    }

    fn container(&self, node: &IntermediateNode, width: Dimension, height: Dimension) -> String {
        let children = rendered_children(node);
        let mut args = self.size_args(width, height);

        if let LayoutBox::Directional(layout) = &node.layout {
            if let Some(padding) = edge_insets(&layout.padding) {
                args.push(arg("padding", padding));
            }
        }
        if node.style.clips_content {
            args.push(arg("clipBehavior", "Clip.antiAlias"));
        }
        let image = matches!(node.kind, NodeKind::Image(_)).then(|| asset_or_placeholder(node));
        if let Some(decoration) = box_decoration(&node.style, image.as_ref()) {
            args.push(arg("decoration", decoration));
        }
        if !children.is_empty() {
            args.push(arg("child", self.layout(node, children)));
        }
        call("Container", args)
    }

    fn layout(&self, node: &IntermediateNode, children: &[IntermediateNode]) -> String {
        let layout = match &node.layout {
            LayoutBox::Directional(layout) => layout,
            LayoutBox::Absolute { .. } => {
                let widgets = children
                    .iter()
                    .enumerate()
                    .map(|(i, child)| self.widget(child, Placement::of_child(node, i, child), true))
                    .collect();
                return call("Stack", vec![arg("children", list(widgets))]);
            }
        };

        let widgets: Vec<String> = children
            .iter()
            .enumerate()
            .map(|(i, child)| self.widget(child, Placement::of_child(node, i, child), false))
            .collect();

        if layout.wrap {
            return call(
                "Wrap",
                vec![
                    arg("spacing", num(layout.gap)),
                    arg("runSpacing", num(layout.cross_gap)),
                    arg("children", list(widgets)),
                ],
            );
        }

        let spaced = if layout.gap > 0.0 && layout.distribution != Distribution::SpaceBetween {
            let spacer = match layout.axis {
                Axis::Horizontal => format!("const SizedBox(width: {})", num(layout.gap)),
                Axis::Vertical => format!("const SizedBox(height: {})", num(layout.gap)),
            };
            let mut out = Vec::with_capacity(widgets.len() * 2);
            for (i, widget) in widgets.into_iter().enumerate() {
                if i > 0 {
                    out.push(spacer.clone());
                }
                out.push(widget);
            }
            out
        } else {
            widgets
        };

        let name = match layout.axis {
            Axis::Horizontal => "Row",
            Axis::Vertical => "Column",
        };
        let main = match layout.distribution {
            Distribution::Start => "MainAxisAlignment.start",
            Distribution::Center => "MainAxisAlignment.center",
            Distribution::End => "MainAxisAlignment.end",
            Distribution::SpaceBetween => "MainAxisAlignment.spaceBetween",
        };
        let cross = match layout.alignment {
            Alignment::Start => "CrossAxisAlignment.start",
            Alignment::Center => "CrossAxisAlignment.center",
            Alignment::End => "CrossAxisAlignment.end",
            Alignment::Baseline => "CrossAxisAlignment.baseline",
        };
        let mut args = vec![
            arg("mainAxisSize", "MainAxisSize.min"),
            arg("mainAxisAlignment", main),
            arg("crossAxisAlignment", cross),
        ];
        if layout.alignment == Alignment::Baseline {
            args.push(arg("textBaseline", "TextBaseline.alphabetic"));
        }
        args.push(arg("children", list(spaced)));
        call(name, args)
    }

    fn text(&self, node: &IntermediateNode, text: &TextData, width: Dimension, height: Dimension) -> String {
        let align = text
            .runs
            .first()
            .map(|r| r.typography.align)
            .unwrap_or_default();

        let widget = if text.is_mixed() {
            let spans = text
                .runs
                .iter()
                .map(|run| self.span(node, run))
                .collect();
            let mut args = vec![(
                None,
                call("TextSpan", vec![arg("children", list(spans))]),
            )];
            if align != TextAlign::Left {
                args.push(arg("textAlign", text_align(align)));
            }
            call("Text.rich", args)
        } else {
            let run = text.runs.first();
            let characters = match run {
                Some(run) => apply_case(&text.characters, run.typography.case),
                None => text.characters.clone(),
            };
            let mut args = vec![(None, dart_string(&characters))];
            if align != TextAlign::Left {
                args.push(arg("textAlign", text_align(align)));
            }
            if let Some(run) = run {
                args.push(arg("style", text_style(&run.typography, run_color(node, run).map(|c| flutter_color(&c.rgb, c.alpha)))));
            }
            call("Text", args)
        };

        let size = self.size_args(width, height);
        if size.is_empty() {
            widget
        } else {
            let mut args = size;
            args.push(arg("child", widget));
            call("SizedBox", args)
        }
    }

    fn span(&self, node: &IntermediateNode, run: &TextRun) -> String {
        let color = run_color(node, run).map(|c| flutter_color(&c.rgb, c.alpha));
        call(
            "TextSpan",
            vec![
                arg("text", dart_string(&apply_case(&run.characters, run.typography.case))),
                arg("style", text_style(&run.typography, color)),
            ],
        )
    }

    fn image(&self, node: &IntermediateNode, width: Dimension, height: Dimension) -> String {
        let mut args = Vec::new();
        let constructor = match asset_or_placeholder(node) {
            AssetReference::InlineBase64 { data, .. } => {
                args.push((None, format!("base64Decode('{}')", data)));
                "Image.memory"
            }
            AssetReference::InlineSvg { svg } => {
                args.push((None, format!("r'''{}'''", svg)));
                "SvgPicture.string"
            }
            other => {
                args.push((None, dart_string(&other.url())));
                "Image.network"
            }
        };
        args.extend(self.size_args(width, height));
        if constructor != "SvgPicture.string" {
            args.push(arg("fit", "BoxFit.cover"));
        }
        let widget = call(constructor, args);
        match node.style.corner_radius {
            CornerRadius::None => widget,
            radius => call(
                "ClipRRect",
                vec![arg("borderRadius", border_radius(&radius)), arg("child", widget)],
            ),
        }
    }
}

fn box_decoration(style: &StyleDescriptor, image: Option<&AssetReference>) -> Option<String> {
    let mut args = Vec::new();
    match style.background() {
        Some(Fill::Solid { color }) => args.push(arg("color", flutter_color(&color.rgb, color.alpha))),
        Some(Fill::Gradient { gradient }) => args.push(arg("gradient", gradient.to_flutter())),
        _ => {}
    }
    if let Some(image) = image {
        let provider = match image {
            AssetReference::InlineBase64 { data, .. } => format!("MemoryImage(base64Decode('{}'))", data),
            other => format!("NetworkImage({})", dart_string(&other.url())),
        };
        args.push(arg(
            "image",
            call("DecorationImage", vec![arg("image", provider), arg("fit", "BoxFit.cover")]),
        ));
    }
    if let Some(stroke) = &style.stroke {
        args.push(arg(
            "border",
            call(
                "Border.all",
                vec![
                    arg("color", flutter_color(&stroke.color.rgb, stroke.color.alpha)),
                    arg("width", num(stroke.weight)),
                ],
            ),
        ));
    }
    if style.corner_radius != CornerRadius::None {
        args.push(arg("borderRadius", border_radius(&style.corner_radius)));
    }
    let shadows: Vec<String> = style
        .shadows
        .iter()
        .filter(|s| !s.inset)
        .map(|s| {
            call(
                "BoxShadow",
                vec![
                    arg("color", flutter_color(&s.color.rgb, s.color.alpha)),
                    arg("offset", format!("Offset({}, {})", num(s.offset_x), num(s.offset_y))),
                    arg("blurRadius", num(s.blur)),
                    arg("spreadRadius", num(s.spread)),
                ],
            )
        })
        .collect();
    if !shadows.is_empty() {
        args.push(arg("boxShadow", list(shadows)));
    }
    (!args.is_empty()).then(|| call("BoxDecoration", args))
}

fn border_radius(radius: &CornerRadius) -> String {
    match *radius {
        CornerRadius::None => "BorderRadius.zero".to_string(),
        CornerRadius::All { radius } => format!("BorderRadius.circular({})", num(radius)),
        CornerRadius::Corners {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        } => format!(
            "BorderRadius.only(topLeft: Radius.circular({}), topRight: Radius.circular({}), bottomRight: Radius.circular({}), bottomLeft: Radius.circular({}))",
            num(top_left),
            num(top_right),
            num(bottom_right),
            num(bottom_left)
        ),
    }
}

fn edge_insets(padding: &Padding) -> Option<String> {
    if padding.is_zero() {
        return None;
    }
    if let Some(all) = padding.as_uniform() {
        return Some(format!("const EdgeInsets.all({})", num(all)));
    }
    if let Some((horizontal, vertical)) = padding.as_symmetric() {
        return Some(format!(
            "const EdgeInsets.symmetric(horizontal: {}, vertical: {})",
            num(horizontal),
            num(vertical)
        ));
    }
    Some(format!(
        "const EdgeInsets.only(left: {}, top: {}, right: {}, bottom: {})",
        num(padding.left),
        num(padding.top),
        num(padding.right),
        num(padding.bottom)
    ))
}

/// `TextStyle(...)` for a typography and optional color literal.
fn text_style(typography: &Typography, color: Option<String>) -> String {
    let mut args = Vec::new();
    if let Some(color) = color {
        args.push(arg("color", color));
    }
    args.push(arg("fontSize", num(typography.size)));
    if !typography.family.is_empty() {
        args.push(arg("fontFamily", dart_string(&typography.family)));
    }
    args.push(arg("fontWeight", format!("FontWeight.w{}", typography.weight.as_str())));
    if typography.italic {
        args.push(arg("fontStyle", "FontStyle.italic"));
    }
    if let Some(line_height) = typography.line_height.to_pixels(typography.size) {
        if typography.size > 0.0 {
            args.push(arg("height", num(line_height / typography.size)));
        }
    }
    if typography.letter_spacing.abs() > f64::EPSILON {
        args.push(arg("letterSpacing", num(typography.letter_spacing)));
    }
    match typography.decoration {
        TextDecoration::None => {}
        TextDecoration::Underline => args.push(arg("decoration", "TextDecoration.underline")),
        TextDecoration::Strikethrough => args.push(arg("decoration", "TextDecoration.lineThrough")),
    }
    call("TextStyle", args)
}

fn text_align(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "TextAlign.left",
        TextAlign::Center => "TextAlign.center",
        TextAlign::Right => "TextAlign.right",
        TextAlign::Justify => "TextAlign.justify",
    }
}

fn apply_case(text: &str, case: TextCase) -> String {
    match case {
        TextCase::Upper => text.to_uppercase(),
        TextCase::Lower => text.to_lowercase(),
        TextCase::Original | TextCase::Title => text.to_string(),
    }
}

fn dart_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('$', "\\$")
        .replace('\n', "\\n");
    format!("'{}'", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::fixtures;
    use scenecode_normalize::ImageData;

    fn generate(nodes: &[IntermediateNode], settings: &PluginSettings) -> String {
        FlutterGenerator::new().generate(nodes, settings).unwrap().code
    }

    #[test]
    fn test_row_with_gap_and_padding() {
        let code = generate(&fixtures::tree(fixtures::row()), &PluginSettings::default());
        assert!(code.starts_with("Container("));
        assert!(code.contains("padding: const EdgeInsets.all(16)"));
        assert!(code.contains("color: Color(0xFFFFFFFF)"));
        assert!(code.contains("child: Row("));
        assert!(code.contains("const SizedBox(width: 8)"));
        assert_eq!(code.matches("width: 48").count(), 2);
    }

    #[test]
    fn test_fill_text_child_and_escaping() {
        let code = generate(&fixtures::tree(fixtures::card()), &PluginSettings::default());
        assert!(code.contains("child: Column("));
        assert!(code.contains("borderRadius: BorderRadius.circular(8)"));
        assert!(code.contains("width: double.infinity"));
        assert!(code.contains("'Hello \\'world\\''"));
        assert!(code.contains("fontWeight: FontWeight.w700"));
        assert!(code.contains("fontFamily: 'Inter'"));
    }

    #[test]
    fn test_absolute_children_use_stack() {
        let code = generate(&fixtures::tree(fixtures::canvas()), &PluginSettings::default());
        assert!(code.contains("child: Stack(\n"));
        assert!(code.contains("Positioned("));
        assert!(code.contains("left: 20,"));
        assert!(code.contains("top: 30,"));
    }

    #[test]
    fn test_stateless_and_full_app_modes() {
        let nodes = fixtures::tree(fixtures::row());
        let mut settings = PluginSettings {
            flutter_generation_mode: FlutterGenerationMode::Stateless,
            ..Default::default()
        };
        let stateless = generate(&nodes, &settings);
        assert!(stateless.starts_with("class Toolbar extends StatelessWidget {"));
        assert!(stateless.contains("const Toolbar({super.key});"));
        assert!(stateless.contains("    return Container("));

        settings.flutter_generation_mode = FlutterGenerationMode::FullApp;
        let app = generate(&nodes, &settings);
        assert!(app.starts_with("import 'package:flutter/material.dart';"));
        assert!(app.contains("runApp(const ScenecodeApp());"));
        assert!(app.contains("Toolbar(),"));
        assert!(app.contains("class Toolbar extends StatelessWidget"));
    }

    #[test]
    fn test_images_by_asset_kind() {
        let mut nodes = fixtures::tree(fixtures::box_node("photo", 40.0, 30.0));
        nodes[0].kind = NodeKind::Image(ImageData {
            asset: Some(AssetReference::InlineBase64 {
                mime_type: "image/png".into(),
                data: "iVBORw==".into(),
            }),
            exclude_children: false,
            flattened: false,
        });
        let settings = PluginSettings {
            flutter_generation_mode: FlutterGenerationMode::FullApp,
            ..Default::default()
        };
        let app = generate(&nodes, &settings);
        assert!(app.starts_with("import 'dart:convert';"));
        assert!(app.contains("Image.memory("));
        assert!(app.contains("base64Decode('iVBORw==')"));

        nodes[0].kind = NodeKind::Unknown {
            host_type: "STICKY".into(),
        };
        let code = generate(&nodes, &PluginSettings::default());
        assert!(code.contains("Image.network("));
        assert!(code.contains("'https://placehold.co/40x30'"));
    }

    #[test]
    fn test_text_style_report() {
        let out = FlutterGenerator::new()
            .generate(&fixtures::tree(fixtures::card()), &PluginSettings::default())
            .unwrap();
        assert!(out.text_styles.starts_with("// Inter 16px 700\nTextStyle("));
    }
}
