//! HTML generator: plain HTML, JSX, styled-components and Svelte.

use scenecode_core::{Framework, PluginSettings, StrokeAlign};
use scenecode_layout::{Alignment, Axis, Distribution, LayoutBox, Padding};
use scenecode_normalize::{IntermediateNode, NodeKind, TextRun};
use scenecode_style::{
    format_number, ColorSpec, CornerRadius, Fill, LineHeight, StyleDescriptor, TextAlign, TextCase,
    TextDecoration, Typography,
};

use super::markup::{render_markup, Styler};
use super::syntax::{syntax_for, Element};
use super::{
    asset_or_placeholder, dimensions, rendered_children, run_color, CodeGenerator, Dimension,
    GeneratedCode, Placement,
};
use crate::error::Result;
use crate::text_styles::{distinct_typographies, text_styles_report};

/// Generates HTML-family markup with CSS.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlGenerator;

impl HtmlGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGenerator for HtmlGenerator {
    fn framework(&self) -> Framework {
        Framework::Html
    }

    fn generate(&self, nodes: &[IntermediateNode], settings: &PluginSettings) -> Result<GeneratedCode> {
        let syntax = syntax_for(settings, false);
        let styler = CssStyler { settings };
        let code = render_markup(nodes, settings, syntax.as_ref(), &styler);

        let text_styles = text_styles_report(&distinct_typographies(nodes), |typography| {
            css_typography(typography, settings)
                .into_iter()
                .map(|(p, v)| format!("{}: {};", p, v))
                .collect::<Vec<_>>()
                .join(" ")
        });

        Ok(GeneratedCode { code, text_styles })
    }
}

struct CssStyler<'a> {
    settings: &'a PluginSettings,
}

impl Styler for CssStyler<'_> {
    fn style_node(&self, node: &IntermediateNode, placement: Placement<'_>, element: &mut Element) {
        self.position(node, placement, element);
        self.size(node, placement, element);
        if !rendered_children(node).is_empty() {
            self.container(node, placement, element);
        }

        match &node.kind {
            NodeKind::Text(text) => {
                if !text.is_mixed() {
                    if let Some(run) = text.runs.first() {
                        self.run_declarations(node, run, element);
                    }
                }
                common_effects(&node.style, element);
            }
            NodeKind::Image(_) if node.renders_children() => {
                element.declare(
                    "background-image",
                    format!("url({})", css_url(&asset_or_placeholder(node).url())),
                );
                element.declare("background-size", "cover");
                element.declare("background-position", "center");
                self.box_style(&node.style, element);
            }
            NodeKind::Frame => self.box_style(&node.style, element),
            _ => {
                corner_radius(&node.style.corner_radius, element);
                common_effects(&node.style, element);
            }
        }

        if node.rotation.abs() > f64::EPSILON {
            element.declare("transform", format!("rotate({}deg)", format_number(-node.rotation)));
        }
    }

    fn style_run(&self, node: &IntermediateNode, run: &TextRun, element: &mut Element) {
        self.run_declarations(node, run, element);
    }
}

impl CssStyler<'_> {
    fn position(&self, _node: &IntermediateNode, placement: Placement<'_>, element: &mut Element) {
        if let Placement::Absolute { x, y, .. } = placement {
            element.declare("position", "absolute");
            element.declare("left", px(x));
            element.declare("top", px(y));
        }
    }

    fn size(&self, node: &IntermediateNode, placement: Placement<'_>, element: &mut Element) {
        let (width, height) = dimensions(node, placement, self.settings);
        for (axis, dimension, property) in [
            (Axis::Horizontal, width, "width"),
            (Axis::Vertical, height, "height"),
        ] {
            match dimension {
                Dimension::Fixed(value) => element.declare(property, px(value)),
                Dimension::Fill if placement.flow_axis() == Some(axis) => {
                    element.declare("flex", "1 1 0")
                }
                Dimension::Fill if placement.flow_axis().is_some() => {
                    element.declare("align-self", "stretch")
                }
                Dimension::Fill => element.declare(property, "100%"),
                Dimension::Auto => {}
            }
        }
    }

    fn container(&self, node: &IntermediateNode, placement: Placement<'_>, element: &mut Element) {
        match &node.layout {
            LayoutBox::Directional(layout) => {
                element.declare("display", "flex");
                if layout.axis == Axis::Vertical {
                    element.declare("flex-direction", "column");
                }
                if layout.gap > 0.0 && layout.distribution != Distribution::SpaceBetween {
                    element.declare("gap", px(layout.gap));
                }
                if let Some(padding) = css_padding(&layout.padding) {
                    element.declare("padding", padding);
                }
                if layout.distribution != Distribution::Start {
                    element.declare("justify-content", justify_content(layout.distribution));
                }
                element.declare("align-items", align_items(layout.alignment));
                if layout.wrap {
                    element.declare("flex-wrap", "wrap");
                    if layout.cross_gap > 0.0 {
                        let property = match layout.axis {
                            Axis::Horizontal => "row-gap",
                            Axis::Vertical => "column-gap",
                        };
                        element.declare(property, px(layout.cross_gap));
                    }
                }
                let has_absolute_child = layout.children.iter().any(|c| c.absolute);
                if has_absolute_child && !matches!(placement, Placement::Absolute { .. }) {
                    element.declare("position", "relative");
                }
            }
            LayoutBox::Absolute { .. } => {
                if !matches!(placement, Placement::Absolute { .. }) {
                    element.declare("position", "relative");
                }
            }
        }
    }

    fn box_style(&self, style: &StyleDescriptor, element: &mut Element) {
        match style.background() {
            Some(Fill::Solid { color }) => {
                element.declare("background-color", self.color(color));
            }
            Some(Fill::Gradient { gradient }) => element.declare("background", gradient.to_css()),
            _ => {}
        }
        if let Some(stroke) = &style.stroke {
            let value = format!("{} solid {}", px(stroke.weight), self.color(&stroke.color));
            match stroke.align {
                StrokeAlign::Outside => element.declare("outline", value),
                StrokeAlign::Center => {
                    element.declare("outline", value);
                    element.declare("outline-offset", px(-stroke.weight / 2.0));
                }
                _ => {
                    element.declare("border", value);
                    element.declare("box-sizing", "border-box");
                }
            }
        }
        corner_radius(&style.corner_radius, element);
        if !style.shadows.is_empty() {
            let shadows = style
                .shadows
                .iter()
                .map(|s| {
                    format!(
                        "{}{} {} {} {} {}",
                        if s.inset { "inset " } else { "" },
                        px(s.offset_x),
                        px(s.offset_y),
                        px(s.blur),
                        px(s.spread),
                        self.color(&s.color)
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            element.declare("box-shadow", shadows);
        }
        if style.clips_content {
            element.declare("overflow", "hidden");
        }
        common_effects(style, element);
    }

    fn run_declarations(&self, node: &IntermediateNode, run: &TextRun, element: &mut Element) {
        if let Some(color) = run_color(node, run) {
            element.declare("color", self.color(color));
        }
        for (property, value) in css_typography(&run.typography, self.settings) {
            element.declare(&property, value);
        }
    }

    fn color(&self, color: &ColorSpec) -> String {
        color.to_css(self.settings.use_color_variables)
    }
}

/// CSS declarations for a typography descriptor.
///
/// The family is omitted when it matches the configured base font family.
pub fn css_typography(typography: &Typography, settings: &PluginSettings) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut push = |p: &str, v: String| out.push((p.to_string(), v));

    if !typography.family.is_empty() && typography.family != settings.base_font_family {
        push("font-family", css_font_family(&typography.family));
    }
    push("font-size", px(typography.size));
    push("font-weight", typography.weight.as_str().to_string());
    if typography.italic {
        push("font-style", "italic".to_string());
    }
    match typography.line_height {
        LineHeight::Auto => {}
        LineHeight::Pixels(value) => push("line-height", px(value)),
        LineHeight::Percent(pct) => push("line-height", format!("{}%", format_number(pct))),
    }
    if typography.letter_spacing.abs() > f64::EPSILON {
        push("letter-spacing", px(typography.letter_spacing));
    }
    match typography.align {
        TextAlign::Left => {}
        TextAlign::Center => push("text-align", "center".to_string()),
        TextAlign::Right => push("text-align", "right".to_string()),
        TextAlign::Justify => push("text-align", "justify".to_string()),
    }
    match typography.case {
        TextCase::Original => {}
        TextCase::Upper => push("text-transform", "uppercase".to_string()),
        TextCase::Lower => push("text-transform", "lowercase".to_string()),
        TextCase::Title => push("text-transform", "capitalize".to_string()),
    }
    match typography.decoration {
        TextDecoration::None => {}
        TextDecoration::Underline => push("text-decoration", "underline".to_string()),
        TextDecoration::Strikethrough => push("text-decoration", "line-through".to_string()),
    }
    out
}

fn css_font_family(family: &str) -> String {
    if family.contains(' ') {
        format!("'{}'", family)
    } else {
        family.to_string()
    }
}

fn corner_radius(radius: &CornerRadius, element: &mut Element) {
    match *radius {
        CornerRadius::None => {}
        CornerRadius::All { radius } if radius > 0.0 => element.declare("border-radius", px(radius)),
        CornerRadius::All { .. } => {}
        CornerRadius::Corners {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        } => element.declare(
            "border-radius",
            format!(
                "{} {} {} {}",
                px(top_left),
                px(top_right),
                px(bottom_right),
                px(bottom_left)
            ),
        ),
    }
}

fn common_effects(style: &StyleDescriptor, element: &mut Element) {
    if style.opacity < 1.0 {
        element.declare("opacity", format_number(style.opacity));
    }
    if let Some(blur) = style.layer_blur {
        element.declare("filter", format!("blur({})", px(blur)));
    }
    if let Some(blur) = style.background_blur {
        element.declare("backdrop-filter", format!("blur({})", px(blur)));
    }
}

fn css_padding(padding: &Padding) -> Option<String> {
    if padding.is_zero() {
        return None;
    }
    if let Some(all) = padding.as_uniform() {
        return Some(px(all));
    }
    if let Some((horizontal, vertical)) = padding.as_symmetric() {
        return Some(format!("{} {}", px(vertical), px(horizontal)));
    }
    Some(format!(
        "{} {} {} {}",
        px(padding.top),
        px(padding.right),
        px(padding.bottom),
        px(padding.left)
    ))
}

fn justify_content(distribution: Distribution) -> &'static str {
    match distribution {
        Distribution::Start => "flex-start",
        Distribution::Center => "center",
        Distribution::End => "flex-end",
        Distribution::SpaceBetween => "space-between",
    }
}

fn align_items(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Start => "flex-start",
        Alignment::Center => "center",
        Alignment::End => "flex-end",
        Alignment::Baseline => "baseline",
    }
}

fn css_url(url: &str) -> String {
    format!("'{}'", url.replace('\'', "%27"))
}

fn px(value: f64) -> String {
    let formatted = format_number(value);
    if formatted == "0" {
        formatted
    } else {
        format!("{}px", formatted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::fixtures;
    use scenecode_core::{AssetReference, HtmlGenerationMode};
    use scenecode_normalize::{ImageData, IntermediateNode};

    fn generate(nodes: &[IntermediateNode], settings: &PluginSettings) -> String {
        HtmlGenerator::new().generate(nodes, settings).unwrap().code
    }

    #[test]
    fn test_horizontal_auto_layout_is_flex() {
        let code = generate(&fixtures::tree(fixtures::row()), &PluginSettings::default());
        let root = code.lines().next().unwrap();
        assert!(root.contains("display: flex"));
        assert!(root.contains("gap: 8px"));
        assert!(root.contains("padding: 16px"));
        assert!(root.contains("background-color: #ffffff"));
        assert!(!root.contains("flex-direction"));
        assert_eq!(code.matches("width: 48px; height: 48px").count(), 2);
    }

    #[test]
    fn test_fill_child_and_text_styles() {
        let code = generate(&fixtures::tree(fixtures::card()), &PluginSettings::default());
        assert!(code.contains("flex-direction: column"));
        assert!(code.contains("border-radius: 8px"));
        assert!(code.contains("align-self: stretch"));
        assert!(code.contains("font-family: Inter"));
        assert!(code.contains("font-weight: 700"));
        assert!(code.contains(">Hello 'world'</div>"));
    }

    #[test]
    fn test_absolute_children_are_positioned() {
        let code = generate(&fixtures::tree(fixtures::canvas()), &PluginSettings::default());
        assert!(code.lines().next().unwrap().contains("position: relative"));
        assert!(code.contains("position: absolute; left: 20px; top: 30px"));
    }

    #[test]
    fn test_responsive_root() {
        let settings = PluginSettings {
            responsive_root: true,
            ..Default::default()
        };
        let code = generate(&fixtures::tree(fixtures::row()), &settings);
        assert!(code.lines().next().unwrap().contains("width: 100%"));
    }

    #[test]
    fn test_picture_uses_asset_url() {
        let mut nodes = fixtures::tree(fixtures::box_node("photo", 40.0, 30.0));
        nodes[0].kind = NodeKind::Image(ImageData {
            asset: Some(AssetReference::RemoteUrl {
                url: "https://cdn.example.com/a.png".into(),
            }),
            exclude_children: false,
            flattened: false,
        });
        let code = generate(&nodes, &PluginSettings::default());
        assert!(code.starts_with("<img "));
        assert!(code.contains("src=\"https://cdn.example.com/a.png\""));
        assert!(code.contains("alt=\"photo\""));
    }

    #[test]
    fn test_unknown_node_is_sized_placeholder() {
        let mut nodes = fixtures::tree(fixtures::box_node("x", 40.0, 30.0));
        nodes[0].kind = NodeKind::Unknown {
            host_type: "STICKY".into(),
        };
        let code = generate(&nodes, &PluginSettings::default());
        assert!(code.contains("src=\"https://placehold.co/40x30\""));
    }

    #[test]
    fn test_modes_share_the_walk() {
        let nodes = fixtures::tree(fixtures::card());
        let mut settings = PluginSettings::default();

        settings.html_generation_mode = HtmlGenerationMode::Jsx;
        let jsx = generate(&nodes, &settings);
        assert!(jsx.contains("style={{width: \"200px\", height: \"120px\", display: \"flex\""));

        settings.html_generation_mode = HtmlGenerationMode::StyledComponents;
        let styled = generate(&nodes, &settings);
        assert!(styled.contains("const Card = styled.div`"));
        assert!(styled.contains("<Card>"));

        settings.html_generation_mode = HtmlGenerationMode::Svelte;
        let svelte = generate(&nodes, &settings);
        assert!(svelte.contains("<div class=\"card\">"));
        assert!(svelte.contains("<style>"));
    }

    #[test]
    fn test_text_styles_report() {
        let out = HtmlGenerator::new()
            .generate(&fixtures::tree(fixtures::card()), &PluginSettings::default())
            .unwrap();
        assert!(out.text_styles.contains("font-size: 16px;"));
        assert!(out.text_styles.contains("font-weight: 700;"));
    }

    #[test]
    fn test_base_font_family_omitted() {
        let settings = PluginSettings {
            base_font_family: "Inter".into(),
            ..Default::default()
        };
        let code = generate(&fixtures::tree(fixtures::card()), &settings);
        assert!(!code.contains("font-family"));
    }
}
