//! Tailwind generator: HTML or JSX with utility classes.
//!
//! Pixel values snap to the nearest step of the default theme scales when
//! `roundTailwindValues` is set and the step is within `thresholdPercent`
//! of the value; everything else becomes an arbitrary `[Npx]` value.
//! Color snapping is a separate toggle handled by
//! [`tailwind_color_token`].

use scenecode_core::{Framework, PluginSettings};
use scenecode_layout::{Alignment, Axis, Distribution, LayoutBox, Padding};
use scenecode_normalize::{IntermediateNode, NodeKind, TextRun};
use scenecode_style::{
    css_color, format_number, tailwind_color_token, ColorSpec, CornerRadius, Fill, LineHeight,
    StyleDescriptor, TextAlign, TextCase, TextDecoration, Typography,
};

use super::markup::{render_markup, Styler};
use super::syntax::{syntax_for, Element};
use super::{
    asset_or_placeholder, dimensions, rendered_children, run_color, CodeGenerator, Dimension,
    GeneratedCode, Placement,
};
use crate::error::Result;
use crate::text_styles::{distinct_typographies, text_styles_report};

/// Spacing scale in rem.
const SPACING: &[(f64, &str)] = &[
    (0.125, "0.5"),
    (0.25, "1"),
    (0.375, "1.5"),
    (0.5, "2"),
    (0.625, "2.5"),
    (0.75, "3"),
    (0.875, "3.5"),
    (1.0, "4"),
    (1.25, "5"),
    (1.5, "6"),
    (1.75, "7"),
    (2.0, "8"),
    (2.25, "9"),
    (2.5, "10"),
    (2.75, "11"),
    (3.0, "12"),
    (3.5, "14"),
    (4.0, "16"),
    (5.0, "20"),
    (6.0, "24"),
    (7.0, "28"),
    (8.0, "32"),
    (9.0, "36"),
    (10.0, "40"),
    (11.0, "44"),
    (12.0, "48"),
    (13.0, "52"),
    (14.0, "56"),
    (15.0, "60"),
    (16.0, "64"),
    (18.0, "72"),
    (20.0, "80"),
    (24.0, "96"),
];

/// Font size scale in rem.
const FONT_SIZES: &[(f64, &str)] = &[
    (0.75, "xs"),
    (0.875, "sm"),
    (1.0, "base"),
    (1.125, "lg"),
    (1.25, "xl"),
    (1.5, "2xl"),
    (1.875, "3xl"),
    (2.25, "4xl"),
    (3.0, "5xl"),
    (3.75, "6xl"),
    (4.5, "7xl"),
    (6.0, "8xl"),
    (8.0, "9xl"),
];

/// Border radius scale in rem; an empty name is the bare `rounded`.
const RADII_V3: &[(f64, &str)] = &[
    (0.125, "sm"),
    (0.25, ""),
    (0.375, "md"),
    (0.5, "lg"),
    (0.75, "xl"),
    (1.0, "2xl"),
    (1.5, "3xl"),
];

const RADII_V4: &[(f64, &str)] = &[
    (0.125, "xs"),
    (0.25, "sm"),
    (0.375, "md"),
    (0.5, "lg"),
    (0.75, "xl"),
    (1.0, "2xl"),
    (1.5, "3xl"),
    (2.0, "4xl"),
];

/// Fixed line heights in rem.
const LEADING: &[(f64, &str)] = &[
    (0.75, "3"),
    (1.0, "4"),
    (1.25, "5"),
    (1.5, "6"),
    (1.75, "7"),
    (2.0, "8"),
    (2.25, "9"),
    (2.5, "10"),
];

/// Relative line heights as a multiple of the font size.
const LEADING_RATIOS: &[(f64, &str)] = &[
    (1.0, "none"),
    (1.25, "tight"),
    (1.375, "snug"),
    (1.5, "normal"),
    (1.625, "relaxed"),
    (2.0, "loose"),
];

/// Letter spacing in em.
const TRACKING: &[(f64, &str)] = &[
    (-0.05, "tighter"),
    (-0.025, "tight"),
    (0.025, "wide"),
    (0.05, "wider"),
    (0.1, "widest"),
];

/// Maps pixel values onto Tailwind's theme scales.
#[derive(Debug, Clone, Copy)]
pub struct TailwindScale<'a> {
    settings: &'a PluginSettings,
}

impl<'a> TailwindScale<'a> {
    pub fn new(settings: &'a PluginSettings) -> Self {
        Self { settings }
    }

    /// Apply the custom prefix to a utility.
    pub fn utility(&self, class: &str) -> String {
        format!("{}{}", self.settings.custom_tailwind_prefix, class)
    }

    /// Spacing suffix for a pixel value: `4`, `px`, `0` or `[13px]`.
    pub fn spacing(&self, px: f64) -> String {
        if px.abs() < 0.005 {
            return "0".to_string();
        }
        if px < 0.0 {
            return arbitrary_px(px);
        }
        if (px - 1.0).abs() < 0.005 {
            return "px".to_string();
        }
        self.snap(SPACING, self.rem(px))
            .map(str::to_string)
            .unwrap_or_else(|| arbitrary_px(px))
    }

    /// `text-sm` or `text-[13px]`.
    pub fn font_size(&self, px: f64) -> String {
        match self.snap(FONT_SIZES, self.rem(px)) {
            Some(name) => format!("text-{}", name),
            None => format!("text-{}", arbitrary_px(px)),
        }
    }

    /// `rounded-lg`, `rounded-full` or `rounded-[5px]`.
    pub fn radius(&self, px: f64) -> String {
        if px >= 9999.0 {
            return "rounded-full".to_string();
        }
        let table = if self.settings.use_tailwind4 { RADII_V4 } else { RADII_V3 };
        match self.snap(table, self.rem(px)) {
            Some("") => "rounded".to_string(),
            Some(name) => format!("rounded-{}", name),
            None => format!("rounded-{}", arbitrary_px(px)),
        }
    }

    /// `leading-6`, `leading-tight` or `leading-[22px]`.
    pub fn line_height(&self, line_height: LineHeight, font_size: f64) -> Option<String> {
        let class = match line_height {
            LineHeight::Auto => return None,
            LineHeight::Pixels(px) => match self.snap(LEADING, self.rem(px)) {
                Some(name) => format!("leading-{}", name),
                None => format!("leading-{}", arbitrary_px(px)),
            },
            LineHeight::Percent(pct) => {
                let ratio = pct / 100.0;
                match self.snap(LEADING_RATIOS, ratio) {
                    Some(name) => format!("leading-{}", name),
                    None => match LineHeight::Percent(pct).to_pixels(font_size) {
                        Some(px) => format!("leading-{}", arbitrary_px(px)),
                        None => return None,
                    },
                }
            }
        };
        Some(class)
    }

    /// `tracking-wide` or `tracking-[0.5px]`; `None` for zero.
    pub fn letter_spacing(&self, px: f64, font_size: f64) -> Option<String> {
        if px.abs() < 0.005 {
            return None;
        }
        let em = px / font_size.max(1.0);
        let named = self.settings.round_tailwind_values.then(|| {
            TRACKING
                .iter()
                .find(|(value, _)| (value - em).abs() < 0.005)
                .map(|(_, name)| *name)
        });
        Some(match named.flatten() {
            Some(name) => format!("tracking-{}", name),
            None => format!("tracking-{}", arbitrary_px(px)),
        })
    }

    /// `opacity-50` or `opacity-[0.37]`.
    pub fn opacity(&self, opacity: f64) -> String {
        let percent = (opacity.clamp(0.0, 1.0) * 100.0).round() as i64;
        if self.settings.round_tailwind_values && percent % 5 == 0 {
            format!("opacity-{}", percent)
        } else {
            format!("opacity-[{}]", format_number(opacity))
        }
    }

    /// `border`, `border-2` or `border-[3px]`.
    pub fn border_width(&self, px: f64) -> String {
        let rounded = px.round();
        if (px - rounded).abs() < 0.005 {
            match rounded as i64 {
                1 => return "border".to_string(),
                2 | 4 | 8 => return format!("border-{}", rounded as i64),
                _ => {}
            }
        }
        format!("border-{}", arbitrary_px(px))
    }

    fn rem(&self, px: f64) -> f64 {
        let base = if self.settings.base_font_size > 0.0 {
            self.settings.base_font_size
        } else {
            16.0
        };
        px / base
    }

    /// Nearest scale entry, if close enough.
    fn snap(&self, table: &[(f64, &'static str)], value: f64) -> Option<&'static str> {
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        let (key, name) = table.iter().copied().min_by(|a, b| {
            (a.0 - value)
                .abs()
                .partial_cmp(&(b.0 - value).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        let error = (key - value).abs();
        let accepted = if self.settings.round_tailwind_values {
            error / value * 100.0 <= self.settings.threshold_percent
        } else {
            error < 1e-6
        };
        accepted.then_some(name)
    }
}

fn arbitrary_px(px: f64) -> String {
    format!("[{}px]", format_number(px))
}

/// Generates markup styled with Tailwind utilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct TailwindGenerator;

impl TailwindGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGenerator for TailwindGenerator {
    fn framework(&self) -> Framework {
        Framework::Tailwind
    }

    fn generate(&self, nodes: &[IntermediateNode], settings: &PluginSettings) -> Result<GeneratedCode> {
        let syntax = syntax_for(settings, true);
        let styler = TailwindStyler {
            settings,
            scale: TailwindScale::new(settings),
        };
        let code = render_markup(nodes, settings, syntax.as_ref(), &styler);
        let text_styles = text_styles_report(&distinct_typographies(nodes), |typography| {
            tailwind_typography(typography, settings).join(" ")
        });
        Ok(GeneratedCode { code, text_styles })
    }
}

/// Tailwind classes for a typography descriptor.
pub fn tailwind_typography(typography: &Typography, settings: &PluginSettings) -> Vec<String> {
    let scale = TailwindScale::new(settings);
    let mut classes = vec![scale.font_size(typography.size)];
    if !typography.family.is_empty() && typography.family != settings.base_font_family {
        classes.push(format!("font-['{}']", typography.family.replace(' ', "_")));
    }
    classes.push(format!("font-{}", typography.weight.tailwind_name()));
    if typography.italic {
        classes.push("italic".to_string());
    }
    classes.extend(scale.line_height(typography.line_height, typography.size));
    classes.extend(scale.letter_spacing(typography.letter_spacing, typography.size));
    match typography.align {
        TextAlign::Left => {}
        TextAlign::Center => classes.push("text-center".to_string()),
        TextAlign::Right => classes.push("text-right".to_string()),
        TextAlign::Justify => classes.push("text-justify".to_string()),
    }
    match typography.case {
        TextCase::Original => {}
        TextCase::Upper => classes.push("uppercase".to_string()),
        TextCase::Lower => classes.push("lowercase".to_string()),
        TextCase::Title => classes.push("capitalize".to_string()),
    }
    match typography.decoration {
        TextDecoration::None => {}
        TextDecoration::Underline => classes.push("underline".to_string()),
        TextDecoration::Strikethrough => classes.push("line-through".to_string()),
    }
    classes
        .into_iter()
        .map(|class| scale.utility(&class))
        .collect()
}

struct TailwindStyler<'a> {
    settings: &'a PluginSettings,
    scale: TailwindScale<'a>,
}

impl Styler for TailwindStyler<'_> {
    fn style_node(&self, node: &IntermediateNode, placement: Placement<'_>, element: &mut Element) {
        let mut classes = Vec::new();
        self.position(placement, &mut classes);
        self.size(node, placement, &mut classes);
        if !rendered_children(node).is_empty() {
            self.container(node, placement, &mut classes);
        }

        match &node.kind {
            NodeKind::Text(text) => {
                if !text.is_mixed() {
                    if let Some(run) = text.runs.first() {
                        self.run_classes(node, run, &mut classes);
                    }
                }
                self.effects(&node.style, &mut classes);
            }
            NodeKind::Image(_) if node.renders_children() => {
                let url = asset_or_placeholder(node).url().replace('\'', "%27").replace(' ', "%20");
                classes.push(format!("bg-[url('{}')]", url));
                classes.push("bg-cover".to_string());
                classes.push("bg-center".to_string());
                self.box_style(&node.style, &mut classes);
            }
            NodeKind::Frame => self.box_style(&node.style, &mut classes),
            _ => {
                self.corner_radius(&node.style.corner_radius, &mut classes);
                self.effects(&node.style, &mut classes);
            }
        }

        if node.rotation.abs() > f64::EPSILON {
            classes.push(format!("rotate-[{}deg]", format_number(-node.rotation)));
        }

        for class in classes {
            element.class(self.scale.utility(&class));
        }
    }

    fn style_run(&self, node: &IntermediateNode, run: &TextRun, element: &mut Element) {
        let mut classes = Vec::new();
        self.run_classes(node, run, &mut classes);
        for class in classes {
            element.class(self.scale.utility(&class));
        }
    }
}

impl TailwindStyler<'_> {
    fn position(&self, placement: Placement<'_>, classes: &mut Vec<String>) {
        if let Placement::Absolute { x, y, .. } = placement {
            classes.push("absolute".to_string());
            classes.push(format!("left-{}", self.scale.spacing(x)));
            classes.push(format!("top-{}", self.scale.spacing(y)));
        }
    }

    fn size(&self, node: &IntermediateNode, placement: Placement<'_>, classes: &mut Vec<String>) {
        let (width, height) = dimensions(node, placement, self.settings);
        for (axis, dimension, prefix) in [(Axis::Horizontal, width, "w"), (Axis::Vertical, height, "h")] {
            match dimension {
                Dimension::Fixed(value) => {
                    classes.push(format!("{}-{}", prefix, self.scale.spacing(value)))
                }
                Dimension::Fill if placement.flow_axis() == Some(axis) => {
                    classes.push("flex-1".to_string())
                }
                Dimension::Fill if placement.flow_axis().is_some() => {
                    classes.push("self-stretch".to_string())
                }
                Dimension::Fill => classes.push(format!("{}-full", prefix)),
                Dimension::Auto => {}
            }
        }
    }

    fn container(&self, node: &IntermediateNode, placement: Placement<'_>, classes: &mut Vec<String>) {
        let positioned = matches!(placement, Placement::Absolute { .. });
        match &node.layout {
            LayoutBox::Directional(layout) => {
                classes.push("flex".to_string());
                if layout.axis == Axis::Vertical {
                    classes.push("flex-col".to_string());
                }
                if layout.gap > 0.0 && layout.distribution != Distribution::SpaceBetween {
                    classes.push(format!("gap-{}", self.scale.spacing(layout.gap)));
                }
                self.padding(&layout.padding, classes);
                match layout.distribution {
                    Distribution::Start => {}
                    Distribution::Center => classes.push("justify-center".to_string()),
                    Distribution::End => classes.push("justify-end".to_string()),
                    Distribution::SpaceBetween => classes.push("justify-between".to_string()),
                }
                classes.push(
                    match layout.alignment {
                        Alignment::Start => "items-start",
                        Alignment::Center => "items-center",
                        Alignment::End => "items-end",
                        Alignment::Baseline => "items-baseline",
                    }
                    .to_string(),
                );
                if layout.wrap {
                    classes.push("flex-wrap".to_string());
                    if layout.cross_gap > 0.0 {
                        let prefix = match layout.axis {
                            Axis::Horizontal => "gap-y",
                            Axis::Vertical => "gap-x",
                        };
                        classes.push(format!("{}-{}", prefix, self.scale.spacing(layout.cross_gap)));
                    }
                }
                if layout.children.iter().any(|c| c.absolute) && !positioned {
                    classes.push("relative".to_string());
                }
            }
            LayoutBox::Absolute { .. } => {
                if !positioned {
                    classes.push("relative".to_string());
                }
            }
        }
    }

    fn padding(&self, padding: &Padding, classes: &mut Vec<String>) {
        if padding.is_zero() {
            return;
        }
        if let Some(all) = padding.as_uniform() {
            classes.push(format!("p-{}", self.scale.spacing(all)));
            return;
        }
        if let Some((horizontal, vertical)) = padding.as_symmetric() {
            if horizontal > 0.0 {
                classes.push(format!("px-{}", self.scale.spacing(horizontal)));
            }
            if vertical > 0.0 {
                classes.push(format!("py-{}", self.scale.spacing(vertical)));
            }
            return;
        }
        for (prefix, value) in [
            ("pt", padding.top),
            ("pr", padding.right),
            ("pb", padding.bottom),
            ("pl", padding.left),
        ] {
            if value > 0.0 {
                classes.push(format!("{}-{}", prefix, self.scale.spacing(value)));
            }
        }
    }

    fn box_style(&self, style: &StyleDescriptor, classes: &mut Vec<String>) {
        match style.background() {
            Some(Fill::Solid { color }) => classes.push(format!("bg-{}", self.color(color))),
            Some(Fill::Gradient { gradient }) => classes.extend(
                gradient
                    .to_tailwind(self.settings.use_tailwind4)
                    .split_whitespace()
                    .map(str::to_string),
            ),
            _ => {}
        }
        if let Some(stroke) = &style.stroke {
            classes.push(self.scale.border_width(stroke.weight));
            classes.push(format!("border-{}", self.color(&stroke.color)));
        }
        self.corner_radius(&style.corner_radius, classes);
        if !style.shadows.is_empty() {
            let shadows = style
                .shadows
                .iter()
                .map(|s| {
                    format!(
                        "{}{}px_{}px_{}px_{}px_{}",
                        if s.inset { "inset_" } else { "" },
                        format_number(s.offset_x),
                        format_number(s.offset_y),
                        format_number(s.blur),
                        format_number(s.spread),
                        css_color(&s.color.rgb, s.color.alpha).replace(' ', "")
                    )
                })
                .collect::<Vec<_>>()
                .join(",");
            classes.push(format!("shadow-[{}]", shadows));
        }
        if style.clips_content {
            classes.push("overflow-hidden".to_string());
        }
        self.effects(style, classes);
    }

    fn corner_radius(&self, radius: &CornerRadius, classes: &mut Vec<String>) {
        match *radius {
            CornerRadius::None => {}
            CornerRadius::All { radius } if radius > 0.0 => classes.push(self.scale.radius(radius)),
            CornerRadius::All { .. } => {}
            CornerRadius::Corners {
                top_left,
                top_right,
                bottom_right,
                bottom_left,
            } => {
                for (corner, value) in [
                    ("tl", top_left),
                    ("tr", top_right),
                    ("br", bottom_right),
                    ("bl", bottom_left),
                ] {
                    if value > 0.0 {
                        classes.push(self.scale.radius(value).replacen("rounded", &format!("rounded-{}", corner), 1));
                    }
                }
            }
        }
    }

    fn effects(&self, style: &StyleDescriptor, classes: &mut Vec<String>) {
        if style.opacity < 1.0 {
            classes.push(self.scale.opacity(style.opacity));
        }
        if let Some(blur) = style.layer_blur {
            classes.push(format!("blur-{}", arbitrary_px(blur)));
        }
        if let Some(blur) = style.background_blur {
            classes.push(format!("backdrop-blur-{}", arbitrary_px(blur)));
        }
    }

    fn run_classes(&self, node: &IntermediateNode, run: &TextRun, classes: &mut Vec<String>) {
        // tailwind_typography applies the prefix itself
        let prefix = &self.settings.custom_tailwind_prefix;
        classes.extend(
            tailwind_typography(&run.typography, self.settings)
                .into_iter()
                .map(|class| class.strip_prefix(prefix.as_str()).map(str::to_string).unwrap_or(class)),
        );
        if let Some(color) = run_color(node, run) {
            classes.push(format!("text-{}", self.color(color)));
        }
    }

    fn color(&self, color: &ColorSpec) -> String {
        tailwind_color_token(color, self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::fixtures;
    use scenecode_core::TailwindGenerationMode;

    fn generate(nodes: &[IntermediateNode], settings: &PluginSettings) -> String {
        TailwindGenerator::new().generate(nodes, settings).unwrap().code
    }

    #[test]
    fn test_horizontal_auto_layout_classes() {
        let code = generate(&fixtures::tree(fixtures::row()), &PluginSettings::default());
        let root = code.lines().next().unwrap();
        assert!(root.starts_with("<div className=\""));
        assert!(root.contains("flex gap-2 p-4"));
        assert!(root.contains("bg-white"));
        assert_eq!(code.matches("w-12 h-12").count(), 2);
    }

    #[test]
    fn test_html_mode_uses_class() {
        let settings = PluginSettings {
            tailwind_generation_mode: TailwindGenerationMode::Html,
            ..Default::default()
        };
        let code = generate(&fixtures::tree(fixtures::row()), &settings);
        assert!(code.starts_with("<div class=\""));
    }

    #[test]
    fn test_spacing_rounding_threshold() {
        let settings = PluginSettings::default();
        let scale = TailwindScale::new(&settings);
        assert_eq!(scale.spacing(16.0), "4");
        assert_eq!(scale.spacing(17.0), "4");
        assert_eq!(scale.spacing(1.0), "px");
        assert_eq!(scale.spacing(0.0), "0");
        assert_eq!(scale.spacing(-4.0), "[-4px]");
        // equidistant steps resolve to the smaller one
        assert_eq!(scale.spacing(13.0), "3");

        let strict = PluginSettings {
            threshold_percent: 1.0,
            ..Default::default()
        };
        assert_eq!(TailwindScale::new(&strict).spacing(17.0), "[17px]");

        let exact = PluginSettings {
            round_tailwind_values: false,
            ..Default::default()
        };
        assert_eq!(TailwindScale::new(&exact).spacing(17.0), "[17px]");
        assert_eq!(TailwindScale::new(&exact).spacing(16.0), "4");
    }

    #[test]
    fn test_base_font_size_changes_scale() {
        let settings = PluginSettings {
            base_font_size: 10.0,
            ..Default::default()
        };
        let scale = TailwindScale::new(&settings);
        assert_eq!(scale.spacing(10.0), "4");
        assert_eq!(scale.font_size(10.0), "text-base");
    }

    #[test]
    fn test_value_and_color_rounding_are_independent() {
        let nodes = fixtures::tree(fixtures::card());
        let settings = PluginSettings {
            round_tailwind_values: false,
            ..Default::default()
        };
        let code = generate(&nodes, &settings);
        assert!(code.contains("bg-blue-500"));
        assert!(code.contains("w-[200px]"));

        let settings = PluginSettings {
            round_tailwind_colors: false,
            ..Default::default()
        };
        let code = generate(&nodes, &settings);
        assert!(code.contains("bg-[#3b82f5]"));
        assert!(code.contains("w-48"));
    }

    #[test]
    fn test_scales() {
        let settings = PluginSettings::default();
        let scale = TailwindScale::new(&settings);
        assert_eq!(scale.font_size(14.0), "text-sm");
        assert_eq!(scale.font_size(100.0), "text-8xl");
        assert_eq!(scale.radius(8.0), "rounded-lg");
        assert_eq!(scale.radius(4.0), "rounded");
        assert_eq!(scale.radius(99999.0), "rounded-full");
        assert_eq!(scale.opacity(0.5), "opacity-50");
        assert_eq!(scale.opacity(0.37), "opacity-[0.37]");
        assert_eq!(scale.border_width(1.0), "border");
        assert_eq!(scale.border_width(3.0), "border-[3px]");
        assert_eq!(scale.line_height(LineHeight::Percent(150.0), 16.0).as_deref(), Some("leading-normal"));
        assert_eq!(scale.line_height(LineHeight::Pixels(24.0), 16.0).as_deref(), Some("leading-6"));
        assert_eq!(scale.letter_spacing(0.0, 16.0), None);

        let v4 = PluginSettings {
            use_tailwind4: true,
            ..Default::default()
        };
        assert_eq!(TailwindScale::new(&v4).radius(4.0), "rounded-sm");
    }

    #[test]
    fn test_custom_prefix() {
        let settings = PluginSettings {
            custom_tailwind_prefix: "tw-".into(),
            ..Default::default()
        };
        let code = generate(&fixtures::tree(fixtures::card()), &settings);
        assert!(code.contains("tw-flex tw-flex-col"));
        assert!(code.contains("tw-text-base"));
        assert!(!code.contains("tw-tw-"));
    }

    #[test]
    fn test_text_and_fill_child() {
        let code = generate(&fixtures::tree(fixtures::card()), &PluginSettings::default());
        assert!(code.contains("self-stretch"));
        assert!(code.contains("font-['Inter']"));
        assert!(code.contains("font-bold"));
        assert!(code.contains("text-black"));
        assert!(code.contains("rounded-lg"));
    }

    #[test]
    fn test_absolute_child() {
        let code = generate(&fixtures::tree(fixtures::canvas()), &PluginSettings::default());
        assert!(code.lines().next().unwrap().contains("relative"));
        assert!(code.contains("absolute left-5 top-7"));
    }
}
