//! Color naming and per-framework color conversions.

use serde::{Deserialize, Serialize};

use scenecode_core::{Framework, PluginSettings, Rgb};

use crate::descriptor::{css_variable_name, ColorSpec};
use crate::gradient::GradientSpec;
use crate::literals::{css_color, flutter_color, format_number, swiftui_color};
use crate::palette;

/// A color with its nearest palette name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedColor {
    pub hex: String,
    pub color_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
}

/// Name a color by nearest match against the Tailwind palette.
///
/// `hex` is always the exact input color, never the palette color.
pub fn resolve_color_name(rgb: &Rgb) -> NamedColor {
    NamedColor {
        hex: rgb.to_hex(),
        color_name: palette::nearest(rgb).name.clone(),
        meta: None,
    }
}

/// A solid color as listed in the color panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolidColorConversion {
    pub hex: String,
    pub color_name: String,
    pub export_value: String,
    pub contrast_white: f64,
    pub contrast_black: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
}

impl SolidColorConversion {
    pub fn new(color: &ColorSpec, framework: Framework, settings: &PluginSettings) -> Self {
        let named = resolve_color_name(&color.rgb);
        Self {
            hex: named.hex,
            color_name: named.color_name,
            export_value: color_export_value(color, framework, settings),
            contrast_white: round2(color.rgb.contrast_white()),
            contrast_black: round2(color.rgb.contrast_black()),
            meta: color.variable_name().map(str::to_string),
        }
    }
}

/// A gradient as listed in the color panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearGradientConversion {
    pub css_preview: String,
    pub export_value: String,
}

impl LinearGradientConversion {
    pub fn new(gradient: &GradientSpec, framework: Framework, settings: &PluginSettings) -> Self {
        Self {
            css_preview: gradient.to_css(),
            export_value: gradient.export_value(framework, settings.use_tailwind4),
        }
    }
}

/// The value a generator writes for a color in the given framework.
pub fn color_export_value(color: &ColorSpec, framework: Framework, settings: &PluginSettings) -> String {
    match framework {
        Framework::Html => color.to_css(settings.use_color_variables),
        Framework::Tailwind => tailwind_color_token(color, settings),
        Framework::Flutter => flutter_color(&color.rgb, color.alpha),
        Framework::SwiftUi => swiftui_color(&color.rgb, color.alpha),
    }
}

/// The Tailwind color token that follows a utility prefix such as `bg-`.
///
/// Variable-bound colors take precedence when color variables are on; then
/// palette snapping when `roundTailwindColors` is set; otherwise an
/// arbitrary hex value. Translucent colors carry an `/NN` opacity suffix.
pub fn tailwind_color_token(color: &ColorSpec, settings: &PluginSettings) -> String {
    let base = match color.variable_name() {
        Some(name) if settings.use_color_variables => {
            if settings.use_tailwind4 {
                format!("(--{})", css_variable_name(name))
            } else {
                format!("[var(--{})]", css_variable_name(name))
            }
        }
        _ if is_pure(&color.rgb, &Rgb::BLACK) => "black".to_string(),
        _ if is_pure(&color.rgb, &Rgb::WHITE) => "white".to_string(),
        _ if settings.round_tailwind_colors => palette::nearest(&color.rgb).name.clone(),
        _ => format!("[{}]", css_color(&color.rgb, 1.0)),
    };
    if color.alpha < 1.0 {
        let percent = (color.alpha.clamp(0.0, 1.0) * 100.0).round();
        format!("{}/{}", base, format_number(percent))
    } else {
        base
    }
}

fn is_pure(a: &Rgb, b: &Rgb) -> bool {
    a.distance_sq(b) == 0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_color_name_keeps_exact_hex() {
        let c = Rgb::from_hex("#3a80f0").unwrap();
        let named = resolve_color_name(&c);
        assert_eq!(named.hex, "#3a80f0");
        assert_eq!(named.color_name, "blue-500");
    }

    #[test]
    fn test_tailwind_token_modes() {
        let mut settings = PluginSettings::default();
        let near_blue = ColorSpec::literal(Rgb::from_hex("#3a80f0").unwrap(), 1.0);
        assert_eq!(tailwind_color_token(&near_blue, &settings), "blue-500");

        settings.round_tailwind_colors = false;
        assert_eq!(tailwind_color_token(&near_blue, &settings), "[#3a80f0]");

        let faded = ColorSpec::literal(Rgb::BLACK, 0.5);
        assert_eq!(tailwind_color_token(&faded, &settings), "black/50");

        let var = ColorSpec::variable("Brand", Rgb::WHITE, 1.0);
        assert_eq!(tailwind_color_token(&var, &settings), "[var(--brand)]");
        settings.use_tailwind4 = true;
        assert_eq!(tailwind_color_token(&var, &settings), "(--brand)");
    }

    #[test]
    fn test_solid_conversion_carries_variable_meta() {
        let settings = PluginSettings::default();
        let var = ColorSpec::variable("Surface", Rgb::WHITE, 1.0);
        let conv = SolidColorConversion::new(&var, Framework::Flutter, &settings);
        assert_eq!(conv.meta.as_deref(), Some("Surface"));
        assert_eq!(conv.export_value, "Color(0xFFFFFFFF)");
        assert_eq!(conv.contrast_black, 21.0);
    }

    proptest::proptest! {
        #[test]
        fn prop_color_name_round_trip(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let named = resolve_color_name(&Rgb::from_rgb8(r, g, b));
            let parsed = Rgb::from_hex(&named.hex).unwrap();
            proptest::prop_assert_eq!(parsed.to_rgb8(), (r, g, b));
        }

        #[test]
        fn prop_color_name_deterministic(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let c = Rgb::from_rgb8(r, g, b);
            proptest::prop_assert_eq!(resolve_color_name(&c), resolve_color_name(&c));
        }
    }
}
