//! Typography resolution.

use serde::{Deserialize, Serialize};

use scenecode_core::TypeStyle;

/// Font weight restricted to the nine standard tri-digit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum FontWeight {
    #[serde(rename = "100")]
    Thin,
    #[serde(rename = "200")]
    ExtraLight,
    #[serde(rename = "300")]
    Light,
    #[default]
    #[serde(rename = "400")]
    Regular,
    #[serde(rename = "500")]
    Medium,
    #[serde(rename = "600")]
    SemiBold,
    #[serde(rename = "700")]
    Bold,
    #[serde(rename = "800")]
    ExtraBold,
    #[serde(rename = "900")]
    Black,
}

impl FontWeight {
    const ALL: [FontWeight; 9] = [
        FontWeight::Thin,
        FontWeight::ExtraLight,
        FontWeight::Light,
        FontWeight::Regular,
        FontWeight::Medium,
        FontWeight::SemiBold,
        FontWeight::Bold,
        FontWeight::ExtraBold,
        FontWeight::Black,
    ];

    /// Snap an arbitrary numeric weight to the nearest hundred in `100..=900`.
    pub fn from_numeric(weight: f64) -> Self {
        if !weight.is_finite() {
            return FontWeight::Regular;
        }
        let index = ((weight / 100.0).round() as i64).clamp(1, 9) - 1;
        Self::ALL[index as usize]
    }

    /// The tri-digit string form, e.g. `"600"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FontWeight::Thin => "100",
            FontWeight::ExtraLight => "200",
            FontWeight::Light => "300",
            FontWeight::Regular => "400",
            FontWeight::Medium => "500",
            FontWeight::SemiBold => "600",
            FontWeight::Bold => "700",
            FontWeight::ExtraBold => "800",
            FontWeight::Black => "900",
        }
    }

    pub fn numeric(&self) -> u16 {
        (*self as u16 + 1) * 100
    }

    /// Tailwind `font-*` suffix.
    pub fn tailwind_name(&self) -> &'static str {
        match self {
            FontWeight::Thin => "thin",
            FontWeight::ExtraLight => "extralight",
            FontWeight::Light => "light",
            FontWeight::Regular => "normal",
            FontWeight::Medium => "medium",
            FontWeight::SemiBold => "semibold",
            FontWeight::Bold => "bold",
            FontWeight::ExtraBold => "extrabold",
            FontWeight::Black => "black",
        }
    }

    /// Case name shared by Flutter `FontWeight.wN00` and SwiftUI `.weight(...)`.
    pub fn swiftui_name(&self) -> &'static str {
        match self {
            FontWeight::Thin => "thin",
            FontWeight::ExtraLight => "ultraLight",
            FontWeight::Light => "light",
            FontWeight::Regular => "regular",
            FontWeight::Medium => "medium",
            FontWeight::SemiBold => "semibold",
            FontWeight::Bold => "bold",
            FontWeight::ExtraBold => "heavy",
            FontWeight::Black => "black",
        }
    }
}

/// Line height as the host expresses it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value")]
pub enum LineHeight {
    #[default]
    Auto,
    Pixels(f64),
    /// Percent of the font size
    Percent(f64),
}

impl LineHeight {
    /// Resolve to pixels for a font size, `None` for auto.
    pub fn to_pixels(&self, font_size: f64) -> Option<f64> {
        match *self {
            LineHeight::Auto => None,
            LineHeight::Pixels(px) => Some(px),
            LineHeight::Percent(pct) => Some(font_size * pct / 100.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    #[default]
    Original,
    Upper,
    Lower,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

/// Resolved text style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub family: String,
    pub weight: FontWeight,
    pub size: f64,
    pub line_height: LineHeight,
    pub letter_spacing: f64,
    pub italic: bool,
    pub align: TextAlign,
    pub case: TextCase,
    pub decoration: TextDecoration,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            family: String::new(),
            weight: FontWeight::Regular,
            size: 16.0,
            line_height: LineHeight::Auto,
            letter_spacing: 0.0,
            italic: false,
            align: TextAlign::Left,
            case: TextCase::Original,
            decoration: TextDecoration::None,
        }
    }
}

impl Typography {
    /// Resolve from a host text style.
    pub fn from_type_style(style: &TypeStyle) -> Self {
        let size = if style.font_size.is_finite() && style.font_size > 0.0 {
            style.font_size
        } else {
            16.0
        };

        let line_height = match style.line_height_unit.as_deref() {
            Some("PIXELS") => style.line_height_px.filter(|v| v.is_finite()).map(LineHeight::Pixels),
            Some("FONT_SIZE_%") | Some("PERCENT") => style
                .line_height_percent_font_size
                .filter(|v| v.is_finite())
                .map(LineHeight::Percent),
            _ => None,
        }
        .unwrap_or_default();

        let align = match style.text_align_horizontal.as_deref() {
            Some("CENTER") => TextAlign::Center,
            Some("RIGHT") => TextAlign::Right,
            Some("JUSTIFIED") => TextAlign::Justify,
            _ => TextAlign::Left,
        };

        let case = match style.text_case.as_deref() {
            Some("UPPER") => TextCase::Upper,
            Some("LOWER") => TextCase::Lower,
            Some("TITLE") => TextCase::Title,
            _ => TextCase::Original,
        };

        let decoration = match style.text_decoration.as_deref() {
            Some("UNDERLINE") => TextDecoration::Underline,
            Some("STRIKETHROUGH") => TextDecoration::Strikethrough,
            _ => TextDecoration::None,
        };

        Self {
            family: style.font_family.clone(),
            weight: FontWeight::from_numeric(style.font_weight),
            size,
            line_height,
            letter_spacing: if style.letter_spacing.is_finite() {
                style.letter_spacing
            } else {
                0.0
            },
            italic: style.italic,
            align,
            case,
            decoration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_snaps_to_hundreds() {
        assert_eq!(FontWeight::from_numeric(450.0), FontWeight::Medium);
        assert_eq!(FontWeight::from_numeric(449.0), FontWeight::Regular);
        assert_eq!(FontWeight::from_numeric(0.0), FontWeight::Thin);
        assert_eq!(FontWeight::from_numeric(1200.0), FontWeight::Black);
        assert_eq!(FontWeight::from_numeric(f64::NAN), FontWeight::Regular);
        assert_eq!(FontWeight::SemiBold.as_str(), "600");
        assert_eq!(FontWeight::SemiBold.numeric(), 600);
    }

    #[test]
    fn test_from_type_style() {
        let style = TypeStyle {
            font_family: "Inter".into(),
            font_weight: 700.0,
            font_size: 24.0,
            line_height_unit: Some("FONT_SIZE_%".into()),
            line_height_percent_font_size: Some(150.0),
            text_align_horizontal: Some("CENTER".into()),
            text_case: Some("UPPER".into()),
            ..Default::default()
        };
        let t = Typography::from_type_style(&style);
        assert_eq!(t.weight, FontWeight::Bold);
        assert_eq!(t.line_height.to_pixels(t.size), Some(36.0));
        assert_eq!(t.align, TextAlign::Center);
        assert_eq!(t.case, TextCase::Upper);
    }

    proptest::proptest! {
        #[test]
        fn prop_weight_always_tri_digit(w in proptest::num::f64::ANY) {
            let s = FontWeight::from_numeric(w).as_str();
            proptest::prop_assert_eq!(s.len(), 3);
            proptest::prop_assert!(s.ends_with("00"));
        }
    }
}
