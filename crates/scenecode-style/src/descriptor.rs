//! Resolved visual style of a node.

use serde::{Deserialize, Serialize};

use scenecode_core::{Rgb, StrokeAlign};

use crate::gradient::GradientSpec;
use crate::literals::css_color;
use crate::typography::Typography;

/// Where a color value came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum ColorSource {
    /// Bound to a named design variable
    Variable(String),
    Literal,
}

/// A resolved color with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSpec {
    pub source: ColorSource,
    pub rgb: Rgb,
    /// Combined color and paint opacity
    pub alpha: f64,
}

impl ColorSpec {
    pub fn literal(rgb: Rgb, alpha: f64) -> Self {
        Self {
            source: ColorSource::Literal,
            rgb,
            alpha,
        }
    }

    pub fn variable(name: impl Into<String>, rgb: Rgb, alpha: f64) -> Self {
        Self {
            source: ColorSource::Variable(name.into()),
            rgb,
            alpha,
        }
    }

    pub fn hex(&self) -> String {
        self.rgb.to_hex()
    }

    /// The bound variable name, if any.
    pub fn variable_name(&self) -> Option<&str> {
        match &self.source {
            ColorSource::Variable(name) => Some(name),
            ColorSource::Literal => None,
        }
    }

    /// CSS value, using `var(--name, fallback)` when requested and bound.
    pub fn to_css(&self, use_variables: bool) -> String {
        let literal = css_color(&self.rgb, self.alpha);
        match self.variable_name() {
            Some(name) if use_variables => format!("var(--{}, {})", css_variable_name(name), literal),
            _ => literal,
        }
    }
}

/// Normalize a design variable name to a CSS custom property name.
pub fn css_variable_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// A single fill layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Fill {
    Solid { color: ColorSpec },
    Gradient { gradient: GradientSpec },
    Image { hash: Option<String> },
}

/// The resolved stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: ColorSpec,
    pub weight: f64,
    pub align: StrokeAlign,
}

/// Corner radius, uniform or per corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CornerRadius {
    #[default]
    None,
    All { radius: f64 },
    Corners {
        top_left: f64,
        top_right: f64,
        bottom_right: f64,
        bottom_left: f64,
    },
}

/// A drop or inner shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub inset: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: ColorSpec,
}

/// Everything a generator needs to style a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    /// Visible fills, bottom layer first
    pub fills: Vec<Fill>,
    pub stroke: Option<Stroke>,
    pub corner_radius: CornerRadius,
    pub opacity: f64,
    pub shadows: Vec<Shadow>,
    pub layer_blur: Option<f64>,
    pub background_blur: Option<f64>,
    pub typography: Option<Typography>,
    pub clips_content: bool,
}

impl Default for StyleDescriptor {
    fn default() -> Self {
        Self {
            fills: Vec::new(),
            stroke: None,
            corner_radius: CornerRadius::None,
            opacity: 1.0,
            shadows: Vec::new(),
            layer_blur: None,
            background_blur: None,
            typography: None,
            clips_content: false,
        }
    }
}

impl StyleDescriptor {
    /// The topmost solid fill.
    pub fn solid_fill(&self) -> Option<&ColorSpec> {
        self.fills.iter().rev().find_map(|f| match f {
            Fill::Solid { color } => Some(color),
            _ => None,
        })
    }

    /// The topmost non-image fill, used as a single background.
    pub fn background(&self) -> Option<&Fill> {
        self.fills.iter().rev().find(|f| !matches!(f, Fill::Image { .. }))
    }

    /// Whether the descriptor adds nothing beyond defaults.
    pub fn is_empty(&self) -> bool {
        self == &StyleDescriptor::default()
    }
}
