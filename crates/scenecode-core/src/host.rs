//! The host scene graph as the plugin receives it.
//!
//! Nodes are owned by the host and treated as read-only records. Every field
//! is defaulted so that partially populated or future-versioned node JSON
//! still deserializes; deciding what a node *means* is the normalizer's job.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::types::{Point, Rect, Rgba};

/// A node of the host scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostNode {
    pub id: String,
    pub name: String,
    /// Raw host type tag ("FRAME", "TEXT", "VECTOR", ...)
    #[serde(rename = "type")]
    pub node_type: String,
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, counter-clockwise
    pub rotation: f64,
    pub absolute_bounding_box: Option<Rect>,
    /// Whether the host can render this node to an image
    pub is_exportable: bool,
    pub opacity: f64,
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weight: f64,
    pub stroke_align: StrokeAlign,
    pub effects: Vec<Effect>,
    pub corner_radius: Option<f64>,
    /// Per-corner radii: top-left, top-right, bottom-right, bottom-left
    pub rectangle_corner_radii: Option<[f64; 4]>,
    pub clips_content: bool,

    // Auto layout
    pub layout_mode: HostLayoutMode,
    pub primary_axis_align_items: PrimaryAxisAlign,
    pub counter_axis_align_items: CounterAxisAlign,
    pub item_spacing: f64,
    pub counter_axis_spacing: f64,
    pub padding_left: f64,
    pub padding_right: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
    pub layout_wrap: LayoutWrap,
    pub layout_sizing_horizontal: HostSizing,
    pub layout_sizing_vertical: HostSizing,
    pub layout_positioning: LayoutPositioning,

    // Text
    pub characters: Option<String>,
    pub style: Option<TypeStyle>,
    pub styled_segments: Vec<StyledSegment>,

    pub children: Vec<HostNode>,
}

impl Default for HostNode {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            node_type: String::new(),
            visible: true,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            absolute_bounding_box: None,
            is_exportable: true,
            opacity: 1.0,
            fills: Vec::new(),
            strokes: Vec::new(),
            stroke_weight: 0.0,
            stroke_align: StrokeAlign::default(),
            effects: Vec::new(),
            corner_radius: None,
            rectangle_corner_radii: None,
            clips_content: false,
            layout_mode: HostLayoutMode::default(),
            primary_axis_align_items: PrimaryAxisAlign::default(),
            counter_axis_align_items: CounterAxisAlign::default(),
            item_spacing: 0.0,
            counter_axis_spacing: 0.0,
            padding_left: 0.0,
            padding_right: 0.0,
            padding_top: 0.0,
            padding_bottom: 0.0,
            layout_wrap: LayoutWrap::default(),
            layout_sizing_horizontal: HostSizing::default(),
            layout_sizing_vertical: HostSizing::default(),
            layout_positioning: LayoutPositioning::default(),
            characters: None,
            style: None,
            styled_segments: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl HostNode {
    /// Create a node with an id, name and type tag.
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: node_type.into(),
            ..Default::default()
        }
    }

    /// Set position and size.
    pub fn with_geometry(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Add a child node.
    pub fn with_child(mut self, child: HostNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add a fill paint.
    pub fn with_fill(mut self, paint: Paint) -> Self {
        self.fills.push(paint);
        self
    }

    /// The node's bounding box, preferring the host's absolute box.
    ///
    /// Returns `None` when neither the absolute box nor the local geometry
    /// are finite.
    pub fn bounding_box(&self) -> Option<Rect> {
        if let Some(bb) = self.absolute_bounding_box {
            if bb.is_finite() {
                return Some(bb);
            }
        }
        let local = Rect::new(self.x, self.y, self.width, self.height);
        local.is_finite().then_some(local)
    }

    /// Whether this node uses host auto layout.
    pub fn has_auto_layout(&self) -> bool {
        matches!(self.layout_mode, HostLayoutMode::Horizontal | HostLayoutMode::Vertical)
    }

    /// The first visible image fill, if any.
    pub fn image_fill(&self) -> Option<&Paint> {
        self.fills
            .iter()
            .find(|p| p.visible && p.paint_type == PaintType::Image)
    }

    /// Depth-first iterator over this node and all descendants.
    pub fn descendants(&self) -> Vec<&HostNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            for child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}

/// A fill or stroke paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: PaintType,
    pub visible: bool,
    pub opacity: f64,
    pub color: Option<Rgba>,
    pub gradient_stops: Vec<HostGradientStop>,
    /// Start, end and width handles in normalized node space
    pub gradient_handle_positions: Vec<Point>,
    pub image_hash: Option<String>,
    /// Name of the design variable the color is bound to
    pub bound_variable: Option<String>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            paint_type: PaintType::Solid,
            visible: true,
            opacity: 1.0,
            color: None,
            gradient_stops: Vec::new(),
            gradient_handle_positions: Vec::new(),
            image_hash: None,
            bound_variable: None,
        }
    }
}

impl Paint {
    /// A visible solid paint.
    pub fn solid(color: Rgba) -> Self {
        Self {
            color: Some(color),
            ..Default::default()
        }
    }

    /// A solid paint bound to a design variable.
    pub fn variable(name: impl Into<String>, color: Rgba) -> Self {
        Self {
            color: Some(color),
            bound_variable: Some(name.into()),
            ..Default::default()
        }
    }

    /// A visible image paint.
    pub fn image(hash: impl Into<String>) -> Self {
        Self {
            paint_type: PaintType::Image,
            image_hash: Some(hash.into()),
            ..Default::default()
        }
    }

    /// A linear gradient running between two handle positions.
    pub fn linear_gradient(start: Point, end: Point, stops: Vec<HostGradientStop>) -> Self {
        Self {
            paint_type: PaintType::GradientLinear,
            gradient_handle_positions: vec![start, end],
            gradient_stops: stops,
            ..Default::default()
        }
    }
}

/// Host paint type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    #[default]
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    Video,
    #[serde(other)]
    Unknown,
}

/// A gradient color stop.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostGradientStop {
    pub position: f64,
    pub color: Rgba,
}

/// A visual effect (shadow or blur).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    pub visible: bool,
    pub radius: f64,
    pub spread: f64,
    pub offset: Point,
    pub color: Rgba,
}

impl Default for Effect {
    fn default() -> Self {
        Self {
            effect_type: EffectType::DropShadow,
            visible: true,
            radius: 0.0,
            spread: 0.0,
            offset: Point::default(),
            color: Rgba::new(0.0, 0.0, 0.0, 0.25),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    #[default]
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrokeAlign {
    #[default]
    Inside,
    Center,
    Outside,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostLayoutMode {
    #[default]
    None,
    Horizontal,
    Vertical,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimaryAxisAlign {
    #[default]
    Min,
    Center,
    Max,
    SpaceBetween,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CounterAxisAlign {
    #[default]
    Min,
    Center,
    Max,
    Baseline,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutWrap {
    #[default]
    NoWrap,
    Wrap,
    #[serde(other)]
    Unknown,
}

/// Host child sizing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostSizing {
    #[default]
    Fixed,
    Hug,
    Fill,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutPositioning {
    #[default]
    Auto,
    Absolute,
    #[serde(other)]
    Unknown,
}

/// Typography as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeStyle {
    pub font_family: String,
    pub font_weight: f64,
    pub font_size: f64,
    pub italic: bool,
    pub line_height_px: Option<f64>,
    pub line_height_percent_font_size: Option<f64>,
    /// "PIXELS", "FONT_SIZE_%" or "INTRINSIC_%"
    pub line_height_unit: Option<String>,
    /// Letter spacing in pixels
    pub letter_spacing: f64,
    pub text_align_horizontal: Option<String>,
    pub text_case: Option<String>,
    pub text_decoration: Option<String>,
}

impl Default for TypeStyle {
    fn default() -> Self {
        Self {
            font_family: String::new(),
            font_weight: 400.0,
            font_size: 16.0,
            italic: false,
            line_height_px: None,
            line_height_percent_font_size: None,
            line_height_unit: None,
            letter_spacing: 0.0,
            text_align_horizontal: None,
            text_case: None,
            text_decoration: None,
        }
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyledSegment {
    pub characters: String,
    pub start: usize,
    pub end: usize,
    pub style: Option<TypeStyle>,
    pub fills: Vec<Paint>,
}

/// Image format for host exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExportFormat {
    Png,
    Svg,
    Json,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Json => "application/json",
        }
    }
}

/// Size constraint for host exports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "UPPERCASE")]
pub enum ExportConstraint {
    Scale(f64),
    Width(f64),
    Height(f64),
}

/// Settings for one export request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub format: ExportFormat,
    pub constraint: ExportConstraint,
}

impl ExportSettings {
    /// PNG at 1x scale.
    pub fn png() -> Self {
        Self {
            format: ExportFormat::Png,
            constraint: ExportConstraint::Scale(1.0),
        }
    }

    /// SVG at 1x scale.
    pub fn svg() -> Self {
        Self {
            format: ExportFormat::Svg,
            constraint: ExportConstraint::Scale(1.0),
        }
    }
}

/// Export and visibility capability of the host.
///
/// Visibility toggling is the only mutation the plugin ever performs on the
/// host tree, and only transiently while isolating a node for export.
#[async_trait]
pub trait HostExporter: Send + Sync {
    /// Render a node to bytes.
    async fn export_node(&self, node_id: &str, settings: ExportSettings) -> Result<Vec<u8>, HostError>;

    /// Current visibility of a node, `None` if the node is unknown.
    fn is_visible(&self, node_id: &str) -> Option<bool>;

    /// Change the visibility of a node.
    fn set_visible(&self, node_id: &str, visible: bool);
}

/// The full host environment the orchestrator talks to.
pub trait Host: HostExporter {
    /// The currently selected top-level nodes.
    fn selection(&self) -> Vec<HostNode>;

    /// Open a URL in the user's browser.
    fn open_external(&self, url: &str);
}
