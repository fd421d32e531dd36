//! Target-neutral layout description.
//!
//! Nothing here names a CSS property, a Tailwind class or a widget. Each
//! generator maps these types onto its own primitives.

use serde::{Deserialize, Serialize};

use scenecode_core::Rect;

/// Main axis of a directional container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Left to right
    #[default]
    Horizontal,
    /// Top to bottom
    Vertical,
}

/// Distribution of children on the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Distribution {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Alignment of children on the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
    Baseline,
}

/// Padding on all sides.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create uniform padding.
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }

    /// The single value when all sides match.
    pub fn as_uniform(&self) -> Option<f64> {
        (self.top == self.right && self.right == self.bottom && self.bottom == self.left)
            .then_some(self.top)
    }

    /// `(horizontal, vertical)` when left/right and top/bottom match.
    pub fn as_symmetric(&self) -> Option<(f64, f64)> {
        (self.left == self.right && self.top == self.bottom).then_some((self.left, self.top))
    }
}

/// How a child is sized along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePolicy {
    /// Explicit size
    #[default]
    Fixed,
    /// Take the available space in the parent
    Fill,
    /// Shrink to the content
    Hug,
}

/// Sizing of one child inside a directional container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChildSizing {
    pub horizontal: SizePolicy,
    pub vertical: SizePolicy,
    /// Taken out of the flow and positioned absolutely
    pub absolute: bool,
}

impl ChildSizing {
    pub const FIXED: Self = Self {
        horizontal: SizePolicy::Fixed,
        vertical: SizePolicy::Fixed,
        absolute: false,
    };

    /// Policy along the given axis.
    pub fn along(&self, axis: Axis) -> SizePolicy {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }
}

/// An auto-layout container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionalLayout {
    pub axis: Axis,
    pub distribution: Distribution,
    pub alignment: Alignment,
    /// Gap between children on the main axis
    pub gap: f64,
    /// Gap between wrapped rows or columns
    pub cross_gap: f64,
    pub padding: Padding,
    pub wrap: bool,
    /// Frame relative to the parent origin
    pub frame: Rect,
    /// Sizing of each visible child, in child order
    pub children: Vec<ChildSizing>,
}

/// How a node positions itself and its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayoutBox {
    /// Explicit frame relative to the parent origin
    Absolute {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Directional(DirectionalLayout),
}

impl LayoutBox {
    /// The node's frame relative to its parent origin.
    pub fn frame(&self) -> Rect {
        match self {
            LayoutBox::Absolute {
                x,
                y,
                width,
                height,
            } => Rect::new(*x, *y, *width, *height),
            LayoutBox::Directional(d) => d.frame,
        }
    }

    pub fn width(&self) -> f64 {
        self.frame().width
    }

    pub fn height(&self) -> f64 {
        self.frame().height
    }

    pub fn as_directional(&self) -> Option<&DirectionalLayout> {
        match self {
            LayoutBox::Directional(d) => Some(d),
            LayoutBox::Absolute { .. } => None,
        }
    }

    /// Sizing of the child at `index`; fixed for absolute containers.
    pub fn child_sizing(&self, index: usize) -> ChildSizing {
        self.as_directional()
            .and_then(|d| d.children.get(index).copied())
            .unwrap_or(ChildSizing::FIXED)
    }
}

impl Default for LayoutBox {
    fn default() -> Self {
        LayoutBox::Absolute {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }
}
