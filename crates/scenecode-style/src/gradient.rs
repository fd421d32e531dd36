//! Linear gradient geometry and per-target rendering.
//!
//! A [`GradientSpec`] is the single source of truth for a gradient: both the
//! CSS preview shown in the UI and the framework-specific export value are
//! derived from the same stop list and angle.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use scenecode_core::{Framework, Paint, PaintType, Point, Rgb};

use crate::literals::{css_color, flutter_color, format_number, swiftui_color};

/// A resolved gradient stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient line, `0.0..=1.0`
    pub position: f64,
    pub color: Rgb,
    pub alpha: f64,
}

/// Gradient kinds the generators can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    Linear,
    Radial,
}

/// A resolved gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    pub kind: GradientKind,
    /// CSS angle in degrees: 0 points up, 90 points right
    pub angle: f64,
    /// Start handle in unit coordinates
    pub start: Point,
    /// End handle in unit coordinates
    pub end: Point,
    pub stops: Vec<GradientStop>,
}

impl GradientSpec {
    /// Resolve a host gradient paint. Returns `None` for non-gradient paints
    /// and for gradients with no stops.
    pub fn from_paint(paint: &Paint) -> Option<Self> {
        let kind = match paint.paint_type {
            PaintType::GradientLinear => GradientKind::Linear,
            PaintType::GradientRadial | PaintType::GradientDiamond | PaintType::GradientAngular => {
                GradientKind::Radial
            }
            _ => return None,
        };
        if paint.gradient_stops.is_empty() {
            return None;
        }

        let start = paint
            .gradient_handle_positions
            .first()
            .copied()
            .unwrap_or(Point::new(0.0, 0.5));
        let end = paint
            .gradient_handle_positions
            .get(1)
            .copied()
            .unwrap_or(Point::new(1.0, 0.5));

        let paint_opacity = if paint.opacity.is_finite() { paint.opacity } else { 1.0 };
        let mut stops: Vec<GradientStop> = paint
            .gradient_stops
            .iter()
            .map(|s| GradientStop {
                position: if s.position.is_finite() {
                    s.position.clamp(0.0, 1.0)
                } else {
                    0.0
                },
                color: s.color.rgb(),
                alpha: (s.color.a * paint_opacity).clamp(0.0, 1.0),
            })
            .collect();
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));

        Some(Self {
            kind,
            angle: css_angle(start, end),
            start,
            end,
            stops,
        })
    }

    /// CSS `linear-gradient(...)` or `radial-gradient(...)` for preview and
    /// HTML output.
    pub fn to_css(&self) -> String {
        let stops = self
            .stops
            .iter()
            .map(|s| {
                format!(
                    "{} {}%",
                    css_color(&s.color, s.alpha),
                    format_number(s.position * 100.0)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        match self.kind {
            GradientKind::Linear => {
                format!("linear-gradient({}deg, {})", format_number(self.angle), stops)
            }
            GradientKind::Radial => format!("radial-gradient({})", stops),
        }
    }

    /// Tailwind classes for the gradient.
    ///
    /// Angles on a 45 degree step map to direction utilities, anything else
    /// falls back to an arbitrary background value.
    pub fn to_tailwind(&self, tailwind4: bool) -> String {
        let direction = tailwind_direction(self.angle);
        match (self.kind, direction) {
            (GradientKind::Linear, Some(dir)) if self.stops.len() <= 3 => {
                let prefix = if tailwind4 { "bg-linear-to-" } else { "bg-gradient-to-" };
                let mut classes = vec![format!("{}{}", prefix, dir)];
                let color = |s: &GradientStop| css_color(&s.color, s.alpha).replace(' ', "");
                if let Some(first) = self.stops.first() {
                    classes.push(format!("from-[{}]", color(first)));
                }
                if self.stops.len() == 3 {
                    classes.push(format!("via-[{}]", color(&self.stops[1])));
                }
                if self.stops.len() > 1 {
                    if let Some(last) = self.stops.last() {
                        classes.push(format!("to-[{}]", color(last)));
                    }
                }
                classes.join(" ")
            }
            _ => format!("bg-[{}]", self.to_css().replace(' ', "_")),
        }
    }

    /// Flutter `LinearGradient(...)` / `RadialGradient(...)`.
    pub fn to_flutter(&self) -> String {
        let colors = self
            .stops
            .iter()
            .map(|s| flutter_color(&s.color, s.alpha))
            .collect::<Vec<_>>()
            .join(", ");
        let stops = self
            .stops
            .iter()
            .map(|s| format_number(s.position))
            .collect::<Vec<_>>()
            .join(", ");
        match self.kind {
            GradientKind::Linear => format!(
                "LinearGradient(begin: Alignment({}, {}), end: Alignment({}, {}), colors: [{}], stops: [{}])",
                format_number(self.start.x * 2.0 - 1.0),
                format_number(self.start.y * 2.0 - 1.0),
                format_number(self.end.x * 2.0 - 1.0),
                format_number(self.end.y * 2.0 - 1.0),
                colors,
                stops
            ),
            GradientKind::Radial => {
                format!("RadialGradient(colors: [{}], stops: [{}])", colors, stops)
            }
        }
    }

    /// SwiftUI `LinearGradient(...)` / `RadialGradient(...)`.
    pub fn to_swiftui(&self) -> String {
        let stops = self
            .stops
            .iter()
            .map(|s| {
                format!(
                    ".init(color: {}, location: {})",
                    swiftui_color(&s.color, s.alpha),
                    format_number(s.position)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        match self.kind {
            GradientKind::Linear => format!(
                "LinearGradient(gradient: Gradient(stops: [{}]), startPoint: UnitPoint(x: {}, y: {}), endPoint: UnitPoint(x: {}, y: {}))",
                stops,
                format_number(self.start.x),
                format_number(self.start.y),
                format_number(self.end.x),
                format_number(self.end.y)
            ),
            GradientKind::Radial => format!(
                "RadialGradient(gradient: Gradient(stops: [{}]), center: .center, startRadius: 0, endRadius: 100)",
                stops
            ),
        }
    }

    /// Framework-specific export value.
    pub fn export_value(&self, framework: Framework, tailwind4: bool) -> String {
        match framework {
            Framework::Html => self.to_css(),
            Framework::Tailwind => self.to_tailwind(tailwind4),
            Framework::Flutter => self.to_flutter(),
            Framework::SwiftUi => self.to_swiftui(),
        }
    }
}

/// CSS angle of the line from `start` to `end` in unit space.
fn css_angle(start: Point, end: Point) -> f64 {
    let dir = DVec2::new(end.x - start.x, end.y - start.y);
    if !dir.is_finite() || dir.length_squared() == 0.0 {
        return 90.0;
    }
    // CSS angles are clockwise from "up"; host y grows downward.
    let degrees = dir.x.atan2(-dir.y).to_degrees();
    let normalized = degrees.rem_euclid(360.0);
    (normalized * 100.0).round() / 100.0 % 360.0
}

fn tailwind_direction(angle: f64) -> Option<&'static str> {
    const DIRECTIONS: [&str; 8] = ["t", "tr", "r", "br", "b", "bl", "l", "tl"];
    let step = angle / 45.0;
    if (step - step.round()).abs() > 1e-6 {
        return None;
    }
    let index = (step.round() as i64).rem_euclid(8) as usize;
    Some(DIRECTIONS[index])
}
