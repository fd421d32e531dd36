//! Host node → [`StyleDescriptor`] resolution.

use scenecode_core::{EffectType, HostNode, Paint, PaintType};

use crate::descriptor::{ColorSpec, CornerRadius, Fill, Shadow, StyleDescriptor, Stroke};
use crate::gradient::GradientSpec;
use crate::typography::Typography;

/// Resolve the visual style of a host node.
///
/// Invisible paints and effects are dropped. Non-finite numbers resolve to
/// neutral values so generators never see NaN.
pub fn resolve_style(node: &HostNode) -> StyleDescriptor {
    let fills = node.fills.iter().filter_map(resolve_fill).collect();

    let stroke = if finite_or_zero(node.stroke_weight) > 0.0 {
        node.strokes
            .iter()
            .rev()
            .find_map(resolve_solid)
            .map(|color| Stroke {
                color,
                weight: node.stroke_weight,
                align: node.stroke_align,
            })
    } else {
        None
    };

    let mut shadows = Vec::new();
    let mut layer_blur = None;
    let mut background_blur = None;
    for effect in node.effects.iter().filter(|e| e.visible) {
        match effect.effect_type {
            EffectType::DropShadow | EffectType::InnerShadow => shadows.push(Shadow {
                inset: effect.effect_type == EffectType::InnerShadow,
                offset_x: finite_or_zero(effect.offset.x),
                offset_y: finite_or_zero(effect.offset.y),
                blur: finite_or_zero(effect.radius).max(0.0),
                spread: finite_or_zero(effect.spread),
                color: ColorSpec::literal(effect.color.rgb(), effect.color.a.clamp(0.0, 1.0)),
            }),
            EffectType::LayerBlur => layer_blur = Some(finite_or_zero(effect.radius).max(0.0)),
            EffectType::BackgroundBlur => {
                background_blur = Some(finite_or_zero(effect.radius).max(0.0))
            }
            EffectType::Unknown => {}
        }
    }

    let typography = if node.node_type == "TEXT" {
        Some(
            node.style
                .as_ref()
                .map(Typography::from_type_style)
                .unwrap_or_default(),
        )
    } else {
        None
    };

    let opacity = if node.opacity.is_finite() {
        node.opacity.clamp(0.0, 1.0)
    } else {
        1.0
    };

    StyleDescriptor {
        fills,
        stroke,
        corner_radius: resolve_corner_radius(node),
        opacity,
        shadows,
        layer_blur,
        background_blur,
        typography,
        clips_content: node.clips_content,
    }
}

/// Resolve a single paint into a fill layer.
pub fn resolve_fill(paint: &Paint) -> Option<Fill> {
    if !paint.visible {
        return None;
    }
    match paint.paint_type {
        PaintType::Solid => resolve_solid(paint).map(|color| Fill::Solid { color }),
        PaintType::Image => Some(Fill::Image {
            hash: paint.image_hash.clone(),
        }),
        PaintType::GradientLinear
        | PaintType::GradientRadial
        | PaintType::GradientAngular
        | PaintType::GradientDiamond => {
            GradientSpec::from_paint(paint).map(|gradient| Fill::Gradient { gradient })
        }
        PaintType::Video | PaintType::Unknown => None,
    }
}

/// Resolve a visible solid paint into a color.
pub fn resolve_solid(paint: &Paint) -> Option<ColorSpec> {
    if !paint.visible || paint.paint_type != PaintType::Solid {
        return None;
    }
    let color = paint.color?;
    let opacity = if paint.opacity.is_finite() { paint.opacity } else { 1.0 };
    let alpha = (color.a * opacity).clamp(0.0, 1.0);
    Some(match &paint.bound_variable {
        Some(name) => ColorSpec::variable(name.clone(), color.rgb(), alpha),
        None => ColorSpec::literal(color.rgb(), alpha),
    })
}

fn resolve_corner_radius(node: &HostNode) -> CornerRadius {
    if let Some([tl, tr, br, bl]) = node.rectangle_corner_radii {
        let corners = [tl, tr, br, bl].map(|r| finite_or_zero(r).max(0.0));
        if corners.iter().all(|r| *r == corners[0]) {
            return uniform(corners[0]);
        }
        return CornerRadius::Corners {
            top_left: corners[0],
            top_right: corners[1],
            bottom_right: corners[2],
            bottom_left: corners[3],
        };
    }
    uniform(node.corner_radius.map(finite_or_zero).unwrap_or(0.0).max(0.0))
}

fn uniform(radius: f64) -> CornerRadius {
    if radius > 0.0 {
        CornerRadius::All { radius }
    } else {
        CornerRadius::None
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenecode_core::{Effect, Rgb, Rgba, TypeStyle};

    #[test]
    fn test_resolve_fills_and_stroke() {
        let mut node = HostNode::new("1", "Card", "FRAME")
            .with_fill(Paint::solid(Rgba::new(1.0, 1.0, 1.0, 1.0)))
            .with_fill(Paint {
                visible: false,
                ..Paint::solid(Rgba::new(1.0, 0.0, 0.0, 1.0))
            });
        node.strokes.push(Paint::variable("Border", Rgba::new(0.0, 0.0, 0.0, 1.0)));
        node.stroke_weight = 2.0;
        node.corner_radius = Some(8.0);

        let style = resolve_style(&node);
        assert_eq!(style.fills.len(), 1);
        assert_eq!(style.solid_fill().unwrap().rgb, Rgb::WHITE);
        let stroke = style.stroke.unwrap();
        assert_eq!(stroke.color.variable_name(), Some("Border"));
        assert_eq!(style.corner_radius, CornerRadius::All { radius: 8.0 });
        assert!(style.typography.is_none());
    }

    #[test]
    fn test_paint_opacity_multiplies_alpha() {
        let paint = Paint {
            opacity: 0.5,
            ..Paint::solid(Rgba::new(0.0, 0.0, 0.0, 0.5))
        };
        assert_eq!(resolve_solid(&paint).unwrap().alpha, 0.25);
    }

    #[test]
    fn test_effects_and_text() {
        let mut node = HostNode::new("2", "Label", "TEXT");
        node.style = Some(TypeStyle {
            font_weight: 600.0,
            ..Default::default()
        });
        node.effects.push(Effect {
            offset: scenecode_core::Point::new(0.0, 4.0),
            radius: 8.0,
            ..Default::default()
        });
        node.effects.push(Effect {
            effect_type: EffectType::LayerBlur,
            radius: f64::NAN,
            ..Default::default()
        });
        let style = resolve_style(&node);
        assert_eq!(style.shadows.len(), 1);
        assert_eq!(style.shadows[0].offset_y, 4.0);
        assert_eq!(style.layer_blur, Some(0.0));
        assert_eq!(style.typography.unwrap().weight.as_str(), "600");
    }

    #[test]
    fn test_mixed_corner_radii() {
        let mut node = HostNode::new("3", "Tab", "RECTANGLE");
        node.rectangle_corner_radii = Some([8.0, 8.0, 0.0, 0.0]);
        assert!(matches!(
            resolve_style(&node).corner_radius,
            CornerRadius::Corners { top_left, bottom_left, .. } if top_left == 8.0 && bottom_left == 0.0
        ));
    }
}
