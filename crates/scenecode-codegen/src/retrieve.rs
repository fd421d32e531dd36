//! Colors and gradients used in a tree, for the color panel.

use scenecode_core::PluginSettings;
use scenecode_normalize::{IntermediateNode, NodeKind};
use scenecode_style::{ColorSpec, Fill, GradientSpec, LinearGradientConversion, SolidColorConversion};

/// Every distinct solid color in depth-first order.
///
/// Fills come first, then the stroke, then text run colors. Two colors
/// are the same when their hex, alpha and variable binding match.
pub fn retrieve_colors(nodes: &[IntermediateNode], settings: &PluginSettings) -> Vec<SolidColorConversion> {
    let mut seen: Vec<&ColorSpec> = Vec::new();
    for root in nodes {
        root.walk(&mut |node| {
            let fills = node.style.fills.iter().filter_map(|fill| match fill {
                Fill::Solid { color } => Some(color),
                _ => None,
            });
            let stroke = node.style.stroke.iter().map(|s| &s.color);
            let runs = match &node.kind {
                NodeKind::Text(text) => text.runs.iter().filter_map(|r| r.color.as_ref()).collect(),
                _ => Vec::new(),
            };
            for color in fills.chain(stroke).chain(runs) {
                if !seen.iter().any(|c| same_color(c, color)) {
                    seen.push(color);
                }
            }
        });
    }
    seen.into_iter()
        .map(|color| SolidColorConversion::new(color, settings.framework, settings))
        .collect()
}

/// Every distinct gradient fill in depth-first order.
pub fn retrieve_gradients(
    nodes: &[IntermediateNode],
    settings: &PluginSettings,
) -> Vec<LinearGradientConversion> {
    let mut seen: Vec<&GradientSpec> = Vec::new();
    for root in nodes {
        root.walk(&mut |node| {
            for fill in &node.style.fills {
                if let Fill::Gradient { gradient } = fill {
                    if !seen.contains(&gradient) {
                        seen.push(gradient);
                    }
                }
            }
        });
    }
    seen.into_iter()
        .map(|gradient| LinearGradientConversion::new(gradient, settings.framework, settings))
        .collect()
}

fn same_color(a: &ColorSpec, b: &ColorSpec) -> bool {
    a.hex() == b.hex() && a.variable_name() == b.variable_name() && (a.alpha - b.alpha).abs() < 1e-6
}
