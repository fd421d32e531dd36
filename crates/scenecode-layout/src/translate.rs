//! Host layout → [`LayoutBox`] translation.

use glam::DVec2;

use scenecode_core::{
    CounterAxisAlign, HostLayoutMode, HostNode, HostSizing, LayoutPositioning, LayoutWrap,
    PrimaryAxisAlign, Rect,
};

use crate::layout_box::{
    Alignment, Axis, ChildSizing, DirectionalLayout, Distribution, LayoutBox, Padding, SizePolicy,
};

/// Children that take part in layout: the visible ones, in order.
pub fn layout_children(node: &HostNode) -> impl Iterator<Item = &HostNode> {
    node.children.iter().filter(|c| c.visible)
}

/// Translate a node's layout relative to its parent.
///
/// Always yields a valid box: non-finite numbers become zero and sizes are
/// never negative.
pub fn translate_layout(node: &HostNode, parent: Option<&HostNode>) -> LayoutBox {
    let frame = relative_frame(node, parent);

    let axis = match node.layout_mode {
        HostLayoutMode::Horizontal => Axis::Horizontal,
        HostLayoutMode::Vertical => Axis::Vertical,
        HostLayoutMode::None | HostLayoutMode::Unknown => {
            return LayoutBox::Absolute {
                x: frame.x,
                y: frame.y,
                width: frame.width,
                height: frame.height,
            };
        }
    };

    let distribution = match node.primary_axis_align_items {
        PrimaryAxisAlign::Center => Distribution::Center,
        PrimaryAxisAlign::Max => Distribution::End,
        PrimaryAxisAlign::SpaceBetween => Distribution::SpaceBetween,
        PrimaryAxisAlign::Min | PrimaryAxisAlign::Unknown => Distribution::Start,
    };
    let alignment = match node.counter_axis_align_items {
        CounterAxisAlign::Center => Alignment::Center,
        CounterAxisAlign::Max => Alignment::End,
        CounterAxisAlign::Baseline => Alignment::Baseline,
        CounterAxisAlign::Min | CounterAxisAlign::Unknown => Alignment::Start,
    };

    let children = layout_children(node)
        .map(|child| child_sizing(child, Some(node)))
        .collect();

    LayoutBox::Directional(DirectionalLayout {
        axis,
        distribution,
        alignment,
        gap: non_negative(node.item_spacing),
        cross_gap: non_negative(node.counter_axis_spacing),
        padding: Padding::new(
            non_negative(node.padding_top),
            non_negative(node.padding_right),
            non_negative(node.padding_bottom),
            non_negative(node.padding_left),
        ),
        wrap: node.layout_wrap == LayoutWrap::Wrap,
        frame,
        children,
    })
}

/// Sizing policy of `child` inside `parent`.
///
/// `Fill` only applies inside an auto-layout parent and `Hug` only to nodes
/// that have content to hug; anything else degrades to `Fixed`.
pub fn child_sizing(child: &HostNode, parent: Option<&HostNode>) -> ChildSizing {
    let in_flow_parent = parent.is_some_and(HostNode::has_auto_layout);
    let can_hug = child.has_auto_layout() || child.node_type == "TEXT";
    let policy = |sizing: HostSizing| match sizing {
        HostSizing::Fill if in_flow_parent => SizePolicy::Fill,
        HostSizing::Hug if can_hug => SizePolicy::Hug,
        _ => SizePolicy::Fixed,
    };
    ChildSizing {
        horizontal: policy(child.layout_sizing_horizontal),
        vertical: policy(child.layout_sizing_vertical),
        absolute: in_flow_parent && child.layout_positioning == LayoutPositioning::Absolute,
    }
}

/// The node's frame relative to the parent's origin, sanitized.
pub fn relative_frame(node: &HostNode, parent: Option<&HostNode>) -> Rect {
    let bounds = node.bounding_box().unwrap_or_default();
    let origin = parent
        .and_then(HostNode::bounding_box)
        .map(|p| DVec2::new(p.x, p.y))
        .unwrap_or(DVec2::new(bounds.x, bounds.y));
    let offset = DVec2::new(bounds.x, bounds.y) - origin;

    // Absolute boxes include rotation overhang; prefer the declared size.
    let width = if node.width.is_finite() { node.width } else { bounds.width };
    let height = if node.height.is_finite() { node.height } else { bounds.height };

    Rect::new(
        finite_or_zero(offset.x),
        finite_or_zero(offset.y),
        non_negative(width),
        non_negative(height),
    )
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn non_negative(v: f64) -> f64 {
    finite_or_zero(v).max(0.0)
}
