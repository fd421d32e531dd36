//! Host tree → intermediate tree.

use scenecode_core::{HostNode, PluginSettings, WarningSink};
use scenecode_layout::{layout_children, translate_layout};
use scenecode_style::{resolve_solid, resolve_style, StyleDescriptor, Typography};

use crate::error::{NormalizeError, Result};
use crate::kind::{classify, is_vector_subtree, HostKind};
use crate::node::{ImageData, IntermediateNode, NodeKind, TextData, TextRun, VectorData};

/// Nesting depth beyond which a subtree becomes a placeholder.
pub const MAX_DEPTH: usize = 128;

/// Normalize the selected top-level nodes.
///
/// Nodes the host cannot export or that have no bounding box are skipped
/// with a warning. Problems inside a subtree degrade that subtree to a
/// placeholder; nothing here aborts the run.
pub fn normalize(
    nodes: &[HostNode],
    settings: &PluginSettings,
    warnings: &WarningSink,
) -> Vec<IntermediateNode> {
    let normalizer = Normalizer { settings, warnings };
    let mut out = Vec::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        if let Err(err) = check_top_level(node) {
            tracing::info!(node_id = %node.id, error = %err, "skipping selected node");
            warnings.add(err.to_string());
            continue;
        }
        out.push(normalizer.node(node, None, 0, &index.to_string()));
    }
    tracing::debug!(
        selected = nodes.len(),
        normalized = out.len(),
        "normalized selection"
    );
    out
}

fn check_top_level(node: &HostNode) -> Result<()> {
    if !node.is_exportable {
        return Err(NormalizeError::NotExportable {
            name: node.name.clone(),
        });
    }
    if node.bounding_box().is_none() {
        return Err(NormalizeError::NoBoundingBox {
            name: node.name.clone(),
        });
    }
    Ok(())
}

struct Normalizer<'a> {
    settings: &'a PluginSettings,
    warnings: &'a WarningSink,
}

impl Normalizer<'_> {
    fn node(
        &self,
        node: &HostNode,
        parent: Option<&HostNode>,
        depth: usize,
        fallback_id: &str,
    ) -> IntermediateNode {
        match self.try_node(node, parent, depth, fallback_id) {
            Ok(normalized) => normalized,
            Err(err) => {
                tracing::warn!(node_id = %node.id, error = %err, "node converted to placeholder");
                self.warnings.add(err.to_string());
                placeholder(node, parent, fallback_id)
            }
        }
    }

    fn try_node(
        &self,
        node: &HostNode,
        parent: Option<&HostNode>,
        depth: usize,
        fallback_id: &str,
    ) -> Result<IntermediateNode> {
        if depth > MAX_DEPTH {
            return Err(NormalizeError::TooDeep {
                name: node.name.clone(),
            });
        }

        let host_kind = classify(node);
        let id = stable_id(node, fallback_id);
        let can_be_flattened = is_vector_subtree(node);
        let has_image = node.image_fill().is_some();
        let has_children = layout_children(node).next().is_some();

        let flatten = self.settings.embed_vectors
            && can_be_flattened
            && host_kind == HostKind::Container;

        let (kind, walk_children) = if flatten {
            (
                NodeKind::Image(ImageData {
                    asset: None,
                    exclude_children: false,
                    flattened: true,
                }),
                false,
            )
        } else {
            match host_kind {
                HostKind::Container if has_image => (
                    NodeKind::Image(ImageData {
                        asset: None,
                        exclude_children: has_children,
                        flattened: false,
                    }),
                    true,
                ),
                HostKind::Container => (NodeKind::Frame, true),
                HostKind::Rectangle if has_image => (NodeKind::Image(ImageData::default()), false),
                HostKind::Rectangle => (NodeKind::Frame, false),
                HostKind::Text => (NodeKind::Text(text_data(node)), false),
                HostKind::Vector => (NodeKind::Vector(VectorData::default()), false),
                HostKind::Boolean => (NodeKind::BooleanGroup(VectorData::default()), true),
                HostKind::Unsupported => {
                    return Err(NormalizeError::UnsupportedType {
                        name: node.name.clone(),
                        host_type: node.node_type.clone(),
                    });
                }
            }
        };

        let children = if walk_children {
            layout_children(node)
                .enumerate()
                .map(|(i, child)| self.node(child, Some(node), depth + 1, &format!("{}:{}", id, i)))
                .collect()
        } else {
            Vec::new()
        };

        Ok(IntermediateNode {
            id,
            name: node.name.clone(),
            kind,
            layout: translate_layout(node, parent),
            rotation: finite_or_zero(node.rotation),
            style: resolve_style(node),
            children,
            can_be_flattened,
            origin: origin(node),
        })
    }
}

/// Stand-in for a subtree that could not be normalized.
fn placeholder(node: &HostNode, parent: Option<&HostNode>, fallback_id: &str) -> IntermediateNode {
    IntermediateNode {
        id: stable_id(node, fallback_id),
        name: node.name.clone(),
        kind: NodeKind::Unknown {
            host_type: node.node_type.clone(),
        },
        layout: translate_layout(node, parent),
        rotation: 0.0,
        style: StyleDescriptor::default(),
        children: Vec::new(),
        can_be_flattened: false,
        origin: origin(node),
    }
}

/// Split a text node into styled runs.
///
/// Host segments are used when they tile the node's characters exactly;
/// otherwise the whole text becomes one run in the node's own style.
fn text_data(node: &HostNode) -> TextData {
    let characters = node.characters.clone().unwrap_or_default();
    let base_typography = node
        .style
        .as_ref()
        .map(Typography::from_type_style)
        .unwrap_or_default();
    let base_color = node.fills.iter().rev().find_map(resolve_solid);

    let segments_tile = !node.styled_segments.is_empty()
        && node
            .styled_segments
            .iter()
            .map(|s| s.characters.as_str())
            .collect::<String>()
            == characters;

    let runs = if segments_tile {
        node.styled_segments
            .iter()
            .filter(|s| !s.characters.is_empty())
            .map(|segment| TextRun {
                characters: segment.characters.clone(),
                typography: segment
                    .style
                    .as_ref()
                    .map(Typography::from_type_style)
                    .unwrap_or_else(|| base_typography.clone()),
                color: segment
                    .fills
                    .iter()
                    .rev()
                    .find_map(resolve_solid)
                    .or_else(|| base_color.clone()),
            })
            .collect()
    } else {
        if !node.styled_segments.is_empty() {
            tracing::debug!(node_id = %node.id, "styled segments do not match text, using single run");
        }
        vec![TextRun {
            characters: characters.clone(),
            typography: base_typography,
            color: base_color,
        }]
    };

    TextData { characters, runs }
}

fn stable_id(node: &HostNode, fallback_id: &str) -> String {
    if node.id.is_empty() {
        fallback_id.to_string()
    } else {
        node.id.clone()
    }
}

fn origin(node: &HostNode) -> Option<String> {
    (!node.id.is_empty()).then(|| node.id.clone())
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
    use scenecode_core::{HostLayoutMode, Paint, Rgba, StyledSegment, TypeStyle};

    fn frame(id: &str) -> HostNode {
        HostNode::new(id, id, "FRAME").with_geometry(0.0, 0.0, 100.0, 100.0)
    }

    fn run(nodes: &[HostNode], settings: &PluginSettings) -> (Vec<IntermediateNode>, Vec<String>) {
        let warnings = WarningSink::new();
        let out = normalize(nodes, settings, &warnings);
        (out, warnings.snapshot())
    }

    #[test]
    fn test_skips_unexportable_and_unbounded() {
        let not_exportable = HostNode {
            is_exportable: false,
            ..frame("a")
        };
        let unbounded = HostNode::new("b", "b", "FRAME").with_geometry(f64::NAN, 0.0, 1.0, 1.0);
        let (out, warnings) = run(&[not_exportable, unbounded, frame("c")], &PluginSettings::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "c");
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_invisible_children_filtered_in_order() {
        let root = frame("root")
            .with_child(frame("1"))
            .with_child(HostNode {
                visible: false,
                ..frame("2")
            })
            .with_child(HostNode::new("3", "3", "TEXT"));
        let (out, _) = run(&[root], &PluginSettings::default());
        let ids: Vec<_> = out[0].children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn test_unknown_type_becomes_placeholder_with_warning() {
        let root = frame("root").with_child(HostNode::new("s", "Note", "STICKY"));
        let (out, warnings) = run(&[root], &PluginSettings::default());
        assert!(matches!(&out[0].children[0].kind, NodeKind::Unknown { host_type } if host_type == "STICKY"));
        assert!(warnings[0].contains("converted to placeholder"));
    }

    #[test]
    fn test_vector_group_flattened_when_embedding() {
        let icon = HostNode::new("g", "Icon", "GROUP")
            .with_geometry(0.0, 0.0, 24.0, 24.0)
            .with_child(HostNode::new("v", "Path", "VECTOR"));
        let (out, _) = run(&[icon.clone()], &PluginSettings::default());
        assert!(matches!(&out[0].kind, NodeKind::Image(img) if img.flattened));
        assert!(out[0].children.is_empty());
        assert!(out[0].can_be_flattened);

        let settings = PluginSettings {
            embed_vectors: false,
            ..Default::default()
        };
        let (out, _) = run(&[icon], &settings);
        assert_eq!(out[0].kind, NodeKind::Frame);
        assert!(matches!(out[0].children[0].kind, NodeKind::Vector(_)));
    }

    #[test]
    fn test_image_frame_keeps_children() {
        let mut hero = frame("hero").with_fill(Paint::image("hash")).with_child(frame("cta"));
        hero.layout_mode = HostLayoutMode::Vertical;
        let (out, _) = run(&[hero], &PluginSettings::default());
        match &out[0].kind {
            NodeKind::Image(img) => assert!(img.exclude_children && !img.flattened),
            other => panic!("unexpected kind {:?}", other),
        }
        assert_eq!(out[0].children.len(), 1);
        assert!(out[0].renders_children());
    }

    #[test]
    fn test_text_runs_from_segments() {
        let mut text = HostNode::new("t", "Title", "TEXT").with_geometry(0.0, 0.0, 10.0, 10.0);
        text.characters = Some("Hello world".into());
        text.styled_segments = vec![
            StyledSegment {
                characters: "Hello ".into(),
                start: 0,
                end: 6,
                style: None,
                fills: vec![],
            },
            StyledSegment {
                characters: "world".into(),
                start: 6,
                end: 11,
                style: Some(TypeStyle {
                    font_weight: 700.0,
                    ..Default::default()
                }),
                fills: vec![Paint::solid(Rgba::new(1.0, 0.0, 0.0, 1.0))],
            },
        ];
        let (out, _) = run(&[text], &PluginSettings::default());
        let NodeKind::Text(data) = &out[0].kind else {
            panic!("expected text");
        };
        assert_eq!(data.runs.len(), 2);
        assert!(data.is_mixed());
        assert_eq!(data.runs[1].typography.weight.as_str(), "700");
    }

    #[test]
    fn test_mismatched_segments_fall_back_to_single_run() {
        let mut text = HostNode::new("t", "T", "TEXT").with_geometry(0.0, 0.0, 10.0, 10.0);
        text.characters = Some("abc".into());
        text.styled_segments = vec![StyledSegment {
            characters: "xyz".into(),
            start: 0,
            end: 3,
            style: None,
            fills: vec![],
        }];
        let (out, _) = run(&[text], &PluginSettings::default());
        let NodeKind::Text(data) = &out[0].kind else {
            panic!("expected text");
        };
        assert_eq!(data.runs.len(), 1);
        assert_eq!(data.runs[0].characters, "abc");
    }

    #[test]
    fn test_deep_nesting_degrades_to_placeholder() {
        let mut node = HostNode::new("leaf", "leaf", "FRAME");
        for i in 0..(MAX_DEPTH + 2) {
            node = HostNode::new(format!("n{}", i), "n", "FRAME").with_child(node);
        }
        let node = node.with_geometry(0.0, 0.0, 1.0, 1.0);
        let (out, warnings) = run(&[node], &PluginSettings::default());
        assert_eq!(out.len(), 1);
        assert!(warnings.iter().any(|w| w.contains("nested too deeply")));
    }

    #[test]
    fn test_missing_ids_derive_from_path() {
        let root = frame("root").with_child(HostNode::new("", "anon", "RECTANGLE"));
        let (out, _) = run(&[root], &PluginSettings::default());
        assert_eq!(out[0].children[0].id, "root:0");
        assert_eq!(out[0].children[0].origin, None);
    }
}
