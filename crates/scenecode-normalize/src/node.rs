//! The intermediate node tree.
//!
//! Every generator consumes this representation and nothing else. It is a
//! strict tree: children are owned by their parent and the only link back to
//! the host is the `origin` id, which can be stripped at any time.

use serde::{Deserialize, Serialize};

use scenecode_core::AssetReference;
use scenecode_layout::LayoutBox;
use scenecode_style::{ColorSpec, StyleDescriptor, Typography};

/// A normalized node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntermediateNode {
    /// Stable id derived from the host id
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub layout: LayoutBox,
    pub rotation: f64,
    pub style: StyleDescriptor,
    pub children: Vec<IntermediateNode>,
    /// Whether the subtree contains only vector content
    pub can_be_flattened: bool,
    /// Host node id used to re-export this node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl IntermediateNode {
    pub fn width(&self) -> f64 {
        self.layout.width()
    }

    pub fn height(&self) -> f64 {
        self.layout.height()
    }

    /// Resolved asset for nodes rendered as a picture.
    pub fn asset(&self) -> Option<&AssetReference> {
        match &self.kind {
            NodeKind::Image(image) => image.asset.as_ref(),
            NodeKind::Vector(vector) | NodeKind::BooleanGroup(vector) => vector.asset.as_ref(),
            _ => None,
        }
    }

    /// Whether generators render this node as a picture rather than a box.
    pub fn is_picture(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Image(_) | NodeKind::Vector(_) | NodeKind::BooleanGroup(_)
        )
    }

    /// Whether generators walk into the children.
    ///
    /// Image nodes with excluded children keep them as content on top of the
    /// image; vectors, boolean groups and flattened images do not.
    pub fn renders_children(&self) -> bool {
        match &self.kind {
            NodeKind::Frame => true,
            NodeKind::Image(image) => image.exclude_children && !image.flattened,
            _ => false,
        }
    }

    /// Depth-first pre-order traversal.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a IntermediateNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Number of nodes in this subtree.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(IntermediateNode::count).sum::<usize>()
    }
}

/// Closed set of node kinds decided once during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    Frame,
    Text(TextData),
    Vector(VectorData),
    Image(ImageData),
    BooleanGroup(VectorData),
    /// Unsupported host type, rendered as a placeholder
    Unknown {
        #[serde(rename = "hostType")]
        host_type: String,
    },
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Frame => "frame",
            NodeKind::Text(_) => "text",
            NodeKind::Vector(_) => "vector",
            NodeKind::Image(_) => "image",
            NodeKind::BooleanGroup(_) => "booleanGroup",
            NodeKind::Unknown { .. } => "unknown",
        }
    }
}

/// Text content split into styled runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub characters: String,
    pub runs: Vec<TextRun>,
}

impl TextData {
    /// Whether the runs differ in style and need per-run output.
    pub fn is_mixed(&self) -> bool {
        self.runs
            .windows(2)
            .any(|w| w[0].typography != w[1].typography || w[0].color != w[1].color)
    }
}

/// A run of characters sharing one style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub characters: String,
    pub typography: Typography,
    pub color: Option<ColorSpec>,
}

/// A vector shape or boolean group rendered as an asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetReference>,
}

/// An image node, possibly a flattened vector subtree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    /// Filled in by the asset pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetReference>,
    /// Export the node alone, with its children hidden
    pub exclude_children: bool,
    /// A vector subtree collapsed into one image
    pub flattened: bool,
}
